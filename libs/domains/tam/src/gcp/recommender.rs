use async_trait::async_trait;
use serde::Deserialize;

use super::{GoogleApiClient, api_url};
use crate::error::TamResult;
use crate::sources::RecommendationSource;

const RECOMMENDER_API: &str = "https://recommender.googleapis.com/v1";
const SOURCE: &str = "recommender";
const PAGE_SIZE: usize = 5;

pub const MACHINE_TYPE_RECOMMENDER: &str = "google.compute.instance.MachineTypeRecommender";

/// Machine-type recommendations for one location.
pub struct Recommender {
    api: GoogleApiClient,
    location: String,
}

#[derive(Debug, Deserialize)]
struct ListRecommendationsResponse {
    #[serde(default)]
    recommendations: Vec<RecommendationEntry>,
}

#[derive(Debug, Deserialize)]
struct RecommendationEntry {
    #[serde(default)]
    description: String,
}

impl Recommender {
    pub fn new(api: GoogleApiClient, location: impl Into<String>) -> Self {
        Self {
            api,
            location: location.into(),
        }
    }
}

#[async_trait]
impl RecommendationSource for Recommender {
    async fn recommendations(&self, project_id: &str) -> TamResult<Vec<String>> {
        let url = api_url(
            RECOMMENDER_API,
            &[
                "projects",
                project_id,
                "locations",
                self.location.as_str(),
                "recommenders",
                MACHINE_TYPE_RECOMMENDER,
                "recommendations",
            ],
        )?;
        let query = [("pageSize", PAGE_SIZE.to_string())];

        let response: ListRecommendationsResponse = self.api.get_json(SOURCE, url, &query).await?;
        Ok(descriptions(response))
    }
}

fn descriptions(response: ListRecommendationsResponse) -> Vec<String> {
    response
        .recommendations
        .into_iter()
        .take(PAGE_SIZE)
        .map(|r| r.description)
        .collect()
}
