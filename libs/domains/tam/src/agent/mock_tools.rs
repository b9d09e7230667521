//! Integrations that answer with fixed, deterministic text.
//!
//! They stand in for monitoring, billing, CRM, chat and slides back ends
//! so an agent can be exercised end to end without those systems.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use validator::Validate;

use super::tools::{TamTool, ToolName, parse_args};
use crate::error::TamResult;

const CREATED_CASE_ID: &str = "CASE-8675309";
const QBR_DECK_URL: &str = "https://docs.google.com/presentation/d/1aBcDeFgHiJkLmNoPqRsTuVwXyZ/edit";

/// Keyword lookup over the internal post-mortems and fit guides.
pub fn search_knowledge_base(query: &str) -> Option<&'static str> {
    let query = query.to_lowercase();
    if query.contains("database latency") {
        return Some(
            "Found one relevant post-mortem document: 'PM-2024-08-15-Database-Hotspotting'.\n\
             Summary: A previous incident was caused by a misconfigured connection pool, \
             leading to lock contention. Recommended action was to implement exponential backoff \
             and increase the pool size.",
        );
    }
    if query.contains("postgres") {
        return Some(
            "Found internal document 'AlloyDB Omni for Postgres - Customer Fit Guide'.\n\
             Ideal customers are those running self-managed PostgreSQL on VMs, \
             experiencing high operational overhead, and looking for better performance and availability.",
        );
    }
    None
}

fn string_schema(fields: &[(&str, &str)]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    json!({ "type": "object", "properties": properties, "required": required })
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProjectInput {
    #[validate(length(min = 1))]
    pub customer_project_id: String,
}

pub struct GcpMonitoringTool;

#[async_trait]
impl TamTool for GcpMonitoringTool {
    fn name(&self) -> ToolName {
        ToolName::GcpMonitoring
    }

    fn description(&self) -> &'static str {
        "Analyze Cloud Monitoring data for a customer project and flag services with high latency, error rates or saturation"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[("customer_project_id", "Customer GCP project id")])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: ProjectInput = parse_args(self.name(), arguments)?;
        info!(project = %input.customer_project_id, "Analyzing monitoring data");
        Ok("Analysis Complete:\n\
            - The 'billing-service' is showing a 20% increase in p99 latency week-over-week.\n\
            - The 'frontend-load-balancer' has a 5% error rate, which is above the 1% SLO.\n\
            - All other services are within normal operating parameters."
            .to_string())
    }
}

pub struct GcpBillingTool;

#[async_trait]
impl TamTool for GcpBillingTool {
    fn name(&self) -> ToolName {
        ToolName::GcpBilling
    }

    fn description(&self) -> &'static str {
        "Analyze Cloud Billing data for cost-saving opportunities"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[("customer_project_id", "Customer GCP project id")])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: ProjectInput = parse_args(self.name(), arguments)?;
        info!(project = %input.customer_project_id, "Analyzing billing data");
        Ok("Analysis Complete:\n\
            - Identified 5 large, idle n2-standard-16 VMs that could be shut down, saving an estimated $2,100/month.\n\
            - Recommends applying a Committed Use Discount for GKE resources, saving an estimated $4,500/month."
            .to_string())
    }
}

pub struct GcpUsageTool;

#[async_trait]
impl TamTool for GcpUsageTool {
    fn name(&self) -> ToolName {
        ToolName::GcpUsage
    }

    fn description(&self) -> &'static str {
        "Gather quarterly service usage statistics for a customer project, used for QBR preparation"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[("customer_project_id", "Customer GCP project id")])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: ProjectInput = parse_args(self.name(), arguments)?;
        info!(project = %input.customer_project_id, "Gathering quarterly usage data");
        Ok("Quarterly Usage Data:\n\
            - GCE Core-hours: 1.2M (up 15% from last quarter)\n\
            - GKE Pod-hours: 3.5M (up 30% from last quarter)\n\
            - BigQuery Bytes Scanned: 500TB (up 25% from last quarter)\n\
            - New Services Adopted: Cloud Run, AlloyDB."
            .to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCaseInput {
    #[validate(length(min = 1))]
    pub customer_name: String,
    #[validate(length(min = 1))]
    pub priority: String,
    #[validate(length(min = 1))]
    pub summary: String,
}

pub struct CreateCaseTool;

#[async_trait]
impl TamTool for CreateCaseTool {
    fn name(&self) -> ToolName {
        ToolName::CreateCase
    }

    fn description(&self) -> &'static str {
        "Create a new support case in the case management system"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[
            ("customer_name", "Customer the case is for"),
            ("priority", "Case priority, e.g. P1"),
            ("summary", "One-line description of the issue"),
        ])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: CreateCaseInput = parse_args(self.name(), arguments)?;
        info!(customer = %input.customer_name, priority = %input.priority, summary = %input.summary, "Creating support case");
        Ok(format!(
            "Successfully created new support case. Case ID: {}",
            CREATED_CASE_ID
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 1))]
    pub customer_name: String,
}

pub struct CustomerProfileTool;

#[async_trait]
impl TamTool for CustomerProfileTool {
    fn name(&self) -> ToolName {
        ToolName::GetCustomerProfile
    }

    fn description(&self) -> &'static str {
        "Retrieve a customer's CRM profile: business goals, tech stack and key contacts"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[("customer_name", "Customer name as recorded in the CRM")])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: CustomerInput = parse_args(self.name(), arguments)?;
        if input.customer_name.contains('Z') {
            return Ok("Customer 'Z' Profile:\n\
                - Industry: Finance\n\
                - Stated Goal: Reduce data processing costs by 20%.\n\
                - Current Stack: Heavy use of self-managed Postgres on GCE, BigQuery."
                .to_string());
        }
        Ok("Customer Profile:\n\
            - Industry: Retail\n\
            - Stated Goal: Improve e-commerce checkout reliability.\n\
            - Current Stack: GKE, Cloud SQL, Spanner."
            .to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GmailDraftInput {
    #[validate(length(min = 1))]
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

pub struct GmailDraftTool;

#[async_trait]
impl TamTool for GmailDraftTool {
    fn name(&self) -> ToolName {
        ToolName::GmailDraft
    }

    fn description(&self) -> &'static str {
        "Create a draft email in Gmail for human review"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[
            ("recipient", "Email address of the recipient"),
            ("subject", "Subject line"),
            ("body", "Plain-text body"),
        ])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: GmailDraftInput = parse_args(self.name(), arguments)?;
        info!(recipient = %input.recipient, subject = %input.subject, "Creating Gmail draft");
        Ok(format!("Successfully created email draft for '{}'.", input.recipient))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatMessageInput {
    #[validate(length(min = 1))]
    pub message: String,
}

pub struct GoogleChatTool;

#[async_trait]
impl TamTool for GoogleChatTool {
    fn name(&self) -> ToolName {
        ToolName::GoogleChat
    }

    fn description(&self) -> &'static str {
        "Send a notification to the incident Google Chat room"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[("message", "Notification text")])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: ChatMessageInput = parse_args(self.name(), arguments)?;
        info!(message = %input.message, "Sending Google Chat notification");
        Ok("Successfully sent notification to incident channel.".to_string())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SlidesInput {
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub usage_data: String,
    pub crm_data: String,
}

pub struct GoogleSlidesTool;

#[async_trait]
impl TamTool for GoogleSlidesTool {
    fn name(&self) -> ToolName {
        ToolName::GoogleSlides
    }

    fn description(&self) -> &'static str {
        "Create a QBR presentation from the template, populated with usage and CRM data"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[
            ("customer_name", "Customer the deck is for"),
            ("usage_data", "Usage summary to place on the slides"),
            ("crm_data", "CRM profile to place on the slides"),
        ])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: SlidesInput = parse_args(self.name(), arguments)?;
        info!(customer = %input.customer_name, "Generating QBR presentation");
        Ok(format!(
            "Successfully created QBR presentation. Link: {}",
            QBR_DECK_URL
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct KnowledgeSearchInput {
    #[validate(length(min = 1))]
    pub query: String,
}

pub struct KnowledgeSearchTool;

#[async_trait]
impl TamTool for KnowledgeSearchTool {
    fn name(&self) -> ToolName {
        ToolName::InternalKnowledgeSearch
    }

    fn description(&self) -> &'static str {
        "Search the internal knowledge base for post-mortems and guides relevant to a query"
    }

    fn parameters_schema(&self) -> Value {
        string_schema(&[("query", "Search terms")])
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: KnowledgeSearchInput = parse_args(self.name(), arguments)?;
        Ok(search_knowledge_base(&input.query)
            .unwrap_or("No relevant documents found in the knowledge base.")
            .to_string())
    }
}
