//! Tool contract, registry and the Co-Pilot tools backed by live services.

use async_trait::async_trait;
use observability::ReportingMetrics;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use validator::Validate;

use crate::error::{TamError, TamResult};
use crate::health::HealthEvaluator;
use crate::models::{DEFAULT_TIME_PERIOD_DAYS, ToolDescriptor, validate_project_id};
use crate::report::QbrGenerator;
use crate::support::SupportCaseManager;

use super::mock_tools::search_knowledge_base;

/// Every tool an agent may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    GetPlatformHealth,
    GetOpenSupportCases,
    GenerateQbrData,
    AnswerTechnicalQuestion,
    GcpMonitoring,
    GcpBilling,
    GcpUsage,
    CreateCase,
    GetCustomerProfile,
    GmailDraft,
    GoogleChat,
    GoogleSlides,
    InternalKnowledgeSearch,
    ListDriveFiles,
    ReadDriveFile,
    ReadGmailMessage,
    SendGmailMessage,
}

/// A named operation with typed arguments.
#[async_trait]
pub trait TamTool: Send + Sync {
    fn name(&self) -> ToolName;

    /// Description for the LLM to understand when to use this tool
    fn description(&self) -> &'static str;

    /// JSON schema for the tool's arguments
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, arguments: Value) -> TamResult<String>;
}

/// Deserializes and validates tool arguments. `null` counts as `{}`.
pub(crate) fn parse_args<T: DeserializeOwned + Validate>(tool: ToolName, arguments: Value) -> TamResult<T> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    let input: T = serde_json::from_value(arguments)
        .map_err(|e| TamError::Validation(format!("{}: {}", tool, e)))?;
    input
        .validate()
        .map_err(|e| TamError::Validation(format!("{}: {}", tool, e)))?;
    Ok(input)
}

pub(crate) fn to_output<T: serde::Serialize>(value: &T) -> TamResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| TamError::Internal(e.to_string()))
}

// =============================================================================
// Co-Pilot tools
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct PlatformHealthInput {
    #[validate(length(min = 1, max = 128), custom(function = "validate_project_id"))]
    pub project_id: String,
    #[validate(range(min = 1, max = 90))]
    pub time_period_days: Option<u32>,
}

pub struct PlatformHealthTool {
    evaluator: Arc<HealthEvaluator>,
}

impl PlatformHealthTool {
    pub fn new(evaluator: Arc<HealthEvaluator>) -> Self {
        Self { evaluator }
    }
}

#[async_trait]
impl TamTool for PlatformHealthTool {
    fn name(&self) -> ToolName {
        ToolName::GetPlatformHealth
    }

    fn description(&self) -> &'static str {
        "Summarize a project's health: performance status, cost trend, new critical security findings and optimization recommendations"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": { "type": "string", "description": "GCP project id" },
                "time_period_days": {
                    "type": "integer",
                    "description": "Days to look back",
                    "minimum": 1,
                    "maximum": 90,
                    "default": DEFAULT_TIME_PERIOD_DAYS
                }
            },
            "required": ["project_id"]
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: PlatformHealthInput = parse_args(self.name(), arguments)?;
        let days = input.time_period_days.unwrap_or(DEFAULT_TIME_PERIOD_DAYS);
        let response = self.evaluator.evaluate(&input.project_id, days).await?;
        to_output(&response)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SupportCasesInput {
    #[validate(length(min = 1))]
    pub customer_account_id: String,
}

pub struct OpenSupportCasesTool {
    manager: Arc<SupportCaseManager>,
}

impl OpenSupportCasesTool {
    pub fn new(manager: Arc<SupportCaseManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl TamTool for OpenSupportCasesTool {
    fn name(&self) -> ToolName {
        ToolName::GetOpenSupportCases
    }

    fn description(&self) -> &'static str {
        "List open support cases for a customer account with the number of P1 cases"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "customer_account_id": {
                    "type": "string",
                    "description": "Customer project id or resource name, e.g. organizations/123"
                }
            },
            "required": ["customer_account_id"]
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: SupportCasesInput = parse_args(self.name(), arguments)?;
        let summary = self.manager.open_cases_summary(&input.customer_account_id).await?;
        to_output(&summary)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct QbrInput {
    #[validate(length(min = 1, max = 128), custom(function = "validate_project_id"))]
    pub project_id: String,
    pub quarter: Option<String>,
}

pub struct QbrDataTool {
    generator: Arc<QbrGenerator>,
}

impl QbrDataTool {
    pub fn new(generator: Arc<QbrGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl TamTool for QbrDataTool {
    fn name(&self) -> ToolName {
        ToolName::GenerateQbrData
    }

    fn description(&self) -> &'static str {
        "Build quarterly business review data: total cost, trend against the previous quarter, top services and recommendations"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_id": { "type": "string", "description": "GCP project id" },
                "quarter": {
                    "type": "string",
                    "description": "Quarter label such as Q3-2025, defaults to the current quarter",
                    "pattern": "^Q[1-4]-\\d{4}$"
                }
            },
            "required": ["project_id"]
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: QbrInput = parse_args(self.name(), arguments)?;
        let report = self
            .generator
            .generate(&input.project_id, input.quarter.as_deref())
            .await?;
        to_output(&report)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TechnicalQuestionInput {
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
}

/// Answers from internal guidance when a match exists.
pub struct TechnicalQuestionTool;

#[async_trait]
impl TamTool for TechnicalQuestionTool {
    fn name(&self) -> ToolName {
        ToolName::AnswerTechnicalQuestion
    }

    fn description(&self) -> &'static str {
        "Answer a technical question using internal post-mortems and fit guides"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "question": { "type": "string", "description": "The customer's technical question" }
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, arguments: Value) -> TamResult<String> {
        let input: TechnicalQuestionInput = parse_args(self.name(), arguments)?;
        Ok(match search_knowledge_base(&input.question) {
            Some(document) => format!("Based on internal guidance:\n{}", document),
            None => format!(
                "No internal guidance matches '{}'. Check the public documentation at https://cloud.google.com/docs and escalate to a specialist if needed.",
                input.question
            ),
        })
    }
}

// =============================================================================
// Tool Registry
// =============================================================================

/// Collection of all available tools
pub struct ToolRegistry {
    tools: Vec<Box<dyn TamTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Replaces any tool already registered under the same name.
    pub fn register<T: TamTool + 'static>(&mut self, tool: T) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(Box::new(tool));
    }

    pub fn get(&self, name: ToolName) -> Option<&dyn TamTool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn names(&self) -> Vec<ToolName> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|t| ToolDescriptor {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    pub async fn execute(&self, name: &str, arguments: Value) -> TamResult<String> {
        let tool = ToolName::from_str(name)
            .ok()
            .and_then(|n| self.get(n))
            .ok_or_else(|| TamError::UnknownTool(name.to_string()))?;

        let result = tool.execute(arguments).await;
        ReportingMetrics::record_tool_invocation(name, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(tool = name, error = %e, "Tool execution failed");
        }
        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
