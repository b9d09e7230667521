//! Agent definitions and the tools they can call.
//!
//! The LLM runtime that plans and dispatches calls lives outside this crate.
//! Here each tool is a typed operation the runtime (or the HTTP API) invokes by name.

pub mod definitions;
pub mod mock_tools;
pub mod prompts;
pub mod tools;
pub mod workspace_tools;

pub use definitions::agent_definitions;
pub use tools::{TamTool, ToolName, ToolRegistry};

use std::sync::Arc;

use crate::health::HealthEvaluator;
use crate::report::QbrGenerator;
use crate::sources::WorkspaceClient;
use crate::support::SupportCaseManager;

/// Registers every tool named by [`ToolName`].
pub fn build_registry(
    health: Arc<HealthEvaluator>,
    support: Arc<SupportCaseManager>,
    reports: Arc<QbrGenerator>,
    workspace: Arc<dyn WorkspaceClient>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(tools::PlatformHealthTool::new(health));
    registry.register(tools::OpenSupportCasesTool::new(support));
    registry.register(tools::QbrDataTool::new(reports));
    registry.register(tools::TechnicalQuestionTool);

    registry.register(mock_tools::GcpMonitoringTool);
    registry.register(mock_tools::GcpBillingTool);
    registry.register(mock_tools::GcpUsageTool);
    registry.register(mock_tools::CreateCaseTool);
    registry.register(mock_tools::CustomerProfileTool);
    registry.register(mock_tools::GmailDraftTool);
    registry.register(mock_tools::GoogleChatTool);
    registry.register(mock_tools::GoogleSlidesTool);
    registry.register(mock_tools::KnowledgeSearchTool);

    registry.register(workspace_tools::ListDriveFilesTool::new(workspace.clone()));
    registry.register(workspace_tools::ReadDriveFileTool::new(workspace.clone()));
    registry.register(workspace_tools::ReadGmailMessageTool::new(workspace.clone()));
    registry.register(workspace_tools::SendGmailMessageTool::new(workspace));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemorySupportCases, InMemoryWarehouse, StaticSignals};
    use crate::sources::MockWorkspaceClient;
    use strum::IntoEnumIterator;

    fn registry() -> ToolRegistry {
        let warehouse = Arc::new(InMemoryWarehouse::new());
        let signals = Arc::new(StaticSignals::unavailable());
        let health = Arc::new(HealthEvaluator::new(
            signals.clone(),
            warehouse.clone(),
            signals.clone(),
            signals,
        ));
        let support = Arc::new(SupportCaseManager::new(Arc::new(InMemorySupportCases::new())));
        let reports = Arc::new(QbrGenerator::new(warehouse));
        build_registry(health, support, reports, Arc::new(MockWorkspaceClient::new()))
    }

    #[test]
    fn test_every_tool_name_is_registered() {
        let registry = registry();
        for name in ToolName::iter() {
            assert!(registry.get(name).is_some(), "{} is not registered", name);
        }
        assert_eq!(registry.list().len(), ToolName::iter().count());
    }

    #[test]
    fn test_agent_tools_exist_in_registry() {
        let registry = registry();
        let registered: Vec<String> = registry.names().iter().map(ToString::to_string).collect();
        for agent in agent_definitions() {
            for tool in &agent.tools {
                assert!(registered.contains(tool), "{} references unknown tool {}", agent.name, tool);
            }
        }
    }
}
