use super::prompts::{
    TAM_ASSISTANT_PROMPT, TAM_COPILOT_PROMPT, TAM_SUPER_AGENT_PROMPT, USER_STORY_PROMPT,
};
use super::tools::ToolName;
use crate::models::AgentDefinition;

fn agent(
    name: &str,
    model: &str,
    description: &str,
    instruction: &str,
    tools: &[ToolName],
) -> AgentDefinition {
    AgentDefinition {
        name: name.to_string(),
        model: model.to_string(),
        description: description.to_string(),
        instruction: instruction.trim().to_string(),
        tools: tools.iter().map(ToString::to_string).collect(),
    }
}

/// All agents served by the registry.
pub fn agent_definitions() -> Vec<AgentDefinition> {
    vec![
        agent(
            "tam_copilot",
            "gemini-2.5-pro",
            "Gathers platform health, support case and QBR data for Technical Account Managers.",
            TAM_COPILOT_PROMPT,
            &[
                ToolName::GetPlatformHealth,
                ToolName::GetOpenSupportCases,
                ToolName::GenerateQbrData,
                ToolName::AnswerTechnicalQuestion,
            ],
        ),
        agent(
            "tam_super_agent",
            "gemini-2.5-flash",
            "Plans and drafts across monitoring, billing, CRM, communication and knowledge tools.",
            TAM_SUPER_AGENT_PROMPT,
            &[
                ToolName::GcpMonitoring,
                ToolName::GcpBilling,
                ToolName::GcpUsage,
                ToolName::CreateCase,
                ToolName::GetCustomerProfile,
                ToolName::GmailDraft,
                ToolName::GoogleChat,
                ToolName::GoogleSlides,
                ToolName::InternalKnowledgeSearch,
            ],
        ),
        agent(
            "tam_assistant",
            "gemini-1.5-flash",
            "A TAM assistant that replies to emails and refers to documents in Google Drive.",
            TAM_ASSISTANT_PROMPT,
            &[
                ToolName::ListDriveFiles,
                ToolName::ReadDriveFile,
                ToolName::ReadGmailMessage,
                ToolName::SendGmailMessage,
            ],
        ),
        agent(
            "user_story_agent",
            "gemini-2.5-flash",
            "Turns raw requirements into structured user stories.",
            USER_STORY_PROMPT,
            &[],
        ),
    ]
}
