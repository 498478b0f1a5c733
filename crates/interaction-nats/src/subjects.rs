//! NATS subject patterns for component interactions
//!
//! Subject pattern: `interaction.{prefix}.{direction}.{entity}.{action}`
//!
//! Bot Events (chat bot → agent):
//! - `interaction.{prefix}.bot.component.activated`
//!
//! Agent Commands (agent → chat bot):
//! - `interaction.{prefix}.agent.layout.send` (request/reply)
//! - `interaction.{prefix}.agent.layout.update`
//! - `interaction.{prefix}.agent.notice.ephemeral`
//!
//! Services offered by the agent:
//! - `interaction.{prefix}.agent.prompt` (request/reply)

/// Subject builders for bot events
pub mod bot {
    /// A control on one of our messages was activated
    pub fn component_activated(prefix: &str) -> String {
        format!("interaction.{}.bot.component.activated", prefix)
    }

    /// Wildcard for all bot events
    pub fn all(prefix: &str) -> String {
        format!("interaction.{}.bot.>", prefix)
    }
}

/// Subject builders for agent commands and services
pub mod agent {
    pub fn layout_send(prefix: &str) -> String {
        format!("interaction.{}.agent.layout.send", prefix)
    }

    pub fn layout_update(prefix: &str) -> String {
        format!("interaction.{}.agent.layout.update", prefix)
    }

    pub fn notice_ephemeral(prefix: &str) -> String {
        format!("interaction.{}.agent.notice.ephemeral", prefix)
    }

    /// Prompt service: show a layout and reply with the matching activation
    pub fn prompt(prefix: &str) -> String {
        format!("interaction.{}.agent.prompt", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_subjects() {
        assert_eq!(
            bot::component_activated("prod"),
            "interaction.prod.bot.component.activated"
        );
        assert_eq!(bot::all("prod"), "interaction.prod.bot.>");
    }

    #[test]
    fn test_agent_subjects() {
        assert_eq!(
            agent::layout_send("dev"),
            "interaction.dev.agent.layout.send"
        );
        assert_eq!(
            agent::layout_update("dev"),
            "interaction.dev.agent.layout.update"
        );
        assert_eq!(
            agent::notice_ephemeral("dev"),
            "interaction.dev.agent.notice.ephemeral"
        );
        assert_eq!(agent::prompt("dev"), "interaction.dev.agent.prompt");
    }
}
