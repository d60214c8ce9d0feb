//! Interactive session commands read from stdin

use anyhow::{bail, Result};
use honeylens_runtime::InteractionKind;
use std::str::FromStr;

pub const HELP: &str = "commands: click, scroll, query, sensitivity <value>, reload, quit";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Interact(InteractionKind),
    Query,
    /// New stored sensitivity; no argument removes it
    Sensitivity(Option<String>),
    Reload,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            bail!("empty command");
        };

        let parsed = match command.to_ascii_lowercase().as_str() {
            "click" => SessionCommand::Interact(InteractionKind::Click),
            "scroll" => SessionCommand::Interact(InteractionKind::Scroll),
            "query" | "results" => SessionCommand::Query,
            "sensitivity" => SessionCommand::Sensitivity(parts.next().map(str::to_string)),
            "reload" => SessionCommand::Reload,
            "quit" | "exit" => SessionCommand::Quit,
            other => bail!("unknown command '{}' ({})", other, HELP),
        };

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "click".parse::<SessionCommand>().unwrap(),
            SessionCommand::Interact(InteractionKind::Click)
        );
        assert_eq!(
            "  SCROLL ".parse::<SessionCommand>().unwrap(),
            SessionCommand::Interact(InteractionKind::Scroll)
        );
        assert_eq!("query".parse::<SessionCommand>().unwrap(), SessionCommand::Query);
        assert_eq!(
            "sensitivity 10".parse::<SessionCommand>().unwrap(),
            SessionCommand::Sensitivity(Some("10".to_string()))
        );
        assert_eq!(
            "sensitivity".parse::<SessionCommand>().unwrap(),
            SessionCommand::Sensitivity(None)
        );
        assert_eq!("exit".parse::<SessionCommand>().unwrap(), SessionCommand::Quit);
    }

    #[test]
    fn test_rejects_unknown_and_empty() {
        assert!("hover".parse::<SessionCommand>().is_err());
        assert!("   ".parse::<SessionCommand>().is_err());
    }
}
