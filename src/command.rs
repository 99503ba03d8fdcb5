//! Operator commands.
//!
//! Produces plain text lines; rendering and permission checks belong to the
//! host that registers the command.

use crate::motd::ReloadCoordinator;

const PREFIX: &str = "[MiniMOTD]";

/// Commands an operator can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    Reload,
    About,
}

impl std::str::FromStr for OperatorCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reload" => Ok(OperatorCommand::Reload),
            "about" => Ok(OperatorCommand::About),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

/// Text reported back to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub lines: Vec<String>,
}

impl OperatorCommand {
    pub fn execute(self, coordinator: &ReloadCoordinator) -> CommandOutput {
        match self {
            OperatorCommand::Reload => {
                let mut lines = vec![format!("{PREFIX} Reloading MiniMOTD...")];
                let success = match coordinator.reload() {
                    Ok(snapshot) => {
                        lines.push(format!(
                            "{PREFIX} Done reloading MiniMOTD. ({} icons, generation {})",
                            snapshot.icons().len(),
                            snapshot.generation()
                        ));
                        true
                    }
                    Err(e) => {
                        lines.push(format!("{PREFIX} Reload failed: {e}"));
                        lines.push(format!(
                            "{PREFIX} Still serving generation {}.",
                            coordinator.generation()
                        ));
                        false
                    }
                };
                CommandOutput { success, lines }
            }
            OperatorCommand::About => CommandOutput {
                success: true,
                lines: vec![
                    "------------------".to_string(),
                    format!("    MiniMOTD v{}", env!("CARGO_PKG_VERSION")),
                    format!("    Serving generation {}", coordinator.generation()),
                    "------------------".to_string(),
                ],
            },
        }
    }
}
