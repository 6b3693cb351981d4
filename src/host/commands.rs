use crate::models::HostLifecycle;

/// One line of input to the host runtime.
///
/// Lifecycle words stand in for the OS notifications a mobile shell would
/// forward; `fetch` stands in for an OS background-fetch wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Lifecycle(HostLifecycle),
    Fetch,
    Status,
    Quit,
}

impl HostCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let word = line.trim();
        if word.is_empty() {
            return Ok(None);
        }

        let command = match word.to_ascii_lowercase().as_str() {
            "fetch" => HostCommand::Fetch,
            "status" => HostCommand::Status,
            "quit" | "exit" | "terminate" => HostCommand::Quit,
            other => HostCommand::Lifecycle(other.parse()?),
        };
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            HostCommand::parse("background\n"),
            Ok(Some(HostCommand::Lifecycle(HostLifecycle::Background)))
        );
        assert_eq!(HostCommand::parse("FETCH"), Ok(Some(HostCommand::Fetch)));
        assert_eq!(HostCommand::parse("quit"), Ok(Some(HostCommand::Quit)));
        assert_eq!(HostCommand::parse("   "), Ok(None));
        assert!(HostCommand::parse("reboot").is_err());
    }
}
