//! External command execution with a testable seam.
//!
//! The `CommandExecutor` trait lets the ffmpeg layer run against a recording
//! fake in tests instead of spawning real processes.

use crate::error::{RedubError, Result};
use std::process::Command;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use behind `Arc<dyn ...>`.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success. A non-zero exit status is
    /// an error carrying the command's stderr.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RedubError::ToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                RedubError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RedubError::MediaToolFailed {
                tool: command.to_string(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock command executor for testing.
    ///
    /// Records all command executions and returns configured responses.
    #[derive(Debug, Default)]
    pub struct MockCommandExecutor {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        responses: Mutex<VecDeque<Result<String>>>,
    }

    impl MockCommandExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a successful response to the queue.
        pub fn with_response(self, response: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(response.to_string()));
            self
        }

        /// Add an error response to the queue.
        pub fn with_error(self, error: RedubError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CommandExecutor for MockCommandExecutor {
        fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
            self.calls.lock().unwrap().push((
                command.to_string(),
                args.iter().map(|s| s.to_string()).collect(),
            ));

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockCommandExecutor;
    use super::*;

    #[test]
    fn test_command_executor_is_object_safe() {
        let executor: Box<dyn CommandExecutor> = Box::new(MockCommandExecutor::new());
        assert!(executor.execute("echo", &["test"]).is_ok());
    }

    #[test]
    fn test_mock_executor_records_calls_and_responses() {
        let mock = MockCommandExecutor::new()
            .with_response("12.5")
            .with_error(RedubError::ToolNotFound {
                tool: "ffmpeg".to_string(),
            });

        assert_eq!(mock.execute("ffprobe", &["-v", "error"]).unwrap(), "12.5");
        assert!(matches!(
            mock.execute("ffmpeg", &[]),
            Err(RedubError::ToolNotFound { .. })
        ));
        assert_eq!(mock.execute("ffmpeg", &[]).unwrap(), "");

        let calls = mock.calls();
        assert_eq!(mock.call_count(), 3);
        assert_eq!(calls[0].0, "ffprobe");
        assert_eq!(calls[0].1, vec!["-v", "error"]);
    }

    #[test]
    fn test_system_executor_missing_binary_is_tool_not_found() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute("redub-definitely-not-a-real-binary", &[]);

        match result {
            Err(RedubError::ToolNotFound { tool }) => {
                assert_eq!(tool, "redub-definitely-not-a-real-binary");
            }
            other => panic!("Expected ToolNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_non_zero_exit_surfaces_stderr() {
        let executor = SystemCommandExecutor::new();
        let result = executor.execute("sh", &["-c", "echo boom >&2; exit 3"]);

        match result {
            Err(RedubError::MediaToolFailed { tool, stderr, .. }) => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "boom");
            }
            other => panic!("Expected MediaToolFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_executor_returns_stdout() {
        let executor = SystemCommandExecutor::new();
        let out = executor.execute("sh", &["-c", "printf 10.0"]).unwrap();
        assert_eq!(out, "10.0");
    }
}
