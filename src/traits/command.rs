use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Trait for executing system commands, allowing for mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments and return the captured output
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output>;

    /// Execute a command, feeding `stdin` to its standard input, and return the captured output
    fn execute_with_stdin(
        &self,
        command: &str,
        args: &[&str],
        stdin: &str,
        working_dir: &Path,
    ) -> Result<Output>;
}

/// Real command executor using std::process::Command
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output> {
        let output = Command::new(command)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to spawn command: {}", command))?;

        Ok(output)
    }

    fn execute_with_stdin(
        &self,
        command: &str,
        args: &[&str],
        stdin: &str,
        working_dir: &Path,
    ) -> Result<Output> {
        let mut child = Command::new(command)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn command: {}", command))?;

        if let Some(mut pipe) = child.stdin.take() {
            // A child that exits without reading closes the pipe early; its exit status still decides
            match pipe.write_all(stdin.as_bytes()) {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(e).with_context(|| format!("Failed to write stdin of: {}", command));
                }
                _ => {}
            }
            // Dropping the pipe closes stdin so the child sees EOF
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for command: {}", command))?;

        Ok(output)
    }
}

/// Joins a program and its arguments into a single display line
pub fn command_line(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

/// Mock command executor for testing
#[cfg(test)]
pub struct MockCommandExecutor {
    /// Pre-configured outputs for commands
    outputs: std::sync::Mutex<Vec<MockCommandResult>>,
    /// Every invocation seen, in order
    invocations: std::sync::Mutex<Vec<MockInvocation>>,
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct MockCommandResult {
    /// Matched against the start of the full command line
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
#[derive(Clone, Debug, PartialEq)]
pub struct MockInvocation {
    pub command: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub working_dir: std::path::PathBuf,
}

#[cfg(test)]
impl MockInvocation {
    pub fn line(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        command_line(&self.command, &args)
    }
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            outputs: std::sync::Mutex::new(Vec::new()),
            invocations: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_outputs(outputs: Vec<MockCommandResult>) -> Self {
        Self {
            outputs: std::sync::Mutex::new(outputs),
            invocations: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<MockInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    fn run(
        &self,
        command: &str,
        args: &[&str],
        stdin: Option<&str>,
        working_dir: &Path,
    ) -> Output {
        self.invocations.lock().unwrap().push(MockInvocation {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            stdin: stdin.map(str::to_string),
            working_dir: working_dir.to_path_buf(),
        });

        let line = command_line(command, args);
        let mut outputs = self.outputs.lock().unwrap();

        if let Some(index) = outputs
            .iter()
            .position(|r| line == r.command || line.starts_with(&format!("{} ", r.command)))
        {
            let mock_result = outputs.remove(index);
            return Output {
                status: create_exit_status(mock_result.exit_code),
                stdout: mock_result.stdout.into_bytes(),
                stderr: mock_result.stderr.into_bytes(),
            };
        }

        // Default: successful empty output
        Output {
            status: create_exit_status(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Default for MockCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output> {
        Ok(self.run(command, args, None, working_dir))
    }

    fn execute_with_stdin(
        &self,
        command: &str,
        args: &[&str],
        stdin: &str,
        working_dir: &Path,
    ) -> Result<Output> {
        Ok(self.run(command, args, Some(stdin), working_dir))
    }
}

#[cfg(test)]
fn create_exit_status(code: i32) -> std::process::ExitStatus {
    // ExitStatus can't be constructed directly; build it from a raw wait status
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw((code & 0xff) << 8)
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mock_executor_matches_command_prefix() {
        let executor = MockCommandExecutor::with_outputs(vec![MockCommandResult {
            command: "databricks bundle".to_string(),
            exit_code: 2,
            stdout: String::new(),
            stderr: "boom".to_string(),
        }]);

        let output = executor
            .execute("databricks", &["bundle", "init", "."], &PathBuf::from("."))
            .unwrap();
        assert_eq!(output.status.code(), Some(2));
        assert_eq!(String::from_utf8_lossy(&output.stderr), "boom");
    }

    #[test]
    fn test_mock_executor_default_success() {
        let executor = MockCommandExecutor::new();
        let output = executor.execute("unknown", &[], &PathBuf::from(".")).unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn test_mock_executor_records_stdin() {
        let executor = MockCommandExecutor::new();
        executor
            .execute_with_stdin("cli", &["configure"], "token", &PathBuf::from("/tmp"))
            .unwrap();

        let invocations = executor.invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].line(), "cli configure");
        assert_eq!(invocations[0].stdin.as_deref(), Some("token"));
    }

    #[cfg(unix)]
    #[test]
    fn test_real_executor_pipes_stdin() {
        let executor = RealCommandExecutor::new();
        let output = executor
            .execute_with_stdin("cat", &[], "dapi123\n", &PathBuf::from("."))
            .unwrap();

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "dapi123\n");
    }

    #[test]
    fn test_real_executor_reports_missing_binary() {
        let executor = RealCommandExecutor::new();
        let result = executor.execute("/nonexistent/stackcheck-cli", &[], &PathBuf::from("."));
        assert!(result.is_err());
    }
}
