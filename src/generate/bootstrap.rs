use super::Generator;
use crate::config::HarnessConfig;
use crate::context::Context;
use crate::scenario::Scenario;
use crate::traits::command::command_line;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

/// Installs a private copy of the CLI via the install script
pub struct CliBootstrap;

impl CliBootstrap {
    /// Run `bash <install_script> <tool_dir>/databricks_cli` and return the expected binary path
    ///
    /// The script's exit status is not fatal: a broken install is reported as a
    /// warning and surfaces later when the binary is spawned.
    pub fn provision(ctx: &Context, install_script: &Path, tool_dir: &Path) -> Result<PathBuf> {
        let cli_dir = tool_dir.join("databricks_cli");
        ctx.fs.create_dir_all(&cli_dir)?;

        let script = install_script.to_string_lossy();
        let target = cli_dir.to_string_lossy();
        let args = [script.as_ref(), target.as_ref()];
        ctx.output.dimmed(&command_line("bash", &args));

        let output = ctx
            .command
            .execute("bash", &args, tool_dir)
            .context("Failed to run CLI install script")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            ctx.output.warning(&format!(
                "Install script exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        let binary = cli_dir.join("databricks");
        ctx.output
            .status_check(&binary.display().to_string(), ctx.fs.is_file(&binary));

        Ok(binary)
    }
}

/// Session-scoped state shared by every scenario of a run
///
/// Owns the temporary root; every directory handed out lives below it and is
/// removed when the session is dropped.
pub struct Session {
    ctx: Context,
    config: HarnessConfig,
    working_dir: PathBuf,
    root: TempDir,
    cli: OnceLock<PathBuf>,
}

impl Session {
    pub fn new(ctx: &Context, config: HarnessConfig, working_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("stackcheck-")
            .tempdir()
            .context("Failed to create session directory")?;

        Ok(Self {
            ctx: ctx.clone(),
            config,
            working_dir: working_dir.into(),
            root,
            cli: OnceLock::new(),
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// The CLI binary for this session, provisioned on first use
    pub fn cli(&self) -> Result<&Path> {
        if let Some(cli) = self.cli.get() {
            return Ok(cli.as_path());
        }

        let path = match &self.config.cli_path {
            Some(explicit) => explicit.clone(),
            None => {
                let tool_dir = self.root.path().join("tools");
                let script = if self.config.install_script.is_absolute() {
                    self.config.install_script.clone()
                } else {
                    self.working_dir.join(&self.config.install_script)
                };
                CliBootstrap::provision(&self.ctx, &script, &tool_dir)?
            }
        };

        Ok(self.cli.get_or_init(|| path).as_path())
    }

    /// A generator bound to this session's CLI
    pub fn generator(&self) -> Result<Generator> {
        let cli = self.cli()?;
        Ok(Generator::new(
            &self.ctx,
            cli,
            self.config.clone(),
            self.working_dir.clone(),
        ))
    }

    /// Fresh directory for one scenario, never shared with another
    pub fn scenario_dir(&self, scenario: &Scenario) -> Result<TempDir> {
        self.case_dir(&scenario.id())
    }

    /// Fresh directory for a named check
    pub fn case_dir(&self, name: &str) -> Result<TempDir> {
        tempfile::Builder::new()
            .prefix(&format!("{}-", name))
            .tempdir_in(self.root.path())
            .with_context(|| format!("Failed to create directory for {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::project_generation_matrix;
    use crate::traits::{MockCommandExecutor, MockCommandResult, MockFileSystem, MockOutput};
    use std::sync::Arc;

    fn mock_ctx(outputs: Vec<MockCommandResult>) -> (Context, Arc<MockCommandExecutor>, Arc<MockOutput>) {
        let command = Arc::new(MockCommandExecutor::with_outputs(outputs));
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(Arc::new(MockFileSystem::new()), output.clone(), command.clone());
        (ctx, command, output)
    }

    #[test]
    fn test_provision_runs_install_script_with_target_dir() {
        let (ctx, command, _) = mock_ctx(vec![]);

        let binary =
            CliBootstrap::provision(&ctx, Path::new("/repo/tests/install.sh"), Path::new("/s/tools")).unwrap();

        assert_eq!(binary, PathBuf::from("/s/tools/databricks_cli/databricks"));
        let invocations = command.invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(
            invocations[0].line(),
            "bash /repo/tests/install.sh /s/tools/databricks_cli"
        );
    }

    #[test]
    fn test_failed_install_is_a_warning_not_an_error() {
        let (ctx, _, output) = mock_ctx(vec![MockCommandResult {
            command: "bash".to_string(),
            exit_code: 1,
            stdout: String::new(),
            stderr: "curl: (6) Could not resolve host".to_string(),
        }]);

        let binary = CliBootstrap::provision(&ctx, Path::new("install.sh"), Path::new("/t")).unwrap();

        assert!(binary.ends_with("databricks"));
        let warnings = output.get_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Could not resolve host"));
        assert!(output.to_text().contains("is NOT available"));
    }

    #[test]
    fn test_session_provisions_once() {
        let (ctx, command, _) = mock_ctx(vec![]);
        let session = Session::new(&ctx, HarnessConfig::default(), "/repo").unwrap();

        let first = session.cli().unwrap().to_path_buf();
        let second = session.cli().unwrap().to_path_buf();

        assert_eq!(first, second);
        assert!(first.starts_with(session.root()));
        assert_eq!(command.invocations().len(), 1);
        assert_eq!(
            command.invocations()[0].args[0],
            "/repo/tests/install.sh"
        );
    }

    #[test]
    fn test_session_uses_explicit_cli_without_install() {
        let (ctx, command, _) = mock_ctx(vec![]);
        let config = HarnessConfig {
            cli_path: Some(PathBuf::from("/usr/local/bin/databricks")),
            ..HarnessConfig::default()
        };
        let session = Session::new(&ctx, config, "/repo").unwrap();

        assert_eq!(session.cli().unwrap(), Path::new("/usr/local/bin/databricks"));
        assert!(command.invocations().is_empty());
    }

    #[test]
    fn test_scenario_dirs_are_isolated() {
        let (ctx, _, _) = mock_ctx(vec![]);
        let session = Session::new(&ctx, HarnessConfig::default(), "/repo").unwrap();
        let scenario = project_generation_matrix()[0];

        let a = session.scenario_dir(&scenario).unwrap();
        let b = session.scenario_dir(&scenario).unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(session.root()));
        assert!(a.path().is_dir());
    }

    #[test]
    fn test_session_root_removed_on_drop() {
        let (ctx, _, _) = mock_ctx(vec![]);
        let session = Session::new(&ctx, HarnessConfig::default(), "/repo").unwrap();
        let root = session.root().to_path_buf();
        assert!(root.is_dir());

        drop(session);
        assert!(!root.exists());
    }
}
