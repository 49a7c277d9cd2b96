//! Project generation through the external `bundle init` command

pub mod bootstrap;

pub use bootstrap::{CliBootstrap, Session};

use crate::config::HarnessConfig;
use crate::context::Context;
use crate::error::HarnessError;
use crate::params::{Params, resolve, scenario_params};
use crate::scenario::Scenario;
use crate::traits::command::command_line;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Name of the input file written next to the generated project
pub const CONFIG_FILE_NAME: &str = "config.json";

/// What happened when a generation was requested
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The CLI ran and materialized the template
    Generated {
        config_file: PathBuf,
        project_dir: PathBuf,
    },
    /// The combination is not applicable; nothing was written or spawned
    Skipped { reason: String },
}

impl GenerationOutcome {
    #[cfg(test)]
    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated { .. })
    }

    pub fn project_dir(&self) -> Option<&Path> {
        match self {
            GenerationOutcome::Generated { project_dir, .. } => Some(project_dir),
            GenerationOutcome::Skipped { .. } => None,
        }
    }
}

/// Runs the external CLI against a template root
pub struct Generator {
    ctx: Context,
    cli: PathBuf,
    config: HarnessConfig,
    working_dir: PathBuf,
}

impl Generator {
    /// `working_dir` is where the CLI processes are started; relative paths in
    /// `config` are resolved against it
    pub fn new(ctx: &Context, cli: impl Into<PathBuf>, config: HarnessConfig, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            ctx: ctx.clone(),
            cli: cli.into(),
            config,
            working_dir: working_dir.into(),
        }
    }

    /// Generate the project for one scenario into `dir`
    pub fn generate_scenario(&self, dir: &Path, scenario: &Scenario) -> Result<GenerationOutcome> {
        let context = scenario_params(scenario, &self.config.root_dir);
        self.generate(dir, &context)
            .with_context(|| format!("Generation failed for scenario {}", scenario))
    }

    /// Merge `context` over the matching defaults, write the config file and run the CLI
    pub fn generate(&self, dir: &Path, context: &Params) -> Result<GenerationOutcome> {
        let Some(params) = resolve(context) else {
            let reason = "models in Unity Catalog are not supported on gcp".to_string();
            self.ctx.output.warning(&format!("Skipping generation: {}", reason));
            return Ok(GenerationOutcome::Skipped { reason });
        };

        let json = serde_json::to_string(&params).context("Failed to serialize template inputs")?;
        let config_file = dir.join(CONFIG_FILE_NAME);
        self.ctx.fs.write(&config_file, &json)?;

        let cli = self.cli.to_string_lossy().to_string();

        let configure_args = ["configure", "--host", self.config.configure_host.as_str()];
        self.ctx.output.dimmed(&command_line(&cli, &configure_args));
        let token = format!("{}\n", self.config.configure_token);
        let output = self
            .ctx
            .command
            .execute_with_stdin(&cli, &configure_args, &token, &self.working_dir)?;
        ensure_success(&command_line(&cli, &configure_args), &output)?;

        let template_root = self.absolute(&self.config.template_root);
        let template_root = template_root.to_string_lossy();
        let config_arg = config_file.to_string_lossy();
        let dir_arg = dir.to_string_lossy();
        let init_args = [
            "bundle",
            "init",
            template_root.as_ref(),
            "--config-file",
            config_arg.as_ref(),
            "--output-dir",
            dir_arg.as_ref(),
        ];
        self.ctx.output.dimmed(&command_line(&cli, &init_args));
        let output = self
            .ctx
            .command
            .execute(&cli, &init_args, &self.working_dir)?;
        ensure_success(&command_line(&cli, &init_args), &output)?;

        let root_dir = params
            .get("input_root_dir")
            .map(String::as_str)
            .unwrap_or(&self.config.root_dir);

        Ok(GenerationOutcome::Generated {
            config_file,
            project_dir: dir.join(root_dir),
        })
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Turn a non-zero exit into a `HarnessError::CommandFailed` carrying the captured output
pub fn ensure_success(command: &str, output: &std::process::Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    Err(HarnessError::CommandFailed {
        command: command.to_string(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
    .into())
}
