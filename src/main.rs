mod checks;
mod commands;
mod config;
mod context;
mod error;
mod generate;
mod inspect;
mod output;
mod params;
mod scenario;
mod traits;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use commands::{
    GenerateCommand, InputsCommand, LintCommand, MatrixCommand, ParamsCommand, PathsCommand,
    ScenariosCommand,
};
use config::HarnessConfig;
use context::Context;
use scenario::{CicdPlatform, Cloud, FeatureSet, Scenario, SetupMode, Toggle};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackcheck")]
#[command(about = "Stackcheck - Validate MLOps project scaffolding generated by bundle templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Harness config file (defaults to ./.stackcheck.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pre-installed CLI binary; skips the install script
    #[arg(long, global = true, env = "STACKCHECK_CLI")]
    cli: Option<PathBuf>,

    /// Script that installs the CLI into a given directory
    #[arg(long, global = true, env = "STACKCHECK_INSTALL_SCRIPT")]
    install_script: Option<PathBuf>,

    /// Template source passed to bundle init
    #[arg(long, global = true, env = "STACKCHECK_TEMPLATE_ROOT")]
    template_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// One point of the scenario matrix
#[derive(Args)]
struct ScenarioArgs {
    /// Cloud provider (aws, azure, gcp)
    #[arg(long, default_value = "azure")]
    cloud: Cloud,

    /// CI/CD platform
    #[arg(long, default_value = "github_actions")]
    cicd_platform: CicdPlatform,

    /// Scaffold mode (CICD_and_Project, Project_Only, CICD_Only)
    #[arg(long, default_value = "CICD_and_Project")]
    setup_mode: SetupMode,

    /// Include the feature store (yes/no)
    #[arg(long, default_value = "no")]
    feature_store: Toggle,

    /// Include MLflow Recipes (yes/no)
    #[arg(long, default_value = "no")]
    recipes: Toggle,

    /// Register models in Unity Catalog (yes/no)
    #[arg(long, default_value = "no")]
    uc_models: Toggle,
}

impl ScenarioArgs {
    fn scenario(&self) -> Scenario {
        Scenario::new(
            self.cloud,
            self.cicd_platform,
            FeatureSet::new(self.setup_mode, self.feature_store, self.recipes, self.uc_models),
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the scenario matrix
    Scenarios {
        /// List the GitLab scenarios instead of the full matrix
        #[arg(long)]
        gitlab: bool,
    },

    /// Print the merged template inputs for a scenario
    Params {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Generate a single scenario into a directory
    Generate {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Output directory for the generated project
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the markdown link checker config into the project
        #[arg(long)]
        checker_config: bool,

        /// Run markdown-link-check over every markdown file of the project
        #[arg(long)]
        link_check: bool,
    },

    /// List every entry of a generated tree, relative to it
    Paths {
        /// Directory to inspect
        dir: PathBuf,
    },

    /// Generate and check every scenario
    Matrix {
        /// Run the GitLab scenarios instead of the full matrix
        #[arg(long)]
        gitlab: bool,
    },

    /// Check how the template handles defaults, pasted URLs and invalid inputs
    Inputs,

    /// Scan the template source for hardcoded workspace URLs and doc links
    Lint {
        /// Template source directory (defaults to <template-root>/template)
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new();
    let working_dir = std::env::current_dir().context("Failed to determine working directory")?;

    let config = HarnessConfig::load(ctx.fs.as_ref(), cli.config.as_deref(), &working_dir)?
        .with_overrides(cli.cli, cli.install_script, cli.template_root);

    match cli.command {
        Commands::Scenarios { gitlab } => {
            ScenariosCommand::execute(&ctx, gitlab)?;
        }
        Commands::Params { scenario } => {
            ParamsCommand::execute(&ctx, &scenario.scenario(), &config.root_dir)?;
        }
        Commands::Generate {
            scenario,
            output,
            checker_config,
            link_check,
        } => {
            GenerateCommand::execute(
                &ctx,
                config,
                &scenario.scenario(),
                &output,
                checker_config,
                link_check,
                &working_dir,
            )?;
        }
        Commands::Paths { dir } => {
            PathsCommand::execute(&ctx, &dir)?;
        }
        Commands::Matrix { gitlab } => {
            let report = MatrixCommand::execute(&ctx, config, gitlab, &working_dir)?;

            if !report.is_success() {
                let failed: Vec<String> = report
                    .failures()
                    .into_iter()
                    .map(|(scenario, _)| scenario.id())
                    .collect();
                anyhow::bail!("{} scenario(s) failed: {}", failed.len(), failed.join(", "));
            }
        }
        Commands::Inputs => {
            let checks = InputsCommand::execute(&ctx, config, &working_dir)?;
            let failed = checks.iter().filter(|c| !c.passed()).count();

            if failed > 0 {
                anyhow::bail!("{} input check(s) failed", failed);
            }
        }
        Commands::Lint { dir } => {
            LintCommand::execute(&ctx, &config, dir.as_deref(), &working_dir)?;
        }
    }

    Ok(())
}
