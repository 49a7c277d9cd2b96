use crate::checks::{ExpectedArtifacts, assert_fully_rendered};
use crate::config::HarnessConfig;
use crate::context::Context;
use crate::generate::{GenerationOutcome, Generator, Session};
use crate::inspect::{read_gitlab_pipeline, read_workflow, read_workflow_in};
use crate::params::{DEFAULT_ROOT_DIR, TEST_PROJECT_NAME, prepare_context};
use crate::scenario::{
    CicdPlatform, MatrixOutcome, MatrixReport, Scenario, gitlab_matrix, project_generation_matrix,
    run_matrix,
};
use anyhow::{Context as _, Result, bail};
use std::path::Path;

/// Handles the 'matrix' command - generates and checks every scenario
pub struct MatrixCommand;

impl MatrixCommand {
    pub fn execute(
        ctx: &Context,
        config: HarnessConfig,
        gitlab: bool,
        working_dir: &Path,
    ) -> Result<MatrixReport> {
        let scenarios = if gitlab {
            gitlab_matrix()
        } else {
            project_generation_matrix()
        };

        let root_dir = config.root_dir.clone();
        let session = Session::new(ctx, config, working_dir)?;
        let generator = session.generator()?;

        ctx.output
            .section(&format!("Running {} scenarios", scenarios.len()));
        ctx.output
            .dimmed(&format!("Session directory: {}", session.root().display()));

        let report = run_matrix(&scenarios, |scenario| {
            Self::check_scenario(ctx, &generator, &session, scenario, &root_dir)
        });

        Self::print_report(ctx, &report);
        Ok(report)
    }

    /// Generate one scenario twice and run every applicable check
    ///
    /// The first generation uses the full scenario inputs and is checked for
    /// rendering and CI/CD output. The second uses the test project name, which
    /// keeps every scenario-dependent notebook in place for the artifact checks.
    fn check_scenario(
        ctx: &Context,
        generator: &Generator,
        session: &Session,
        scenario: &Scenario,
        root_dir: &str,
    ) -> Result<MatrixOutcome> {
        let dir = session.scenario_dir(scenario)?;
        let dir = dir.path();

        if let GenerationOutcome::Skipped { reason } = generator.generate_scenario(dir, scenario)? {
            return Ok(MatrixOutcome::Skipped(reason));
        }

        let fs = ctx.fs.as_ref();
        assert_fully_rendered(fs, dir)?;

        if scenario.setup_mode().includes_cicd() {
            match scenario.cicd_platform {
                CicdPlatform::GithubActions | CicdPlatform::GithubActionsForGithubEnterpriseServers => {
                    let workflow = if root_dir == DEFAULT_ROOT_DIR {
                        read_workflow(fs, dir)?
                    } else {
                        read_workflow_in(fs, dir, root_dir)?
                    };
                    if workflow.trim().is_empty() {
                        bail!("Generated test workflow is empty");
                    }
                }
                CicdPlatform::Gitlab => {
                    read_gitlab_pipeline(fs, dir, root_dir)?;
                }
                CicdPlatform::AzureDevops => {}
            }
        }

        let artifact_dir = session.case_dir(&format!("{}-artifacts", scenario.id()))?;
        let artifact_dir = artifact_dir.path();
        generator
            .generate(artifact_dir, &prepare_context(scenario, TEST_PROJECT_NAME))
            .with_context(|| format!("Artifact generation failed for scenario {}", scenario))?;
        ExpectedArtifacts::for_scenario(scenario).verify(fs, artifact_dir, TEST_PROJECT_NAME)?;

        Ok(MatrixOutcome::Passed)
    }

    fn print_report(ctx: &Context, report: &MatrixReport) {
        for (scenario, outcome) in &report.results {
            match outcome {
                MatrixOutcome::Passed => ctx.output.success(&scenario.id()),
                MatrixOutcome::Skipped(reason) => {
                    ctx.output.warning(&format!("{} skipped: {}", scenario, reason))
                }
                MatrixOutcome::Failed(message) => {
                    ctx.output.error(&format!("{} failed: {}", scenario, message))
                }
            }
        }

        ctx.output.blank();
        ctx.output.key_value("Passed", &report.passed().to_string());
        ctx.output.key_value("Skipped", &report.skipped().to_string());
        ctx.output.key_value("Failed", &report.failed().to_string());
    }
}
