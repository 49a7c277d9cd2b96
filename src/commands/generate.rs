use crate::config::HarnessConfig;
use crate::context::Context;
use crate::generate::{GenerationOutcome, Session};
use crate::inspect::{check_markdown_links, paths, write_markdown_checker_config};
use crate::scenario::Scenario;
use anyhow::Result;
use std::path::Path;

/// Handles the 'generate' command - materializes one scenario into a directory
pub struct GenerateCommand;

impl GenerateCommand {
    pub fn execute(
        ctx: &Context,
        config: HarnessConfig,
        scenario: &Scenario,
        output_dir: &Path,
        checker_config: bool,
        link_check: bool,
        working_dir: &Path,
    ) -> Result<GenerationOutcome> {
        ctx.output.section(&format!("Generating {}", scenario));
        ctx.fs.create_dir_all(output_dir)?;

        let session = Session::new(ctx, config, working_dir)?;
        let generator = session.generator()?;
        let outcome = generator.generate_scenario(output_dir, scenario)?;

        let Some(project_dir) = outcome.project_dir().map(Path::to_path_buf) else {
            return Ok(outcome);
        };

        if checker_config {
            let written = write_markdown_checker_config(ctx.fs.as_ref(), output_dir)?;
            ctx.output
                .key_value("Checker config", &written.display().to_string());
        }

        let count = paths(ctx.fs.as_ref(), output_dir)?.len();
        ctx.output
            .key_value("Project", &project_dir.display().to_string());
        ctx.output.key_value("Entries", &count.to_string());
        ctx.output.success(&format!("Generated {}", scenario));

        if link_check {
            ctx.output.section("Checking markdown links");
            let checked = check_markdown_links(ctx, &project_dir)?;
            ctx.output
                .success(&format!("Links OK in {} markdown file(s)", checked));
        }

        Ok(outcome)
    }
}
