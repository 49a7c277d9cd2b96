use crate::checks::assert_template_source_clean;
use crate::config::HarnessConfig;
use crate::context::Context;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Directory under the template root holding the files that get rendered
pub const TEMPLATE_SOURCE_DIR: &str = "template";

/// Handles the 'lint' command - scans the template source for hardcoded URLs
pub struct LintCommand;

impl LintCommand {
    pub fn execute(
        ctx: &Context,
        config: &HarnessConfig,
        dir: Option<&Path>,
        working_dir: &Path,
    ) -> Result<PathBuf> {
        let template_dir = match dir {
            Some(dir) => dir.to_path_buf(),
            None => working_dir
                .join(&config.template_root)
                .join(TEMPLATE_SOURCE_DIR),
        };

        if !ctx.fs.exists(&template_dir) {
            bail!("Template source not found: {}", template_dir.display());
        }

        ctx.output
            .info(&format!("Scanning {}", template_dir.display()));
        assert_template_source_clean(ctx.fs.as_ref(), &template_dir)?;
        ctx.output.success("No hardcoded workspace URLs or doc links");

        Ok(template_dir)
    }
}
