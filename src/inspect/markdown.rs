use crate::context::Context;
use crate::generate::ensure_success;
use crate::params::DEFAULT_ROOT_DIR;
use crate::params::resolve::{PROD_WORKSPACE_HOST, STAGING_WORKSPACE_HOST};
use crate::traits::FileSystem;
use crate::traits::command::command_line;
use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Written into the generated project for the markdown link checker
pub const CHECKER_CONFIG_FILE: &str = "checker-config.json";

/// External link checker, resolved from PATH
pub const LINK_CHECKER: &str = "markdown-link-check";

/// Link-checker configuration (markdown-link-check schema)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerConfig {
    pub ignore_patterns: Vec<IgnorePattern>,
    pub http_headers: Vec<HttpHeaders>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnorePattern {
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpHeaders {
    pub urls: Vec<String>,
    pub headers: BTreeMap<String, String>,
}

impl Default for CheckerConfig {
    /// Placeholder workspaces and the local MLflow server never resolve, so they are ignored
    fn default() -> Self {
        let ignore = [
            "http://127.0.0.1:5000".to_string(),
            format!("{}*", STAGING_WORKSPACE_HOST),
            format!("{}*", PROD_WORKSPACE_HOST),
        ];

        Self {
            ignore_patterns: ignore
                .into_iter()
                .map(|pattern| IgnorePattern { pattern })
                .collect(),
            http_headers: vec![HttpHeaders {
                urls: vec!["https://docs.github.com/".to_string()],
                headers: BTreeMap::from([(
                    "Accept-Encoding".to_string(),
                    "zstd, br, gzip, deflate".to_string(),
                )]),
            }],
        }
    }
}

/// Write `checker-config.json` into `<dir>/my-mlops-project` and return its path
pub fn write_markdown_checker_config(fs: &dyn FileSystem, dir: &Path) -> Result<PathBuf> {
    write_checker_config_in(fs, &dir.join(DEFAULT_ROOT_DIR))
}

fn write_checker_config_in(fs: &dyn FileSystem, project_dir: &Path) -> Result<PathBuf> {
    let path = project_dir.join(CHECKER_CONFIG_FILE);
    let json = serde_json::to_string(&CheckerConfig::default())
        .context("Failed to serialize link checker config")?;
    fs.write(&path, &json)?;
    Ok(path)
}

/// Every `.md` file below `project_dir`, relative to it
pub fn markdown_files(fs: &dyn FileSystem, project_dir: &Path) -> Result<Vec<String>> {
    let files = super::paths(fs, project_dir)?
        .into_iter()
        .filter(|rel| rel.ends_with(".md") && fs.is_file(&project_dir.join(rel)))
        .collect();
    Ok(files)
}

/// Run the link checker over every markdown file of a generated project
///
/// Runs from `project_dir`, writing `checker-config.json` there first when it is missing.
/// Every file is checked before the failures are reported together.
pub fn check_markdown_links(ctx: &Context, project_dir: &Path) -> Result<usize> {
    if !ctx.fs.is_file(&project_dir.join(CHECKER_CONFIG_FILE)) {
        write_checker_config_in(ctx.fs.as_ref(), project_dir)?;
    }

    let files = markdown_files(ctx.fs.as_ref(), project_dir)?;
    let mut failures = Vec::new();

    for file in &files {
        let args = ["-c", CHECKER_CONFIG_FILE, file.as_str()];
        let line = command_line(LINK_CHECKER, &args);
        ctx.output.dimmed(&line);

        let output = ctx.command.execute(LINK_CHECKER, &args, project_dir)?;
        if let Err(e) = ensure_success(&line, &output) {
            ctx.output.error(&format!("Broken links in {}", file));
            failures.push(format!("{:#}", e));
        }
    }

    if !failures.is_empty() {
        bail!(
            "{} of {} markdown file(s) have broken links:\n{}",
            failures.len(),
            files.len(),
            failures.join("\n")
        );
    }

    Ok(files.len())
}
