//! Assertions run against generated projects and the template source

pub mod artifacts;
pub mod params;

pub use artifacts::{Artifact, ExpectedArtifacts};
pub use params::{INVALID_PARAM_CASES, assert_default_params, workspace_host};

use crate::error::HarnessError;
use crate::traits::FileSystem;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Jinja/Go template delimiters that must be gone after substitution
pub const TEMPLATE_MARKERS: [&str; 3] = ["{{", "{%", "%}"];

/// Files where template-looking syntax is legitimate (workflow expressions)
pub const TEMPLATE_MARKER_EXCLUDES: [&str; 3] = [".github", ".yml", ".yaml"];

/// Real workspace domains must never be hardcoded in the template source
pub const WORKSPACE_URL_MARKERS: [&str; 3] = [
    "azuredatabricks.net",
    "cloud.databricks.com",
    "gcp.databricks.com",
];

/// Cloud-specific doc links are substituted per cloud and must not be hardcoded
pub const DOC_URL_MARKERS: [&str; 3] = [
    "https://learn.microsoft.com/en-us/azure/databricks",
    "https://docs.databricks.com/",
    "https://docs.gcp.databricks.com/",
];

/// Binary artifacts are never string-matched
const BINARY_EXCLUDES: [&str; 3] = [".png", ".parquet", ".tar.gz"];

/// Assert no file in `paths` contains any of `disallowed`
///
/// Every path must exist. Paths containing one of `exclude` (or a binary
/// extension) are skipped, as are directories. All violations are collected
/// before failing.
pub fn assert_no_disallowed_strings(
    fs: &dyn FileSystem,
    paths: &[PathBuf],
    disallowed: &[&str],
    exclude: &[&str],
) -> Result<()> {
    for path in paths {
        if !fs.exists(path) {
            return Err(HarnessError::MissingFile(path.clone()).into());
        }
    }

    let mut violations = Vec::new();

    for path in paths {
        let display = path.to_string_lossy();
        let skipped = exclude
            .iter()
            .chain(BINARY_EXCLUDES.iter())
            .any(|needle| display.contains(needle));

        if skipped || !fs.is_file(path) {
            continue;
        }

        let data = fs.read_to_string(path)?;
        for needle in disallowed {
            if data.contains(needle) {
                violations.push((path.clone(), needle.to_string()));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::Disallowed { violations }.into())
    }
}

/// Absolute paths of everything below `root`, as consumed by `assert_no_disallowed_strings`
pub fn tree(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    Ok(crate::inspect::paths(fs, root)?
        .into_iter()
        .map(|rel| root.join(rel))
        .collect())
}

/// No unrendered template syntax left in a generated project
pub fn assert_fully_rendered(fs: &dyn FileSystem, dir: &Path) -> Result<()> {
    let files = tree(fs, dir)?;
    assert_no_disallowed_strings(fs, &files, &TEMPLATE_MARKERS, &TEMPLATE_MARKER_EXCLUDES)
}

/// No hardcoded workspace URLs or cloud doc links in the template source
pub fn assert_template_source_clean(fs: &dyn FileSystem, template_dir: &Path) -> Result<()> {
    let files = tree(fs, template_dir)?;
    let markers: Vec<&str> = WORKSPACE_URL_MARKERS
        .iter()
        .chain(DOC_URL_MARKERS.iter())
        .copied()
        .collect();
    assert_no_disallowed_strings(fs, &files, &markers, &[])
}
