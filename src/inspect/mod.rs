//! Helpers for looking at a generated project tree

pub mod markdown;

pub use markdown::{check_markdown_links, write_markdown_checker_config};

use crate::error::HarnessError;
use crate::params::DEFAULT_ROOT_DIR;
use crate::traits::FileSystem;
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Location of the GitHub Actions test workflow inside a generated project
pub const WORKFLOW_PATH: &str = ".github/workflows/run-tests.yml";

/// Location of the GitLab pipeline inside a generated project
pub const GITLAB_PIPELINE_PATH: &str = ".gitlab/cicd.yml";

/// File the template renders with every resolved input, one `key=value` per line
pub const PARAMS_TESTING_FILE: &str = "_params_testing_only.txt";

/// Every file and directory below `root`, relative to it; the root itself is excluded
pub fn paths(fs: &dyn FileSystem, root: &Path) -> Result<BTreeSet<String>> {
    let mut relative = BTreeSet::new();

    for entry in fs.walk_dir(root)? {
        let Ok(rel) = entry.strip_prefix(root) else {
            continue;
        };

        let rel = rel.to_string_lossy().to_string();
        if rel.is_empty() || rel == "." {
            continue;
        }

        relative.insert(rel);
    }

    Ok(relative)
}

fn read_required(fs: &dyn FileSystem, path: PathBuf) -> Result<String> {
    if !fs.is_file(&path) {
        return Err(HarnessError::MissingFile(path).into());
    }

    fs.read_to_string(&path)
}

/// Read `<dir>/my-mlops-project/.github/workflows/run-tests.yml`
///
/// Only scenarios that generate GitHub Actions CI produce this file.
pub fn read_workflow(fs: &dyn FileSystem, dir: &Path) -> Result<String> {
    read_workflow_in(fs, dir, DEFAULT_ROOT_DIR)
}

/// Same as `read_workflow` for a project generated under a custom root dir
pub fn read_workflow_in(fs: &dyn FileSystem, dir: &Path, root_dir: &str) -> Result<String> {
    read_required(fs, dir.join(root_dir).join(WORKFLOW_PATH))
}

/// Read the GitLab pipeline definition of a generated project
pub fn read_gitlab_pipeline(fs: &dyn FileSystem, dir: &Path, root_dir: &str) -> Result<String> {
    read_required(fs, dir.join(root_dir).join(GITLAB_PIPELINE_PATH))
}

/// Read the params testing file the template writes when the project name is the test UUID
pub fn read_params_testing_file(fs: &dyn FileSystem, dir: &Path, root_dir: &str) -> Result<String> {
    read_required(fs, dir.join(root_dir).join(PARAMS_TESTING_FILE))
}

pub fn read_readme(fs: &dyn FileSystem, dir: &Path, root_dir: &str) -> Result<String> {
    read_required(fs, dir.join(root_dir).join("README.md"))
}
