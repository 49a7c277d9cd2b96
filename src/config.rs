use crate::params::DEFAULT_ROOT_DIR;
use crate::traits::FileSystem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".stackcheck.yaml";

/// Harness configuration, typically loaded from .stackcheck.yaml
///
/// Every field is optional in the file; CLI flags and environment variables
/// override whatever the file says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HarnessConfig {
    /// Pre-installed CLI binary; when unset the install script provisions one
    pub cli_path: Option<PathBuf>,

    /// Script invoked as `bash <script> <dir>` to install the CLI into `dir`
    pub install_script: PathBuf,

    /// Template source passed to `bundle init`
    pub template_root: PathBuf,

    /// Host passed to `configure --host`
    pub configure_host: String,

    /// Token written to `configure` on stdin
    pub configure_token: String,

    /// Root directory name of generated projects
    pub root_dir: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            cli_path: None,
            install_script: PathBuf::from("tests/install.sh"),
            template_root: PathBuf::from("."),
            configure_host: "https://123".to_string(),
            configure_token: "dapi123".to_string(),
            root_dir: DEFAULT_ROOT_DIR.to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_to_string(path)?;
        let config: HarnessConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse harness config: {:?}", path))?;

        if config.root_dir.trim().is_empty() {
            anyhow::bail!("root_dir in {:?} must not be empty", path);
        }

        Ok(config)
    }

    /// Load an explicit config file, or `.stackcheck.yaml` in `working_dir` if present,
    /// falling back to defaults
    pub fn load(fs: &dyn FileSystem, explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(fs, path);
        }

        let candidate = working_dir.join(CONFIG_FILE_NAME);
        if fs.is_file(&candidate) {
            return Self::from_file(fs, &candidate);
        }

        Ok(Self::default())
    }

    /// Apply command-line / environment overrides on top of the loaded values
    pub fn with_overrides(
        mut self,
        cli_path: Option<PathBuf>,
        install_script: Option<PathBuf>,
        template_root: Option<PathBuf>,
    ) -> Self {
        if cli_path.is_some() {
            self.cli_path = cli_path;
        }
        if let Some(script) = install_script {
            self.install_script = script;
        }
        if let Some(root) = template_root {
            self.template_root = root;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;

    #[test]
    fn test_load_defaults_when_no_file() {
        let fs = MockFileSystem::new();
        let config = HarnessConfig::load(&fs, None, Path::new("/work")).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.root_dir, "my-mlops-project");
    }

    #[test]
    fn test_load_partial_file_keeps_other_defaults() {
        let fs = MockFileSystem::new();
        fs.write(
            Path::new("/work/.stackcheck.yaml"),
            "cli_path: /opt/databricks\ntemplate_root: /src/mlops-stacks\n",
        )
        .unwrap();

        let config = HarnessConfig::load(&fs, None, Path::new("/work")).unwrap();
        assert_eq!(config.cli_path, Some(PathBuf::from("/opt/databricks")));
        assert_eq!(config.template_root, PathBuf::from("/src/mlops-stacks"));
        assert_eq!(config.configure_token, "dapi123");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let fs = MockFileSystem::new();
        let result = HarnessConfig::load(&fs, Some(Path::new("/missing.yaml")), Path::new("/work"));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_root_dir() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("/c.yaml"), "root_dir: ''\n").unwrap();
        let err = HarnessConfig::from_file(&fs, Path::new("/c.yaml")).unwrap_err();
        assert!(err.to_string().contains("root_dir"));
    }

    #[test]
    fn test_overrides_win() {
        let config = HarnessConfig::default().with_overrides(
            Some(PathBuf::from("/bin/fake")),
            None,
            Some(PathBuf::from("/tpl")),
        );
        assert_eq!(config.cli_path, Some(PathBuf::from("/bin/fake")));
        assert_eq!(config.install_script, PathBuf::from("tests/install.sh"));
        assert_eq!(config.template_root, PathBuf::from("/tpl"));
    }
}
