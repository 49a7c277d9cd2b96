//! Scenario axes and their expansion into test matrices
//!
//! A scenario is one combination of cloud, CI/CD platform, scaffold mode and
//! feature toggles. `matrix` builds the lists of scenarios a run walks through.

pub mod matrix;

pub use matrix::{
    MatrixOutcome, MatrixReport, SETUP_COMBINATIONS, by_cloud, gitlab_matrix,
    project_generation_matrix, run_matrix,
};

use crate::error::HarnessError;
use std::fmt;
use std::str::FromStr;

/// Cloud provider hosting the Databricks workspaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cloud {
    Aws,
    Azure,
    Gcp,
}

impl Cloud {
    pub const ALL: [Cloud; 3] = [Cloud::Aws, Cloud::Azure, Cloud::Gcp];

    /// Get the identifier used in template inputs
    pub fn as_str(&self) -> &'static str {
        match self {
            Cloud::Aws => "aws",
            Cloud::Azure => "azure",
            Cloud::Gcp => "gcp",
        }
    }
}

impl fmt::Display for Cloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cloud {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cloud::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| HarnessError::InvalidValue {
                kind: "cloud",
                value: s.to_string(),
                expected: Cloud::ALL.iter().map(|c| c.as_str()).collect(),
            })
    }
}

/// CI/CD platform the generated pipelines target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CicdPlatform {
    GithubActions,
    GithubActionsForGithubEnterpriseServers,
    AzureDevops,
    Gitlab,
}

impl CicdPlatform {
    pub const ALL: [CicdPlatform; 4] = [
        CicdPlatform::GithubActions,
        CicdPlatform::GithubActionsForGithubEnterpriseServers,
        CicdPlatform::AzureDevops,
        CicdPlatform::Gitlab,
    ];

    /// Platforms covered by the full project-generation matrix
    pub const MATRIX: [CicdPlatform; 3] = [
        CicdPlatform::GithubActions,
        CicdPlatform::GithubActionsForGithubEnterpriseServers,
        CicdPlatform::AzureDevops,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CicdPlatform::GithubActions => "github_actions",
            CicdPlatform::GithubActionsForGithubEnterpriseServers => {
                "github_actions_for_github_enterprise_servers"
            }
            CicdPlatform::AzureDevops => "azure_devops",
            CicdPlatform::Gitlab => "gitlab",
        }
    }
}

impl fmt::Display for CicdPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CicdPlatform {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CicdPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| HarnessError::InvalidValue {
                kind: "CI/CD platform",
                value: s.to_string(),
                expected: CicdPlatform::ALL.iter().map(|p| p.as_str()).collect(),
            })
    }
}

/// Which parts of the template get generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SetupMode {
    CicdAndProject,
    ProjectOnly,
    CicdOnly,
}

impl SetupMode {
    pub const ALL: [SetupMode; 3] = [
        SetupMode::CicdAndProject,
        SetupMode::ProjectOnly,
        SetupMode::CicdOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SetupMode::CicdAndProject => "CICD_and_Project",
            SetupMode::ProjectOnly => "Project_Only",
            SetupMode::CicdOnly => "CICD_Only",
        }
    }

    /// Whether CI/CD pipeline configuration is generated
    pub fn includes_cicd(&self) -> bool {
        *self != SetupMode::ProjectOnly
    }

    /// Whether the project source layout is generated
    pub fn includes_project(&self) -> bool {
        *self != SetupMode::CicdOnly
    }
}

impl fmt::Display for SetupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetupMode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SetupMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| HarnessError::InvalidValue {
                kind: "setup mode",
                value: s.to_string(),
                expected: SetupMode::ALL.iter().map(|m| m.as_str()).collect(),
            })
    }
}

/// A yes/no template flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Toggle::Yes => "yes",
            Toggle::No => "no",
        }
    }

    pub fn is_yes(&self) -> bool {
        *self == Toggle::Yes
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Toggle {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Toggle::Yes),
            "no" => Ok(Toggle::No),
            other => Err(HarnessError::InvalidValue {
                kind: "toggle",
                value: other.to_string(),
                expected: vec!["yes", "no"],
            }),
        }
    }
}

/// Scaffold mode together with the three optional components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureSet {
    pub setup_mode: SetupMode,
    pub include_feature_store: Toggle,
    pub include_mlflow_recipes: Toggle,
    pub include_models_in_unity_catalog: Toggle,
}

impl FeatureSet {
    pub const fn new(
        setup_mode: SetupMode,
        include_feature_store: Toggle,
        include_mlflow_recipes: Toggle,
        include_models_in_unity_catalog: Toggle,
    ) -> Self {
        Self {
            setup_mode,
            include_feature_store,
            include_mlflow_recipes,
            include_models_in_unity_catalog,
        }
    }
}

/// One fully resolved test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scenario {
    pub cloud: Cloud,
    pub cicd_platform: CicdPlatform,
    pub features: FeatureSet,
}

impl Scenario {
    pub fn new(cloud: Cloud, cicd_platform: CicdPlatform, features: FeatureSet) -> Self {
        Self {
            cloud,
            cicd_platform,
            features,
        }
    }

    pub fn setup_mode(&self) -> SetupMode {
        self.features.setup_mode
    }

    /// Stable identifier, e.g. `aws-github_actions-CICD_and_Project-no-no-no`
    pub fn id(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}-{}",
            self.cloud,
            self.cicd_platform,
            self.features.setup_mode,
            self.features.include_feature_store,
            self.features.include_mlflow_recipes,
            self.features.include_models_in_unity_catalog
        )
    }

    /// Models in Unity Catalog are not available on GCP workspaces
    pub fn is_supported(&self) -> bool {
        !(self.cloud == Cloud::Gcp && self.features.include_models_in_unity_catalog.is_yes())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}
