use super::{CicdPlatform, Cloud, FeatureSet, Scenario};
use anyhow::Result;

use super::SetupMode::{CicdAndProject, CicdOnly, ProjectOnly};
use super::Toggle::{No, Yes};

/// Valid scaffold-mode/toggle combinations
///
/// Order of toggles: feature store, MLflow recipes, models in Unity Catalog.
/// Recipes and feature store are mutually exclusive, and CICD_Only never varies
/// the toggles because no project code is generated.
pub const SETUP_COMBINATIONS: [FeatureSet; 11] = [
    FeatureSet::new(CicdAndProject, No, No, No),
    FeatureSet::new(CicdAndProject, No, No, Yes),
    FeatureSet::new(CicdAndProject, No, Yes, No),
    FeatureSet::new(CicdAndProject, Yes, No, No),
    FeatureSet::new(CicdAndProject, Yes, No, Yes),
    FeatureSet::new(ProjectOnly, No, No, No),
    FeatureSet::new(ProjectOnly, No, No, Yes),
    FeatureSet::new(ProjectOnly, No, Yes, No),
    FeatureSet::new(ProjectOnly, Yes, No, No),
    FeatureSet::new(ProjectOnly, Yes, No, Yes),
    FeatureSet::new(CicdOnly, No, No, No),
];

/// Single axis: every supported cloud
pub fn by_cloud() -> Vec<Cloud> {
    Cloud::ALL.to_vec()
}

/// Full cross product of clouds, CI/CD platforms and setup combinations
pub fn project_generation_matrix() -> Vec<Scenario> {
    let mut scenarios =
        Vec::with_capacity(Cloud::ALL.len() * CicdPlatform::MATRIX.len() * SETUP_COMBINATIONS.len());

    for cloud in Cloud::ALL {
        for platform in CicdPlatform::MATRIX {
            for features in SETUP_COMBINATIONS {
                scenarios.push(Scenario::new(cloud, platform, features));
            }
        }
    }

    scenarios
}

/// GitLab pipelines are only exercised for Azure with Unity Catalog models
pub fn gitlab_matrix() -> Vec<Scenario> {
    vec![Scenario::new(
        Cloud::Azure,
        CicdPlatform::Gitlab,
        FeatureSet::new(CicdAndProject, No, No, Yes),
    )]
}

/// Result of running one scenario
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixOutcome {
    Passed,
    Skipped(String),
    Failed(String),
}

/// Per-scenario outcomes of a matrix run, in execution order
#[derive(Debug, Default)]
pub struct MatrixReport {
    pub results: Vec<(Scenario, MatrixOutcome)>,
}

impl MatrixReport {
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, MatrixOutcome::Passed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, MatrixOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, MatrixOutcome::Failed(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed scenarios together with their error messages
    pub fn failures(&self) -> Vec<(&Scenario, &str)> {
        self.results
            .iter()
            .filter_map(|(scenario, outcome)| match outcome {
                MatrixOutcome::Failed(message) => Some((scenario, message.as_str())),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&MatrixOutcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// Run `check` once per scenario and collect the outcomes
///
/// Unsupported scenarios are recorded as skipped without calling `check`. A
/// failing scenario does not stop the run.
pub fn run_matrix<F>(scenarios: &[Scenario], mut check: F) -> MatrixReport
where
    F: FnMut(&Scenario) -> Result<MatrixOutcome>,
{
    let mut report = MatrixReport::default();

    for scenario in scenarios {
        let outcome = if !scenario.is_supported() {
            MatrixOutcome::Skipped(format!(
                "models in Unity Catalog are not supported on {}",
                scenario.cloud
            ))
        } else {
            match check(scenario) {
                Ok(outcome) => outcome,
                Err(e) => MatrixOutcome::Failed(format!("{:#}", e)),
            }
        };

        report.results.push((*scenario, outcome));
    }

    report
}
