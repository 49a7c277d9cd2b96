use crate::context::Context;
use crate::params::{Params, resolve, scenario_params};
use crate::scenario::Scenario;
use anyhow::{Context as _, Result};

/// Handles the 'params' command - prints the merged inputs for one scenario
pub struct ParamsCommand;

impl ParamsCommand {
    /// Returns `None` when the scenario is not applicable
    pub fn execute(ctx: &Context, scenario: &Scenario, root_dir: &str) -> Result<Option<Params>> {
        let context = scenario_params(scenario, root_dir);

        let Some(merged) = resolve(&context) else {
            ctx.output.warning(&format!(
                "Scenario {} is skipped: models in Unity Catalog are not supported on {}",
                scenario, scenario.cloud
            ));
            return Ok(None);
        };

        let json = serde_json::to_string_pretty(&merged).context("Failed to serialize template inputs")?;
        println!("{}", json);

        Ok(Some(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{CicdPlatform, Cloud, FeatureSet, SetupMode, Toggle};
    use crate::traits::{MockCommandExecutor, MockFileSystem, MockOutput};
    use std::sync::Arc;

    #[test]
    fn test_project_only_keeps_default_platform() {
        let ctx = Context::test();
        let scenario = Scenario::new(
            Cloud::Azure,
            CicdPlatform::AzureDevops,
            FeatureSet::new(SetupMode::ProjectOnly, Toggle::No, Toggle::No, Toggle::No),
        );

        let merged = ParamsCommand::execute(&ctx, &scenario, "my-mlops-project")
            .unwrap()
            .unwrap();

        // The scenario's platform only applies when CI/CD is generated
        assert_eq!(merged["input_cicd_platform"], "github_actions");
        assert_eq!(merged["input_setup_cicd_and_project"], "Project_Only");
    }

    #[test]
    fn test_unsupported_scenario_warns() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(
            Arc::new(MockFileSystem::new()),
            output.clone(),
            Arc::new(MockCommandExecutor::new()),
        );
        let scenario = Scenario::new(
            Cloud::Gcp,
            CicdPlatform::GithubActions,
            FeatureSet::new(SetupMode::CicdAndProject, Toggle::Yes, Toggle::No, Toggle::Yes),
        );

        assert!(ParamsCommand::execute(&ctx, &scenario, "x").unwrap().is_none());
        assert!(output.has_warning());
    }
}
