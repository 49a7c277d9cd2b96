use super::Params;
use super::defaults::defaults_for;
use crate::scenario::{Cloud, Scenario};

/// Staging workspace used by every CI/CD scenario
pub const STAGING_WORKSPACE_HOST: &str = "https://adb-3214.67.azuredatabricks.net";
/// Production workspace used by every CI/CD scenario
pub const PROD_WORKSPACE_HOST: &str = "https://adb-345.89.azuredatabricks.net";

fn set(params: &mut Params, key: &str, value: impl Into<String>) {
    params.insert(key.to_string(), value.into());
}

/// Build the overrides a scenario passes to the generator
///
/// CI/CD inputs are only added when pipelines are generated, and project inputs
/// only when project code is generated.
pub fn scenario_params(scenario: &Scenario, root_dir: &str) -> Params {
    let features = &scenario.features;
    let mode = features.setup_mode;

    let mut params = Params::new();
    set(&mut params, "input_setup_cicd_and_project", mode.as_str());
    set(&mut params, "input_root_dir", root_dir);
    set(&mut params, "input_cloud", scenario.cloud.as_str());

    if mode.includes_cicd() {
        set(&mut params, "input_cicd_platform", scenario.cicd_platform.as_str());
        set(&mut params, "input_databricks_staging_workspace_host", STAGING_WORKSPACE_HOST);
        set(&mut params, "input_databricks_prod_workspace_host", PROD_WORKSPACE_HOST);
        set(&mut params, "input_default_branch", "main");
        set(&mut params, "input_release_branch", "release");
    }

    if mode.includes_project() {
        set(&mut params, "input_project_name", root_dir);
        set(&mut params, "input_include_feature_store", features.include_feature_store.as_str());
        set(&mut params, "input_include_mlflow_recipes", features.include_mlflow_recipes.as_str());
        set(&mut params, "input_read_user_group", "users");
        set(
            &mut params,
            "input_include_models_in_unity_catalog",
            features.include_models_in_unity_catalog.as_str(),
        );
        set(&mut params, "input_schema_name", "schema_name");
        set(&mut params, "input_unity_catalog_read_user_group", "account users");
        set(&mut params, "input_inference_table_name", "dummy.schema.table");
    }

    params
}

/// Context used by the artifact checks: identity inputs plus every toggle,
/// without pinning workspace hosts or branches
pub fn prepare_context(scenario: &Scenario, project_name: &str) -> Params {
    let features = &scenario.features;

    let mut context = Params::new();
    set(&mut context, "input_setup_cicd_and_project", features.setup_mode.as_str());
    set(&mut context, "input_project_name", project_name);
    set(&mut context, "input_root_dir", project_name);
    set(&mut context, "input_cloud", scenario.cloud.as_str());
    set(&mut context, "input_cicd_platform", scenario.cicd_platform.as_str());
    set(&mut context, "input_include_feature_store", features.include_feature_store.as_str());
    set(&mut context, "input_include_mlflow_recipes", features.include_mlflow_recipes.as_str());
    set(
        &mut context,
        "input_include_models_in_unity_catalog",
        features.include_models_in_unity_catalog.as_str(),
    );
    context
}

/// Pick the default table for a context, or `None` when the combination cannot be generated
///
/// A missing or unrecognised `input_cloud` falls back to Azure, the template's own default.
pub fn select_defaults(context: &Params) -> Option<&'static Params> {
    let cloud = context
        .get("input_cloud")
        .and_then(|c| c.parse::<Cloud>().ok())
        .unwrap_or(Cloud::Azure);

    let uc_models = context
        .get("input_include_models_in_unity_catalog")
        .is_some_and(|v| v == "yes");

    if cloud == Cloud::Gcp && uc_models {
        return None;
    }

    Some(defaults_for(cloud))
}

/// Layer `context` over `defaults`; context values win on collision
pub fn merge(defaults: &Params, context: &Params) -> Params {
    let mut merged = defaults.clone();
    merged.extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Full resolution for a context: default table selection plus merge
pub fn resolve(context: &Params) -> Option<Params> {
    select_defaults(context).map(|defaults| merge(defaults, context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::defaults::{DEFAULT_ROOT_DIR, aws_defaults, azure_defaults};
    use crate::scenario::{CicdPlatform, FeatureSet, SetupMode, Toggle, project_generation_matrix};

    fn scenario(cloud: Cloud, mode: SetupMode, uc: Toggle) -> Scenario {
        Scenario::new(
            cloud,
            CicdPlatform::GithubActions,
            FeatureSet::new(mode, Toggle::No, Toggle::No, uc),
        )
    }

    #[test]
    fn test_cicd_and_project_sets_both_sections() {
        let params = scenario_params(
            &scenario(Cloud::Aws, SetupMode::CicdAndProject, Toggle::No),
            DEFAULT_ROOT_DIR,
        );

        assert_eq!(params["input_cicd_platform"], "github_actions");
        assert_eq!(params["input_databricks_staging_workspace_host"], STAGING_WORKSPACE_HOST);
        assert_eq!(params["input_project_name"], DEFAULT_ROOT_DIR);
        assert_eq!(params["input_include_feature_store"], "no");
        assert_eq!(params.len(), 16);
    }

    #[test]
    fn test_project_only_skips_cicd_section() {
        let params = scenario_params(
            &scenario(Cloud::Azure, SetupMode::ProjectOnly, Toggle::No),
            DEFAULT_ROOT_DIR,
        );

        for key in [
            "input_cicd_platform",
            "input_databricks_staging_workspace_host",
            "input_databricks_prod_workspace_host",
            "input_default_branch",
            "input_release_branch",
        ] {
            assert!(!params.contains_key(key), "{} should not be set", key);
        }

        // The default table's platform still flows through the merge
        let merged = resolve(&params).unwrap();
        assert_eq!(merged["input_cicd_platform"], azure_defaults()["input_cicd_platform"]);
        assert_eq!(
            merged["input_databricks_staging_workspace_host"],
            "https://adb-xxxx.xx.azuredatabricks.net"
        );
    }

    #[test]
    fn test_cicd_only_skips_project_section() {
        let params = scenario_params(
            &scenario(Cloud::Gcp, SetupMode::CicdOnly, Toggle::No),
            "custom-root",
        );

        assert_eq!(params["input_root_dir"], "custom-root");
        assert!(!params.contains_key("input_project_name"));
        assert!(!params.contains_key("input_include_models_in_unity_catalog"));
        assert_eq!(params["input_release_branch"], "release");
    }

    #[test]
    fn test_merge_keeps_defaults_for_absent_keys() {
        for scenario in project_generation_matrix() {
            let context = scenario_params(&scenario, DEFAULT_ROOT_DIR);
            let Some(merged) = resolve(&context) else {
                continue;
            };
            let defaults = defaults_for(scenario.cloud);

            for (key, value) in defaults {
                match context.get(key) {
                    Some(overridden) => assert_eq!(&merged[key], overridden),
                    None => assert_eq!(&merged[key], value),
                }
            }
            assert_eq!(merged.len(), defaults.len());
        }
    }

    #[test]
    fn test_merge_prefers_context() {
        let mut context = Params::new();
        context.insert("input_cloud".to_string(), "aws".to_string());
        context.insert("input_project_name".to_string(), "other".to_string());

        let merged = merge(aws_defaults(), &context);
        assert_eq!(merged["input_project_name"], "other");
        assert_eq!(merged["input_root_dir"], DEFAULT_ROOT_DIR);
    }

    #[test]
    fn test_select_defaults_rejects_gcp_with_uc_models() {
        let params = scenario_params(
            &scenario(Cloud::Gcp, SetupMode::ProjectOnly, Toggle::Yes),
            DEFAULT_ROOT_DIR,
        );
        assert!(select_defaults(&params).is_none());

        let aws = scenario_params(
            &scenario(Cloud::Aws, SetupMode::ProjectOnly, Toggle::Yes),
            DEFAULT_ROOT_DIR,
        );
        assert_eq!(select_defaults(&aws), Some(aws_defaults()));
    }

    #[test]
    fn test_select_defaults_falls_back_to_azure() {
        assert_eq!(select_defaults(&Params::new()), Some(azure_defaults()));
    }

    #[test]
    fn test_prepare_context_carries_all_toggles() {
        let context = prepare_context(
            &Scenario::new(
                Cloud::Azure,
                CicdPlatform::AzureDevops,
                FeatureSet::new(SetupMode::CicdOnly, Toggle::No, Toggle::No, Toggle::No),
            ),
            "proj",
        );

        assert_eq!(context["input_cicd_platform"], "azure_devops");
        assert_eq!(context["input_include_mlflow_recipes"], "no");
        assert_eq!(context.len(), 8);
    }
}
