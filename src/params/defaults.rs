use super::Params;
use crate::scenario::Cloud;
use lazy_static::lazy_static;

pub const DEFAULT_ROOT_DIR: &str = "my-mlops-project";

/// Project name that makes the template keep `_params_testing_only.txt`
pub const TEST_PROJECT_NAME: &str = "27896cf3-bb3e-476e-8129-96df0406d5c7";

/// Every table shares exactly these keys
#[cfg(test)]
pub const INPUT_KEYS: [&str; 17] = [
    "input_setup_cicd_and_project",
    "input_root_dir",
    "input_project_name",
    "input_cloud",
    "input_cicd_platform",
    "input_databricks_test_workspace_host",
    "input_databricks_staging_workspace_host",
    "input_databricks_prod_workspace_host",
    "input_default_branch",
    "input_release_branch",
    "input_read_user_group",
    "input_include_feature_store",
    "input_include_mlflow_recipes",
    "input_include_models_in_unity_catalog",
    "input_schema_name",
    "input_unity_catalog_read_user_group",
    "input_inference_table_name",
];

fn table(entries: &[(&str, &str)]) -> Params {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Layer provider-specific values over a base table
fn derive(base: &Params, overrides: &[(&str, &str)]) -> Params {
    let mut derived = base.clone();
    for (key, value) in overrides {
        derived.insert(key.to_string(), value.to_string());
    }
    derived
}

lazy_static! {
    static ref AZURE_DEFAULT_PARAMS: Params = table(&[
        ("input_setup_cicd_and_project", "CICD_and_Project"),
        ("input_root_dir", DEFAULT_ROOT_DIR),
        ("input_project_name", DEFAULT_ROOT_DIR),
        ("input_cloud", "azure"),
        ("input_cicd_platform", "github_actions"),
        ("input_databricks_test_workspace_host", "https://adb-xxxx.xx.azuredatabricks.net"),
        ("input_databricks_staging_workspace_host", "https://adb-xxxx.xx.azuredatabricks.net"),
        ("input_databricks_prod_workspace_host", "https://adb-xxxx.xx.azuredatabricks.net"),
        ("input_default_branch", "main"),
        ("input_release_branch", "release"),
        ("input_read_user_group", "users"),
        ("input_include_feature_store", "no"),
        ("input_include_mlflow_recipes", "no"),
        ("input_include_models_in_unity_catalog", "no"),
        ("input_schema_name", "schema_name"),
        ("input_unity_catalog_read_user_group", "account users"),
        ("input_inference_table_name", "dummy.schema.table"),
    ]);

    static ref AWS_DEFAULT_PARAMS: Params = derive(&AZURE_DEFAULT_PARAMS, &[
        ("input_cloud", "aws"),
        ("input_databricks_test_workspace_host", "https://your-staging-workspace.cloud.databricks.com"),
        ("input_databricks_staging_workspace_host", "https://your-staging-workspace.cloud.databricks.com"),
        ("input_databricks_prod_workspace_host", "https://your-prod-workspace.cloud.databricks.com"),
    ]);

    static ref GCP_DEFAULT_PARAMS: Params = derive(&AZURE_DEFAULT_PARAMS, &[
        ("input_cloud", "gcp"),
        ("input_databricks_test_workspace_host", "https://your-staging-workspace.gcp.databricks.com"),
        ("input_databricks_staging_workspace_host", "https://your-staging-workspace.gcp.databricks.com"),
        ("input_databricks_prod_workspace_host", "https://your-prod-workspace.gcp.databricks.com"),
    ]);

    // What the template itself fills in when an input is omitted
    static ref GENERATOR_BASE_DEFAULTS: Params = table(&[
        ("input_default_branch", "main"),
        ("input_release_branch", "release"),
        ("input_read_user_group", "users"),
        ("input_include_feature_store", "no"),
        ("input_include_mlflow_recipes", "no"),
        ("input_include_models_in_unity_catalog", "no"),
        ("input_schema_name", "schema_name"),
        ("input_unity_catalog_read_user_group", "account users"),
        ("input_inference_table_name", "dummy.schema.table"),
    ]);
}

pub fn azure_defaults() -> &'static Params {
    &AZURE_DEFAULT_PARAMS
}

pub fn aws_defaults() -> &'static Params {
    &AWS_DEFAULT_PARAMS
}

pub fn gcp_defaults() -> &'static Params {
    &GCP_DEFAULT_PARAMS
}

/// Harness defaults merged under every generation for `cloud`
pub fn defaults_for(cloud: Cloud) -> &'static Params {
    match cloud {
        Cloud::Aws => aws_defaults(),
        Cloud::Azure => azure_defaults(),
        Cloud::Gcp => gcp_defaults(),
    }
}

/// Values the generator is expected to write into `_params_testing_only.txt`
/// when only project name, root dir, cloud and platform are supplied
pub fn expected_generator_defaults(cloud: Cloud) -> Params {
    let hosts: [(&str, &str); 4] = match cloud {
        Cloud::Azure => [
            ("input_cloud", "azure"),
            ("input_databricks_test_workspace_host", "https://adb-xxxx.xx.azuredatabricks.net"),
            ("input_databricks_staging_workspace_host", "https://adb-xxxx.xx.azuredatabricks.net"),
            ("input_databricks_prod_workspace_host", "https://adb-xxxx.xx.azuredatabricks.net"),
        ],
        Cloud::Aws => [
            ("input_cloud", "aws"),
            ("input_databricks_test_workspace_host", "https://your-test-workspace.cloud.databricks.com"),
            ("input_databricks_staging_workspace_host", "https://your-staging-workspace.cloud.databricks.com"),
            ("input_databricks_prod_workspace_host", "https://your-prod-workspace.cloud.databricks.com"),
        ],
        Cloud::Gcp => [
            ("input_cloud", "gcp"),
            ("input_databricks_test_workspace_host", "https://your-test-workspace.gcp.databricks.com"),
            ("input_databricks_staging_workspace_host", "https://your-staging-workspace.gcp.databricks.com"),
            ("input_databricks_prod_workspace_host", "https://your-prod-workspace.gcp.databricks.com"),
        ],
    };

    derive(&GENERATOR_BASE_DEFAULTS, &hosts)
}
