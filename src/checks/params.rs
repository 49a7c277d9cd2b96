use crate::error::HarnessError;
use crate::params::expected_generator_defaults;
use crate::scenario::Cloud;
use anyhow::{Context, Result, bail};
use url::Url;

/// Single-input overrides the generator must refuse
pub const INVALID_PARAM_CASES: [(&str, &str); 8] = [
    ("input_databricks_staging_workspace_host", "http://no-https"),
    ("input_databricks_prod_workspace_host", "no-https"),
    ("input_project_name", "a"),
    ("input_project_name", "a-"),
    ("input_project_name", "Name with spaces"),
    ("input_project_name", "name/with/slashes"),
    ("input_project_name", "name\\with\\backslashes"),
    ("input_project_name", "name.with.periods"),
];

/// Workspace URLs as copied from a browser: the generator keeps only the host
pub const WORKSPACE_URL_SUFFIXES: [&str; 4] = [
    "/?o=123456789#job/1234/run/9234",
    "/?o=123456789#",
    "/?o=123456789#ml/dashboard",
    "#ml/dashboard",
];

/// A realistic workspace host per cloud
pub fn sample_workspace_host(cloud: Cloud) -> &'static str {
    match cloud {
        Cloud::Aws => "https://dbc-my-aws-workspace.cloud.databricks.com",
        Cloud::Azure => "https://adb-mycoolworkspace.11.azuredatabricks.net",
        Cloud::Gcp => "https://dbc-my-gcp-workspace.gcp.databricks.com",
    }
}

/// Scheme and host of a workspace URL, with path, query and fragment removed
pub fn workspace_host(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("Invalid workspace URL: {}", raw))?;

    if url.scheme() != "https" {
        bail!("Workspace URL must use https: {}", raw);
    }

    Ok(url.origin().ascii_serialization())
}

/// Every expected `key=value` default must appear in the params testing file
pub fn assert_default_params(content: &str, cloud: Cloud) -> Result<()> {
    for (key, value) in expected_generator_defaults(cloud) {
        if !content.contains(&format!("{}={}", key, value)) {
            return Err(HarnessError::MissingParam { key, value }.into());
        }
    }

    Ok(())
}
