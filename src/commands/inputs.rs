use crate::checks::params::{WORKSPACE_URL_SUFFIXES, sample_workspace_host};
use crate::checks::{INVALID_PARAM_CASES, assert_default_params, workspace_host};
use crate::config::HarnessConfig;
use crate::context::Context;
use crate::error::HarnessError;
use crate::generate::{Generator, Session};
use crate::inspect::{read_params_testing_file, read_readme};
use crate::params::{DEFAULT_ROOT_DIR, Params, TEST_PROJECT_NAME};
use crate::scenario::{CicdPlatform, Cloud, by_cloud};
use anyhow::{Result, bail};
use std::path::Path;

/// Result of one input-handling check
#[derive(Debug, Clone, PartialEq)]
pub struct InputCheck {
    pub name: String,
    pub failure: Option<String>,
}

impl InputCheck {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Handles the 'inputs' command - checks how the template treats its inputs
pub struct InputsCommand;

impl InputsCommand {
    pub fn execute(ctx: &Context, config: HarnessConfig, working_dir: &Path) -> Result<Vec<InputCheck>> {
        let session = Session::new(ctx, config, working_dir)?;
        let generator = session.generator()?;
        let mut checks = Vec::new();

        ctx.output.section("Checking template inputs");
        ctx.output
            .dimmed(&format!("Session directory: {}", session.root().display()));

        let dir = session.case_dir("empty-context")?;
        let result = Self::check_accepts_empty_context(&generator, dir.path());
        checks.push(Self::record(ctx, "empty-context".to_string(), result));

        let dir = session.case_dir("default-project-name")?;
        let result = Self::check_default_project_name(ctx, &generator, dir.path());
        checks.push(Self::record(ctx, "default-project-name".to_string(), result));

        for cloud in by_cloud() {
            for platform in CicdPlatform::MATRIX {
                let name = format!("defaults-{}-{}", cloud, platform);
                let dir = session.case_dir(&name)?;
                let result = Self::check_defaults(ctx, &generator, dir.path(), cloud, platform);
                checks.push(Self::record(ctx, name, result));
            }

            for (index, suffix) in WORKSPACE_URL_SUFFIXES.iter().enumerate() {
                let name = format!("workspace-url-{}-{}", cloud, index);
                let dir = session.case_dir(&name)?;
                let raw = format!("{}{}", sample_workspace_host(cloud), suffix);
                let result = Self::check_workspace_url(ctx, &generator, dir.path(), cloud, &raw);
                checks.push(Self::record(ctx, name, result));
            }
        }

        for (index, (key, value)) in INVALID_PARAM_CASES.iter().enumerate() {
            let dir = session.case_dir(&format!("invalid-{}", index))?;
            let result = Self::check_rejected(&generator, dir.path(), key, value);
            checks.push(Self::record(ctx, format!("{} rejects '{}'", key, value), result));
        }

        let failed = checks.iter().filter(|c| !c.passed()).count();
        ctx.output.blank();
        ctx.output.key_value("Passed", &(checks.len() - failed).to_string());
        ctx.output.key_value("Failed", &failed.to_string());

        Ok(checks)
    }

    /// Every input has a default, so an empty context must generate
    pub fn check_accepts_empty_context(generator: &Generator, dir: &Path) -> Result<()> {
        generator.generate(dir, &Params::new())?;
        Ok(())
    }

    /// Without a project name the README must refer to the default one
    pub fn check_default_project_name(ctx: &Context, generator: &Generator, dir: &Path) -> Result<()> {
        generator.generate(dir, &Params::new())?;
        let readme = read_readme(ctx.fs.as_ref(), dir, DEFAULT_ROOT_DIR)?;

        if !readme.contains(DEFAULT_ROOT_DIR) {
            bail!("README does not mention the default project name '{}'", DEFAULT_ROOT_DIR);
        }

        Ok(())
    }

    /// Minimal inputs must leave every other option at the template's default
    pub fn check_defaults(
        ctx: &Context,
        generator: &Generator,
        dir: &Path,
        cloud: Cloud,
        platform: CicdPlatform,
    ) -> Result<()> {
        generator.generate(dir, &Self::identity(cloud, platform))?;
        let content = read_params_testing_file(ctx.fs.as_ref(), dir, TEST_PROJECT_NAME)?;
        assert_default_params(&content, cloud)
    }

    /// A pasted workspace URL must be reduced to its host in the generated project
    pub fn check_workspace_url(
        ctx: &Context,
        generator: &Generator,
        dir: &Path,
        cloud: Cloud,
        raw: &str,
    ) -> Result<()> {
        let mut context = Self::identity(cloud, CicdPlatform::GithubActions);
        context.insert("input_databricks_staging_workspace_host".to_string(), raw.to_string());
        context.insert("input_databricks_prod_workspace_host".to_string(), raw.to_string());

        generator.generate(dir, &context)?;
        let content = read_params_testing_file(ctx.fs.as_ref(), dir, TEST_PROJECT_NAME)?;
        let host = workspace_host(raw)?;

        for key in ["databricks_staging_workspace_host", "databricks_prod_workspace_host"] {
            let line = format!("\n{}={}\n", key, host);
            if !content.contains(&line) {
                bail!("Expected '{}={}' in the params testing file", key, host);
            }
        }

        Ok(())
    }

    /// Generation with a single invalid override must fail at `bundle init`
    ///
    /// Any other error (the CLI could not be spawned, `configure` failed) means
    /// the template never saw the input and is returned as is.
    pub fn check_rejected(generator: &Generator, dir: &Path, key: &str, value: &str) -> Result<()> {
        let mut context = Params::new();
        context.insert(key.to_string(), value.to_string());

        match generator.generate(dir, &context) {
            Ok(_) => bail!("Generation accepted {}='{}'", key, value),
            Err(e) if Self::is_init_failure(&e) => Ok(()),
            Err(e) => Err(e.context(format!("Could not check rejection of {}='{}'", key, value))),
        }
    }

    fn is_init_failure(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::CommandFailed { command, .. }) if command.contains(" bundle init ")
        )
    }

    fn identity(cloud: Cloud, platform: CicdPlatform) -> Params {
        let mut context = Params::new();
        context.insert("input_project_name".to_string(), TEST_PROJECT_NAME.to_string());
        context.insert("input_root_dir".to_string(), TEST_PROJECT_NAME.to_string());
        context.insert("input_cicd_platform".to_string(), platform.as_str().to_string());
        // Azure is the template's default and is left implicit
        if cloud != Cloud::Azure {
            context.insert("input_cloud".to_string(), cloud.as_str().to_string());
        }
        context
    }

    fn record(ctx: &Context, name: String, result: Result<()>) -> InputCheck {
        match result {
            Ok(()) => {
                ctx.output.success(&name);
                InputCheck { name, failure: None }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                ctx.output.error(&format!("{} failed: {}", name, message));
                InputCheck {
                    name,
                    failure: Some(message),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{
        FileSystem, MockCommandExecutor, MockCommandResult, MockFileSystem, MockOutput,
        RealCommandExecutor,
    };
    use std::sync::Arc;

    const CLI: &str = "/bin/databricks";

    fn setup(outputs: Vec<MockCommandResult>) -> (Context, Arc<MockFileSystem>, Arc<MockCommandExecutor>) {
        let fs = Arc::new(MockFileSystem::new());
        let command = Arc::new(MockCommandExecutor::with_outputs(outputs));
        let ctx = Context::test_with(fs.clone(), Arc::new(MockOutput::new()), command.clone());
        (ctx, fs, command)
    }

    fn generator(ctx: &Context) -> Generator {
        Generator::new(ctx, CLI, HarnessConfig::default(), "/repo")
    }

    fn failing_init() -> MockCommandResult {
        MockCommandResult {
            command: format!("{} bundle init", CLI),
            exit_code: 1,
            stdout: String::new(),
            stderr: "invalid project name".to_string(),
        }
    }

    #[test]
    fn test_check_rejected_passes_when_generation_fails() {
        let (ctx, _, _) = setup(vec![failing_init()]);

        let result = InputsCommand::check_rejected(&generator(&ctx), Path::new("/tmp/case"), "input_project_name", "a");

        assert!(result.is_ok());
    }

    #[test]
    fn test_check_rejected_fails_when_generation_succeeds() {
        let (ctx, _, _) = setup(vec![]);

        let err = InputsCommand::check_rejected(&generator(&ctx), Path::new("/tmp/case"), "input_project_name", "a")
            .unwrap_err();

        assert!(err.to_string().contains("accepted input_project_name='a'"));
    }

    #[test]
    fn test_check_defaults_reads_params_file() {
        let (ctx, fs, command) = setup(vec![]);
        let dir = Path::new("/tmp/case");

        let mut content = String::from("\n");
        for (key, value) in crate::params::expected_generator_defaults(Cloud::Gcp) {
            content.push_str(&format!("{}={}\n", key, value));
        }
        fs.write(&dir.join(TEST_PROJECT_NAME).join("_params_testing_only.txt"), &content)
            .unwrap();

        InputsCommand::check_defaults(&ctx, &generator(&ctx), dir, Cloud::Gcp, CicdPlatform::AzureDevops).unwrap();

        let config: Params = serde_json::from_str(&fs.get_file_contents(&dir.join("config.json")).unwrap()).unwrap();
        assert_eq!(config["input_cloud"], "gcp");
        assert_eq!(config["input_root_dir"], TEST_PROJECT_NAME);
        assert_eq!(config["input_cicd_platform"], "azure_devops");
        assert_eq!(command.invocations().len(), 2);
    }

    #[test]
    fn test_check_defaults_reports_missing_params_file() {
        let (ctx, _, _) = setup(vec![]);

        let err = InputsCommand::check_defaults(&ctx, &generator(&ctx), Path::new("/tmp/case"), Cloud::Aws, CicdPlatform::GithubActions)
            .unwrap_err();

        assert!(err.to_string().contains("_params_testing_only.txt"));
    }

    #[test]
    fn test_check_workspace_url_expects_bare_host() {
        let (ctx, fs, _) = setup(vec![]);
        let dir = Path::new("/tmp/case");
        let host = sample_workspace_host(Cloud::Aws);

        fs.write(
            &dir.join(TEST_PROJECT_NAME).join("_params_testing_only.txt"),
            &format!(
                "x=1\ndatabricks_staging_workspace_host={}\ndatabricks_prod_workspace_host={}\n",
                host, host
            ),
        )
        .unwrap();

        let raw = format!("{}{}", host, WORKSPACE_URL_SUFFIXES[0]);
        InputsCommand::check_workspace_url(&ctx, &generator(&ctx), dir, Cloud::Aws, &raw).unwrap();

        let config: Params = serde_json::from_str(&fs.get_file_contents(&dir.join("config.json")).unwrap()).unwrap();
        assert_eq!(config["input_databricks_prod_workspace_host"], raw);
    }

    #[test]
    fn test_check_rejected_propagates_configure_failure() {
        let (ctx, _, command) = setup(vec![MockCommandResult {
            command: format!("{} configure", CLI),
            exit_code: 1,
            stdout: String::new(),
            stderr: "auth error".to_string(),
        }]);

        let err = InputsCommand::check_rejected(&generator(&ctx), Path::new("/tmp/case"), "input_project_name", "a")
            .unwrap_err();

        assert!(format!("{:#}", err).contains("auth error"));
        // bundle init was never reached
        assert_eq!(command.invocations().len(), 1);
    }

    #[test]
    fn test_check_rejected_propagates_spawn_failure() {
        let ctx = Context::test_with(
            Arc::new(MockFileSystem::new()),
            Arc::new(MockOutput::new()),
            Arc::new(RealCommandExecutor::new()),
        );
        let generator = Generator::new(&ctx, "/nonexistent/databricks", HarnessConfig::default(), std::env::temp_dir());

        let result = InputsCommand::check_rejected(&generator, Path::new("/tmp/case"), "input_project_name", "a");

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_context_must_generate() {
        let (ctx, fs, _) = setup(vec![]);
        let dir = Path::new("/tmp/case");

        InputsCommand::check_accepts_empty_context(&generator(&ctx), dir).unwrap();

        let config: Params = serde_json::from_str(&fs.get_file_contents(&dir.join("config.json")).unwrap()).unwrap();
        assert_eq!(config["input_cloud"], "azure");

        let (ctx, _, _) = setup(vec![failing_init()]);
        assert!(InputsCommand::check_accepts_empty_context(&generator(&ctx), dir).is_err());
    }

    #[test]
    fn test_default_project_name_in_readme() {
        let (ctx, fs, _) = setup(vec![]);
        let dir = Path::new("/tmp/case");
        let readme = dir.join(DEFAULT_ROOT_DIR).join("README.md");

        fs.write(&readme, "# my-mlops-project\n").unwrap();
        InputsCommand::check_default_project_name(&ctx, &generator(&ctx), dir).unwrap();

        fs.write(&readme, "# project\n").unwrap();
        let err = InputsCommand::check_default_project_name(&ctx, &generator(&ctx), dir).unwrap_err();
        assert!(err.to_string().contains("default project name"));
    }

    #[test]
    fn test_identity_leaves_azure_implicit() {
        let azure = InputsCommand::identity(Cloud::Azure, CicdPlatform::GithubActions);
        assert!(!azure.contains_key("input_cloud"));

        let aws = InputsCommand::identity(Cloud::Aws, CicdPlatform::GithubActionsForGithubEnterpriseServers);
        assert_eq!(aws["input_cloud"], "aws");
        assert_eq!(aws["input_cicd_platform"], "github_actions_for_github_enterprise_servers");
    }

    #[test]
    fn test_execute_runs_every_check() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(
            Arc::new(MockFileSystem::new()),
            output.clone(),
            Arc::new(MockCommandExecutor::new()),
        );
        let config = HarnessConfig {
            cli_path: Some(CLI.into()),
            ..HarnessConfig::default()
        };

        let checks = InputsCommand::execute(&ctx, config, Path::new("/repo")).unwrap();

        // 2 empty-context checks, 3 clouds x (3 platforms + 4 URLs), 8 invalid inputs
        assert_eq!(checks.len(), 31);
        assert_eq!(checks[0].name, "empty-context");
        assert!(checks[0].passed());
        assert_eq!(checks[2].name, "defaults-aws-github_actions");
        // The mock CLI writes nothing and accepts every invalid input
        assert!(checks.iter().skip(1).all(|c| !c.passed()));
        assert!(output.to_text().contains("Failed: 30"));
    }
}
