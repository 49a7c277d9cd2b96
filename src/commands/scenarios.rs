use crate::context::Context;
use crate::scenario::{Scenario, gitlab_matrix, project_generation_matrix};
use anyhow::Result;

/// Handles the 'scenarios' command - lists the scenario matrix
pub struct ScenariosCommand;

impl ScenariosCommand {
    pub fn execute(ctx: &Context, gitlab: bool) -> Result<Vec<Scenario>> {
        let scenarios = if gitlab {
            gitlab_matrix()
        } else {
            project_generation_matrix()
        };

        ctx.output.section(&format!("{} scenarios", scenarios.len()));

        for scenario in &scenarios {
            if scenario.is_supported() {
                ctx.output.info(&scenario.id());
            } else {
                ctx.output.dimmed(&format!("{} (skipped: not supported)", scenario.id()));
            }
        }

        Ok(scenarios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCommandExecutor, MockFileSystem, MockOutput};
    use std::sync::Arc;

    #[test]
    fn test_lists_full_matrix_and_marks_skips() {
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(
            Arc::new(MockFileSystem::new()),
            output.clone(),
            Arc::new(MockCommandExecutor::new()),
        );

        let scenarios = ScenariosCommand::execute(&ctx, false).unwrap();
        assert_eq!(scenarios.len(), 99);

        let text = output.to_text();
        assert!(text.contains("=== 99 scenarios ==="));
        assert_eq!(text.matches("(skipped: not supported)").count(), 12);
    }

    #[test]
    fn test_gitlab_matrix() {
        let ctx = Context::test();
        let scenarios = ScenariosCommand::execute(&ctx, true).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].id(), "azure-gitlab-CICD_and_Project-no-no-yes");
    }
}
