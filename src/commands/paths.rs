use crate::context::Context;
use crate::inspect::paths;
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// Handles the 'paths' command - prints every entry of a generated tree
pub struct PathsCommand;

impl PathsCommand {
    pub fn execute(ctx: &Context, dir: &Path) -> Result<BTreeSet<String>> {
        if !ctx.fs.exists(dir) {
            anyhow::bail!("Directory does not exist: {}", dir.display());
        }

        let entries = paths(ctx.fs.as_ref(), dir)?;
        for entry in &entries {
            println!("{}", entry);
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{FileSystem, MockCommandExecutor, MockFileSystem, MockOutput};
    use std::sync::Arc;

    #[test]
    fn test_missing_dir_is_an_error() {
        let ctx = Context::test();
        assert!(PathsCommand::execute(&ctx, Path::new("/nope")).is_err());
    }

    #[test]
    fn test_lists_relative_entries() {
        let fs = Arc::new(MockFileSystem::new());
        fs.write(Path::new("/gen/p/README.md"), "x").unwrap();
        let ctx = Context::test_with(
            fs,
            Arc::new(MockOutput::new()),
            Arc::new(MockCommandExecutor::new()),
        );

        let entries = PathsCommand::execute(&ctx, Path::new("/gen")).unwrap();
        assert_eq!(
            entries.into_iter().collect::<Vec<_>>(),
            vec!["p".to_string(), "p/README.md".to_string()]
        );
    }
}
