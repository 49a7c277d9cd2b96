use crate::error::HarnessError;
use crate::scenario::Scenario;
use crate::traits::FileSystem;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Scenario-dependent notebooks inside the project package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Plain Delta-table training notebook
    DeltaNotebook,
    /// Feature engineering notebook, only with the feature store
    FeatureStoreNotebook,
    /// MLflow Recipes training notebook
    RecipeNotebook,
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [
        Artifact::DeltaNotebook,
        Artifact::FeatureStoreNotebook,
        Artifact::RecipeNotebook,
    ];

    /// Path relative to the project package directory
    pub fn relative_path(&self) -> &'static str {
        match self {
            Artifact::DeltaNotebook => "training/notebooks/Train.py",
            Artifact::FeatureStoreNotebook => {
                "feature_engineering/notebooks/GenerateAndWriteFeatures.py"
            }
            Artifact::RecipeNotebook => "training/notebooks/TrainWithMLflowRecipes.py",
        }
    }
}

/// Which artifacts a scenario must and must not produce
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedArtifacts {
    pub entries: Vec<(Artifact, bool)>,
}

impl ExpectedArtifacts {
    pub fn for_scenario(scenario: &Scenario) -> Self {
        let features = &scenario.features;
        let project = features.setup_mode.includes_project();
        let feature_store = features.include_feature_store.is_yes();
        let recipes = features.include_mlflow_recipes.is_yes();

        let entries = Artifact::ALL
            .into_iter()
            .map(|artifact| {
                let present = project
                    && match artifact {
                        Artifact::DeltaNotebook => !recipes && !feature_store,
                        Artifact::FeatureStoreNotebook => feature_store,
                        Artifact::RecipeNotebook => recipes,
                    };
                (artifact, present)
            })
            .collect();

        Self { entries }
    }

    /// Project package directory: the root dir with dashes turned into underscores
    pub fn package_dir(dir: &Path, root_dir: &str) -> PathBuf {
        dir.join(root_dir).join(root_dir.replace('-', "_"))
    }

    /// Check presence and absence of every artifact under `<dir>/<root_dir>/<package>/`
    pub fn verify(&self, fs: &dyn FileSystem, dir: &Path, root_dir: &str) -> Result<()> {
        let package = Self::package_dir(dir, root_dir);

        for (artifact, expected_present) in &self.entries {
            let path = package.join(artifact.relative_path());
            if fs.is_file(&path) != *expected_present {
                return Err(HarnessError::ArtifactMismatch {
                    path,
                    expected_present: *expected_present,
                }
                .into());
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn is_expected(&self, artifact: Artifact) -> bool {
        self.entries
            .iter()
            .any(|(a, present)| *a == artifact && *present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{
        CicdPlatform, Cloud, FeatureSet, SetupMode, Toggle, project_generation_matrix,
    };
    use crate::traits::MockFileSystem;

    const ROOT: &str = "27896cf3-bb3e-476e-8129-96df0406d5c7";

    fn scenario(mode: SetupMode, fs: Toggle, recipes: Toggle) -> Scenario {
        Scenario::new(
            Cloud::Aws,
            CicdPlatform::GithubActions,
            FeatureSet::new(mode, fs, recipes, Toggle::No),
        )
    }

    #[test]
    fn test_delta_notebook_only_without_optional_features() {
        let plain = ExpectedArtifacts::for_scenario(&scenario(SetupMode::CicdAndProject, Toggle::No, Toggle::No));
        assert!(plain.is_expected(Artifact::DeltaNotebook));
        assert!(!plain.is_expected(Artifact::FeatureStoreNotebook));
        assert!(!plain.is_expected(Artifact::RecipeNotebook));

        let recipes = ExpectedArtifacts::for_scenario(&scenario(SetupMode::ProjectOnly, Toggle::No, Toggle::Yes));
        assert!(!recipes.is_expected(Artifact::DeltaNotebook));
        assert!(recipes.is_expected(Artifact::RecipeNotebook));
    }

    #[test]
    fn test_cicd_only_expects_nothing() {
        for scenario in project_generation_matrix()
            .iter()
            .filter(|s| s.setup_mode() == SetupMode::CicdOnly)
        {
            let expected = ExpectedArtifacts::for_scenario(scenario);
            assert!(Artifact::ALL.iter().all(|a| !expected.is_expected(*a)));
        }
    }

    #[test]
    fn test_package_dir_replaces_dashes() {
        assert_eq!(
            ExpectedArtifacts::package_dir(Path::new("/o"), ROOT),
            PathBuf::from("/o/27896cf3-bb3e-476e-8129-96df0406d5c7/27896cf3_bb3e_476e_8129_96df0406d5c7")
        );
    }

    #[test]
    fn test_verify_detects_missing_and_unexpected() {
        let expected = ExpectedArtifacts::for_scenario(&scenario(SetupMode::CicdAndProject, Toggle::Yes, Toggle::No));
        let package = ExpectedArtifacts::package_dir(Path::new("/o"), ROOT);

        let fs = MockFileSystem::new();
        let err = expected.verify(&fs, Path::new("/o"), ROOT).unwrap_err();
        assert!(err.to_string().starts_with("Expected artifact is missing"));

        fs.write(&package.join(Artifact::FeatureStoreNotebook.relative_path()), "# fs")
            .unwrap();
        expected.verify(&fs, Path::new("/o"), ROOT).unwrap();

        fs.write(&package.join(Artifact::DeltaNotebook.relative_path()), "# delta")
            .unwrap();
        let err = expected.verify(&fs, Path::new("/o"), ROOT).unwrap_err();
        assert!(err.to_string().contains("Unexpected artifact was generated"));
        assert!(err.to_string().contains("Train.py"));
    }
}
