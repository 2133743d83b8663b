use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

pub mod identity;
pub mod metadata;
pub mod substitutions;
pub mod substitutor;
pub mod tracked;

pub use identity::{slugify, ProjectIdentity};
pub use metadata::extract_package_slug;
pub use substitutions::{Substitution, SubstitutionMap, TEMPLATE_ROOT_SLUG};
pub use substitutor::{CandidateFile, NameSubstitutor, SubstituteOptions, SubstituteResult, PROTECTED_DIR};
pub use tracked::{GitTrackedFiles, TrackedFiles};

#[derive(thiserror::Error, Debug)]
pub enum SubstituteError {
    #[error("The project name '{value}' is invalid.\nSuggested name: {suggestion}")]
    InvalidIdentifier { value: String, suggestion: String },
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Tracked files error: {message}")]
    TrackedFiles { message: String },
    #[error("Metadata error in {path:?}: {message}")]
    Metadata { path: PathBuf, message: String },
    #[error("Review error: {message}")]
    Review { message: String },
}

impl SubstituteError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Resolves both identities for a run rooted at `root`.
///
/// Without `current_project_name` the current name is read from the package
/// metadata under `root`. Both names must already be valid slugs.
pub fn resolve_substitutor(
    root: &Path,
    project_name: &str,
    current_project_name: Option<&str>,
) -> Result<NameSubstitutor, SubstituteError> {
    let new = ProjectIdentity::new(project_name)?;
    let current_name = match current_project_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => extract_package_slug(root)?,
    };
    let current = ProjectIdentity::new(&current_name)?;

    Ok(NameSubstitutor::new(root, current, new))
}

/// Renames the project under `root` to `project_name`, using git's tracked
/// files at `HEAD` as the set of files to process.
pub fn substitute_template_name(
    root: &Path,
    project_name: &str,
    current_project_name: Option<&str>,
    options: SubstituteOptions,
) -> Result<SubstituteResult, SubstituteError> {
    let substitutor = resolve_substitutor(root, project_name, current_project_name)?;
    info!(
        "Renaming project '{}' to '{}'",
        substitutor.current().slug(),
        substitutor.new_identity().slug()
    );
    substitutor.run(&GitTrackedFiles, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolve_with_explicit_current_name() {
        let substitutor = resolve_substitutor(Path::new("/repo"), "my-app", Some("dev-tools")).unwrap();

        assert_eq!(substitutor.current().slug(), "dev-tools");
        assert_eq!(substitutor.new_identity().package_name(), "my_app");
    }

    #[test]
    fn test_resolve_detects_current_name_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "[project]\nname = \"package-utils\"\n").unwrap();

        let substitutor = resolve_substitutor(dir.path(), "my-app", None).unwrap();
        assert_eq!(substitutor.current().display_name(), "Package Utils");

        let substitutor = resolve_substitutor(dir.path(), "my-app", Some("")).unwrap();
        assert_eq!(substitutor.current().slug(), "package-utils");
    }

    #[test]
    fn test_resolve_rejects_invalid_names() {
        let error = resolve_substitutor(Path::new("/repo"), "My_App", Some("dev-tools")).unwrap_err();
        assert!(error.to_string().contains("Suggested name: my-app"));

        let error = resolve_substitutor(Path::new("/repo"), "my-app", Some("Dev Tools")).unwrap_err();
        assert!(matches!(error, SubstituteError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_resolve_invalid_detected_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "[project]\nname = \"Dev_Tools\"\n").unwrap();

        let error = resolve_substitutor(dir.path(), "my-app", None).unwrap_err();
        assert!(error.to_string().contains("'Dev_Tools'"));
        assert!(error.to_string().contains("dev-tools"));
    }

    #[test]
    fn test_substitute_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.md"), "dev-tools").unwrap();

        let error = substitute_template_name(dir.path(), "my-app", Some("dev-tools"), SubstituteOptions::default())
            .unwrap_err();

        assert!(matches!(error, SubstituteError::TrackedFiles { .. }));
        assert_eq!(fs::read_to_string(dir.path().join("notes.md")).unwrap(), "dev-tools");
    }

    #[test]
    fn test_substitute_committed_repository() {
        let dir = tempfile::tempdir().unwrap();
        tracked::testing::commit_files(
            dir.path(),
            &[
                ("pyproject.toml", "[project]\nname = \"dev-tools\"\n"),
                ("dev_tools/caf\u{e9}.md", "Dev Tools caf\u{e9}"),
                ("dev_tools/plain.md", "import dev_tools"),
                (".github/workflows/main.yml", "name: dev-tools"),
            ],
        );

        let result = substitute_template_name(dir.path(), "my-app", None, SubstituteOptions::default()).unwrap();

        assert_eq!(
            result,
            SubstituteResult {
                files_visited: 3,
                content_changes: 3,
                paths_renamed: 2,
            }
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("my_app/caf\u{e9}.md")).unwrap(),
            "My App caf\u{e9}"
        );
        assert_eq!(fs::read_to_string(dir.path().join("my_app/plain.md")).unwrap(), "import my_app");
        assert_eq!(
            fs::read_to_string(dir.path().join("pyproject.toml")).unwrap(),
            "[project]\nname = \"my-app\"\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join(".github/workflows/main.yml")).unwrap(),
            "name: dev-tools"
        );
        assert!(!dir.path().join("dev_tools").exists());
    }

    #[test]
    fn test_resolve_missing_metadata() {
        let dir = tempfile::tempdir().unwrap();

        let error = resolve_substitutor(dir.path(), "my-app", None).unwrap_err();
        assert!(matches!(error, SubstituteError::Metadata { .. }));
    }
}
