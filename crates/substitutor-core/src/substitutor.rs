use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{ProjectIdentity, SubstituteError, SubstitutionMap, TrackedFiles};

/// Workflow files need elevated permissions to modify, so they are never
/// rewritten or renamed.
pub const PROTECTED_DIR: &str = ".github/workflows";

#[derive(Debug, Clone, Copy, Default)]
pub struct SubstituteOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstituteResult {
    pub files_visited: usize,
    pub content_changes: usize,
    pub paths_renamed: usize,
}

/// A tracked file that passed the protected-path and regular-file filters.
#[derive(Debug)]
pub struct CandidateFile {
    pub relative: PathBuf,
    pub absolute: PathBuf,
    /// `None` when the file is not valid UTF-8 text.
    pub content: Option<String>,
}

/// Renames one project identity into another across a working tree.
#[derive(Debug, Clone)]
pub struct NameSubstitutor {
    root: PathBuf,
    current: ProjectIdentity,
    new: ProjectIdentity,
    substitutions: SubstitutionMap,
}

impl NameSubstitutor {
    pub fn new(root: &Path, current: ProjectIdentity, new: ProjectIdentity) -> Self {
        let substitutions = SubstitutionMap::new(&current, &new);
        Self {
            root: root.to_path_buf(),
            current,
            new,
            substitutions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn current(&self) -> &ProjectIdentity {
        &self.current
    }

    pub fn new_identity(&self) -> &ProjectIdentity {
        &self.new
    }

    pub fn substitutions(&self) -> &SubstitutionMap {
        &self.substitutions
    }

    pub fn run<T>(&self, tracked: &T, options: SubstituteOptions) -> Result<SubstituteResult, SubstituteError>
    where
        T: TrackedFiles + ?Sized,
    {
        self.run_interactive(tracked, options, |_, _, _| Ok(true), |_, _| Ok(true))
    }

    /// Like [`run`](Self::run), but asks `content_callback` before each
    /// rewrite and `path_callback` before each rename. A `false` answer skips
    /// that single change.
    pub fn run_interactive<T, F, G>(
        &self,
        tracked: &T,
        options: SubstituteOptions,
        content_callback: F,
        path_callback: G,
    ) -> Result<SubstituteResult, SubstituteError>
    where
        T: TrackedFiles + ?Sized,
        F: Fn(&Path, &str, &str) -> Result<bool, SubstituteError>,
        G: Fn(&Path, &Path) -> Result<bool, SubstituteError>,
    {
        info!(
            "Substituting '{}' -> '{}' in {:?}",
            self.current.slug(),
            self.new.slug(),
            self.root
        );

        let mut result = SubstituteResult::default();
        let mut vacated_dirs = BTreeSet::new();

        let paths = tracked.list(&self.root)?;
        debug!("Visiting {} tracked paths", paths.len());

        for candidate in self.walk(paths) {
            let candidate = candidate?;
            result.files_visited += 1;

            if let Some(content) = &candidate.content {
                if let Some(new_content) = self.substitutions.apply(content) {
                    if content_callback(&candidate.absolute, content, &new_content)? {
                        if options.dry_run {
                            info!("Would update contents of: {:?}", candidate.absolute);
                        } else {
                            info!("Updating contents of: {:?}", candidate.absolute);
                            write_text(&candidate.absolute, &new_content)?;
                        }
                        result.content_changes += 1;
                    }
                }
            }

            if let Some(new_relative) = self.renamed_path(&candidate.relative) {
                let new_absolute = self.root.join(&new_relative);
                if path_callback(&candidate.absolute, &new_absolute)? {
                    if options.dry_run {
                        info!("Would rename file: {:?} -> {:?}", candidate.absolute, new_absolute);
                    } else {
                        info!("Renaming file: {:?} -> {:?}", candidate.absolute, new_absolute);
                        move_file(&candidate.absolute, &new_absolute)?;
                        if let Some(parent) = candidate.relative.parent() {
                            vacated_dirs.insert(parent.to_path_buf());
                        }
                    }
                    result.paths_renamed += 1;
                }
            }
        }

        self.prune_empty_dirs(&vacated_dirs)?;

        info!(
            "Substitution complete: {} files visited, {} content changes, {} paths renamed",
            result.files_visited, result.content_changes, result.paths_renamed
        );
        Ok(result)
    }

    /// Lazily yields the files in `paths` eligible for substitution.
    ///
    /// Each file is checked and read only when the iterator reaches it, so a
    /// yielded file exists at that moment.
    pub fn walk(
        &self,
        paths: Vec<PathBuf>,
    ) -> impl Iterator<Item = Result<CandidateFile, SubstituteError>> + '_ {
        paths
            .into_iter()
            .filter_map(move |relative| self.candidate(relative).transpose())
    }

    fn candidate(&self, relative: PathBuf) -> Result<Option<CandidateFile>, SubstituteError> {
        if relative.starts_with(PROTECTED_DIR) {
            debug!("Skipping protected file: {:?}", relative);
            return Ok(None);
        }

        let absolute = self.root.join(&relative);
        if !absolute.is_file() {
            debug!("Skipping non-regular or missing path: {:?}", absolute);
            return Ok(None);
        }

        let content = match fs::read_to_string(&absolute) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                debug!("Skipping binary file: {:?}", absolute);
                None
            }
            Err(source) => return Err(SubstituteError::io(&absolute, source)),
        };

        Ok(Some(CandidateFile {
            relative,
            absolute,
            content,
        }))
    }

    /// Computes the new location of `relative` if one of its segments is
    /// exactly the current package name.
    ///
    /// When a segment matches, every occurrence of the package name in the
    /// relative path is replaced, so `dev_tools/dev_tools_cli.py` becomes
    /// `my_app/my_app_cli.py`. A segment that merely contains the package
    /// name does not trigger a rename on its own.
    pub fn renamed_path(&self, relative: &Path) -> Option<PathBuf> {
        let current = self.current.package_name();
        let matches = relative
            .components()
            .any(|component| matches!(component, Component::Normal(segment) if segment == current));
        if !matches {
            return None;
        }

        let renamed: PathBuf = relative
            .components()
            .map(|component| match component {
                Component::Normal(segment) => self.rename_segment(segment),
                other => other.as_os_str().to_os_string(),
            })
            .collect();
        debug!("Path replacement: {:?} -> {:?}", relative, renamed);
        Some(renamed)
    }

    fn rename_segment(&self, segment: &OsStr) -> OsString {
        match segment.to_str() {
            Some(name) => OsString::from(name.replace(self.current.package_name(), self.new.package_name())),
            None => {
                warn!("Keeping non-UTF-8 path segment unchanged: {:?}", segment);
                segment.to_os_string()
            }
        }
    }

    /// Removes directories emptied by file moves, deepest first, up to but
    /// excluding the root.
    fn prune_empty_dirs(&self, vacated: &BTreeSet<PathBuf>) -> Result<(), SubstituteError> {
        let mut dirs: Vec<&Path> = vacated
            .iter()
            .flat_map(|dir| dir.ancestors())
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        dirs.sort_by(|a, b| b.components().count().cmp(&a.components().count()));

        for dir in dirs {
            let absolute = self.root.join(dir);
            if !absolute.is_dir() {
                continue;
            }
            let is_empty = fs::read_dir(&absolute)
                .map_err(|e| SubstituteError::io(&absolute, e))?
                .next()
                .is_none();
            if is_empty {
                debug!("Removing empty directory: {:?}", absolute);
                fs::remove_dir(&absolute).map_err(|e| SubstituteError::io(&absolute, e))?;
            }
        }
        Ok(())
    }
}

fn write_text(path: &Path, content: &str) -> Result<(), SubstituteError> {
    fs::write(path, content).map_err(|e| SubstituteError::io(path, e))
}

fn move_file(from: &Path, to: &Path) -> Result<(), SubstituteError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| SubstituteError::io(parent, e))?;
    }
    fs::rename(from, to).map_err(|e| SubstituteError::io(from, e))
}
