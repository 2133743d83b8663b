use std::fs;
use std::path::Path;

use tracing::debug;

use crate::SubstituteError;

pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Reads the package slug (`project.name`) from `<root>/pyproject.toml`.
pub fn extract_package_slug(root: &Path) -> Result<String, SubstituteError> {
    let path = root.join(PYPROJECT_FILE);
    debug!("Reading package metadata: {:?}", path);

    let content = fs::read_to_string(&path).map_err(|e| SubstituteError::Metadata {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| SubstituteError::Metadata {
        path: path.clone(),
        message: e.message().to_string(),
    })?;

    table
        .get("project")
        .and_then(|project| project.get("name"))
        .and_then(|name| name.as_str())
        .map(str::to_string)
        .ok_or_else(|| SubstituteError::Metadata {
            path,
            message: "missing string field 'project.name'".to_string(),
        })
}
