use tracing::debug;

use crate::ProjectIdentity;

/// Slug the template repository uses for itself. Always mapped onto the current
/// project slug so a fresh copy of the template renames its own references.
pub const TEMPLATE_ROOT_SLUG: &str = "dev-tools";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub original: String,
    pub replacement: String,
}

/// Ordered literal replacements applied to file contents.
///
/// Entries are applied in order, each one to the output of the previous.
/// The keys are assumed not to overlap in a way where an earlier replacement
/// produces text that a later key matches; the display name is listed before
/// the slug and package name so the most specific form is consumed first.
#[derive(Debug, Clone)]
pub struct SubstitutionMap {
    substitutions: Vec<Substitution>,
}

impl SubstitutionMap {
    pub fn new(current: &ProjectIdentity, new: &ProjectIdentity) -> Self {
        let pairs = [
            (TEMPLATE_ROOT_SLUG, current.slug()),
            (current.display_name(), new.display_name()),
            (current.slug(), new.slug()),
            (current.package_name(), new.package_name()),
        ];

        let substitutions = pairs
            .into_iter()
            .map(|(original, replacement)| {
                debug!("Substitution: '{}' -> '{}'", original, replacement);
                Substitution {
                    original: original.to_string(),
                    replacement: replacement.to_string(),
                }
            })
            .collect();

        Self { substitutions }
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// Returns the rewritten content if any key occurs in `content`.
    ///
    /// Once triggered every entry is applied, in order, replacing all
    /// occurrences. `None` means the content should be left untouched.
    pub fn apply(&self, content: &str) -> Option<String> {
        let triggered = self
            .substitutions
            .iter()
            .any(|substitution| content.contains(&substitution.original));
        if !triggered {
            return None;
        }

        let mut new_content = content.to_string();
        for substitution in &self.substitutions {
            let count = new_content.matches(&substitution.original).count();
            if count > 0 {
                debug!(
                    "Content replacement: '{}' -> '{}' ({} occurrences)",
                    substitution.original, substitution.replacement, count
                );
                new_content = new_content.replace(&substitution.original, &substitution.replacement);
            }
        }
        Some(new_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(current: &str, new: &str) -> SubstitutionMap {
        SubstitutionMap::new(
            &ProjectIdentity::new(current).unwrap(),
            &ProjectIdentity::new(new).unwrap(),
        )
    }

    #[test]
    fn test_map_order() {
        let map = map("dev-tools", "my-app");
        let pairs: Vec<(&str, &str)> = map
            .substitutions()
            .iter()
            .map(|s| (s.original.as_str(), s.replacement.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("dev-tools", "dev-tools"),
                ("Dev Tools", "My App"),
                ("dev-tools", "my-app"),
                ("dev_tools", "my_app"),
            ]
        );
    }

    #[test]
    fn test_anchor_maps_to_current_slug() {
        let map = map("package-utils", "my-app");
        let anchor = &map.substitutions()[0];

        assert_eq!(anchor.original, TEMPLATE_ROOT_SLUG);
        assert_eq!(anchor.replacement, "package-utils");
    }

    #[test]
    fn test_apply_all_forms() {
        let map = map("dev-tools", "my-app");

        let result = map.apply("Dev Tools config for dev-tools");
        assert_eq!(result.unwrap(), "My App config for my-app");

        let result = map.apply("import dev_tools\nfrom dev_tools.cli import main\n");
        assert_eq!(result.unwrap(), "import my_app\nfrom my_app.cli import main\n");
    }

    #[test]
    fn test_apply_no_match() {
        let map = map("dev-tools", "my-app");

        assert!(map.apply("nothing to see here").is_none());
        assert!(map.apply("").is_none());
    }

    #[test]
    fn test_anchor_chains_through_current_identity() {
        let map = map("package-utils", "my-app");

        let result = map.apply("pip install dev-tools package-utils");
        assert_eq!(result.unwrap(), "pip install my-app my-app");
    }

    #[test]
    fn test_apply_is_literal() {
        let map = map("dev-tools", "my-app");

        let result = map.apply("dev.tools dev_tools.* [dev-tools]");
        assert_eq!(result.unwrap(), "dev.tools my_app.* [my-app]");
    }

    #[test]
    fn test_round_trip_restores_content() {
        let forward = map("dev-tools", "my-app");
        let backward = map("my-app", "dev-tools");
        let original = "# Dev Tools\n\nInstall dev-tools, then `import dev_tools`.\n";

        let converted = forward.apply(original).unwrap();
        let restored = backward.apply(&converted).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let map = map("dev-tools", "my-app");
        let converted = map.apply("Dev Tools / dev-tools / dev_tools").unwrap();

        assert!(map.apply(&converted).is_none());
    }
}
