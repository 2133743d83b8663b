use std::sync::OnceLock;

use deunicode::deunicode;
use regex::Regex;

use crate::SubstituteError;

/// The three name forms a project is known by, derived from a validated slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    slug: String,
    package_name: String,
    display_name: String,
}

impl ProjectIdentity {
    /// Validates `raw_slug` and derives the package and display names from it.
    ///
    /// The input must be non-empty and already in canonical slug form
    /// (see [`slugify`]). Otherwise the error carries the canonical form as a
    /// suggestion.
    pub fn new(raw_slug: &str) -> Result<Self, SubstituteError> {
        let canonical = slugify(raw_slug);
        if raw_slug.is_empty() || raw_slug != canonical {
            return Err(SubstituteError::InvalidIdentifier {
                value: raw_slug.to_string(),
                suggestion: canonical,
            });
        }

        let package_name = canonical.replace('-', "_");
        let display_name = title_case(&canonical.replace('-', " "));

        Ok(Self {
            slug: canonical,
            package_name,
            display_name,
        })
    }

    /// Lowercase, hyphen separated form, e.g. `dev-tools`.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Module identifier form, e.g. `dev_tools`.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Human readable form, e.g. `Dev Tools`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Transliterates `value` to ASCII, lowercases it, collapses every run of
/// non-alphanumeric characters into a single hyphen and strips leading and
/// trailing hyphens.
///
/// Apostrophes and quotes are dropped rather than treated as separators, so
/// `"Bob's Tools"` becomes `bobs-tools` and `"Café Tools"` becomes `cafe-tools`.
pub fn slugify(value: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators =
        SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("separator pattern is valid"));

    let lowered: String = deunicode(value)
        .chars()
        .filter(|c| !matches!(c, '\'' | '"'))
        .collect::<String>()
        .to_lowercase();
    separators
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Uppercases every letter that follows a non-letter and lowercases the rest,
/// so `plugin v2beta` becomes `Plugin V2Beta`.
fn title_case(value: &str) -> String {
    let mut previous_is_letter = false;
    value
        .chars()
        .map(|c| {
            let mapped = if !c.is_alphabetic() {
                c
            } else if previous_is_letter {
                c.to_ascii_lowercase()
            } else {
                c.to_ascii_uppercase()
            };
            previous_is_letter = c.is_alphabetic();
            mapped
        })
        .collect()
}
