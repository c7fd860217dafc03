//! PEP 508 dependency specifiers

use hcb_errors::RecipeError;
use pep440_rs::VersionSpecifiers;
use pep508_rs::{MarkerTree, PackageName, VerbatimUrl, VersionOrUrl};
use std::fmt;
use std::str::FromStr;

/// A parsed PEP 508 dependency specifier
///
/// `name [extras] (version-constraint | @ url) [; marker]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// PEP 503 normalized name
    pub name: String,
    /// Extras, ignored when mapping to conda
    pub extras: Vec<String>,
    /// Version constraint, `None` when unconstrained
    pub specifiers: Option<VersionSpecifiers>,
    /// Direct reference URL (`name @ url`)
    pub url: Option<String>,
    /// Environment marker without the leading `;`
    pub marker: Option<String>,
}

impl Requirement {
    /// Name normalized per PEP 503
    #[must_use]
    pub fn canonical_name(&self) -> String {
        self.name.clone()
    }

    /// Whether the marker restricts this requirement to an optional extra
    #[must_use]
    pub fn is_extra_only(&self) -> bool {
        self.marker.as_deref().is_some_and(marker_mentions_extra)
    }
}

/// Scan a rendered marker for the `extra` variable, skipping quoted values
fn marker_mentions_extra(marker: &str) -> bool {
    let mut quote = None;
    let mut token = String::new();
    for ch in marker.chars().chain(std::iter::once(' ')) {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => {
                quote = Some(ch);
                token.clear();
            }
            None if ch.is_ascii_alphanumeric() || ch == '_' => token.push(ch),
            None => {
                if token == "extra" {
                    return true;
                }
                token.clear();
            }
        }
    }
    false
}

/// PEP 503 name normalization
///
/// Names that are not valid project names are only trimmed and lowercased;
/// they can never match a parsed requirement.
#[must_use]
pub fn canonicalize_name(name: &str) -> String {
    PackageName::from_str(name.trim()).map_or_else(
        |_| name.trim().to_ascii_lowercase(),
        |package| package.to_string(),
    )
}

impl FromStr for Requirement {
    type Err = RecipeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parsed = pep508_rs::Requirement::<VerbatimUrl>::from_str(input.trim()).map_err(|e| {
            RecipeError::InvalidRequirement {
                requirement: input.to_string(),
                message: e.to_string(),
            }
        })?;

        let (specifiers, url) = match parsed.version_or_url {
            Some(VersionOrUrl::VersionSpecifier(specifiers)) if !specifiers.is_empty() => {
                (Some(specifiers), None)
            }
            Some(VersionOrUrl::VersionSpecifier(_)) | None => (None, None),
            Some(VersionOrUrl::Url(url)) => (None, Some(url.to_string())),
        };

        Ok(Self {
            name: parsed.name.to_string(),
            extras: parsed.extras.iter().map(ToString::to_string).collect(),
            specifiers,
            url,
            marker: marker_text(&parsed.marker),
        })
    }
}

fn marker_text(marker: &MarkerTree) -> Option<String> {
    if marker.is_true() {
        None
    } else {
        marker.try_to_string()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(url) = &self.url {
            write!(f, " @ {url}")?;
        } else if let Some(specifiers) = &self.specifiers {
            write!(f, "{specifiers}")?;
        }
        if let Some(marker) = &self.marker {
            write!(f, " ; {marker}")?;
        }
        Ok(())
    }
}
