//! Package names and PEP 508 dependency requirements.

use crate::version::{VersionError, VersionSpecifiers};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").expect("name pattern compiles")
});

static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("separator pattern compiles"));

/// Errors produced while parsing a dependency requirement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    #[error("requirement is empty")]
    Empty,

    #[error("invalid package name '{0}'")]
    InvalidName(String),

    #[error("invalid extra name '{0}'")]
    InvalidExtra(String),

    #[error("missing closing `]` after extras")]
    UnclosedExtras,

    #[error("missing closing `)` after version specifiers")]
    UnclosedParen,

    #[error("missing URL after `@`")]
    MissingUrl,

    #[error("empty environment marker after `;`")]
    EmptyMarker,

    #[error("unexpected '{0}' after URL, expected `; marker`")]
    TrailingUrlText(String),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// A validated distribution name, kept as written.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Validate a name against the PEP 508 name grammar.
    pub fn new(name: impl Into<String>) -> Result<Self, RequirementError> {
        let name = name.into();
        if NAME_RE.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(RequirementError::InvalidName(name))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The PEP 503 normalized form: lowercase, separator runs collapsed to `-`.
    #[must_use]
    pub fn normalized(&self) -> String {
        SEPARATOR_RUN_RE
            .replace_all(&self.0, "-")
            .to_ascii_lowercase()
    }

    /// The importable module name derived from the package name.
    #[must_use]
    pub fn module_name(&self) -> String {
        self.normalized().replace('-', "_")
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PackageName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A dependency requirement such as `anyio[trio]>=4,<5; python_version < "3.13"`.
///
/// The original text is retained so the manifest reports dependencies exactly
/// as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    raw: String,
    name: PackageName,
    extras: Vec<String>,
    specifiers: VersionSpecifiers,
    url: Option<String>,
    marker: Option<String>,
}

impl Requirement {
    /// The requirement exactly as declared, minus surrounding whitespace.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn name(&self) -> &PackageName {
        &self.name
    }

    #[must_use]
    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    #[must_use]
    pub fn specifiers(&self) -> &VersionSpecifiers {
        &self.specifiers
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// Returns true if the requirement pins or caps the version it admits.
    #[must_use]
    pub fn has_upper_bound(&self) -> bool {
        self.url.is_some() || self.specifiers.has_upper_bound()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn parse_extras(list: &str) -> Result<Vec<String>, RequirementError> {
    list.split(',')
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
        .map(|extra| {
            if NAME_RE.is_match(extra) {
                Ok(extra.to_string())
            } else {
                Err(RequirementError::InvalidExtra(extra.to_string()))
            }
        })
        .collect()
}

fn parse_marker(text: &str) -> Result<String, RequirementError> {
    let marker = text.trim();
    if marker.is_empty() {
        return Err(RequirementError::EmptyMarker);
    }
    Ok(marker.to_string())
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(RequirementError::Empty);
        }

        let name_end = raw.find(|c: char| !is_name_char(c)).unwrap_or(raw.len());
        let name = PackageName::new(&raw[..name_end])?;
        let mut rest = raw[name_end..].trim_start();

        let mut extras = Vec::new();
        if let Some(after) = rest.strip_prefix('[') {
            let (list, tail) = after
                .split_once(']')
                .ok_or(RequirementError::UnclosedExtras)?;
            extras = parse_extras(list)?;
            rest = tail.trim_start();
        }

        let mut url = None;
        let mut specifiers = VersionSpecifiers::default();
        let marker;
        if let Some(location) = rest.strip_prefix('@') {
            // A URL may itself contain `;`, so it ends at whitespace.
            let location = location.trim_start();
            let url_end = location.find(char::is_whitespace).unwrap_or(location.len());
            let (link, tail) = location.split_at(url_end);
            if link.is_empty() || link.starts_with(';') {
                return Err(RequirementError::MissingUrl);
            }
            url = Some(link.to_string());
            marker = match tail.trim_start() {
                "" => None,
                tail => match tail.strip_prefix(';') {
                    Some(text) => Some(parse_marker(text)?),
                    None => return Err(RequirementError::TrailingUrlText(tail.to_string())),
                },
            };
        } else {
            let (version_part, marker_part) = match rest.split_once(';') {
                Some((version_part, text)) => (version_part.trim_end(), Some(text)),
                None => (rest, None),
            };
            marker = marker_part.map(parse_marker).transpose()?;
            if let Some(inner) = version_part.strip_prefix('(') {
                let inner = inner
                    .strip_suffix(')')
                    .ok_or(RequirementError::UnclosedParen)?;
                specifiers = inner.parse()?;
            } else {
                specifiers = version_part.parse()?;
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            name,
            extras,
            specifiers,
            url,
            marker,
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
