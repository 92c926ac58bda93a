//! Entry-point references of the form `package.module:object.attr`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryPointError {
    #[error("entry point is empty")]
    Empty,

    #[error("expected `module:object`, found '{0}'")]
    MissingColon(String),

    #[error("'{0}' is not a dotted Python identifier")]
    InvalidPath(String),
}

/// A validated `module:object` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    module: String,
    object: String,
    extras: Vec<String>,
}

impl EntryPoint {
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[must_use]
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Legacy `[extra]` suffix, if present.
    #[must_use]
    pub fn extras(&self) -> &[String] {
        &self.extras
    }
}

/// Returns true if `segment` is a valid Python identifier.
pub(crate) fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn dotted_path(path: &str) -> Result<String, EntryPointError> {
    let path = path.trim();
    if path.split('.').all(|segment| is_identifier(segment.trim())) {
        Ok(path
            .split('.')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("."))
    } else {
        Err(EntryPointError::InvalidPath(path.to_string()))
    }
}

impl FromStr for EntryPoint {
    type Err = EntryPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(EntryPointError::Empty);
        }

        let (reference, extras) = match value.split_once('[') {
            Some((reference, tail)) if tail.trim_end().ends_with(']') => {
                let list = tail.trim_end().trim_end_matches(']');
                let extras = list
                    .split(',')
                    .map(str::trim)
                    .filter(|extra| !extra.is_empty())
                    .map(str::to_string)
                    .collect();
                (reference, extras)
            }
            Some(_) => return Err(EntryPointError::InvalidPath(value.to_string())),
            None => (value, Vec::new()),
        };

        let (module, object) = reference
            .split_once(':')
            .ok_or_else(|| EntryPointError::MissingColon(value.to_string()))?;

        Ok(Self {
            module: dotted_path(module)?,
            object: dotted_path(object)?,
            extras,
        })
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.object)?;
        if !self.extras.is_empty() {
            write!(f, " [{}]", self.extras.join(", "))?;
        }
        Ok(())
    }
}

impl Serialize for EntryPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_module_and_function() {
        let ep: EntryPoint = "built_by_uv.cli:hello".parse().unwrap();
        assert_eq!(ep.module(), "built_by_uv.cli");
        assert_eq!(ep.object(), "hello");
        assert_eq!(ep.to_string(), "built_by_uv.cli:hello");
    }

    #[test]
    fn tolerate_spaces_and_extras() {
        let ep: EntryPoint = " tool.main : App.run [rich] ".parse().unwrap();
        assert_eq!(ep.module(), "tool.main");
        assert_eq!(ep.object(), "App.run");
        assert_eq!(ep.extras(), ["rich"]);
    }

    #[test]
    fn reject_bad_references() {
        assert_eq!("".parse::<EntryPoint>(), Err(EntryPointError::Empty));
        assert!(matches!(
            "built_by_uv.cli".parse::<EntryPoint>(),
            Err(EntryPointError::MissingColon(_))
        ));
        assert!(matches!(
            "1pkg:main".parse::<EntryPoint>(),
            Err(EntryPointError::InvalidPath(_))
        ));
        assert!(matches!(
            "pkg..mod:main".parse::<EntryPoint>(),
            Err(EntryPointError::InvalidPath(_))
        ));
        assert!(matches!(
            "pkg:".parse::<EntryPoint>(),
            Err(EntryPointError::InvalidPath(_))
        ));
    }
}
