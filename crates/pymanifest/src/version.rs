//! PEP 440 versions and version specifiers.
//!
//! Covers what a manifest needs: parsing and normalizing versions like
//! `1!2.0.0rc1.post2.dev3+local.7`, ordering them, and evaluating specifier
//! sets such as `>=3.12,<4` against a concrete version.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors produced while parsing versions and specifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version '{0}'")]
    InvalidVersion(String),

    #[error("invalid version specifier '{specifier}': {reason}")]
    InvalidSpecifier {
        specifier: String,
        reason: &'static str,
    },
}

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)^\s*
        v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:[-_.]?(?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_n>[0-9]+)?)?
        (?:-(?P<post_n1>[0-9]+)|[-_.]?(?P<post_l>post|rev|r)[-_.]?(?P<post_n2>[0-9]+)?)?
        (?:[-_.]?(?P<dev_l>dev)[-_.]?(?P<dev_n>[0-9]+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        \s*$",
    )
    .expect("version pattern compiles")
});

/// Pre-release phase, ordered `a < b < rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

impl PreRelease {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Self::Alpha,
            "b" | "beta" => Self::Beta,
            _ => Self::Rc,
        }
    }

    /// Returns the normalized label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::Rc => "rc",
        }
    }
}

/// One dot-separated segment of a local version label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalSegment {
    Number(u64),
    Text(String),
}

impl Ord for LocalSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        // Numeric segments sort after alphanumeric ones.
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Greater,
            (Self::Text(_), Self::Number(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for LocalSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A PEP 440 version.
///
/// Equality and ordering follow PEP 440, so `1.0` and `1.0.0` compare equal.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Vec<LocalSegment>,
}

impl Version {
    /// Build a plain release version such as `3.12`.
    #[must_use]
    pub fn from_release(release: impl Into<Vec<u64>>) -> Self {
        Self {
            epoch: 0,
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: Vec::new(),
        }
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    #[must_use]
    pub fn pre(&self) -> Option<(PreRelease, u64)> {
        self.pre
    }

    #[must_use]
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    #[must_use]
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    #[must_use]
    pub fn local(&self) -> &[LocalSegment] {
        &self.local
    }

    /// Returns true for pre-releases and development releases.
    #[must_use]
    pub fn is_pre(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    #[must_use]
    pub fn is_post(&self) -> bool {
        self.post.is_some()
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        !self.local.is_empty()
    }

    /// The same version with its local label removed.
    #[must_use]
    pub fn without_local(&self) -> Self {
        Self {
            local: Vec::new(),
            ..self.clone()
        }
    }

    /// Returns true if both versions share epoch and (zero-padded) release.
    fn same_release(&self, other: &Self) -> bool {
        self.epoch == other.epoch && cmp_release(&self.release, &other.release).is_eq()
    }

    /// Returns true if this version's release starts with `prefix`.
    fn has_release_prefix(&self, epoch: u64, prefix: &[u64]) -> bool {
        self.epoch == epoch
            && prefix
                .iter()
                .enumerate()
                .all(|(i, part)| self.release.get(i).copied().unwrap_or(0) == *part)
    }

    fn pre_key(&self) -> (u8, u64) {
        match (self.pre, self.post, self.dev) {
            // A bare dev release sorts before every pre-release of the same version.
            (None, None, Some(_)) => (0, 0),
            (Some((phase, n)), _, _) => (phase as u8 + 1, n),
            (None, _, _) => (u8::MAX, 0),
        }
    }

    fn dev_key(&self) -> (bool, u64) {
        (self.dev.is_none(), self.dev.unwrap_or(0))
    }
}

fn cmp_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| cmp_release(&self.release, &other.release))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Version {}

fn parse_number(text: &str, original: &str) -> Result<u64, VersionError> {
    text.parse()
        .map_err(|_| VersionError::InvalidVersion(original.to_string()))
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| VersionError::InvalidVersion(s.to_string()))?;

        let epoch = match caps.name("epoch") {
            Some(m) => parse_number(m.as_str(), s)?,
            None => 0,
        };

        let release = caps["release"]
            .split('.')
            .map(|part| parse_number(part, s))
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_l") {
            Some(label) => {
                let n = match caps.name("pre_n") {
                    Some(m) => parse_number(m.as_str(), s)?,
                    None => 0,
                };
                Some((PreRelease::from_label(label.as_str()), n))
            }
            None => None,
        };

        let post = if let Some(m) = caps.name("post_n1") {
            Some(parse_number(m.as_str(), s)?)
        } else if caps.name("post_l").is_some() {
            match caps.name("post_n2") {
                Some(m) => Some(parse_number(m.as_str(), s)?),
                None => Some(0),
            }
        } else {
            None
        };

        let dev = if caps.name("dev_l").is_some() {
            match caps.name("dev_n") {
                Some(m) => Some(parse_number(m.as_str(), s)?),
                None => Some(0),
            }
        } else {
            None
        };

        let local: Vec<LocalSegment> = caps
            .name("local")
            .map(|m| {
                m.as_str()
                    .split(['-', '_', '.'])
                    .map(|seg| match seg.parse::<u64>() {
                        Ok(n) => LocalSegment::Number(n),
                        Err(_) => LocalSegment::Text(seg.to_ascii_lowercase()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release = self
            .release
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&release)?;
        if let Some((phase, n)) = self.pre {
            write!(f, "{}{n}", phase.as_str())?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{n}")?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{n}")?;
        }
        if !self.local.is_empty() {
            let local = self
                .local
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(".");
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Comparison operator of a version specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `~=`
    Compatible,
    /// `==`
    Equal,
    /// `==` with a trailing `.*`
    EqualStar,
    /// `!=`
    NotEqual,
    /// `!=` with a trailing `.*`
    NotEqualStar,
    /// `<=`
    LessThanEqual,
    /// `>=`
    GreaterThanEqual,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `===`
    ArbitraryEqual,
}

impl Operator {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compatible => "~=",
            Self::Equal | Self::EqualStar => "==",
            Self::NotEqual | Self::NotEqualStar => "!=",
            Self::LessThanEqual => "<=",
            Self::GreaterThanEqual => ">=",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::ArbitraryEqual => "===",
        }
    }
}

// Longest operators first so `===` is not read as `==`.
const OPERATORS: [(&str, Operator); 8] = [
    ("===", Operator::ArbitraryEqual),
    ("~=", Operator::Compatible),
    ("==", Operator::Equal),
    ("!=", Operator::NotEqual),
    ("<=", Operator::LessThanEqual),
    (">=", Operator::GreaterThanEqual),
    ("<", Operator::LessThan),
    (">", Operator::GreaterThan),
];

/// A single clause like `>=4` or `==1.2.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpecifier {
    operator: Operator,
    /// The version as written, without any `.*` suffix.
    text: String,
    /// Parsed version; `None` only for `===`.
    version: Option<Version>,
}

impl VersionSpecifier {
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Returns true if this clause puts an upper limit on admissible versions.
    #[must_use]
    pub fn is_upper_bound(&self) -> bool {
        matches!(
            self.operator,
            Operator::Compatible
                | Operator::Equal
                | Operator::EqualStar
                | Operator::LessThan
                | Operator::LessThanEqual
                | Operator::ArbitraryEqual
        )
    }

    /// Evaluate the clause against `version`.
    #[must_use]
    pub fn contains(&self, version: &Version) -> bool {
        let Some(spec) = &self.version else {
            return version.to_string().eq_ignore_ascii_case(&self.text);
        };

        match self.operator {
            Operator::ArbitraryEqual => version.to_string().eq_ignore_ascii_case(&self.text),
            Operator::Equal => {
                if spec.is_local() {
                    version == spec
                } else {
                    version.without_local() == *spec
                }
            }
            Operator::NotEqual => {
                if spec.is_local() {
                    version != spec
                } else {
                    version.without_local() != *spec
                }
            }
            Operator::EqualStar => version.has_release_prefix(spec.epoch, &spec.release),
            Operator::NotEqualStar => !version.has_release_prefix(spec.epoch, &spec.release),
            Operator::LessThanEqual => version.without_local() <= *spec,
            Operator::GreaterThanEqual => version.without_local() >= *spec,
            Operator::LessThan => {
                // `<V` excludes pre-releases of V unless V itself is one.
                version.without_local() < *spec
                    && (spec.is_pre() || !version.is_pre() || !version.same_release(spec))
            }
            Operator::GreaterThan => {
                // `>V` excludes post-releases of V unless V itself is one.
                version.without_local() > *spec
                    && (spec.is_post() || !version.is_post() || !version.same_release(spec))
            }
            Operator::Compatible => {
                let prefix = &spec.release[..spec.release.len() - 1];
                version.without_local() >= *spec && version.has_release_prefix(spec.epoch, prefix)
            }
        }
    }
}

impl FromStr for VersionSpecifier {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |reason| VersionError::InvalidSpecifier {
            specifier: trimmed.to_string(),
            reason,
        };

        let (mut operator, rest) = OPERATORS
            .iter()
            .find_map(|(prefix, op)| trimmed.strip_prefix(*prefix).map(|rest| (*op, rest)))
            .ok_or_else(|| invalid("expected a comparison operator"))?;

        let mut text = rest.trim();
        if text.is_empty() {
            return Err(invalid("missing version after operator"));
        }

        if operator == Operator::ArbitraryEqual {
            return Ok(Self {
                operator,
                text: text.to_string(),
                version: None,
            });
        }

        if let Some(prefix) = text.strip_suffix(".*") {
            operator = match operator {
                Operator::Equal => Operator::EqualStar,
                Operator::NotEqual => Operator::NotEqualStar,
                _ => return Err(invalid("`.*` is only allowed with `==` and `!=`")),
            };
            text = prefix;
        }

        let version: Version = text.parse()?;

        match operator {
            Operator::EqualStar | Operator::NotEqualStar if version.is_local() => {
                return Err(invalid("`.*` cannot be combined with a local version"));
            }
            Operator::Compatible if version.release.len() < 2 => {
                return Err(invalid("`~=` requires at least two release segments"));
            }
            Operator::Compatible
            | Operator::LessThan
            | Operator::LessThanEqual
            | Operator::GreaterThan
            | Operator::GreaterThanEqual
                if version.is_local() =>
            {
                return Err(invalid("local versions are only allowed with `==` and `!=`"));
            }
            _ => {}
        }

        Ok(Self {
            operator,
            text: text.to_string(),
            version: Some(version),
        })
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.version, self.operator) {
            (Some(v), Operator::EqualStar | Operator::NotEqualStar) => {
                write!(f, "{}{v}.*", self.operator.as_str())
            }
            (Some(v), _) => write!(f, "{}{v}", self.operator.as_str()),
            (None, _) => write!(f, "{}{}", self.operator.as_str(), self.text),
        }
    }
}

/// A comma-separated set of specifiers; a version must satisfy all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSpecifiers(Vec<VersionSpecifier>);

impl VersionSpecifiers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionSpecifier> {
        self.0.iter()
    }

    /// Returns true if `version` satisfies every specifier. The empty set
    /// admits everything.
    #[must_use]
    pub fn contains(&self, version: &Version) -> bool {
        self.0.iter().all(|spec| spec.contains(version))
    }

    /// Returns true if any clause limits versions from above.
    #[must_use]
    pub fn has_upper_bound(&self) -> bool {
        self.0.iter().any(VersionSpecifier::is_upper_bound)
    }
}

impl FromStr for VersionSpecifiers {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        s.split(',')
            .map(VersionSpecifier::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for VersionSpecifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl Serialize for VersionSpecifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
