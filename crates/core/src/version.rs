//! Tool version parsing and precedence
//!
//! gtm reports versions such as `v1.0-beta.8` or `v1.2.3`, which are close
//! to, but not always valid, semantic versions (the patch component may be
//! missing). Components are compared numerically so that `v1.10` sorts after
//! `v1.9`, and a release sorts after any prerelease of the same core.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a version string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,

    #[error("invalid version component '{0}'")]
    InvalidComponent(String),

    #[error("invalid prerelease identifier '{0}'")]
    InvalidPrerelease(String),
}

/// One dot-separated prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq)]
enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            (Self::Alpha(a), Self::Alpha(b)) => a.cmp(b),
            (Self::Numeric(_), Self::Alpha(_)) => Ordering::Less,
            (Self::Alpha(_), Self::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parsed tool version
///
/// Equality follows precedence: `v1.0` and `1.0.0` are equal.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    core: Vec<u64>,
    pre: Vec<Identifier>,
}

impl Version {
    /// Find the first version-looking token in free-form tool output
    pub fn find_in(text: &str) -> Option<Self> {
        text.split_whitespace()
            .map(|token| {
                token.trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')' | '"' | '\''))
            })
            .find_map(|token| token.parse().ok())
    }

    /// The string this version was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if this version carries prerelease identifiers
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    fn core_component(&self, index: usize) -> u64 {
        self.core.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let body = raw.strip_prefix(&['v', 'V'][..]).unwrap_or(raw);

        // Build metadata never affects precedence
        let body = body.split_once('+').map_or(body, |(head, _)| head);
        if body.is_empty() {
            return Err(VersionError::Empty);
        }

        let (core_part, pre_part) = match body.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (body, None),
        };

        let core = core_part
            .split('.')
            .map(|component| {
                if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::InvalidComponent(component.to_string()));
                }
                component
                    .parse::<u64>()
                    .map_err(|_| VersionError::InvalidComponent(component.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match pre_part {
            None => Vec::new(),
            Some(pre) => pre
                .split('.')
                .map(parse_identifier)
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self {
            raw: raw.to_string(),
            core,
            pre,
        })
    }
}

fn parse_identifier(ident: &str) -> Result<Identifier, VersionError> {
    if ident.is_empty() || !ident.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(VersionError::InvalidPrerelease(ident.to_string()));
    }

    if ident.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = ident.parse::<u64>() {
            return Ok(Identifier::Numeric(n));
        }
    }
    Ok(Identifier::Alpha(ident.to_string()))
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.core.len().max(other.core.len());
        for i in 0..width {
            match self.core_component(i).cmp(&other.core_component(i)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            // Slice ordering: identifier-wise, then a shorter prefix sorts lower
            (false, false) => self.pre.as_slice().cmp(other.pre.as_slice()),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
