//! Semantic versions used as changelog sort keys

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version {0:?}: expected MAJOR.MINOR.PATCH")]
    InvalidCore(String),

    #[error("Invalid pre-release identifier {1:?} in {0:?}")]
    InvalidPrerelease(String, String),

    #[error("Invalid build metadata in {0:?}")]
    InvalidBuild(String),
}

/// A `MAJOR.MINOR.PATCH[-pre][+build]` version.
///
/// Ordering follows SemVer precedence. Build metadata is kept for display
/// but never takes part in comparisons.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Vec<Identifier>,
    pub build: Option<String>,
}

/// One dot-separated pre-release identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // A pre-release sorts before its release
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                // Lexicographic over identifiers; a shorter prefix sorts first
                (false, false) => self.pre.cmp(&other.pre),
            })
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

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => {
                if !build.split('.').all(is_identifier) {
                    return Err(VersionError::InvalidBuild(s.to_string()));
                }
                (rest, Some(build.to_string()))
            }
            None => (s, None),
        };

        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let mut parts = core.split('.').map(parse_numeric);
        let (Some(Some(major)), Some(Some(minor)), Some(Some(patch)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(VersionError::InvalidCore(s.to_string()));
        };

        let pre = match pre {
            Some(pre) => pre
                .split('.')
                .map(|part| {
                    if !is_identifier(part) {
                        return Err(VersionError::InvalidPrerelease(
                            s.to_string(),
                            part.to_string(),
                        ));
                    }
                    if part.chars().all(|c| c.is_ascii_digit()) {
                        // Numeric identifiers must not carry leading zeros
                        return parse_numeric(part).map(Identifier::Numeric).ok_or_else(|| {
                            VersionError::InvalidPrerelease(s.to_string(), part.to_string())
                        });
                    }
                    Ok(Identifier::AlphaNumeric(part.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre,
            build,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            let pre: Vec<String> = self.pre.iter().map(|id| id.to_string()).collect();
            write!(f, "-{}", pre.join("."))?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

/// Digits only, no leading zero unless the number is zero
fn parse_numeric(part: &str) -> Option<u64> {
    let digits = !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if !digits || (part.len() > 1 && part.starts_with('0')) {
        return None;
    }
    part.parse().ok()
}

fn is_identifier(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_numeric_not_lexical() {
        assert!(v("1.10.0") > v("1.2.0"));
        assert!(v("2.0.0-beta") > v("1.10.0"));
        assert!(v("0.0.10") > v("0.0.9"));
    }

    #[test]
    fn test_prerelease_precedence() {
        // Example chain from the SemVer 2.0 precedence rules
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        for pair in chain.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(v("1.0.0+build.1"), v("1.0.0+build.2"));
        assert_eq!(v("1.0.0+20240101"), v("1.0.0"));
        assert_eq!(v("1.0.0-rc.1+abc").to_string(), "1.0.0-rc.1+abc");
    }

    #[test]
    fn test_hyphen_inside_prerelease() {
        let version = v("1.2.3-rc-1.2");
        assert_eq!(
            version.pre,
            vec![
                Identifier::AlphaNumeric("rc-1".to_string()),
                Identifier::Numeric(2)
            ]
        );
    }

    #[test]
    fn test_invalid_versions() {
        assert!("1.2".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("01.2.3".parse::<Version>().is_err());
        assert!("1.2.3junk".parse::<Version>().is_err());
        assert!("1.2.3-".parse::<Version>().is_err());
        assert!("1.2.3-a..b".parse::<Version>().is_err());
        assert!("1.2.3+".parse::<Version>().is_err());
    }

    #[test]
    fn test_prerelease_leading_zero_rejected() {
        assert_eq!(
            "1.0.0-01".parse::<Version>(),
            Err(VersionError::InvalidPrerelease(
                "1.0.0-01".to_string(),
                "01".to_string()
            ))
        );
        assert!("1.0.0-rc.007".parse::<Version>().is_err());
        assert!("1.0.0-0".parse::<Version>().is_ok());
        assert!("1.0.0-0a".parse::<Version>().is_ok());
        assert!("1.0.0+001".parse::<Version>().is_ok());
    }
}
