//! Plain-text requirements parsing for the packaging surface.
//!
//! The format is the conventional one-requirement-per-line list:
//! comments and blank lines are skipped, a package may carry a version
//! comparison (`>=`, `==`, `>`) and a platform-conditional suffix after
//! `;`, editable entries (`-e …#egg=name`) reduce to their package
//! name, and `-r other-file` pulls in another list. The mock core never
//! reads this; it feeds packaging metadata only.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version comparison operators, longest spelling first when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    /// `>=`
    GreaterEq,
    /// `==`
    Exact,
    /// `>`
    Greater,
}

impl Comparator {
    /// The operator as written in a requirements file.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::GreaterEq => ">=",
            Comparator::Exact => "==",
            Comparator::Greater => ">",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version bound attached to a requirement.
///
/// The version stays a raw string: the source format allows spellings
/// like `1.0.0b1` that are not semver, and nothing here interprets
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    /// The comparison operator.
    pub comparator: Comparator,
    /// The version string, verbatim.
    pub version: String,
}

/// One parsed requirement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Package name.
    pub package: String,
    /// Optional version bound.
    pub version: Option<VersionSpec>,
    /// Optional platform-conditional marker (the text after `;`).
    pub platform: Option<String>,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.package)?;
        if let Some(spec) = &self.version {
            write!(f, "{}{}", spec.comparator, spec.version)?;
        }
        if let Some(platform) = &self.platform {
            write!(f, "; {}", platform)?;
        }
        Ok(())
    }
}

/// Errors from requirements parsing.
#[derive(Debug, Error)]
pub enum RequirementError {
    /// A line did not fit the format.
    #[error("malformed requirement `{line}`: {reason}")]
    Malformed {
        /// The offending line, verbatim.
        line: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An `-r` include appeared where no file context exists.
    #[error("`-r` include `{target}` requires file-based parsing")]
    IncludeWithoutFile {
        /// The include target.
        target: String,
    },

    /// Reading an included file failed.
    #[error("failed to read requirements file: {0}")]
    Io(#[from] std::io::Error),
}

const COMPARATORS: [Comparator; 3] = [
    Comparator::GreaterEq,
    Comparator::Exact,
    Comparator::Greater,
];

enum Line {
    Skip,
    Requirement(Requirement),
    Include(String),
}

fn parse_line(line: &str) -> Result<Line, RequirementError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Line::Skip);
    }

    if let Some(target) = line.strip_prefix("-r ") {
        return Ok(Line::Include(target.trim().to_string()));
    }

    if line.starts_with("-e ") {
        // Editable install; only the egg name matters here.
        let package = line.split("#egg=").nth(1).ok_or_else(|| {
            RequirementError::Malformed {
                line: line.to_string(),
                reason: "editable entry without #egg= fragment".to_string(),
            }
        })?;
        return Ok(Line::Requirement(Requirement {
            package: package.trim().to_string(),
            version: None,
            platform: None,
        }));
    }

    let (body, platform) = match line.split_once(';') {
        Some((body, platform)) => (body.trim(), Some(platform.trim().to_string())),
        None => (line, None),
    };

    let split = COMPARATORS
        .iter()
        .filter_map(|&comparator| {
            body.find(comparator.as_str())
                .map(|pos| (pos, comparator))
        })
        .min_by_key(|&(pos, comparator)| (pos, std::cmp::Reverse(comparator.as_str().len())));

    let requirement = match split {
        Some((pos, comparator)) => {
            let package = body[..pos].trim();
            let version = body[pos + comparator.as_str().len()..].trim();
            if package.is_empty() || version.is_empty() {
                return Err(RequirementError::Malformed {
                    line: line.to_string(),
                    reason: format!("nothing on one side of `{}`", comparator),
                });
            }
            Requirement {
                package: package.to_string(),
                version: Some(VersionSpec {
                    comparator,
                    version: version.to_string(),
                }),
                platform,
            }
        }
        None => Requirement {
            package: body.to_string(),
            version: None,
            platform,
        },
    };
    Ok(Line::Requirement(requirement))
}

/// Parse requirements from in-memory text.
///
/// `-r` includes are rejected here; use [`parse_file`] when the list
/// lives on disk and may include others.
pub fn parse_str(text: &str) -> Result<Vec<Requirement>, RequirementError> {
    let mut requirements = Vec::new();
    for line in text.lines() {
        match parse_line(line)? {
            Line::Skip => {}
            Line::Requirement(requirement) => requirements.push(requirement),
            Line::Include(target) => {
                return Err(RequirementError::IncludeWithoutFile { target })
            }
        }
    }
    Ok(requirements)
}

/// Parse a requirements file, following `-r` includes relative to it.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Requirement>, RequirementError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mut requirements = Vec::new();
    for line in text.lines() {
        match parse_line(line)? {
            Line::Skip => {}
            Line::Requirement(requirement) => requirements.push(requirement),
            Line::Include(target) => {
                let included = match path.parent() {
                    Some(parent) => parent.join(&target),
                    None => Path::new(&target).to_path_buf(),
                };
                requirements.extend(parse_file(included)?);
            }
        }
    }
    Ok(requirements)
}
