use crate::error::{CheckError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a requested metric is compared against metric paths found in documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Byte-for-byte equality
    #[value(name = "exact")]
    Exact,
    /// Case-insensitive substring
    #[default]
    #[value(name = "contains")]
    Contains,
    /// Case-sensitive substring
    #[value(name = "contains_case_sensitive")]
    ContainsCaseSensitive,
    /// Regular expression anchored at the start of the metric path
    #[value(name = "regex")]
    Regex,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Contains => "contains",
            Self::ContainsCaseSensitive => "contains_case_sensitive",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact" => Ok(Self::Exact),
            "contains" => Ok(Self::Contains),
            "contains_case_sensitive" => Ok(Self::ContainsCaseSensitive),
            "regex" => Ok(Self::Regex),
            other => Err(CheckError::InvalidMatchMode(other.to_string())),
        }
    }
}

/// A requested metric compiled for one match mode.
#[derive(Debug, Clone)]
pub struct MetricPattern {
    target: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact,
    Contains { lowered: String },
    ContainsCaseSensitive,
    Regex(Regex),
}

impl MetricPattern {
    /// `operation` names what the caller is doing, for the error on a bad regex.
    pub fn compile(target: &str, mode: MatchMode, operation: &'static str) -> Result<Self> {
        let matcher = match mode {
            MatchMode::Exact => Matcher::Exact,
            MatchMode::Contains => Matcher::Contains {
                lowered: target.to_lowercase(),
            },
            MatchMode::ContainsCaseSensitive => Matcher::ContainsCaseSensitive,
            MatchMode::Regex => {
                let anchored = format!("^(?:{target})");
                let regex = Regex::new(&anchored).map_err(|source| {
                    CheckError::InvalidMatchExpression {
                        pattern: target.to_string(),
                        operation,
                        source,
                    }
                })?;
                Matcher::Regex(regex)
            }
        };
        Ok(Self {
            target: target.to_string(),
            matcher,
        })
    }

    /// Compiles every target, keeping the ones that compile.
    pub fn compile_all(
        targets: &[String],
        mode: MatchMode,
        operation: &'static str,
    ) -> (Vec<Self>, Vec<CheckError>) {
        let mut patterns = Vec::with_capacity(targets.len());
        let mut errors = Vec::new();
        for target in targets {
            match Self::compile(target, mode, operation) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => errors.push(e),
            }
        }
        (patterns, errors)
    }

    /// The metric as the caller requested it
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_match(&self, candidate: Option<&str>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        match &self.matcher {
            Matcher::Exact => candidate == self.target,
            Matcher::Contains { lowered } => candidate.to_lowercase().contains(lowered.as_str()),
            Matcher::ContainsCaseSensitive => candidate.contains(self.target.as_str()),
            Matcher::Regex(regex) => regex.is_match(candidate),
        }
    }
}

/// Whether `candidate` matches `target` under `mode`.
///
/// An absent target matches everything; an absent candidate matches nothing.
pub fn matches(candidate: Option<&str>, target: Option<&str>, mode: MatchMode) -> Result<bool> {
    match target {
        None => Ok(true),
        Some(target) => Ok(MetricPattern::compile(target, mode, "matching a metric path")?
            .is_match(candidate)),
    }
}

/// [`matches`] for an already compiled pattern, `None` meaning no metric filter.
pub fn matches_pattern(candidate: Option<&str>, pattern: Option<&MetricPattern>) -> bool {
    pattern.map_or(true, |p| p.is_match(candidate))
}
