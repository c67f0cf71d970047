//! Phase expressions.
//!
//! Spreadsheet cells describe phase sets in several ways: a JSON array
//! (`[1, 2]`), a comma list (`"1,3,5"`), a range (`"2-4"` or `"2..4"`),
//! or a mix (`"1, 3-5"`). [`PhaseSpec`] keeps the cell as given and
//! resolves it on demand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Widest range a single expression item may expand to.
pub const MAX_RANGE_SPAN: i64 = 1_000;

/// Errors from resolving a phase expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseParseError {
    /// A token is not an integer.
    #[error("invalid phase token '{token}'")]
    InvalidToken {
        /// The offending token.
        token: String,
    },

    /// A phase number is below 1.
    #[error("phase {phase} is not positive")]
    NonPositive {
        /// The offending phase.
        phase: i64,
    },

    /// A range whose start exceeds its end.
    #[error("reversed range {start}-{end}")]
    ReversedRange {
        /// Range start.
        start: i64,
        /// Range end.
        end: i64,
    },

    /// A range covering more than [`MAX_RANGE_SPAN`] phases.
    #[error("range {start}-{end} spans more than {max} phases", max = MAX_RANGE_SPAN)]
    RangeTooLarge {
        /// Range start.
        start: i64,
        /// Range end.
        end: i64,
    },
}

/// A set of phases as written in the source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhaseSpec {
    /// Explicit list of phase numbers.
    List(Vec<i64>),
    /// Textual expression (list, range, or both).
    Expression(String),
}

impl PhaseSpec {
    /// Resolves to a sorted, de-duplicated phase set.
    ///
    /// An empty expression resolves to an empty set.
    pub fn resolve(&self) -> Result<BTreeSet<u32>, PhaseParseError> {
        match self {
            Self::List(phases) => phases.iter().map(|&p| to_phase(p)).collect(),
            Self::Expression(text) => parse_expression(text),
        }
    }
}

impl From<Vec<i64>> for PhaseSpec {
    fn from(phases: Vec<i64>) -> Self {
        Self::List(phases)
    }
}

impl From<&str> for PhaseSpec {
    fn from(text: &str) -> Self {
        Self::Expression(text.to_string())
    }
}

fn to_phase(value: i64) -> Result<u32, PhaseParseError> {
    if value < 1 || value > u32::MAX as i64 {
        return Err(PhaseParseError::NonPositive { phase: value });
    }
    Ok(value as u32)
}

fn parse_number(token: &str) -> Result<i64, PhaseParseError> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|_| PhaseParseError::InvalidToken {
            token: token.trim().to_string(),
        })
}

fn parse_expression(text: &str) -> Result<BTreeSet<u32>, PhaseParseError> {
    let inner = text
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();

    let mut phases = BTreeSet::new();
    if inner.is_empty() {
        return Ok(phases);
    }

    for item in inner.split(',') {
        let item = item.trim();
        // "2..4" is checked first so that "2-4" parsing never sees dots.
        let bounds = item.split_once("..").or_else(|| item.split_once('-'));
        match bounds {
            Some((lo, hi)) if !lo.trim().is_empty() => {
                let start = parse_number(lo)?;
                let end = parse_number(hi)?;
                if start > end {
                    return Err(PhaseParseError::ReversedRange { start, end });
                }
                let (first, last) = (to_phase(start)?, to_phase(end)?);
                if end - start >= MAX_RANGE_SPAN {
                    return Err(PhaseParseError::RangeTooLarge { start, end });
                }
                phases.extend(first..=last);
            }
            _ => {
                phases.insert(to_phase(parse_number(item)?)?);
            }
        }
    }

    Ok(phases)
}
