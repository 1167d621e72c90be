//! Tracks whether each section of a result came from a live provider or a fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a category was filled with synthesized data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Non-success status or network failure.
    Transport(String),
    /// The provider answered but nothing usable survived mapping.
    Empty,
    /// Generated text did not contain a parseable object.
    Parse(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(detail) => write!(f, "transport failure: {detail}"),
            Self::Empty => f.write_str("provider returned no usable records"),
            Self::Parse(detail) => write!(f, "unparseable response: {detail}"),
        }
    }
}

/// A value together with the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Fetched(T),
    FellBack { value: T, reason: FallbackReason },
}

impl<T> Sourced<T> {
    pub fn fell_back(value: T, reason: FallbackReason) -> Self {
        Self::FellBack { value, reason }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FellBack { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Fetched(value) | Self::FellBack { value, .. } => value,
        }
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Fetched(_) => None,
            Self::FellBack { reason, .. } => Some(reason),
        }
    }

    pub fn origin(&self) -> Origin {
        if self.is_fallback() {
            Origin::Fallback
        } else {
            Origin::Live
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Fetched(value) | Self::FellBack { value, .. } => value,
        }
    }

    /// Split into the value and its origin label.
    pub fn into_parts(self) -> (T, Origin) {
        let origin = self.origin();
        (self.into_inner(), origin)
    }
}

/// Where a section of the results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Live,
    Fallback,
    /// Generated locally by construction, never fetched.
    Synthetic,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
            Self::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-section origin of one research run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub papers: Origin,
    pub patents: Origin,
    pub news: Origin,
    pub trends: Origin,
    pub summary: Origin,
}

impl Provenance {
    /// True when at least one section was filled with placeholder data.
    pub fn any_fallback(&self) -> bool {
        [self.papers, self.patents, self.news, self.summary]
            .iter()
            .any(|origin| *origin == Origin::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetched_has_no_reason() {
        let sourced = Sourced::Fetched(vec![1, 2]);
        assert!(!sourced.is_fallback());
        assert!(sourced.reason().is_none());
        assert_eq!(sourced.into_parts(), (vec![1, 2], Origin::Live));
    }

    #[test]
    fn fallback_keeps_reason() {
        let sourced = Sourced::fell_back("filler", FallbackReason::Empty);
        assert_eq!(sourced.reason(), Some(&FallbackReason::Empty));
        assert_eq!(sourced.origin(), Origin::Fallback);
        assert_eq!(*sourced.value(), "filler");
    }

    #[test]
    fn provenance_detects_any_fallback() {
        let mut provenance = Provenance {
            papers: Origin::Live,
            patents: Origin::Live,
            news: Origin::Live,
            trends: Origin::Synthetic,
            summary: Origin::Live,
        };
        assert!(!provenance.any_fallback());
        provenance.news = Origin::Fallback;
        assert!(provenance.any_fallback());
    }
}
