use crate::catalog::Candidate;
use std::fmt;

/// Step of the escalating resolution sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sanitized,
    Simplified,
    CoreTitle,
    WebFallback,
    Custom,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Sanitized => "sanitized",
            Stage::Simplified => "simplified",
            Stage::CoreTitle => "core-title",
            Stage::WebFallback => "web-fallback",
            Stage::Custom => "custom",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query text tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub text: String,
    pub stage: Stage,
}

impl NormalizedQuery {
    pub fn new(text: impl Into<String>, stage: Stage) -> Self {
        Self {
            text: text.into(),
            stage,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Same question to the catalog, regardless of which stage asked it
    pub fn same_text(&self, other: &NormalizedQuery) -> bool {
        self.text == other.text
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Terminal result of resolving one folder
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionOutcome {
    /// Operator picked a catalog candidate
    Resolved(Candidate),
    /// Operator typed their own title
    ResolvedCustom(String),
    /// Folder already carries a canonical name, or the operator cancelled
    Skipped,
    /// Every stage came up empty and no custom retry helped
    Exhausted,
}
