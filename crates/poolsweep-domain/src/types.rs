use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// ── Identifiers ──────────────────────────────────────────────────────────────

/// Cloud region a client is scoped to, e.g. `us-west-2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn new(s: impl Into<String>) -> Result<Self, DomainError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidRegion(s));
        }
        Ok(Region(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Region {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Region::new(s)
    }
}

impl From<Region> for String {
    fn from(r: Region) -> String {
        r.0
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque continuation cursor handed back by a list call.
///
/// Never empty: a remote API that answers with `""` means "no more pages",
/// which callers express as `None` via [`PageToken::from_remote`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(s: impl Into<String>) -> Result<Self, DomainError> {
        let s = s.into();
        if s.is_empty() {
            return Err(DomainError::InvalidPageToken(s));
        }
        Ok(PageToken(s))
    }

    /// Normalise an optional token from a remote response. Absent and empty
    /// tokens both mark the final page.
    pub fn from_remote(raw: Option<&str>) -> Option<Self> {
        raw.filter(|s| !s.is_empty()).map(|s| PageToken(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry key of a sweep procedure, e.g. `aws_cognito_user_pool`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SweeperName(String);

impl SweeperName {
    pub fn new(s: impl Into<String>) -> Result<Self, DomainError> {
        let s = s.into();
        let valid = !s.is_empty()
            && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(DomainError::InvalidSweeperName(s));
        }
        Ok(SweeperName(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SweeperName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Listing ───────────────────────────────────────────────────────────────────

/// One remote resource discovered while listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub id: String,
    pub name: String,
}

impl ResourceHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A single page of a cursor-paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<ResourceHandle>,
    /// `None` on the final page.
    pub next: Option<PageToken>,
}

impl Page {
    pub fn last(items: Vec<ResourceHandle>) -> Self {
        Self { items, next: None }
    }

    pub fn with_next(items: Vec<ResourceHandle>, next: PageToken) -> Self {
        Self { items, next: Some(next) }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// How a remote error should be treated by cleanup and check code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The operation is unavailable for this region/account; skip quietly.
    Skip,
    /// The resource does not exist.
    NotFound,
    /// Anything else.
    Fatal,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorClass::Skip => write!(f, "skip"),
            ErrorClass::NotFound => write!(f, "not_found"),
            ErrorClass::Fatal => write!(f, "fatal"),
        }
    }
}

/// Successful terminal state of a sweep. Fatal terminations are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepOutcome {
    /// Every discoverable resource was deleted (possibly zero).
    Done { deleted: usize },
    /// The service is unavailable for this region/account.
    Skipped { reason: String },
}

impl SweepOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SweepOutcome::Skipped { .. })
    }
}

impl std::fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepOutcome::Done { deleted } => write!(f, "done ({} deleted)", deleted),
            SweepOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
        }
    }
}
