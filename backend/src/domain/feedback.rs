//! Feedback record model: the central entity of the portal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Validation errors returned by feedback value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackValidationError {
    /// A free-text field was blank once trimmed.
    EmptyText,
    /// The sentiment value is outside the enumerated set.
    InvalidSentiment,
}

impl fmt::Display for FeedbackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "text must not be empty"),
            Self::InvalidSentiment => {
                write!(f, "sentiment must be one of positive, neutral, negative")
            }
        }
    }
}

impl std::error::Error for FeedbackValidationError {}

/// Stable feedback record identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FeedbackId(Uuid);

impl FeedbackId {
    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`FeedbackId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for FeedbackId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Categorical judgment attached to a feedback record.
///
/// Exactly one of three values; never a score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Wire representation of the sentiment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = FeedbackValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(FeedbackValidationError::InvalidSentiment),
        }
    }
}

/// Non-empty free text for the strengths/improvements fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackText(String);

impl FeedbackText {
    /// Validate and construct feedback text. Caller-provided whitespace is
    /// preserved as long as the text is not blank overall.
    pub fn new(text: impl Into<String>) -> Result<Self, FeedbackValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(FeedbackValidationError::EmptyText);
        }
        Ok(Self(text))
    }

    /// The text content.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for FeedbackText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<FeedbackText> for String {
    fn from(value: FeedbackText) -> Self {
        value.0
    }
}

impl TryFrom<String> for FeedbackText {
    type Error = FeedbackValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Tag collection: insertion order preserved, deduplicated case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(Vec<String>);

impl Tags {
    /// Deduplicate tags, keeping the first occurrence of each.
    pub fn new(tags: Vec<String>) -> Self {
        let mut seen = Vec::with_capacity(tags.len());
        for tag in tags {
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        Self(seen)
    }

    /// Tags in insertion order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Tags {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<Tags> for Vec<String> {
    fn from(value: Tags) -> Self {
        value.0
    }
}

/// Mutation failures raised while applying an edit to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackMutationError {
    /// The caller supplied an expected version that no longer matches.
    VersionMismatch { expected: u64, actual: u64 },
}

impl fmt::Display for FeedbackMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionMismatch { expected, actual } => write!(
                f,
                "stale edit: expected version {expected}, record is at {actual}",
            ),
        }
    }
}

impl std::error::Error for FeedbackMutationError {}

/// Field changes for an edit. `None` leaves the field untouched.
///
/// `expected_version` makes last-write-wins explicit: when supplied, the edit
/// only applies if the record has not moved on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackEdit {
    pub strengths: Option<FeedbackText>,
    pub improvements: Option<FeedbackText>,
    pub sentiment: Option<Sentiment>,
    pub tags: Option<Tags>,
    pub expected_version: Option<u64>,
}

impl FeedbackEdit {
    /// Whether the edit carries no field changes at all.
    pub fn is_empty(&self) -> bool {
        self.strengths.is_none()
            && self.improvements.is_none()
            && self.sentiment.is_none()
            && self.tags.is_none()
    }
}

/// Validated components for constructing a new [`FeedbackRecord`].
#[derive(Debug, Clone)]
pub struct FeedbackDraft {
    pub id: FeedbackId,
    pub manager_id: UserId,
    pub employee_id: UserId,
    pub strengths: FeedbackText,
    pub improvements: FeedbackText,
    pub sentiment: Sentiment,
    pub tags: Tags,
    pub created_at: DateTime<Utc>,
}

/// Structured feedback from a manager to one of their team members.
///
/// ## Invariants
/// - `id`, `manager_id`, `employee_id`, and `created_at` never change.
/// - `acknowledged` transitions `false → true` at most once and is never
///   reversed.
/// - `version` counts successful edits, starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    id: FeedbackId,
    manager_id: UserId,
    employee_id: UserId,
    strengths: FeedbackText,
    improvements: FeedbackText,
    sentiment: Sentiment,
    tags: Tags,
    acknowledged: bool,
    version: u64,
    created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Build a new record. Fresh records are unacknowledged at version 0.
    pub fn new(draft: FeedbackDraft) -> Self {
        let FeedbackDraft {
            id,
            manager_id,
            employee_id,
            strengths,
            improvements,
            sentiment,
            tags,
            created_at,
        } = draft;
        Self {
            id,
            manager_id,
            employee_id,
            strengths,
            improvements,
            sentiment,
            tags,
            acknowledged: false,
            version: 0,
            created_at,
        }
    }

    pub fn id(&self) -> FeedbackId {
        self.id
    }

    /// Author of the record.
    pub fn manager_id(&self) -> UserId {
        self.manager_id
    }

    /// Subject of the record.
    pub fn employee_id(&self) -> UserId {
        self.employee_id
    }

    pub fn strengths(&self) -> &FeedbackText {
        &self.strengths
    }

    pub fn improvements(&self) -> &FeedbackText {
        &self.improvements
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Number of successful edits applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Creation instant. Edits never change it.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply an edit, bumping the version on success.
    ///
    /// Author, subject, creation time, and acknowledgement state are
    /// untouched regardless of which fields are supplied.
    pub fn apply(&mut self, edit: FeedbackEdit) -> Result<(), FeedbackMutationError> {
        if let Some(expected) = edit.expected_version {
            if expected != self.version {
                return Err(FeedbackMutationError::VersionMismatch {
                    expected,
                    actual: self.version,
                });
            }
        }
        if let Some(strengths) = edit.strengths {
            self.strengths = strengths;
        }
        if let Some(improvements) = edit.improvements {
            self.improvements = improvements;
        }
        if let Some(sentiment) = edit.sentiment {
            self.sentiment = sentiment;
        }
        if let Some(tags) = edit.tags {
            self.tags = tags;
        }
        self.version += 1;
        Ok(())
    }

    /// Mark the record as seen by its subject.
    ///
    /// Returns whether a transition occurred; a second call is a no-op.
    pub fn acknowledge(&mut self) -> bool {
        if self.acknowledged {
            false
        } else {
            self.acknowledged = true;
            true
        }
    }
}

/// Sort records for presentation: newest first, ties broken by id ascending
/// so the order is deterministic.
pub fn sort_newest_first(records: &mut [FeedbackRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
