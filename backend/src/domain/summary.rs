//! Derived sentiment aggregation over feedback records.
//!
//! Nothing here persists; summaries are recomputed on demand from whatever
//! record set the caller already holds.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::feedback::{FeedbackRecord, Sentiment};

/// Sentiment bucket counts over a set of feedback records.
///
/// The three buckets always partition the input: `positive + neutral +
/// negative == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeedbackSummary {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

/// Count records per sentiment. Pure; an empty input yields all zeros.
pub fn summarize<'a, I>(records: I) -> FeedbackSummary
where
    I: IntoIterator<Item = &'a FeedbackRecord>,
{
    let mut summary = FeedbackSummary::default();
    for record in records {
        summary.total += 1;
        match record.sentiment() {
            Sentiment::Positive => summary.positive += 1,
            Sentiment::Neutral => summary.neutral += 1,
            Sentiment::Negative => summary.negative += 1,
        }
    }
    summary
}
