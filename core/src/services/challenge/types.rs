//! Types for challenge store results

use crate::domain::entities::challenge::Challenge;

/// Outcome of submitting a code against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeResult {
    /// The code matched a live challenge, which has now been removed
    Matched(Challenge),
    /// A live challenge exists but the code differs; the challenge is kept
    Mismatch,
    /// No challenge is outstanding for the recipient
    NotFound,
    /// The challenge had passed its deadline; it has been removed
    Expired,
}

impl ConsumeResult {
    pub fn is_matched(&self) -> bool {
        matches!(self, ConsumeResult::Matched(_))
    }

    /// Short label for structured logs
    pub fn label(&self) -> &'static str {
        match self {
            ConsumeResult::Matched(_) => "matched",
            ConsumeResult::Mismatch => "mismatch",
            ConsumeResult::NotFound => "not_found",
            ConsumeResult::Expired => "expired",
        }
    }
}
