//! Vote Policy Engine: pure decisions over separate upvote/downvote counters.
//!
//! | action   | record  | decision                                        |
//! |----------|---------|-------------------------------------------------|
//! | upvote   | absent  | `Insert` (upvotes = 1, downvotes = 0)           |
//! | upvote   | present | `Increment` (upvotes + 1, downvotes - 1 if > 0) |
//! | downvote | present | `Decrement` (downvotes + 1) or `Evict` at 3     |
//! | downvote | absent  | `Ignore`                                        |

use serde::{Deserialize, Serialize};

use crate::models::catalog::ToolRecord;

/// Downvote count at which a row is removed from the catalog.
pub const EVICTION_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    #[serde(alias = "like")]
    Upvote,
    #[serde(alias = "dislike")]
    Downvote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDecision {
    Insert,
    Increment,
    Decrement,
    Evict,
    Ignore,
}

pub fn decide(action: VoteAction, existing: Option<&ToolRecord>) -> VoteDecision {
    match (action, existing) {
        (VoteAction::Upvote, None) => VoteDecision::Insert,
        (VoteAction::Upvote, Some(_)) => VoteDecision::Increment,
        (VoteAction::Downvote, Some(record))
            if record.downvotes.saturating_add(1) >= EVICTION_THRESHOLD =>
        {
            VoteDecision::Evict
        }
        (VoteAction::Downvote, Some(_)) => VoteDecision::Decrement,
        (VoteAction::Downvote, None) => VoteDecision::Ignore,
    }
}

/// One upvote; also heals one earlier downvote.
pub fn apply_upvote(record: &mut ToolRecord) {
    record.upvotes = record.upvotes.saturating_add(1);
    record.downvotes = record.downvotes.saturating_sub(1);
}

/// One downvote below the eviction threshold.
pub fn apply_downvote(record: &mut ToolRecord) {
    record.downvotes = record.downvotes.saturating_add(1);
}
