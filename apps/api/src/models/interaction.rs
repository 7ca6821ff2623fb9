use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One completed advisory turn. Append-only; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLogEntry {
    pub id: Uuid,
    pub timestamp: String,
    pub role: String,
    pub situation: String,
    pub question: String,
    pub answer: String,
}

impl InteractionLogEntry {
    pub fn now(role: &str, situation: &str, question: &str, answer: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Local::now().format(LOG_TIMESTAMP_FORMAT).to_string(),
            role: role.to_string(),
            situation: situation.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}
