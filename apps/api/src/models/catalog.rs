use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Role assigned when a draft arrives without one.
pub const DEFAULT_ROLE: &str = "기타";
/// Placeholder role from the manual-entry form; never a real category.
pub const MANUAL_ENTRY_ROLE: &str = "직접 입력";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriceTier {
    Free,
    Paid,
    #[default]
    Freemium,
}

impl PriceTier {
    /// Parses the free-text labels found in model output and hand-edited rows
    /// ("무료", "부분유료", "Free / Paid", ...). Unrecognised labels map to `Freemium`.
    pub fn from_label(label: &str) -> Self {
        let s = label.trim().to_lowercase();
        let has_free = s.contains("무료") || s.contains("free");
        let has_paid = s.contains("유료") || s.contains("paid");

        if s.contains("부분") || s.contains("freemium") || (has_free && has_paid) {
            PriceTier::Freemium
        } else if has_free {
            PriceTier::Free
        } else if has_paid {
            PriceTier::Paid
        } else {
            PriceTier::Freemium
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            PriceTier::Free => "free",
            PriceTier::Paid => "paid",
            PriceTier::Freemium => "freemium",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl Serialize for PriceTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_label())
    }
}

impl<'de> Deserialize<'de> for PriceTier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PriceTier::from_label(&lenient_string(deserializer)?))
    }
}

/// Accepts strings, numbers, booleans and null; model output is not strict about types.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Vote counters arrive as numbers, numeric strings or garbage; garbage counts as zero.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(parse_count(&lenient_string(deserializer)?))
}

/// Parses a stored vote counter. Missing, negative or non-numeric values become 0.
pub fn parse_count(raw: &str) -> u32 {
    let raw = raw.trim();
    raw.parse::<u32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32))
        .unwrap_or(0)
}

/// An extracted tool record that has not been catalogued yet.
///
/// Korean column labels from the legacy spreadsheet export are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolRecordDraft {
    #[serde(default, alias = "추천도구", deserialize_with = "lenient_string")]
    pub tool_name: String,
    #[serde(default, alias = "직무", deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, alias = "상황", deserialize_with = "lenient_string")]
    pub situation: String,
    #[serde(default, alias = "결과물", deserialize_with = "lenient_string")]
    pub output: String,
    #[serde(default, alias = "특징_및_팁", deserialize_with = "lenient_string")]
    pub tips: String,
    #[serde(default, alias = "유료여부")]
    pub price_tier: PriceTier,
    #[serde(default, alias = "링크", deserialize_with = "lenient_string")]
    pub link: String,
}

impl ToolRecordDraft {
    /// Trims every field and fills the default role.
    /// Returns `None` when the draft has no tool name, since the name is the catalog key.
    pub fn sanitized(self) -> Option<Self> {
        let tool_name = self.tool_name.trim().to_string();
        if tool_name.is_empty() {
            return None;
        }
        let role = match self.role.trim() {
            "" => DEFAULT_ROLE.to_string(),
            role => role.to_string(),
        };
        Some(Self {
            tool_name,
            role,
            situation: self.situation.trim().to_string(),
            output: self.output.trim().to_string(),
            tips: self.tips.trim().to_string(),
            price_tier: self.price_tier,
            link: self.link.trim().to_string(),
        })
    }
}

/// One row of the catalog. `tool_name` is the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    #[serde(alias = "추천도구", deserialize_with = "lenient_string")]
    pub tool_name: String,
    #[serde(default, alias = "직무", deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, alias = "상황", deserialize_with = "lenient_string")]
    pub situation: String,
    #[serde(default, alias = "결과물", deserialize_with = "lenient_string")]
    pub output: String,
    #[serde(default, alias = "특징_및_팁", deserialize_with = "lenient_string")]
    pub tips: String,
    #[serde(default, alias = "유료여부")]
    pub price_tier: PriceTier,
    #[serde(default, alias = "링크", deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(default, alias = "추천수", deserialize_with = "lenient_count")]
    pub upvotes: u32,
    #[serde(default, alias = "비추천수", deserialize_with = "lenient_count")]
    pub downvotes: u32,
}

impl ToolRecord {
    /// A fresh row for a first upvote: one positive vote, no negative ones.
    pub fn first_upvote(draft: ToolRecordDraft) -> Self {
        Self {
            tool_name: draft.tool_name,
            role: draft.role,
            situation: draft.situation,
            output: draft.output,
            tips: draft.tips,
            price_tier: draft.price_tier,
            link: draft.link,
            upvotes: 1,
            downvotes: 0,
        }
    }
}
