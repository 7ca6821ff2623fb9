// Catalog LLM prompt templates.

pub use crate::llm_client::prompts::SINGLE_LABEL_SYSTEM as ROLE_CLASSIFY_SYSTEM;

/// Role classification prompt. Replace `{candidate}` and `{roles}` before sending.
pub const ROLE_CLASSIFY_PROMPT_TEMPLATE: &str = r#"A user described their job role as: '{candidate}'
Job roles already present in our catalog: [{roles}]

RULES:
1. If the user's role means nearly the same thing as one of the existing roles, reply with that existing role exactly as written.
2. If it is a genuinely new role, reply with a short, general job category name for it (e.g. 마케팅, 개발, 디자인, 기획).
3. Reply with the role name only — one line, no explanation."#;
