// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for single-label classification answers.
pub const SINGLE_LABEL_SYSTEM: &str = "You are a precise classifier. \
    Reply with exactly one short label on a single line. \
    Do NOT add quotes, punctuation, explanations or apologies.";
