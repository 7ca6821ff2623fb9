// Extraction LLM prompt templates.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM as EXTRACTION_SYSTEM;

/// Tool extraction prompt. Replace `{query}` and `{response}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract every AI tool recommended in the conversation below as structured records.

USER QUESTION:
{query}

RECOMMENDATION TEXT:
{response}

OUTPUT SCHEMA (return a JSON array, one object per recommended tool):
[
  {
    "tool_name": "string — the product name exactly as written",
    "role": "string — the job role the tool is recommended for",
    "situation": "string — the tool's GENERAL core capability (see rule 2)",
    "output": "string — the kind of artifact the tool produces",
    "tips": "string — one-line description, at most ~40 characters",
    "price_tier": "free" | "paid" | "freemium",
    "link": "string — URL, or empty string if none is given"
  }
]

RULES:
1. Only include tools that are clearly named. If no tool name is clear, return [].
2. "situation" must describe what the tool does in general, NOT restate the user's specific request.
   Example: a general writing assistant recommended for "help me write a cover letter" gets
   "situation": "text drafting", not "cover letter writing".
3. Write field values in the same language as the recommendation text.
4. Return ONLY the JSON array — nothing else, no code fences."#;
