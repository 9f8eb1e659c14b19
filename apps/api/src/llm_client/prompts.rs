// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Trailer appended to user prompts for backends without a native JSON mode.
pub const JSON_ONLY_INSTRUCTION: &str = "Return response as valid JSON only.";

/// Appends the JSON-only trailer after a blank line.
pub fn with_json_only_instruction(prompt: &str) -> String {
    format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
}
