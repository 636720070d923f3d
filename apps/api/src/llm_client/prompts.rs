// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose answer must be machine-parsed as JSON.
pub const RAW_JSON_ONLY_INSTRUCTION: &str = "IMPORTANT: Return ONLY the raw JSON object. \
    Do not include any markdown formatting (like ```json), explanations, or conversational text.";

/// Separator the question prompts ask the model to place between questions.
pub const QUESTION_SEPARATOR: &str = "---";
