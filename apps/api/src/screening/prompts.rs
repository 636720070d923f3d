// Resume screening prompt. Replace `{resume_text}` before sending.

use crate::llm_client::prompts::RAW_JSON_ONLY_INSTRUCTION;

pub const SCREENING_PROMPT_TEMPLATE: &str = r#"Analyze the following resume text and provide a JSON response with the following structure:
{
  "atsScore": number (0-100),
  "keywords": array of strings (suggested keywords),
  "overallScore": number (0-100),
  "feedback": array of strings (improvement suggestions)
}
Resume text: {resume_text}

{json_only}"#;

/// The full resume text is embedded; screening never truncates.
pub fn build_screening_prompt(resume_text: &str) -> String {
    SCREENING_PROMPT_TEMPLATE
        .replace("{json_only}", RAW_JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", resume_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_full_text_and_json_instruction() {
        let resume = "x".repeat(25_000);
        let prompt = build_screening_prompt(&resume);
        assert!(prompt.contains(&resume));
        assert!(prompt.contains("\"atsScore\": number (0-100)"));
        assert!(prompt.ends_with(RAW_JSON_ONLY_INSTRUCTION));
    }

    #[test]
    fn test_placeholders_in_resume_text_are_left_alone() {
        let prompt = build_screening_prompt("I like {json_only} literally");
        assert!(prompt.contains("I like {json_only} literally"));
    }
}
