// Question-generation prompt templates.
// Placeholders in braces are replaced before sending.

/// Manual generation from a job role and free-form instructions.
pub const MANUAL_QUESTIONS_PROMPT_TEMPLATE: &str = "Generate exactly {count} {question_type} questions for the position of {job_role} with {difficulty} difficulty.

Instructions: {instructions}

Make sure the questions are highly relevant to the job role and instructions provided. Do not generate fewer or more questions than requested.

Please format each question as:
Question: [question text]
Type: [question type]
Difficulty: [difficulty]
{options_line}

Separate each question with ---";

/// Line added to the manual template when multiple-choice questions are requested.
pub const OPTIONS_FORMAT_LINE: &str = "Options: A. [option1] B. [option2] C. [option3] D. [option4]";

/// Interview questions grounded in an uploaded resume.
pub const RESUME_QUESTIONS_PROMPT_TEMPLATE: &str = "Based on the following resume, generate exactly {count} {interview_type} interview questions with {difficulty} difficulty.

Resume Content:
{resume_text}

Instructions:
Generate questions that directly relate to the projects, skills, and experience mentioned in the resume.

Please format each question as:
Question: [question text]
Type: {interview_type}
Difficulty: {difficulty}
Based On: [Specific section or project from resume]

Separate each question with ---";
