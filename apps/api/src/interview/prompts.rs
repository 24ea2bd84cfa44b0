// Interview prompt templates. Fill with `llm_client::prompts::render`.
// The model is small; prompts stay short and end on a "JSON:" cue.

/// Placeholders: `{resume_text}`.
pub const RESUME_EXTRACTION_PROMPT: &str = r#"
Extract resume info and return ONLY JSON.

{resume_text}

Format:
{
  "name": "",
  "email": "",
  "phone": "",
  "skills": [],
  "experience": [],
  "projects": []
}
JSON:
"#;

/// Placeholders: `{num}`, `{resume_json}`.
pub const QUESTION_GENERATION_PROMPT: &str = r#"
Generate exactly {num} interview questions based on this resume.

{resume_json}

Return ONLY JSON array:
[
  {"id":1,"question":"","focus":""}
]
JSON:
"#;

/// Placeholders: `{question}`, `{answer}`.
pub const FOLLOWUP_PROMPT: &str = r#"
Generate ONE follow-up question.

Question: {question}
Answer: {answer}

Only the question:
"#;

/// Placeholders: `{question}`, `{answer}`.
pub const EVALUATION_PROMPT: &str = r#"
Evaluate the answer and return JSON.

Question: {question}
Answer: {answer}

{
  "technical_accuracy": 0,
  "completeness": 0,
  "practical_knowledge": 0,
  "communication": 0,
  "total_score": 0,
  "feedback": ""
}
JSON:
"#;
