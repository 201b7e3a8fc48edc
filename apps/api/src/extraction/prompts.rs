// Profile extraction prompt templates.
// `{text}` is replaced with the user's transcript or typed description.

pub const SEEKER_EXTRACT_PROMPT: &str = r#"Extract structured information from the following job seeker profile description. Return a JSON object with the following structure:
{
  "bio": "A brief professional bio (2-3 sentences)",
  "skills": ["skill1", "skill2", "skill3"],
  "experience": "Years of experience or experience level",
  "education": "Educational background if mentioned"
}

Text: {text}

"#;

pub const EMPLOYER_EXTRACT_PROMPT: &str = r#"Extract structured information from the following job posting description. Return a JSON object with the following structure:
{
  "description": "A detailed job description (2-3 paragraphs)",
  "requirements": ["requirement1", "requirement2", "requirement3"],
  "salary": "Salary range if mentioned",
  "type": "Full-time, Part-time, Contract, etc."
}

Text: {text}

"#;
