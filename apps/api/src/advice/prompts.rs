// Prompt templates for the advice generators.
// Reuses the shared system fragment from llm_client::prompts.

/// Resume enhancement prompt. Replace: {resume}, {jd}, {missing_skills}
pub const ENHANCE_PROMPT_TEMPLATE: &str = "You are a career coach AI. Given the following resume section, \
job description, and missing skills, suggest improved wording for the resume section to better match \
the job description and address the missing skills.
Resume Section:
{resume}
Job Description:
{jd}
Missing Skills:
{missing_skills}
Improved Resume Section:";

/// Project ideas prompt. Replace: {resume}, {skills}
pub const PROJECT_IDEAS_PROMPT_TEMPLATE: &str = "Based on the following resume and skills, suggest 3 \
impactful project topics and descriptions which tackle real life problems (not limited to AI/ML) that \
align with the candidate's background and would impress recruiters in their field.
Resume:
{resume}
Skills:
{skills}
Project Ideas:";

/// Sampling temperature for resume rewording; kept low to stay close to the source.
pub const ENHANCE_TEMPERATURE: f32 = 0.3;

pub const PROJECT_IDEAS_TEMPERATURE: f32 = 0.5;
