// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use resumecraft_profile::models::WorkExperience;

/// System prompt for the work-experience rewrite.
pub const RESUME_SYSTEM: &str = "You are an expert resume writer skilled in ATS optimization.";

/// System prompt for the cover letter.
pub const COVER_LETTER_SYSTEM: &str =
    "You are a skilled business communicator who writes concise, effective cover letters.";

const RESUME_PROMPT_HEAD: &str = "\
You are a professional resume writer helping tailor resumes for a specific job description. \
Keep it recruiter-friendly and ATS-compliant. Use strong action verbs, quantified achievements, \
and align each bullet point with the provided job description.

The goal is to rewrite only the WORK EXPERIENCE section of the candidate's resume. \
Your output will be injected into an existing resume layout, so do NOT include any summary, \
contact info, education, or skills. Return just the updated WORK EXPERIENCE section in clean \
resume bullet format.";

const RESUME_PROMPT_RULES: &str = "\
Instructions:
- Align the content with the responsibilities and requirements in the job description.
- Preserve formatting: Job title | Company | Dates, followed by 3-5 bullet points each.
- Do not add or remove job roles. Only rewrite the bullet points to better match the job.
- Keep a concise, executive tone.";

/// Renders one position as `Position | Company | Start – End` followed by its bullets.
fn experience_block(exp: &WorkExperience) -> String {
    let end = if exp.current {
        "Present"
    } else {
        exp.end_date.as_deref().unwrap_or("")
    };
    let mut block = format!(
        "{} | {} | {} – {}",
        exp.position, exp.company, exp.start_date, end
    );
    for bullet in &exp.bullets {
        block.push_str("\n• ");
        block.push_str(bullet);
    }
    block
}

/// One-line highlight used in the cover letter prompt.
fn highlight(exp: &WorkExperience) -> String {
    let impact = exp
        .bullets
        .first()
        .map(String::as_str)
        .unwrap_or(exp.description.as_str());
    format!("{} at {} – Key Impact: {}", exp.position, exp.company, impact)
}

pub fn resume_prompt(
    experiences: &[WorkExperience],
    job_description: &str,
    existing_resume: Option<&str>,
) -> String {
    let original = experiences
        .iter()
        .map(experience_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut prompt = format!(
        "{RESUME_PROMPT_HEAD}\n\nCandidate's Original Work Experience:\n{original}\n\n\
         Target Job Description:\n{job_description}\n\n{RESUME_PROMPT_RULES}\n"
    );
    if let Some(existing) = existing_resume.filter(|s| !s.trim().is_empty()) {
        prompt.push_str(&format!(
            "- Match the layout and tone of the candidate's current resume:\n{existing}\n"
        ));
    }
    prompt.push_str(crate::llm_client::prompts::PLAIN_TEXT_INSTRUCTION);
    prompt
}

pub fn cover_letter_prompt(
    job_title: &str,
    job_description: &str,
    skills: &[String],
    experiences: &[WorkExperience],
) -> String {
    let highlights = experiences
        .iter()
        .take(2)
        .map(highlight)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Write a concise, personalized cover letter for the following job title and description.\n\n\
         Job Title: {job_title}\n\
         Job Description:\n{job_description}\n\n\
         Candidate Background:\n\
         Skills: {skills}\n\
         Recent Experience Highlights:\n{highlights}\n\n\
         Make it sound confident, polished, and tailored to the role.\n{plain}",
        skills = skills.join(", "),
        plain = crate::llm_client::prompts::PLAIN_TEXT_INSTRUCTION,
    )
}
