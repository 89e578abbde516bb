//! Local resume / cover letter template.
//!
//! Used when the generation backend cannot be reached. Output is a pure
//! function of the request: no clock, no randomness, no I/O.

use crate::models::{Education, GeneratedDocuments, GenerationRequest, WorkExperience};

const SUMMARY_PREVIEW_CHARS: usize = 150;
const LETTER_PREVIEW_CHARS: usize = 100;

pub const NO_EXPERIENCE: &str = "No previous work experience.";
pub const NO_EDUCATION: &str = "No formal education listed.";
pub const NO_SKILLS: &str = "No skills listed.";
pub const SALUTATION: &str = "Dear Hiring Manager,";

/// Renders a markdown resume and a plain cover letter from the request alone.
pub fn render_fallback(request: &GenerationRequest) -> GeneratedDocuments {
    GeneratedDocuments {
        resume: render_resume(request),
        cover_letter: render_cover_letter(request),
    }
}

fn render_resume(request: &GenerationRequest) -> String {
    let skills = if request.skills.is_empty() {
        NO_SKILLS.to_string()
    } else {
        request.skills.join(", ")
    };

    format!(
        "# {title_upper} RESUME\n\
         \n\
         ## PROFESSIONAL SUMMARY\n\
         Experienced professional seeking a {title} position.\n\
         {summary}...\n\
         \n\
         ## WORK EXPERIENCE\n\
         {experience}\n\
         \n\
         ## EDUCATION\n\
         {education}\n\
         \n\
         ## SKILLS\n\
         {skills}\n",
        title_upper = request.job_title.to_uppercase(),
        title = request.job_title,
        summary = preview(&request.job_description, SUMMARY_PREVIEW_CHARS),
        experience = experience_section(&request.work_experience),
        education = education_section(&request.education),
    )
}

fn render_cover_letter(request: &GenerationRequest) -> String {
    format!(
        "{SALUTATION}\n\
         \n\
         I am writing to express my interest in the {title} position at your company.\n\
         \n\
         {preview}...\n\
         \n\
         I believe my experience and skills make me an excellent candidate for this role.\n\
         \n\
         Sincerely,\n\
         [Your Name]\n",
        title = request.job_title,
        preview = preview(&request.job_description, LETTER_PREVIEW_CHARS),
    )
}

fn experience_section(entries: &[WorkExperience]) -> String {
    if entries.is_empty() {
        return NO_EXPERIENCE.to_string();
    }
    entries
        .iter()
        .map(|exp| {
            let bullets = exp
                .bullets
                .iter()
                .map(|b| format!("- {b}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "### {} at {}\n{} - {}\n{}\n{}",
                exp.position,
                exp.company,
                exp.start_date,
                exp.end_date.as_deref().unwrap_or("Present"),
                exp.description,
                bullets
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn education_section(entries: &[Education]) -> String {
    if entries.is_empty() {
        return NO_EDUCATION.to_string();
    }
    entries
        .iter()
        .map(|edu| {
            format!(
                "### {} in {}\n{}\n{} - {}\n",
                edu.degree,
                edu.field,
                edu.institution,
                edu.start_date,
                edu.end_date.as_deref().unwrap_or("Present")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `max_chars` characters of `text`, never splitting a character.
fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
