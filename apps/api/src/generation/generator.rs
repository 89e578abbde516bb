//! Document generation: tailored work-experience section plus cover letter.
//!
//! Flow: rewrite experience (LLM) → write cover letter (LLM) → replace the
//! letter's header block with the stored contact details → return both.

use chrono::NaiveDate;
use tracing::info;

use resumecraft_profile::models::{GeneratedDocuments, GenerationRequest, Profile};

use crate::errors::AppError;
use crate::generation::prompts::{
    cover_letter_prompt, resume_prompt, COVER_LETTER_SYSTEM, RESUME_SYSTEM,
};
use crate::llm_client::TextGenerator;

/// Lines of the model's letter treated as its header block.
const HEADER_LINES: usize = 6;

const NAME_PLACEHOLDER: &str = "[Your Name]";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Contact block placed on top of every generated cover letter.
pub fn cover_letter_header(profile: &Profile, date: NaiveDate) -> String {
    let date = date.format("%B %d, %Y").to_string();
    [
        or_placeholder(&profile.name, NAME_PLACEHOLDER),
        "[Your Address]",
        "[City, State, Zip]",
        or_placeholder(&profile.email, "[Your Email]"),
        or_placeholder(&profile.phone, "[Your Phone Number]"),
        date.as_str(),
    ]
    .join("\n")
}

/// Swaps the first six lines of the model's letter for the real header.
/// A letter of six lines or fewer keeps only the header.
pub fn compose_cover_letter(profile: &Profile, generated: &str, date: NaiveDate) -> String {
    let lines: Vec<&str> = generated.trim().lines().collect();
    let body = lines.get(HEADER_LINES..).unwrap_or_default().join("\n");

    let letter = format!("{}\n{}", cover_letter_header(profile, date), body)
        .trim()
        .to_string();
    if profile.name.trim().is_empty() {
        letter
    } else {
        letter.replace(NAME_PLACEHOLDER, &profile.name)
    }
}

/// Runs both LLM calls. Experiences and skills come from the request; when
/// the request carries none the stored profile's are used.
pub async fn generate_documents(
    llm: &dyn TextGenerator,
    profile: &Profile,
    request: &GenerationRequest,
    today: NaiveDate,
) -> Result<GeneratedDocuments, AppError> {
    let experiences = if request.work_experience.is_empty() {
        &profile.work_experiences
    } else {
        &request.work_experience
    };
    let skills = if request.skills.is_empty() {
        &profile.skills
    } else {
        &request.skills
    };

    info!(
        "Generating documents for '{}' from {} positions",
        request.job_title,
        experiences.len()
    );

    let resume = llm
        .prompt(
            RESUME_SYSTEM,
            &resume_prompt(
                experiences,
                &request.job_description,
                request.existing_resume_format.as_deref(),
            ),
        )
        .await?;

    let letter = llm
        .prompt(
            COVER_LETTER_SYSTEM,
            &cover_letter_prompt(
                &request.job_title,
                &request.job_description,
                skills,
                experiences,
            ),
        )
        .await?;

    Ok(GeneratedDocuments {
        resume,
        cover_letter: compose_cover_letter(profile, &letter, today),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::default_profile;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_header_uses_profile_contact_details() {
        let header = cover_letter_header(&default_profile(), date());
        assert_eq!(
            header,
            "John Doe\n[Your Address]\n[City, State, Zip]\njohn@example.com\n(123) 456-7890\nMarch 05, 2024"
        );
    }

    #[test]
    fn test_first_six_lines_replaced() {
        let generated = "A\nB\nC\nD\nE\nF\nDear Hiring Manager,\n\nBody.\n\nSincerely,\n[Your Name]";
        let letter = compose_cover_letter(&default_profile(), generated, date());

        assert!(letter.starts_with("John Doe\n[Your Address]"));
        assert!(letter.contains("March 05, 2024\nDear Hiring Manager,"));
        assert!(letter.ends_with("Sincerely,\nJohn Doe"));
        assert!(!letter.contains("\nA\n"));
    }

    #[test]
    fn test_short_letter_keeps_only_header() {
        let letter = compose_cover_letter(&default_profile(), "Dear team,\nHire me.", date());
        assert_eq!(letter, cover_letter_header(&default_profile(), date()));
    }

    #[test]
    fn test_blank_profile_keeps_placeholders() {
        let letter = compose_cover_letter(&Profile::default(), "1\n2\n3\n4\n5\n6\nBody", date());
        assert!(letter.starts_with("[Your Name]\n"));
        assert!(letter.contains("[Your Email]"));
        assert!(letter.ends_with("Body"));
    }
}
