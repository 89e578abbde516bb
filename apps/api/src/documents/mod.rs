//! Document upload and download.

pub mod handlers;
pub mod render;

use resumecraft_profile::models::Profile;

/// Content of the most recently added resume, if any.
pub fn latest_resume(profile: &Profile) -> Option<&str> {
    profile.resumes.last().map(|doc| doc.content.as_str())
}
