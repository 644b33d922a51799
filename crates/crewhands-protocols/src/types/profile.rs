//! Applicant profile.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Everything the form filler knows about the applicant.
///
/// Loaded once per run and never mutated. Every field defaults so partial
/// profile files are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantProfile {
    // Personal
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub nationality: String,
    pub date_of_birth: Option<String>,

    // Professional
    pub current_position: String,
    pub years_experience: Option<u32>,
    pub certifications: Vec<String>,
    pub languages: Vec<String>,
    pub skills: Vec<String>,

    // Documents
    pub cv_path: Option<PathBuf>,
    pub cover_letter_path: Option<PathBuf>,
    pub passport_path: Option<PathBuf>,
    pub certificates: Vec<PathBuf>,

    // Preferences
    pub available_from: Option<String>,
    pub preferred_positions: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub salary_expectation: Option<String>,

    /// Cover letter template with `{{position}}`, `{{vessel}}`,
    /// `{{company}}` and `{{name}}` tokens.
    pub cover_letter: Option<String>,
}

impl ApplicantProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
