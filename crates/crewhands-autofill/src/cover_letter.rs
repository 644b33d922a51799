//! Cover letter and experience summary text.

use std::sync::Arc;

use tracing::{debug, warn};

use crewhands_protocols::{ApplicantProfile, CanonicalJob, TextGenerator};

/// Produces the cover letter for one application.
///
/// Precedence: the profile's template, then the text generator, then the
/// built-in letter. Generator failures fall back silently to the built-in
/// letter.
#[derive(Clone, Default)]
pub struct CoverLetterWriter {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl CoverLetterWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub async fn write(&self, job: &CanonicalJob, profile: &ApplicantProfile) -> String {
        if let Some(template) = profile.cover_letter.as_deref().filter(|t| !t.trim().is_empty()) {
            return render_template(template, job, profile);
        }

        if let Some(generator) = &self.generator {
            match generator.generate(&generation_prompt(job, profile)).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(job_id = %job.id, "Using generated cover letter");
                    return text.trim().to_string();
                }
                Ok(_) => warn!(job_id = %job.id, "Generated cover letter was empty"),
                Err(e) => warn!(job_id = %job.id, error = %e, "Cover letter generation failed"),
            }
        }

        default_letter(job, profile)
    }
}

impl std::fmt::Debug for CoverLetterWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverLetterWriter")
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

/// Replace `{{position}}`, `{{vessel}}`, `{{company}}` and `{{name}}`.
pub fn render_template(template: &str, job: &CanonicalJob, profile: &ApplicantProfile) -> String {
    template
        .replace("{{position}}", &job.title)
        .replace("{{vessel}}", job.vessel_name().unwrap_or("your vessel"))
        .replace("{{company}}", job.company.as_deref().unwrap_or("your company"))
        .replace("{{name}}", &profile.full_name())
}

/// Built-in letter used when there is no template and no generated text.
pub fn default_letter(job: &CanonicalJob, profile: &ApplicantProfile) -> String {
    let vessel = job
        .vessel_name()
        .map(|name| format!(" on {}", name))
        .unwrap_or_default();
    let years = profile
        .years_experience
        .map(|y| y.to_string())
        .unwrap_or_else(|| "several".to_string());
    let current = if profile.current_position.trim().is_empty() {
        String::new()
    } else {
        format!(" as a {}", profile.current_position.trim())
    };
    let available = profile
        .available_from
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("immediately");

    let mut paragraphs = vec![
        "Dear Hiring Manager,".to_string(),
        format!(
            "I am writing to express my interest in the {} role{}.",
            job.title, vessel
        ),
        format!(
            "With {} years of experience in the yachting industry{}, I am confident in my ability to contribute effectively to your team.",
            years, current
        ),
    ];
    if !profile.certifications.is_empty() {
        paragraphs.push(format!(
            "I hold the following certifications: {}.",
            profile.certifications.join(", ")
        ));
    }
    paragraphs.push(format!(
        "I am available {} and would welcome the opportunity to discuss how I can add value to your crew.",
        available
    ));
    paragraphs.push("Thank you for considering my application.".to_string());
    paragraphs.push(format!("Best regards,\n{}", profile.full_name()));

    paragraphs.join("\n\n")
}

/// Prompt sent to the text generator. Same job and profile, same prompt.
pub fn generation_prompt(job: &CanonicalJob, profile: &ApplicantProfile) -> String {
    let mut lines = vec![
        "Write a concise, professional cover letter for a yacht crew job application.".to_string(),
        format!("Job title: {}", job.title),
        format!("Role: {}", job.role),
    ];
    if let Some(vessel) = job.vessel_name() {
        lines.push(format!("Vessel: {}", vessel));
    }
    if let Some(location) = &job.location {
        lines.push(format!("Location: {}", location.raw));
    }
    if let Some(company) = &job.company {
        lines.push(format!("Company: {}", company));
    }
    lines.push(format!("Applicant: {}", profile.full_name()));
    lines.push(experience_summary(profile));
    lines.push("Sign off with the applicant's name. Plain text only.".to_string());
    lines.retain(|line| !line.trim().is_empty());
    lines.join("\n")
}

/// Position, years, certifications and languages block for "experience"
/// textareas. Empty when the profile has none of them.
pub fn experience_summary(profile: &ApplicantProfile) -> String {
    let mut lines = Vec::new();
    if !profile.current_position.trim().is_empty() {
        lines.push(format!("Current Position: {}", profile.current_position.trim()));
    }
    if let Some(years) = profile.years_experience {
        lines.push(format!("Years of Experience: {}", years));
    }
    if !profile.certifications.is_empty() {
        lines.push(String::new());
        lines.push("Certifications:".to_string());
        lines.extend(profile.certifications.iter().map(|c| format!("- {}", c)));
    }
    if !profile.languages.is_empty() {
        lines.push(String::new());
        lines.push("Languages:".to_string());
        lines.extend(profile.languages.iter().map(|l| format!("- {}", l)));
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
#[path = "cover_letter_tests.rs"]
mod tests;
