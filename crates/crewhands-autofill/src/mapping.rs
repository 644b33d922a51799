//! Profile fields and the generic label mappings.

use crewhands_protocols::ApplicantProfile;

/// A value the filler can put into a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    Country,
    Nationality,
    CurrentPosition,
    YearsExperience,
    CoverLetter,
    ExperienceSummary,
    SalaryExpectation,
    AvailableFrom,
}

/// Label patterns that identify one profile field on an unknown form.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    /// Lowercase patterns, tried in order.
    pub patterns: &'static [&'static str],
    pub field: ProfileField,
}

const fn mapping(patterns: &'static [&'static str], field: ProfileField) -> FieldMapping {
    FieldMapping { patterns, field }
}

/// Ordered mappings walked by the generic dialect.
pub const GENERIC_MAPPINGS: &[FieldMapping] = &[
    mapping(&["first name", "firstname", "first_name"], ProfileField::FirstName),
    mapping(&["last name", "lastname", "last_name", "surname"], ProfileField::LastName),
    mapping(&["email", "e-mail"], ProfileField::Email),
    mapping(&["phone", "telephone", "mobile", "cell"], ProfileField::Phone),
    mapping(&["address"], ProfileField::Address),
    mapping(&["city"], ProfileField::City),
    mapping(&["country"], ProfileField::Country),
    mapping(&["nationality"], ProfileField::Nationality),
    mapping(&["position", "role", "job title"], ProfileField::CurrentPosition),
    mapping(&["experience", "years"], ProfileField::YearsExperience),
    mapping(&["message", "cover letter", "coverletter"], ProfileField::CoverLetter),
    mapping(&["salary", "expectation", "pay"], ProfileField::SalaryExpectation),
    mapping(&["available", "start date", "commencement"], ProfileField::AvailableFrom),
];

/// Resolved text for every [`ProfileField`] of one application.
#[derive(Debug, Clone)]
pub struct FieldValues<'a> {
    profile: &'a ApplicantProfile,
    cover_letter: String,
    experience: String,
}

impl<'a> FieldValues<'a> {
    pub fn new(profile: &'a ApplicantProfile, cover_letter: String, experience: String) -> Self {
        Self {
            profile,
            cover_letter,
            experience,
        }
    }

    /// Value for `field`; `None` when the profile has nothing to enter.
    pub fn get(&self, field: ProfileField) -> Option<String> {
        let p = self.profile;
        let value = match field {
            ProfileField::FirstName => p.first_name.clone(),
            ProfileField::LastName => p.last_name.clone(),
            ProfileField::Email => p.email.clone(),
            ProfileField::Phone => p.phone.clone(),
            ProfileField::Address => p.address.clone(),
            ProfileField::City => p.city.clone(),
            ProfileField::Country => p.country.clone(),
            ProfileField::Nationality => p.nationality.clone(),
            ProfileField::CurrentPosition => p.current_position.clone(),
            ProfileField::YearsExperience => p.years_experience?.to_string(),
            ProfileField::CoverLetter => self.cover_letter.clone(),
            ProfileField::ExperienceSummary => self.experience.clone(),
            ProfileField::SalaryExpectation => p.salary_expectation.clone()?,
            ProfileField::AvailableFrom => p.available_from.clone()?,
        };
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
