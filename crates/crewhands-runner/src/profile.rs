//! Applicant profile loading.

use std::path::Path;

use tracing::info;

use crewhands_protocols::ApplicantProfile;

use crate::error::RunnerError;

/// Read an applicant profile from a JSON file. Missing fields default.
pub async fn load_profile(path: &Path) -> Result<ApplicantProfile, RunnerError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RunnerError::ProfileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let profile: ApplicantProfile =
        serde_json::from_str(&content).map_err(|source| RunnerError::ProfileParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(name = %profile.full_name(), "Loaded applicant profile");
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_partial_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"firstName": "Ana", "lastName": "Silva", "yearsExperience": 4,
                "certifications": ["STCW"], "cvPath": "/docs/cv.pdf"}"#,
        )
        .unwrap();

        let profile = load_profile(&path).await.unwrap();
        assert_eq!(profile.full_name(), "Ana Silva");
        assert_eq!(profile.years_experience, Some(4));
        assert_eq!(profile.certifications, vec!["STCW"]);
        assert_eq!(profile.cv_path.as_deref(), Some(Path::new("/docs/cv.pdf")));
        assert!(profile.languages.is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_invalid_profile() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_profile(&dir.path().join("absent.json")).await,
            Err(RunnerError::ProfileRead { .. })
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            load_profile(&path).await,
            Err(RunnerError::ProfileParse { .. })
        ));
    }
}
