use std::collections::HashSet;

use crewhands_protocols::CanonicalJob;

/// Keep the first job seen for each id, preserving order.
pub fn deduplicate_jobs(jobs: Vec<CanonicalJob>) -> Vec<CanonicalJob> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| seen.insert(job.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crewhands_protocols::{Role, Source};

    fn job(id: &str, title: &str) -> CanonicalJob {
        CanonicalJob {
            id: id.to_string(),
            source: Source::Yotspot,
            title: title.to_string(),
            description: String::new(),
            role: Role::Unknown,
            vessel: None,
            location: None,
            salary: None,
            requirements: Vec::new(),
            benefits: Vec::new(),
            posted_at: None,
            expires_at: None,
            scraped_at: Utc::now(),
            url: None,
            company: None,
            contact_email: None,
            contract: Default::default(),
        }
    }

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let jobs = vec![job("1", "first"), job("2", "second"), job("1", "repeat")];
        let unique = deduplicate_jobs(jobs);
        let seen: Vec<(&str, &str)> = unique
            .iter()
            .map(|j| (j.id.as_str(), j.title.as_str()))
            .collect();
        assert_eq!(seen, vec![("1", "first"), ("2", "second")]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(deduplicate_jobs(Vec::new()).is_empty());
    }
}
