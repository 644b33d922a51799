//! Candidate filtering.

use std::collections::BTreeSet;

use tracing::info;

use crewhands_config::FilterConfig;
use crewhands_protocols::CanonicalJob;

/// Jobs matching every active criterion and not yet applied to, in input
/// order.
///
/// Criteria are case-insensitive substring matches: roles against the role
/// label or title, locations against the raw location, vessel types against
/// the vessel type label. `min_salary` passes when either end of the range
/// reaches it. Jobs lacking the field a criterion inspects are dropped.
pub fn filter_jobs(
    jobs: &[CanonicalJob],
    filters: &FilterConfig,
    applied: &BTreeSet<String>,
) -> Vec<CanonicalJob> {
    let roles = lowercase(&filters.roles);
    let locations = lowercase(&filters.locations);
    let vessel_types = lowercase(&filters.vessel_types);

    let filtered: Vec<CanonicalJob> = jobs
        .iter()
        .filter(|job| {
            roles.is_empty() || {
                let role = job.role.label().to_lowercase();
                let title = job.title.to_lowercase();
                roles.iter().any(|r| role.contains(r) || title.contains(r))
            }
        })
        .filter(|job| {
            locations.is_empty()
                || job.location.as_ref().is_some_and(|location| {
                    let raw = location.raw.to_lowercase();
                    locations.iter().any(|l| raw.contains(l))
                })
        })
        .filter(|job| match filters.min_salary {
            Some(minimum) => job.salary.as_ref().is_some_and(|s| s.reaches(minimum)),
            None => true,
        })
        .filter(|job| {
            vessel_types.is_empty()
                || job
                    .vessel
                    .as_ref()
                    .and_then(|v| v.vessel_type.as_ref())
                    .is_some_and(|t| {
                        let label = t.label().to_lowercase();
                        vessel_types.iter().any(|v| label.contains(v))
                    })
        })
        .filter(|job| !applied.contains(&job.id))
        .cloned()
        .collect();

    info!("Filtered to {} jobs", filtered.len());
    filtered
}

fn lowercase(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
