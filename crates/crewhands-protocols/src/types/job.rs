//! Canonical job model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Source;

/// A normalized job posting.
///
/// `id` is a fingerprint of source, title and URL. Two listings with the same
/// title and no URL are told apart only by their first-seen timestamp, so the
/// id is stable per listing but not a guaranteed-unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalJob {
    pub id: String,
    pub source: Source,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel: Option<Vessel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contract: Contract,
}

impl CanonicalJob {
    /// Vessel name, when known.
    pub fn vessel_name(&self) -> Option<&str> {
        self.vessel.as_ref().and_then(|v| v.name.as_deref())
    }

    pub fn region(&self) -> Region {
        self.location
            .as_ref()
            .map(|l| l.region)
            .unwrap_or(Region::Unknown)
    }
}

/// Crew role category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Captain,
    Chef,
    StewardStewardess,
    Engineer,
    Deckhand,
    FirstOfficer,
    Bosun,
    Mate,
    /// Unclassified role; carries the first words of the source text.
    Other(String),
    Unknown,
}

impl Role {
    pub fn label(&self) -> &str {
        match self {
            Role::Captain => "Captain",
            Role::Chef => "Chef",
            Role::StewardStewardess => "Steward/Stewardess",
            Role::Engineer => "Engineer",
            Role::Deckhand => "Deckhand",
            Role::FirstOfficer => "First Officer",
            Role::Bosun => "Bosun",
            Role::Mate => "Mate",
            Role::Other(text) => text,
            Role::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Captain" => Role::Captain,
            "Chef" => Role::Chef,
            "Steward/Stewardess" => Role::StewardStewardess,
            "Engineer" => Role::Engineer,
            "Deckhand" => Role::Deckhand,
            "First Officer" => Role::FirstOfficer,
            "Bosun" => Role::Bosun,
            "Mate" => Role::Mate,
            "Unknown" | "" => Role::Unknown,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.label().to_string()
    }
}

/// Cruising region inferred from a location string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Mediterranean,
    Caribbean,
    Usa,
    MiddleEast,
    Asia,
    Unknown,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Mediterranean => "mediterranean",
            Region::Caribbean => "caribbean",
            Region::Usa => "usa",
            Region::MiddleEast => "middle_east",
            Region::Asia => "asia",
            Region::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub raw: String,
    pub region: Region,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vessel_type: Option<VesselType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<VesselLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl Vessel {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.vessel_type.is_none()
            && self.length.is_none()
            && self.flag.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VesselType {
    MotorYacht,
    SailingYacht,
    Superyacht,
    Megayacht,
    Catamaran,
    /// Unrecognized type, kept as scraped.
    Other(String),
}

impl VesselType {
    pub fn label(&self) -> &str {
        match self {
            VesselType::MotorYacht => "Motor Yacht",
            VesselType::SailingYacht => "Sailing Yacht",
            VesselType::Superyacht => "Superyacht",
            VesselType::Megayacht => "Megayacht",
            VesselType::Catamaran => "Catamaran",
            VesselType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for VesselType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for VesselType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Motor Yacht" => VesselType::MotorYacht,
            "Sailing Yacht" => VesselType::SailingYacht,
            "Superyacht" => VesselType::Superyacht,
            "Megayacht" => VesselType::Megayacht,
            "Catamaran" => VesselType::Catamaran,
            _ => VesselType::Other(s),
        }
    }
}

impl From<VesselType> for String {
    fn from(t: VesselType) -> Self {
        t.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    M,
    Ft,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselLength {
    pub value: f64,
    pub unit: LengthUnit,
}

impl VesselLength {
    pub fn meters(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::M,
        }
    }

    pub fn feet(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Ft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriod {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub min: f64,
    pub max: f64,
    pub currency: Currency,
    pub period: PayPeriod,
    pub raw: String,
}

impl Salary {
    /// Whether either end of the range reaches `minimum`.
    pub fn reaches(&self, minimum: f64) -> bool {
        self.min >= minimum || self.max >= minimum
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContractKind {
    Permanent,
    Temporary,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractDuration {
    pub value: u32,
    pub unit: DurationUnit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde(rename = "type")]
    pub kind: ContractKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<ContractDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}
