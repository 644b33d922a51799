//! Listing sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A job board driven by a site adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Yotspot,
    #[serde(rename = "yacrew")]
    YaCrew,
}

impl Source {
    /// All known sources, in adapter order.
    pub const ALL: [Source; 2] = [Source::Yotspot, Source::YaCrew];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Yotspot => "yotspot",
            Source::YaCrew => "yacrew",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yotspot" => Ok(Source::Yotspot),
            "yacrew" => Ok(Source::YaCrew),
            other => Err(format!("unknown source: {}", other)),
        }
    }
}
