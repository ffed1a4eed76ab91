//! Pure mappings from raw provider values to human-facing levels and categories.

use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

/// Display information for one OpenWeather air quality index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiLevel {
    pub index: u8,
    pub level: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

const AQI_LEVELS: [AqiLevel; 5] = [
    AqiLevel {
        index: 1,
        level: "Good",
        color: "#00e400",
        description: "Air quality is considered satisfactory",
    },
    AqiLevel {
        index: 2,
        level: "Fair",
        color: "#ffff00",
        description: "Air quality is acceptable for most people",
    },
    AqiLevel {
        index: 3,
        level: "Moderate",
        color: "#ff7e00",
        description: "Members of sensitive groups may experience health effects",
    },
    AqiLevel {
        index: 4,
        level: "Poor",
        color: "#ff0000",
        description: "Everyone may begin to experience health effects",
    },
    AqiLevel {
        index: 5,
        level: "Very Poor",
        color: "#8f3f97",
        description: "Health warnings of emergency conditions",
    },
];

/// Level an AQI value. Anything outside 1-5 is an upstream contract violation.
pub fn aqi_level(aqi: i64) -> Result<AqiLevel, ClassifyError> {
    AQI_LEVELS
        .iter()
        .find(|lvl| i64::from(lvl.index) == aqi)
        .copied()
        .ok_or(ClassifyError::AqiOutOfRange(aqi))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UvSeverity {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvSeverity {
    /// Bucket a UV index; each bucket includes its upper bound.
    pub fn from_index(uv: u32) -> Self {
        match uv {
            0..=2 => UvSeverity::Low,
            3..=5 => UvSeverity::Moderate,
            6..=7 => UvSeverity::High,
            8..=10 => UvSeverity::VeryHigh,
            _ => UvSeverity::Extreme,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UvSeverity::Low => "low",
            UvSeverity::Moderate => "moderate",
            UvSeverity::High => "high",
            UvSeverity::VeryHigh => "very-high",
            UvSeverity::Extreme => "extreme",
        }
    }
}

impl std::fmt::Display for UvSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Severe,
    Climate,
    Forecast,
    Agriculture,
    General,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Severe => "severe",
            NewsCategory::Climate => "climate",
            NewsCategory::Forecast => "forecast",
            NewsCategory::Agriculture => "agriculture",
            NewsCategory::General => "general",
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword sets in priority order. The first category with any match wins;
/// `General` is the fallback and has no keywords of its own.
const CATEGORY_KEYWORDS: &[(NewsCategory, &[&str])] = &[
    (
        NewsCategory::Severe,
        &["hurricane", "tornado", "flood", "blizzard", "storm", "disaster", "emergency"],
    ),
    (
        NewsCategory::Climate,
        &["climate change", "global warming", "greenhouse", "carbon", "emissions"],
    ),
    (NewsCategory::Forecast, &["forecast", "prediction", "outlook", "expect", "coming"]),
    (NewsCategory::Agriculture, &["crop", "farm", "agriculture", "harvest", "drought"]),
];

pub fn categorize(content: &str) -> NewsCategory {
    let lower = content.to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(NewsCategory::General)
}
