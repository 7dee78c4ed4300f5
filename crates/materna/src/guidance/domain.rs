use serde::{Deserialize, Serialize};

/// Clinical weight of a guidance rule, ordered from least to most acute.
///
/// Legacy rule files still use the `warning`/`urgent` vocabulary; those
/// spellings deserialize onto `medium` and `high`. Anything else is rejected
/// at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Low,
    #[serde(alias = "warning")]
    Medium,
    #[serde(alias = "urgent")]
    High,
    Critical,
}

impl Severity {
    pub const fn ordered() -> [Self; 5] {
        [Self::Info, Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// A single match at or above `High` escalates the whole report.
    pub const fn escalates(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceCategory {
    Hypertension,
    Anemia,
    Preeclampsia,
    FetalMovement,
    GestationalTiming,
    Nutrition,
    SymptomTriage,
    Emergency,
    General,
}

impl GuidanceCategory {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Hypertension,
            Self::Anemia,
            Self::Preeclampsia,
            Self::FetalMovement,
            Self::GestationalTiming,
            Self::Nutrition,
            Self::SymptomTriage,
            Self::Emergency,
            Self::General,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hypertension => "Hypertension",
            Self::Anemia => "Anemia",
            Self::Preeclampsia => "Pre-eclampsia",
            Self::FetalMovement => "Fetal Movement",
            Self::GestationalTiming => "Gestational Timing",
            Self::Nutrition => "Nutrition",
            Self::SymptomTriage => "Symptom Triage",
            Self::Emergency => "Emergency",
            Self::General => "General",
        }
    }
}
