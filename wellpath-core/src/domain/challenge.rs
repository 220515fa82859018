use crate::domain::status::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Challenge ID (opaque, assigned by the backend)
pub type ChallengeId = String;

/// Length of a challenge program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeType {
    OneDayChallenge,
    ThreeDayChallenge,
    SevenDayChallenge,
}

impl ChallengeType {
    pub const ALL: [ChallengeType; 3] = [
        ChallengeType::OneDayChallenge,
        ChallengeType::ThreeDayChallenge,
        ChallengeType::SevenDayChallenge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeType::OneDayChallenge => "OneDayChallenge",
            ChallengeType::ThreeDayChallenge => "ThreeDayChallenge",
            ChallengeType::SevenDayChallenge => "SevenDayChallenge",
        }
    }

    /// Display label ("1 Day", "3 Days", "7 Days")
    pub fn label(self) -> &'static str {
        match self {
            ChallengeType::OneDayChallenge => "1 Day",
            ChallengeType::ThreeDayChallenge => "3 Days",
            ChallengeType::SevenDayChallenge => "7 Days",
        }
    }

    /// Reverse of [`ChallengeType::label`]
    pub fn from_label(label: &str) -> Result<Self, ParseEnumError> {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == label)
            .ok_or_else(|| ParseEnumError::new("challenge type label", label))
    }

    /// Number of days the program lasts
    pub fn days(self) -> u32 {
        match self {
            ChallengeType::OneDayChallenge => 1,
            ChallengeType::ThreeDayChallenge => 3,
            ChallengeType::SevenDayChallenge => 7,
        }
    }
}

impl fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChallengeType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("challenge type", s))
    }
}

/// Wellbeing area a challenge targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImprovementTag {
    MentalHealth,
    PhysicalBalance,
    SocialConnection,
    CreativeRelaxation,
    Combined,
}

impl ImprovementTag {
    pub const ALL: [ImprovementTag; 5] = [
        ImprovementTag::MentalHealth,
        ImprovementTag::PhysicalBalance,
        ImprovementTag::SocialConnection,
        ImprovementTag::CreativeRelaxation,
        ImprovementTag::Combined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImprovementTag::MentalHealth => "MentalHealth",
            ImprovementTag::PhysicalBalance => "PhysicalBalance",
            ImprovementTag::SocialConnection => "SocialConnection",
            ImprovementTag::CreativeRelaxation => "CreativeRelaxation",
            ImprovementTag::Combined => "Combined",
        }
    }

    /// Category name shown in the catalog
    pub fn label(self) -> &'static str {
        match self {
            ImprovementTag::MentalHealth => "Mental Health",
            ImprovementTag::PhysicalBalance => "Physical Balance",
            ImprovementTag::SocialConnection => "Social Connection",
            ImprovementTag::CreativeRelaxation => "Creative Relaxation",
            ImprovementTag::Combined => "Combined",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, ParseEnumError> {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == label)
            .ok_or_else(|| ParseEnumError::new("improvement tag label", label))
    }
}

impl fmt::Display for ImprovementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImprovementTag {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("improvement tag", s))
    }
}

/// Catalog entry for a challenge program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub media_url: Option<String>,

    pub challenge_type: ChallengeType,

    #[serde(default)]
    pub improvement_tag: Option<ImprovementTag>,

    /// Number of steps across all days, when the backend reports it
    #[serde(default)]
    pub total_steps: Option<u32>,
}
