use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use utoipa::ToSchema;

/// Outcome of a tee shot (fairway) or approach (green) relative to its target.
///
/// `NotApplicable` is only meaningful for fairways, e.g. on a par 3 where the
/// tee shot is the approach.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "hit_outcome", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HitOutcome {
    Hit,
    Left,
    Right,
    Long,
    Short,
    #[default]
    NotApplicable,
}

/// Accepts the wire names in any letter case.
impl FromStr for HitOutcome {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "HIT" => Ok(Self::Hit),
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            "LONG" => Ok(Self::Long),
            "SHORT" => Ok(Self::Short),
            "NOT_APPLICABLE" => Ok(Self::NotApplicable),
            _ => Err(format!("unknown hit outcome '{}'", value)),
        }
    }
}

impl<'de> Deserialize<'de> for HitOutcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// Which categorical outcome a breakdown row counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "breakdown_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum BreakdownKind {
    Fairway,
    Green,
}

impl BreakdownKind {
    /// Selects the outcome this kind counts from a hole stat.
    pub fn outcome_of(&self, values: &super::HoleStatValues) -> HitOutcome {
        match self {
            Self::Fairway => values.fairway_hit,
            Self::Green => values.green_hit,
        }
    }
}
