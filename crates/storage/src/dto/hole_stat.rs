use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{HitOutcome, HoleStat, HoleStatValues};

/// Request payload for recording a player's stats on a hole.
///
/// Every field is mandatory; they are optional here so a missing field is
/// reported as a validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct HoleStatRequest {
    #[validate(
        required(message = "score is required"),
        range(min = 1, max = 30, message = "score must be between 1 and 30")
    )]
    pub score: Option<i32>,

    #[validate(
        required(message = "putts is required"),
        range(min = 0, max = 20, message = "putts must be between 0 and 20")
    )]
    pub putts: Option<i32>,

    #[validate(
        required(message = "penalties is required"),
        range(min = 0, max = 20, message = "penalties must be between 0 and 20")
    )]
    pub penalties: Option<i32>,

    #[validate(required(message = "fairway_hit is required"))]
    pub fairway_hit: Option<HitOutcome>,

    #[validate(
        required(message = "green_hit is required"),
        custom(function = "validate_green_hit")
    )]
    pub green_hit: Option<HitOutcome>,

    #[validate(
        required(message = "pin_location is required"),
        length(max = 255, message = "pin_location must be at most 255 characters")
    )]
    pub pin_location: Option<String>,
}

impl TryFrom<HoleStatRequest> for HoleStatValues {
    type Error = ValidationErrors;

    fn try_from(request: HoleStatRequest) -> Result<Self, Self::Error> {
        request.validate()?;

        match request {
            HoleStatRequest {
                score: Some(score),
                putts: Some(putts),
                penalties: Some(penalties),
                fairway_hit: Some(fairway_hit),
                green_hit: Some(green_hit),
                pin_location: Some(pin_location),
            } => Ok(HoleStatValues {
                score,
                putts,
                penalties,
                fairway_hit,
                green_hit,
                pin_location,
            }),
            // `validate` rejects every missing field above
            _ => Err(ValidationErrors::new()),
        }
    }
}

fn validate_green_hit(outcome: &HitOutcome) -> Result<(), ValidationError> {
    if *outcome == HitOutcome::NotApplicable {
        let mut error = ValidationError::new("green_hit_not_applicable");
        error.message = Some(Cow::Borrowed("green_hit cannot be NOT_APPLICABLE"));
        return Err(error);
    }

    Ok(())
}

/// Hole stat as returned to clients. A hole without recorded stats is
/// returned with zero values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HoleStatResponse {
    pub hole_id: Uuid,
    #[serde(flatten)]
    pub values: HoleStatValues,
}

impl From<HoleStat> for HoleStatResponse {
    fn from(stat: HoleStat) -> Self {
        Self {
            hole_id: stat.hole_id,
            values: stat.values,
        }
    }
}
