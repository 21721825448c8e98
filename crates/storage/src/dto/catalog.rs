use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{NewCourse, NewHole};

/// Course as served by the course catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogCourse {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<CatalogMarker>,
}

/// One marker (tee box) of a catalog course with its hole layout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogMarker {
    pub id: i64,
    pub marker: String,
    pub slope: i32,
    pub rating: Decimal,
    pub par_total: i32,
    pub yardage_total: i32,
    pub meters_total: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<CatalogHole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogHole {
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub yardage: i32,
    pub meters: i32,
}

/// Course name filter for catalog searches.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseSearchParams {
    /// Case-insensitive part of the course name.
    pub name: Option<String>,
}

impl CatalogCourse {
    /// Builds the course stored with a round for the given marker.
    pub fn for_marker(&self, marker_id: i64) -> Option<NewCourse> {
        let marker = self.details.iter().find(|d| d.id == marker_id)?;

        Some(NewCourse {
            name: self.name.clone(),
            marker: marker.marker.clone(),
            slope: marker.slope,
            rating: marker.rating,
            total_par: marker.par_total,
            total_yards: marker.yardage_total,
            total_meters: marker.meters_total,
            holes: marker
                .holes
                .iter()
                .map(|h| NewHole {
                    number: h.number,
                    par: h.par,
                    stroke_index: h.stroke_index,
                    distance_yards: h.yardage,
                    distance_meters: h.meters,
                })
                .collect(),
        })
    }
}
