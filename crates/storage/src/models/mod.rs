pub mod breakdown;
pub mod course;
pub mod hit_outcome;
pub mod hole;
pub mod hole_stat;
pub mod round;
pub mod round_summary;
pub mod user;

pub use breakdown::{BreakdownRow, CategoricalBreakdown};
pub use course::{Course, NewCourse};
pub use hit_outcome::{BreakdownKind, HitOutcome};
pub use hole::{Hole, NewHole};
pub use hole_stat::{HolePerformance, HoleStat, HoleStatValues};
pub use round::{NewRound, Round, RoundOverview};
pub use round_summary::{RoundSummary, RoundWithSummary, SummaryValues};
pub use user::User;
