pub mod breakdown;
pub mod hole_stat;
pub mod round;
pub mod summary;
pub mod user;
