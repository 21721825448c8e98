pub mod catalog;
pub mod chart;
pub mod common;
pub mod hole_stat;
pub mod round;
pub mod user;
