pub mod charts;
pub mod courses;
pub mod hole_stats;
pub mod login;
pub mod rounds;
pub mod users;
