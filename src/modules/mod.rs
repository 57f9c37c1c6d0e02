pub mod dashboard;
pub mod evaluations;
pub mod users;
