pub mod ics;
pub mod repository;
pub mod types;
