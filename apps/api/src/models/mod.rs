pub mod analysis;
pub mod association;
pub mod course;
pub mod job;
pub mod profile;
