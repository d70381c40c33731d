//! Route handlers organized by domain.

pub mod deploy;
pub mod health;
pub mod jobs;
