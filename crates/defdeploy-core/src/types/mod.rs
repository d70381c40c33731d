//! Shared domain types.

pub mod category;
pub mod locale;

pub use category::{DeploymentCategory, UnknownCategory};
pub use locale::Locale;
