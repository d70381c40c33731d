//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use defdeploy_core::error::AppError;

/// Category names as sent by clients.
///
/// Older clients post the list as a JSON-encoded string instead of an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefinitionTypes {
    /// A plain JSON array of names.
    List(Vec<String>),
    /// A string holding a JSON array of names.
    Encoded(String),
}

impl Default for DefinitionTypes {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl DefinitionTypes {
    /// Decode into the list of raw category names.
    pub fn into_names(self) -> Result<Vec<String>, AppError> {
        match self {
            Self::List(names) => Ok(names),
            Self::Encoded(raw) => serde_json::from_str(&raw).map_err(|e| {
                AppError::validation(format!("definitionTypes is not a JSON array of strings: {e}"))
            }),
        }
    }
}

/// Deploy definitions request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeployDefinitionsRequest {
    /// Category names to deploy, in order.
    #[serde(default)]
    pub definition_types: DefinitionTypes,
    /// Whether to start the taxonomy publishing job.
    #[serde(default)]
    pub publish_taxonomies: bool,
    /// Locale tag; the configured default when absent.
    #[validate(length(max = 35, message = "Locale tag is too long"))]
    pub locale: Option<String>,
}

/// Deployment status request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusRequest {
    /// Name returned by the deploy call.
    #[validate(length(min = 1, message = "jobName is required"))]
    pub job_name: String,
}
