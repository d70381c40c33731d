//! Marketing definition categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A class of marketing definition with its own deployment backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentCategory {
    /// Marketing automation plans.
    AutomationPlans,
    /// Campaign activities.
    Campaigns,
    /// Events.
    Events,
    /// Funnels.
    Funnels,
    /// Goals.
    Goals,
    /// Marketing assets.
    MarketingAssets,
    /// Outcomes.
    Outcomes,
    /// Page events.
    PageEvents,
    /// Profiles.
    Profiles,
    /// Segments.
    Segments,
}

impl DeploymentCategory {
    /// All categories, in declaration order.
    pub const ALL: [DeploymentCategory; 10] = [
        Self::AutomationPlans,
        Self::Campaigns,
        Self::Events,
        Self::Funnels,
        Self::Goals,
        Self::MarketingAssets,
        Self::Outcomes,
        Self::PageEvents,
        Self::Profiles,
        Self::Segments,
    ];

    /// Return the wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutomationPlans => "automationplans",
            Self::Campaigns => "campaigns",
            Self::Events => "events",
            Self::Funnels => "funnels",
            Self::Goals => "goals",
            Self::MarketingAssets => "marketingassets",
            Self::Outcomes => "outcomes",
            Self::PageEvents => "pageevents",
            Self::Profiles => "profiles",
            Self::Segments => "segments",
        }
    }
}

impl fmt::Display for DeploymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown definition category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for DeploymentCategory {
    type Err = UnknownCategory;

    /// Parse a wire name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
