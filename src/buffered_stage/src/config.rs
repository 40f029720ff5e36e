use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::error::StageResult;

/// How `delete` decides whether the original record still holds the key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, CandidType)]
pub enum PresenceRule {
    /// Present only when the original value is truthy. A key holding `false`,
    /// `0` or `""` counts as absent, so deleting it leaves nothing to apply.
    #[default]
    #[serde(rename = "truthy")]
    Truthy,
    /// Present whenever the original has the key at all.
    #[serde(rename = "exists")]
    Exists,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, CandidType)]
#[serde(default)]
pub struct StageConfig {
    pub presence: PresenceRule,
}

impl StageConfig {
    pub fn strict() -> Self {
        Self {
            presence: PresenceRule::Exists,
        }
    }

    pub fn from_json_str(s: &str) -> StageResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
