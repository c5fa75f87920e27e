use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for the court search endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1))]
    pub postcode: String,
    #[serde(alias = "serviceArea", rename = "serviceArea", default)]
    pub service_area: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[validate(range(min = 1, max = 50))]
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    10
}
