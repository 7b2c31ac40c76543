use serde::{Deserialize, Serialize};

/// Error payload returned by the activities service when it refuses a
/// command. `detail` is absent on responses that carry no explanation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRejection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiRejection {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}
