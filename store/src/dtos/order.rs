use serde::Serialize;

/// Result of saving an order. Saving never fails with an error value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveOutcome {
    pub fn saved() -> Self {
        SaveOutcome {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        SaveOutcome {
            success: false,
            error: Some(error.into()),
        }
    }
}
