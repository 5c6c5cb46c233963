//! Consultation payment status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Lifecycle status of a consultation booking.
///
/// Only paid consultations are ever recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    #[default]
    Paid,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Paid => "paid",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "paid" => Ok(ConsultationStatus::Paid),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown consultation status '{}'", other),
            )),
        }
    }
}

impl std::fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
