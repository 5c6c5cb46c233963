//! Paid consultation booking.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConsultationId, Timestamp, ValidationError};

use super::ConsultationStatus;

/// Booking details captured from a completed checkout, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConsultation {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    /// Start of the booked slot. The discount window opens here.
    pub consultation_date: Timestamp,
    pub hair_type: String,
    pub concerns: String,
    pub payment_intent_id: Option<String>,
    pub payment_session_id: String,
}

impl NewConsultation {
    /// Checks the fields a consultation cannot be recorded without.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_email.trim().is_empty() {
            return Err(ValidationError::empty_field("customer_email"));
        }
        if !self.customer_email.contains('@') {
            return Err(ValidationError::invalid_format(
                "customer_email",
                "missing @ symbol",
            ));
        }
        if self.payment_session_id.trim().is_empty() {
            return Err(ValidationError::empty_field("payment_session_id"));
        }
        Ok(())
    }
}

/// A recorded, paid consultation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: ConsultationId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub consultation_date: Timestamp,
    pub hair_type: String,
    pub concerns: String,
    pub payment_intent_id: Option<String>,
    pub payment_session_id: String,
    pub status: ConsultationStatus,
    pub created_at: Timestamp,
}

impl Consultation {
    pub fn from_new(id: ConsultationId, new: NewConsultation, created_at: Timestamp) -> Self {
        Self {
            id,
            customer_name: new.customer_name,
            customer_email: new.customer_email,
            customer_phone: new.customer_phone,
            consultation_date: new.consultation_date,
            hair_type: new.hair_type,
            concerns: new.concerns,
            payment_intent_id: new.payment_intent_id,
            payment_session_id: new.payment_session_id,
            status: ConsultationStatus::Paid,
            created_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_new_consultation(session_id: &str) -> NewConsultation {
    NewConsultation {
        customer_name: "Ada Lovelace".to_string(),
        customer_email: "ada@example.com".to_string(),
        customer_phone: None,
        consultation_date: Timestamp::parse_rfc3339("consultation_date", "2025-01-10T10:00:00Z")
            .unwrap(),
        hair_type: "curly".to_string(),
        concerns: "frizz".to_string(),
        payment_intent_id: Some("pi_123".to_string()),
        payment_session_id: session_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_new_marks_consultation_paid() {
        let id = ConsultationId::new();
        let consultation =
            Consultation::from_new(id, sample_new_consultation("cs_1"), Timestamp::now());

        assert_eq!(consultation.id, id);
        assert_eq!(consultation.status, ConsultationStatus::Paid);
        assert_eq!(consultation.payment_session_id, "cs_1");
    }

    #[test]
    fn validate_accepts_complete_booking() {
        assert!(sample_new_consultation("cs_1").validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_email() {
        let mut new = sample_new_consultation("cs_1");
        new.customer_email = "  ".to_string();

        let err = new.validate().unwrap_err();
        assert_eq!(err.field(), "customer_email");
    }

    #[test]
    fn validate_rejects_email_without_at() {
        let mut new = sample_new_consultation("cs_1");
        new.customer_email = "ada.example.com".to_string();

        assert!(matches!(
            new.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn validate_rejects_missing_session() {
        let new = sample_new_consultation("");
        assert_eq!(new.validate().unwrap_err().field(), "payment_session_id");
    }
}
