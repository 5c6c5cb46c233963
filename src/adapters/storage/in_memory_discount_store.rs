//! In-Memory Discount Store Adapter
//!
//! Keeps consultations and discount codes in process memory with the same
//! uniqueness and conditional-update semantics as the PostgreSQL store.
//! Useful for testing and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::consultation::{Consultation, NewConsultation};
use crate::domain::discount::{DiscountCode, DiscountCodeRecord};
use crate::domain::foundation::{ConsultationId, DomainError, ErrorCode, Timestamp};
use crate::ports::DiscountStore;

#[derive(Debug, Default)]
struct Tables {
    consultations: HashMap<ConsultationId, Consultation>,
    by_session: HashMap<String, ConsultationId>,
    codes: HashMap<DiscountCode, DiscountCodeRecord>,
    by_consultation: HashMap<ConsultationId, DiscountCode>,
}

/// In-memory implementation of the DiscountStore port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDiscountStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDiscountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored consultations.
    pub async fn consultation_count(&self) -> usize {
        self.tables.read().await.consultations.len()
    }

    /// Number of stored discount codes.
    pub async fn code_count(&self) -> usize {
        self.tables.read().await.codes.len()
    }
}

#[async_trait]
impl DiscountStore for InMemoryDiscountStore {
    async fn insert_consultation(
        &self,
        consultation: NewConsultation,
    ) -> Result<Consultation, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.by_session.contains_key(&consultation.payment_session_id) {
            return Err(DomainError::new(
                ErrorCode::PaymentSessionTaken,
                "Consultation already recorded for payment session",
            )
            .with_detail("payment_session_id", consultation.payment_session_id));
        }

        let created = Consultation::from_new(ConsultationId::new(), consultation, Timestamp::now());
        tables
            .by_session
            .insert(created.payment_session_id.clone(), created.id);
        tables.consultations.insert(created.id, created.clone());
        Ok(created)
    }

    async fn code_exists(&self, code: &DiscountCode) -> Result<bool, DomainError> {
        Ok(self.tables.read().await.codes.contains_key(code))
    }

    async fn insert_discount_code(&self, record: &DiscountCodeRecord) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.consultations.contains_key(&record.consultation_id()) {
            return Err(DomainError::database("Discount code references unknown consultation")
                .with_detail("consultation_id", record.consultation_id().to_string()));
        }
        if tables.codes.contains_key(record.code()) {
            return Err(DomainError::new(
                ErrorCode::DiscountCodeTaken,
                "Discount code already exists",
            ));
        }
        if tables.by_consultation.contains_key(&record.consultation_id()) {
            return Err(DomainError::new(
                ErrorCode::CodeAlreadyIssued,
                "Consultation already has a discount code",
            ));
        }

        tables
            .by_consultation
            .insert(record.consultation_id(), record.code().clone());
        tables.codes.insert(record.code().clone(), record.clone());
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &DiscountCode,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        Ok(self.tables.read().await.codes.get(code).cloned())
    }

    async fn mark_used_if_unused(
        &self,
        code: &DiscountCode,
        order_id: Option<&str>,
        at: Timestamp,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        let mut tables = self.tables.write().await;
        let Some(record) = tables.codes.get_mut(code) else {
            return Ok(None);
        };
        if record.mark_used(order_id.map(str::to_string), at) {
            Ok(Some(record.clone()))
        } else {
            Ok(None)
        }
    }

    async fn find_consultation_by_session(
        &self,
        payment_session_id: &str,
    ) -> Result<Option<Consultation>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_session
            .get(payment_session_id)
            .and_then(|id| tables.consultations.get(id))
            .cloned())
    }

    async fn find_code_for_consultation(
        &self,
        consultation_id: &ConsultationId,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_consultation
            .get(consultation_id)
            .and_then(|code| tables.codes.get(code))
            .cloned())
    }
}
