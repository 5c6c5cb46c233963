//! Hand-written port mocks shared by the discount handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::consultation::{Consultation, NewConsultation};
use crate::domain::discount::{DiscountCode, DiscountCodeRecord};
use crate::domain::foundation::{ConsultationId, DomainError, ErrorCode, Timestamp};
use crate::ports::{ConsultationConfirmation, DiscountStore, NotificationSender};

// ════════════════════════════════════════════════════════════════════════════
// MockDiscountStore
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockDiscountStore {
    consultations: Mutex<Vec<Consultation>>,
    codes: Mutex<Vec<DiscountCodeRecord>>,
    /// `code_exists` reports a hit this many more times.
    phantom_hits: Mutex<u32>,
    /// `insert_discount_code` reports a collision this many more times.
    insert_collisions: Mutex<u32>,
    /// Every call fails with this code when set.
    failure: Option<ErrorCode>,
    generated: Mutex<Vec<DiscountCode>>,
}

impl MockDiscountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(code: ErrorCode) -> Self {
        Self {
            failure: Some(code),
            ..Self::default()
        }
    }

    pub fn with_phantom_hits(self, hits: u32) -> Self {
        *self.phantom_hits.lock().unwrap() = hits;
        self
    }

    pub fn with_insert_collisions(self, collisions: u32) -> Self {
        *self.insert_collisions.lock().unwrap() = collisions;
        self
    }

    pub fn with_record(self, record: DiscountCodeRecord) -> Self {
        self.codes.lock().unwrap().push(record);
        self
    }

    pub fn consultations(&self) -> Vec<Consultation> {
        self.consultations.lock().unwrap().clone()
    }

    pub fn codes(&self) -> Vec<DiscountCodeRecord> {
        self.codes.lock().unwrap().clone()
    }

    /// Candidates seen by `code_exists`, in order.
    pub fn candidates(&self) -> Vec<DiscountCode> {
        self.generated.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), DomainError> {
        match self.failure {
            Some(code) => Err(DomainError::new(code, "store unavailable")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DiscountStore for MockDiscountStore {
    async fn insert_consultation(
        &self,
        consultation: NewConsultation,
    ) -> Result<Consultation, DomainError> {
        self.check()?;
        let mut consultations = self.consultations.lock().unwrap();
        if consultations
            .iter()
            .any(|c| c.payment_session_id == consultation.payment_session_id)
        {
            return Err(DomainError::new(ErrorCode::PaymentSessionTaken, "session taken"));
        }
        let created =
            Consultation::from_new(ConsultationId::new(), consultation, Timestamp::now());
        consultations.push(created.clone());
        Ok(created)
    }

    async fn code_exists(&self, code: &DiscountCode) -> Result<bool, DomainError> {
        self.check()?;
        self.generated.lock().unwrap().push(code.clone());
        let mut hits = self.phantom_hits.lock().unwrap();
        if *hits > 0 {
            *hits -= 1;
            return Ok(true);
        }
        Ok(self.codes.lock().unwrap().iter().any(|r| r.code() == code))
    }

    async fn insert_discount_code(&self, record: &DiscountCodeRecord) -> Result<(), DomainError> {
        self.check()?;
        let mut collisions = self.insert_collisions.lock().unwrap();
        if *collisions > 0 {
            *collisions -= 1;
            return Err(DomainError::new(ErrorCode::DiscountCodeTaken, "code taken"));
        }
        let mut codes = self.codes.lock().unwrap();
        if codes.iter().any(|r| r.code() == record.code()) {
            return Err(DomainError::new(ErrorCode::DiscountCodeTaken, "code taken"));
        }
        if codes
            .iter()
            .any(|r| r.consultation_id() == record.consultation_id())
        {
            return Err(DomainError::new(ErrorCode::CodeAlreadyIssued, "already issued"));
        }
        codes.push(record.clone());
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &DiscountCode,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        self.check()?;
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.code() == code)
            .cloned())
    }

    async fn mark_used_if_unused(
        &self,
        code: &DiscountCode,
        order_id: Option<&str>,
        at: Timestamp,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        self.check()?;
        let mut codes = self.codes.lock().unwrap();
        let Some(record) = codes.iter_mut().find(|r| r.code() == code) else {
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
        self.check()?;
        Ok(self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.payment_session_id == payment_session_id)
            .cloned())
    }

    async fn find_code_for_consultation(
        &self,
        consultation_id: &ConsultationId,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        self.check()?;
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.consultation_id() == consultation_id)
            .cloned())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MockNotificationSender
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockNotificationSender {
    sent: Mutex<Vec<ConsultationConfirmation>>,
    fail: bool,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<ConsultationConfirmation> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_consultation_confirmation(
        &self,
        confirmation: &ConsultationConfirmation,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                "provider rejected message",
            ));
        }
        self.sent.lock().unwrap().push(confirmation.clone());
        Ok(())
    }
}
