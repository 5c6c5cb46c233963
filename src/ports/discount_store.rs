//! Discount store port.
//!
//! Persists consultations and the discount codes issued for them.
//!
//! # Design
//!
//! - **Uniqueness in the store**: code and payment session uniqueness are
//!   enforced by the backend and reported as typed conflicts
//! - **Atomic redemption**: `mark_used_if_unused` is a single conditional
//!   write, never a read followed by a write
//! - **Bounded**: implementations must not block indefinitely
//!
//! # Example
//!
//! ```ignore
//! async fn redeem(store: &dyn DiscountStore, code: &DiscountCode) -> Result<bool, DomainError> {
//!     let redeemed = store
//!         .mark_used_if_unused(code, Some("order-1"), Timestamp::now())
//!         .await?;
//!     Ok(redeemed.is_some())
//! }
//! ```

use async_trait::async_trait;

use crate::domain::consultation::{Consultation, NewConsultation};
use crate::domain::discount::{DiscountCode, DiscountCodeRecord};
use crate::domain::foundation::{ConsultationId, DomainError, Timestamp};

/// Storage port for consultations and their discount codes.
#[async_trait]
pub trait DiscountStore: Send + Sync {
    /// Records a paid consultation and assigns its id.
    ///
    /// # Errors
    ///
    /// - `PaymentSessionTaken` if the session was already recorded
    /// - `DatabaseError` / `StoreTimeout` on persistence failure
    async fn insert_consultation(
        &self,
        consultation: NewConsultation,
    ) -> Result<Consultation, DomainError>;

    /// Returns true if the code is already stored.
    async fn code_exists(&self, code: &DiscountCode) -> Result<bool, DomainError>;

    /// Stores a freshly issued code.
    ///
    /// # Errors
    ///
    /// - `DiscountCodeTaken` if the code collides with an existing one
    /// - `CodeAlreadyIssued` if the consultation already owns a code
    /// - `DatabaseError` / `StoreTimeout` on persistence failure
    async fn insert_discount_code(&self, record: &DiscountCodeRecord) -> Result<(), DomainError>;

    /// Looks up a code by exact (normalized) value.
    async fn find_by_code(
        &self,
        code: &DiscountCode,
    ) -> Result<Option<DiscountCodeRecord>, DomainError>;

    /// Marks the code used if, and only if, it exists and is unused.
    ///
    /// Returns the updated record, or `None` when the code is unknown or
    /// already used. Of any number of concurrent calls for one code, at most
    /// one returns `Some`.
    async fn mark_used_if_unused(
        &self,
        code: &DiscountCode,
        order_id: Option<&str>,
        at: Timestamp,
    ) -> Result<Option<DiscountCodeRecord>, DomainError>;

    /// Finds the consultation recorded for a checkout session.
    async fn find_consultation_by_session(
        &self,
        payment_session_id: &str,
    ) -> Result<Option<Consultation>, DomainError>;

    /// Finds the code issued for a consultation, if any.
    async fn find_code_for_consultation(
        &self,
        consultation_id: &ConsultationId,
    ) -> Result<Option<DiscountCodeRecord>, DomainError>;
}
