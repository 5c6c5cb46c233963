//! Discount code record issued to a paid consultation.
//!
//! The expiry is always derived from the activation time; there is no way
//! to construct a record with an independently chosen expiry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConsultationId, Timestamp};

use super::DiscountCode;

/// Hours a code stays redeemable after the consultation starts.
pub const VALIDITY_WINDOW_HOURS: i64 = 48;

/// When and against which order a code was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    pub used_at: Timestamp,
    pub order_id: Option<String>,
}

/// Redeemability of a code at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redeemability {
    Redeemable,
    AlreadyUsed,
    NotYetActive { activates_at: Timestamp },
    Expired { expired_at: Timestamp },
}

/// A persisted discount code and its usage state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountCodeRecord {
    code: DiscountCode,
    consultation_id: ConsultationId,
    amount_cents: i64,
    activates_at: Timestamp,
    expires_at: Timestamp,
    redemption: Option<Redemption>,
    created_at: Timestamp,
}

impl DiscountCodeRecord {
    /// Issues a fresh, unused code active from `activates_at`.
    pub fn issue(
        code: DiscountCode,
        consultation_id: ConsultationId,
        amount_cents: i64,
        activates_at: Timestamp,
        created_at: Timestamp,
    ) -> Self {
        Self::from_parts(code, consultation_id, amount_cents, activates_at, None, created_at)
    }

    /// Rebuilds a record from storage. The expiry is recomputed.
    pub fn from_parts(
        code: DiscountCode,
        consultation_id: ConsultationId,
        amount_cents: i64,
        activates_at: Timestamp,
        redemption: Option<Redemption>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            code,
            consultation_id,
            amount_cents,
            activates_at,
            expires_at: activates_at.plus_hours(VALIDITY_WINDOW_HOURS),
            redemption,
            created_at,
        }
    }

    pub fn code(&self) -> &DiscountCode {
        &self.code
    }

    pub fn consultation_id(&self) -> ConsultationId {
        self.consultation_id
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn activates_at(&self) -> Timestamp {
        self.activates_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn redemption(&self) -> Option<&Redemption> {
        self.redemption.as_ref()
    }

    pub fn is_used(&self) -> bool {
        self.redemption.is_some()
    }

    /// Classifies the code at `at`. Both window bounds are inclusive.
    pub fn redeemability(&self, at: &Timestamp) -> Redeemability {
        if self.is_used() {
            Redeemability::AlreadyUsed
        } else if at.is_before(&self.activates_at) {
            Redeemability::NotYetActive {
                activates_at: self.activates_at,
            }
        } else if at.is_after(&self.expires_at) {
            Redeemability::Expired {
                expired_at: self.expires_at,
            }
        } else {
            Redeemability::Redeemable
        }
    }

    pub fn is_redeemable(&self, at: &Timestamp) -> bool {
        self.redeemability(at) == Redeemability::Redeemable
    }

    /// Marks the code used. Returns false, leaving the record untouched,
    /// if it was already used.
    pub fn mark_used(&mut self, order_id: Option<String>, at: Timestamp) -> bool {
        if self.is_used() {
            return false;
        }
        self.redemption = Some(Redemption {
            used_at: at,
            order_id,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> Timestamp {
        Timestamp::parse_rfc3339("at", value).unwrap()
    }

    fn issued_for(activation: &str) -> DiscountCodeRecord {
        DiscountCodeRecord::issue(
            DiscountCode::from_persisted("HAIR-AB23CD"),
            ConsultationId::new(),
            5000,
            at(activation),
            at("2025-01-01T00:00:00Z"),
        )
    }

    #[test]
    fn expiry_is_activation_plus_48_hours() {
        let record = issued_for("2025-01-10T10:00:00Z");
        assert_eq!(record.expires_at(), at("2025-01-12T10:00:00Z"));
    }

    #[test]
    fn rebuilt_record_recomputes_expiry() {
        let record = DiscountCodeRecord::from_parts(
            DiscountCode::from_persisted("HAIR-AB23CD"),
            ConsultationId::new(),
            5000,
            at("2025-03-01T08:30:00Z"),
            None,
            at("2025-02-01T00:00:00Z"),
        );
        assert_eq!(record.expires_at(), at("2025-03-03T08:30:00Z"));
    }

    #[test]
    fn new_records_are_unused() {
        let record = issued_for("2025-01-10T10:00:00Z");
        assert!(!record.is_used());
        assert!(record.redemption().is_none());
    }

    // ══════════════════════════════════════════════════════════════
    // Window Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn before_activation_is_not_yet_active() {
        let record = issued_for("2025-01-10T10:00:00Z");
        assert_eq!(
            record.redeemability(&at("2025-01-10T09:00:00Z")),
            Redeemability::NotYetActive {
                activates_at: at("2025-01-10T10:00:00Z")
            }
        );
    }

    #[test]
    fn inside_window_is_redeemable() {
        let record = issued_for("2025-01-10T10:00:00Z");
        assert!(record.is_redeemable(&at("2025-01-11T00:00:00Z")));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let record = issued_for("2025-01-10T10:00:00Z");
        assert!(record.is_redeemable(&at("2025-01-10T10:00:00Z")));
        assert!(record.is_redeemable(&at("2025-01-12T10:00:00Z")));
    }

    #[test]
    fn after_expiry_is_expired() {
        let record = issued_for("2025-01-10T10:00:00Z");
        assert_eq!(
            record.redeemability(&at("2025-01-13T00:00:00Z")),
            Redeemability::Expired {
                expired_at: at("2025-01-12T10:00:00Z")
            }
        );
    }

    #[test]
    fn used_takes_precedence_over_window() {
        let mut record = issued_for("2025-01-10T10:00:00Z");
        record.mark_used(None, at("2025-01-11T00:00:00Z"));

        assert_eq!(
            record.redeemability(&at("2025-01-13T00:00:00Z")),
            Redeemability::AlreadyUsed
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Usage Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn mark_used_records_order_and_time() {
        let mut record = issued_for("2025-01-10T10:00:00Z");

        assert!(record.mark_used(Some("order-42".to_string()), at("2025-01-11T00:00:00Z")));

        let redemption = record.redemption().unwrap();
        assert_eq!(redemption.order_id.as_deref(), Some("order-42"));
        assert_eq!(redemption.used_at, at("2025-01-11T00:00:00Z"));
    }

    #[test]
    fn mark_used_is_one_way() {
        let mut record = issued_for("2025-01-10T10:00:00Z");
        record.mark_used(Some("first".to_string()), at("2025-01-11T00:00:00Z"));

        assert!(!record.mark_used(Some("second".to_string()), at("2025-01-11T01:00:00Z")));
        assert_eq!(
            record.redemption().unwrap().order_id.as_deref(),
            Some("first")
        );
        assert!(record.is_used());
    }
}
