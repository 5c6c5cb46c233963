//! Business-rule rejections for validation and redemption.
//!
//! These are normal outcomes, not errors: they travel back to the caller with
//! a success transport status and a `valid: false` / `success: false` flag.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

use super::Redeemability;

/// Why a code failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationRejection {
    UnknownCode,
    AlreadyUsed,
    NotYetActive { activates_at: Timestamp },
    Expired { expired_at: Timestamp },
}

impl ValidationRejection {
    /// Maps a non-redeemable state to its rejection. `None` when redeemable.
    pub fn from_redeemability(state: Redeemability) -> Option<Self> {
        match state {
            Redeemability::Redeemable => None,
            Redeemability::AlreadyUsed => Some(Self::AlreadyUsed),
            Redeemability::NotYetActive { activates_at } => {
                Some(Self::NotYetActive { activates_at })
            }
            Redeemability::Expired { expired_at } => Some(Self::Expired { expired_at }),
        }
    }

    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCode => "Unknown discount code",
            Self::AlreadyUsed => "Discount code has already been used",
            Self::NotYetActive { .. } => "Discount code is not active yet",
            Self::Expired { .. } => "Discount code has expired",
        }
    }

    /// Activation time to show the customer, if the code is merely early.
    pub fn activates_at(&self) -> Option<Timestamp> {
        match self {
            Self::NotYetActive { activates_at } => Some(*activates_at),
            _ => None,
        }
    }
}

/// Why a redemption did not happen.
///
/// Unknown and already-used codes are deliberately indistinguishable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionRejection {
    NotFoundOrAlreadyUsed,
}

impl RedemptionRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFoundOrAlreadyUsed => "Discount code not found or already used",
        }
    }
}
