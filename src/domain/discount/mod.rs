//! Discount module - single-use codes issued for paid consultations.
//!
//! A code becomes redeemable at the consultation slot and stays redeemable
//! for [`VALIDITY_WINDOW_HOURS`], until it is used once.

mod code;
mod errors;
mod outcome;
mod policy;
mod record;

pub use code::{DiscountCode, CODE_ALPHABET, CODE_PREFIX, CODE_SUFFIX_LEN};
pub use errors::DiscountError;
pub use outcome::{RedemptionRejection, ValidationRejection};
pub use policy::DiscountPolicy;
pub use record::{DiscountCodeRecord, Redeemability, Redemption, VALIDITY_WINDOW_HOURS};
