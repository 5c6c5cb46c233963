//! Consultation Discounts - Paid consultation webhooks and single-use discount codes
//!
//! When a hair consultation is paid through Stripe Checkout, this crate records
//! the booking, issues a `HAIR-XXXXXX` code valid for 48 hours from the
//! consultation time, and emails it to the customer. The storefront checkout
//! validates and redeems codes over HTTP.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
