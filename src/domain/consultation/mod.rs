//! Consultation module - paid bookings that own a discount code.

#[allow(clippy::module_inception)]
mod consultation;
mod status;

pub use consultation::{Consultation, NewConsultation};
pub use status::ConsultationStatus;

#[cfg(test)]
pub(crate) use consultation::sample_new_consultation;
