//! ProcessPaymentWebhookHandler - Command handler for consultation payment webhooks.
//!
//! Turns a verified, paid `checkout.session.completed` (or a later
//! `checkout.session.async_payment_succeeded`) delivery into a recorded
//! consultation, one discount code, and a best-effort confirmation email.
//! Redeliveries of the same checkout session reuse what was already stored.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::consultation::{Consultation, NewConsultation};
use crate::domain::discount::{DiscountCode, DiscountCodeRecord, DiscountError, DiscountPolicy};
use crate::domain::foundation::{ConsultationId, ErrorCode, Timestamp};
use crate::domain::payment::{StripeWebhookVerifier, WebhookError};
use crate::ports::{ConsultationConfirmation, DiscountStore, NotificationSender};

/// Command to process a payment webhook delivery.
#[derive(Debug, Clone)]
pub struct ProcessPaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessPaymentWebhookResult {
    /// Consultation recorded and a new code issued.
    Issued {
        consultation_id: ConsultationId,
        discount_code: DiscountCode,
        notified: bool,
    },
    /// The checkout session was processed before; nothing new was written.
    AlreadyIssued {
        consultation_id: ConsultationId,
        discount_code: DiscountCode,
    },
    /// Event acknowledged but not relevant to consultations.
    Ignored { reason: String },
}

impl ProcessPaymentWebhookResult {
    fn ignored(reason: impl Into<String>) -> Self {
        Self::Ignored {
            reason: reason.into(),
        }
    }
}

enum Issuance {
    Fresh(DiscountCodeRecord),
    Existing(DiscountCodeRecord),
}

/// Handler for consultation payment webhooks.
pub struct ProcessPaymentWebhookHandler {
    store: Arc<dyn DiscountStore>,
    notifier: Arc<dyn NotificationSender>,
    verifier: Arc<StripeWebhookVerifier>,
    policy: DiscountPolicy,
}

impl ProcessPaymentWebhookHandler {
    pub fn new(
        store: Arc<dyn DiscountStore>,
        notifier: Arc<dyn NotificationSender>,
        verifier: Arc<StripeWebhookVerifier>,
        policy: DiscountPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            verifier,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessPaymentWebhookCommand,
    ) -> Result<ProcessPaymentWebhookResult, DiscountError> {
        // 1. Verify signature and parse event
        let event = match self.verifier.verify_and_parse(&cmd.payload, &cmd.signature) {
            Ok(event) => event,
            Err(WebhookError::Ignored(reason)) => {
                info!(%reason, "Webhook acknowledged without processing");
                return Ok(ProcessPaymentWebhookResult::ignored(reason));
            }
            Err(e) => {
                warn!(error = %e, "Rejected webhook delivery");
                return Err(e.into());
            }
        };

        // 2. Filter to paid consultation checkouts
        if !event.parsed_type().confirms_checkout_payment() {
            debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring event type");
            return Ok(ProcessPaymentWebhookResult::ignored(format!(
                "unhandled event type {}",
                event.event_type
            )));
        }

        let session = event.checkout_session()?;
        if !session.is_consultation() {
            debug!(event_id = %event.id, purpose = ?session.purpose(), "Ignoring non-consultation checkout");
            return Ok(ProcessPaymentWebhookResult::ignored(
                "checkout is not a consultation",
            ));
        }
        if !session.is_paid() {
            info!(event_id = %event.id, session_id = %session.id, "Ignoring unpaid consultation checkout");
            return Ok(ProcessPaymentWebhookResult::ignored("checkout is not paid"));
        }

        // 3. Extract the booking
        let request = session.consultation_request().map_err(|e| {
            warn!(event_id = %event.id, error = %e, "Consultation checkout missing booking data");
            DiscountError::from(e)
        })?;

        // 4-5. Record the consultation once per checkout session
        let consultation = match self.store.find_consultation_by_session(&session.id).await? {
            Some(existing) => {
                info!(event_id = %event.id, consultation_id = %existing.id, "Checkout session already recorded");
                existing
            }
            None => self.record_consultation(request).await?,
        };

        // 6. Issue the code, unless a previous delivery already did
        let record = match self.store.find_code_for_consultation(&consultation.id).await? {
            Some(existing) => Issuance::Existing(existing),
            None => self.issue_code(&consultation).await?,
        };

        let record = match record {
            Issuance::Existing(existing) => {
                info!(
                    consultation_id = %consultation.id,
                    code = %existing.code(),
                    "Discount code already issued, skipping notification"
                );
                return Ok(ProcessPaymentWebhookResult::AlreadyIssued {
                    consultation_id: consultation.id,
                    discount_code: existing.code().clone(),
                });
            }
            Issuance::Fresh(record) => record,
        };

        info!(
            event_id = %event.id,
            consultation_id = %consultation.id,
            code = %record.code(),
            activates_at = %record.activates_at(),
            "Discount code issued"
        );

        // 7. Notify, best effort
        let notified = self.notify(&consultation, &record).await;

        Ok(ProcessPaymentWebhookResult::Issued {
            consultation_id: consultation.id,
            discount_code: record.code().clone(),
            notified,
        })
    }

    async fn record_consultation(
        &self,
        request: NewConsultation,
    ) -> Result<Consultation, DiscountError> {
        let session_id = request.payment_session_id.clone();
        match self.store.insert_consultation(request).await {
            Ok(consultation) => Ok(consultation),
            Err(e) if e.code == ErrorCode::PaymentSessionTaken => {
                // A concurrent delivery won the insert.
                let winner = self.store.find_consultation_by_session(&session_id).await?;
                winner.ok_or_else(|| DiscountError::Persistence(e))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Generates candidates until one is stored, up to the policy bound.
    async fn issue_code(&self, consultation: &Consultation) -> Result<Issuance, DiscountError> {
        let attempts = self.policy.max_generation_attempts;
        for attempt in 1..=attempts {
            let code = DiscountCode::generate();
            if self.store.code_exists(&code).await? {
                debug!(attempt, "Generated code already exists, retrying");
                continue;
            }

            let record = DiscountCodeRecord::issue(
                code,
                consultation.id,
                self.policy.amount_cents,
                consultation.consultation_date,
                Timestamp::now(),
            );

            match self.store.insert_discount_code(&record).await {
                Ok(()) => return Ok(Issuance::Fresh(record)),
                Err(e) if e.code == ErrorCode::DiscountCodeTaken => {
                    debug!(attempt, "Generated code collided on insert, retrying");
                }
                Err(e) if e.code == ErrorCode::CodeAlreadyIssued => {
                    let existing = self
                        .store
                        .find_code_for_consultation(&consultation.id)
                        .await?;
                    return existing
                        .map(Issuance::Existing)
                        .ok_or_else(|| DiscountError::Persistence(e));
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(
            consultation_id = %consultation.id,
            attempts,
            "Exhausted discount code generation attempts"
        );
        Err(DiscountError::CodeCollisionExhausted { attempts })
    }

    async fn notify(&self, consultation: &Consultation, record: &DiscountCodeRecord) -> bool {
        let confirmation = ConsultationConfirmation {
            to_email: consultation.customer_email.clone(),
            customer_name: consultation.customer_name.clone(),
            consultation_date: consultation.consultation_date,
            discount_code: record.code().to_string(),
            discount_amount: self.policy.display_amount(),
            valid_from: record.activates_at(),
            valid_until: record.expires_at(),
        };

        match self.notifier.send_consultation_confirmation(&confirmation).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    consultation_id = %consultation.id,
                    error = %e,
                    "Confirmation email failed, code remains valid"
                );
                false
            }
        }
    }
}
