//! PostgreSQL implementation of DiscountStore.
//!
//! Every statement runs under a bounded timeout. Unique constraint names are
//! mapped to typed conflict codes so callers can retry or resolve races.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::consultation::{Consultation, ConsultationStatus, NewConsultation};
use crate::domain::discount::{DiscountCode, DiscountCodeRecord, Redemption};
use crate::domain::foundation::{ConsultationId, DomainError, ErrorCode, Timestamp};
use crate::ports::DiscountStore;

const DISCOUNT_CODES_PKEY: &str = "discount_codes_pkey";
const DISCOUNT_CODES_CONSULTATION_KEY: &str = "discount_codes_consultation_id_key";
const CONSULTATIONS_SESSION_KEY: &str = "consultations_payment_session_id_key";

/// Columns of a discount code joined with its consultation's slot.
const CODE_COLUMNS: &str = r#"
    d.code, d.consultation_id, d.amount_cents, c.consultation_date AS activates_at,
    d.used, d.used_at, d.used_order_id, d.created_at
"#;

/// PostgreSQL implementation of the DiscountStore port.
pub struct PostgresDiscountStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresDiscountStore {
    /// Creates a store over `pool`; each statement is bounded by `query_timeout`.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(|e| map_sqlx_error(operation, e)),
            Err(_) => Err(DomainError::new(
                ErrorCode::StoreTimeout,
                format!("Timed out after {:?} trying to {}", self.query_timeout, operation),
            )),
        }
    }
}

fn map_sqlx_error(operation: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some(DISCOUNT_CODES_PKEY) => {
                return DomainError::new(ErrorCode::DiscountCodeTaken, "Discount code already exists")
            }
            Some(DISCOUNT_CODES_CONSULTATION_KEY) => {
                return DomainError::new(
                    ErrorCode::CodeAlreadyIssued,
                    "Consultation already has a discount code",
                )
            }
            Some(CONSULTATIONS_SESSION_KEY) => {
                return DomainError::new(
                    ErrorCode::PaymentSessionTaken,
                    "Consultation already recorded for payment session",
                )
            }
            _ => {}
        }
    }
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", operation, e))
}

/// Database row representation of a consultation.
#[derive(Debug, sqlx::FromRow)]
struct ConsultationRow {
    id: Uuid,
    customer_name: String,
    customer_email: String,
    customer_phone: Option<String>,
    consultation_date: DateTime<Utc>,
    hair_type: String,
    concerns: String,
    payment_intent_id: Option<String>,
    payment_session_id: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ConsultationRow> for Consultation {
    type Error = DomainError;

    fn try_from(row: ConsultationRow) -> Result<Self, Self::Error> {
        let status = ConsultationStatus::parse(&row.status).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid status value: {}", e))
        })?;

        Ok(Consultation {
            id: ConsultationId::from_uuid(row.id),
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            consultation_date: Timestamp::from_datetime(row.consultation_date),
            hair_type: row.hair_type,
            concerns: row.concerns,
            payment_intent_id: row.payment_intent_id,
            payment_session_id: row.payment_session_id,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// Database row representation of a discount code.
#[derive(Debug, sqlx::FromRow)]
struct DiscountCodeRow {
    code: String,
    consultation_id: Uuid,
    amount_cents: i64,
    activates_at: DateTime<Utc>,
    used: bool,
    used_at: Option<DateTime<Utc>>,
    used_order_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DiscountCodeRow> for DiscountCodeRecord {
    fn from(row: DiscountCodeRow) -> Self {
        let redemption = row.used.then(|| Redemption {
            used_at: Timestamp::from_datetime(row.used_at.unwrap_or(row.created_at)),
            order_id: row.used_order_id,
        });

        DiscountCodeRecord::from_parts(
            DiscountCode::from_persisted(row.code),
            ConsultationId::from_uuid(row.consultation_id),
            row.amount_cents,
            Timestamp::from_datetime(row.activates_at),
            redemption,
            Timestamp::from_datetime(row.created_at),
        )
    }
}

#[async_trait]
impl DiscountStore for PostgresDiscountStore {
    async fn insert_consultation(
        &self,
        consultation: NewConsultation,
    ) -> Result<Consultation, DomainError> {
        let consultation =
            Consultation::from_new(ConsultationId::new(), consultation, Timestamp::now());

        self.bounded(
            "insert consultation",
            sqlx::query(
                r#"
                INSERT INTO consultations (
                    id, customer_name, customer_email, customer_phone, consultation_date,
                    hair_type, concerns, payment_intent_id, payment_session_id, status, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(consultation.id.as_uuid())
            .bind(&consultation.customer_name)
            .bind(&consultation.customer_email)
            .bind(&consultation.customer_phone)
            .bind(consultation.consultation_date.as_datetime())
            .bind(&consultation.hair_type)
            .bind(&consultation.concerns)
            .bind(&consultation.payment_intent_id)
            .bind(&consultation.payment_session_id)
            .bind(consultation.status.as_str())
            .bind(consultation.created_at.as_datetime())
            .execute(&self.pool),
        )
        .await?;

        Ok(consultation)
    }

    async fn code_exists(&self, code: &DiscountCode) -> Result<bool, DomainError> {
        self.bounded(
            "check discount code",
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM discount_codes WHERE code = $1)",
            )
            .bind(code.as_str())
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn insert_discount_code(&self, record: &DiscountCodeRecord) -> Result<(), DomainError> {
        self.bounded(
            "insert discount code",
            sqlx::query(
                r#"
                INSERT INTO discount_codes (
                    code, consultation_id, amount_cents, activates_at, expires_at,
                    used, used_at, used_order_id, created_at
                ) VALUES ($1, $2, $3, $4, $5, FALSE, NULL, NULL, $6)
                "#,
            )
            .bind(record.code().as_str())
            .bind(record.consultation_id().as_uuid())
            .bind(record.amount_cents())
            .bind(record.activates_at().as_datetime())
            .bind(record.expires_at().as_datetime())
            .bind(record.created_at().as_datetime())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &DiscountCode,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM discount_codes d JOIN consultations c ON c.id = d.consultation_id WHERE d.code = $1",
            CODE_COLUMNS
        );
        let row: Option<DiscountCodeRow> = self
            .bounded(
                "find discount code",
                sqlx::query_as(&sql).bind(code.as_str()).fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(DiscountCodeRecord::from))
    }

    async fn mark_used_if_unused(
        &self,
        code: &DiscountCode,
        order_id: Option<&str>,
        at: Timestamp,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        let row: Option<DiscountCodeRow> = self
            .bounded(
                "redeem discount code",
                sqlx::query_as(
                    r#"
                    WITH d AS (
                        UPDATE discount_codes
                        SET used = TRUE, used_at = $2, used_order_id = $3
                        WHERE code = $1 AND used = FALSE
                        RETURNING code, consultation_id, amount_cents, used, used_at,
                                  used_order_id, created_at
                    )
                    SELECT d.code, d.consultation_id, d.amount_cents,
                           c.consultation_date AS activates_at,
                           d.used, d.used_at, d.used_order_id, d.created_at
                    FROM d JOIN consultations c ON c.id = d.consultation_id
                    "#,
                )
                .bind(code.as_str())
                .bind(at.as_datetime())
                .bind(order_id)
                .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(DiscountCodeRecord::from))
    }

    async fn find_consultation_by_session(
        &self,
        payment_session_id: &str,
    ) -> Result<Option<Consultation>, DomainError> {
        let row: Option<ConsultationRow> = self
            .bounded(
                "find consultation",
                sqlx::query_as(
                    r#"
                    SELECT id, customer_name, customer_email, customer_phone, consultation_date,
                           hair_type, concerns, payment_intent_id, payment_session_id, status,
                           created_at
                    FROM consultations
                    WHERE payment_session_id = $1
                    "#,
                )
                .bind(payment_session_id)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(Consultation::try_from).transpose()
    }

    async fn find_code_for_consultation(
        &self,
        consultation_id: &ConsultationId,
    ) -> Result<Option<DiscountCodeRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM discount_codes d JOIN consultations c ON c.id = d.consultation_id WHERE d.consultation_id = $1",
            CODE_COLUMNS
        );
        let row: Option<DiscountCodeRow> = self
            .bounded(
                "find consultation discount code",
                sqlx::query_as(&sql)
                    .bind(consultation_id.as_uuid())
                    .fetch_optional(&self.pool),
            )
            .await?;

        Ok(row.map(DiscountCodeRecord::from))
    }
}
