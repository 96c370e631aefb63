use crate::domain::booking::{Booking, BookingFilter, BookingOrder};
use crate::scoring::model_handle::TrainingSource;
use crate::scoring::types::{
    MonetaryLevel, PriorityInputs, PriorityRecord, PrioritySegment, UrgencyLevel,
};
use crate::segmentation::TransactionRecord;
use anyhow::{anyhow, Result};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "booking_id, customer_id, service_type_id, price_locked, status, event_date, party_size, \
     priority_score, priority_segment, urgency_level, monetary_level, scored_at, created_at, updated_at";

#[derive(Clone)]
pub struct BookingsRepo {
    pub pool: PgPool,
}

impl BookingsRepo {
    pub async fn insert_tx(tx: &mut Transaction<'_, Postgres>, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                booking_id, customer_id, service_type_id, price_locked, status, event_date, party_size,
                priority_score, priority_segment, urgency_level, monetary_level, scored_at,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11, $12,
                $13, $14
            )
            "#,
        )
        .bind(booking.booking_id)
        .bind(booking.customer_id)
        .bind(booking.service_type_id)
        .bind(booking.price_locked)
        .bind(&booking.status)
        .bind(booking.event_date)
        .bind(booking.party_size)
        .bind(booking.priority.priority_score)
        .bind(booking.priority.priority_segment.as_str())
        .bind(booking.priority.urgency_level.as_str())
        .bind(booking.priority.monetary_level.as_str())
        .bind(booking.priority.scored_at)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn lock_by_id_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: Uuid,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1 FOR UPDATE"
        ))
        .bind(booking_id)
        .fetch_optional(tx.as_mut())
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    /// Writes the status together with every priority field; the price
    /// lock is never rewritten.
    pub async fn update_status_and_priority_tx(
        tx: &mut Transaction<'_, Postgres>,
        booking: &Booking,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2,
                priority_score = $3,
                priority_segment = $4,
                urgency_level = $5,
                monetary_level = $6,
                scored_at = $7,
                updated_at = $8
            WHERE booking_id = $1
            "#,
        )
        .bind(booking.booking_id)
        .bind(&booking.status)
        .bind(booking.priority.priority_score)
        .bind(booking.priority.priority_segment.as_str())
        .bind(booking.priority.urgency_level.as_str())
        .bind(booking.priority.monetary_level.as_str())
        .bind(booking.priority.scored_at)
        .bind(booking.updated_at)
        .execute(tx.as_mut())
        .await?;

        Ok(())
    }

    pub async fn find(&self, booking_id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = $1"))
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    pub async fn list(&self, customer_id: Option<i64>, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let order = match filter.order {
            BookingOrder::PriorityScoreDesc => "priority_score DESC, created_at DESC",
            BookingOrder::Newest => "created_at DESC",
        };
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE ($1::BIGINT IS NULL OR customer_id = $1) \
               AND ($2::TEXT IS NULL OR priority_segment = $2) \
             ORDER BY {order}"
        );

        let rows = sqlx::query(&sql)
            .bind(customer_id)
            .bind(filter.segment.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(booking_from_row).collect()
    }

    /// Point-in-time read of every booking joined with its customer, for
    /// RFM extraction. Not isolated from concurrent writes.
    pub async fn list_transaction_history(&self) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT b.customer_id, c.name AS customer_name, b.created_at, b.price_locked
            FROM bookings b
            JOIN customers c ON c.customer_id = b.customer_id
            ORDER BY b.customer_id ASC, b.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TransactionRecord {
                customer_id: r.get("customer_id"),
                customer_name: r.get("customer_name"),
                booked_at: r.get("created_at"),
                price_locked: r.get("price_locked"),
            })
            .collect())
    }

    pub async fn list_priority_inputs(&self) -> Result<Vec<PriorityInputs>> {
        let rows = sqlx::query(
            r#"
            SELECT GREATEST(0, EXTRACT(DAY FROM (event_date - created_at)))::BIGINT AS days_until_event,
                   status, price_locked, party_size
            FROM bookings
            ORDER BY created_at ASC, booking_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PriorityInputs {
                days_until_event: r.get("days_until_event"),
                status: r.get("status"),
                price_locked: r.get("price_locked"),
                party_size: r.get("party_size"),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl TrainingSource for BookingsRepo {
    async fn training_samples(&self) -> Result<Vec<PriorityInputs>> {
        self.list_priority_inputs().await
    }
}

fn booking_from_row(r: &PgRow) -> Result<Booking> {
    let segment: String = r.get("priority_segment");
    let urgency: String = r.get("urgency_level");
    let monetary: String = r.get("monetary_level");

    Ok(Booking {
        booking_id: r.get("booking_id"),
        customer_id: r.get("customer_id"),
        service_type_id: r.get("service_type_id"),
        price_locked: r.get("price_locked"),
        status: r.get("status"),
        event_date: r.get("event_date"),
        party_size: r.get("party_size"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
        priority: PriorityRecord {
            priority_score: r.get("priority_score"),
            priority_segment: PrioritySegment::parse(&segment)
                .ok_or_else(|| anyhow!("unknown priority_segment in row: {segment}"))?,
            urgency_level: UrgencyLevel::parse(&urgency)
                .ok_or_else(|| anyhow!("unknown urgency_level in row: {urgency}"))?,
            monetary_level: MonetaryLevel::parse(&monetary)
                .ok_or_else(|| anyhow!("unknown monetary_level in row: {monetary}"))?,
            scored_at: r.get("scored_at"),
        },
    })
}
