use crate::domain::booking::{
    Booking, BookingFilter, CreateBookingRequest, INITIAL_STATUS, MAX_STATUS_LEN,
};
use crate::domain::catalog::ServiceType;
use crate::repo::bookings_repo::BookingsRepo;
use crate::repo::catalog_repo::CatalogRepo;
use crate::scoring::types::{BookingSnapshot, PriorityInputs, PriorityRecord};
use crate::scoring::PriorityScorer;
use crate::service::catalog_service::validate_price;
use crate::service::error::ServiceError;
use crate::service::notifier::{NotificationEvent, Notifier};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct BookingService {
    pub pool: PgPool,
    pub bookings_repo: BookingsRepo,
    pub scorer: PriorityScorer,
    pub notifier: Notifier,
    pub lock_timeout_ms: u64,
}

impl BookingService {
    /// Locks the service type, snapshots its current price into the new
    /// booking, scores it and commits. Concurrent bookings of the same
    /// service type queue on the row lock.
    pub async fn create_booking(
        &self,
        customer_id: i64,
        req: CreateBookingRequest,
    ) -> Result<Booking, ServiceError> {
        validate_create(&req)?;
        let scorer = self.scorer.prepare().await?;

        let mut tx = self.pool.begin().await.map_err(|e| ServiceError::Internal(e.into()))?;
        self.set_lock_timeout(&mut tx).await?;

        let service_type = CatalogRepo::lock_service_type_tx(&mut tx, req.service_type_id)
            .await
            .map_err(|e| ServiceError::from_db(e, "service type"))?
            .ok_or_else(|| ServiceError::NotFound("service type".to_string()))?;

        let now = Utc::now();
        let snapshot = new_booking_snapshot(&req, service_type.price, now);
        let assessment = scorer.assess(&PriorityInputs::from_snapshot(&snapshot));

        let booking = Booking {
            booking_id: Uuid::new_v4(),
            customer_id,
            service_type_id: service_type.service_type_id,
            price_locked: snapshot.price_locked,
            status: snapshot.status,
            event_date: snapshot.event_date,
            party_size: snapshot.party_size,
            created_at: now,
            updated_at: now,
            priority: PriorityRecord::stamp(assessment, now),
        };

        BookingsRepo::insert_tx(&mut tx, &booking)
            .await
            .map_err(|e| ServiceError::from_db(e, "customer"))?;
        tx.commit().await.map_err(|e| ServiceError::Internal(e.into()))?;

        tracing::info!(
            booking_id = %booking.booking_id,
            service_type_id = booking.service_type_id,
            price_locked = %booking.price_locked,
            priority_score = booking.priority.priority_score,
            strategy = self.scorer.strategy(),
            "booking created"
        );

        self.notifier.enqueue(NotificationEvent::BookingCreated(booking.clone()));
        Ok(booking)
    }

    /// Moves the booking to `status` and recomputes its priority in full.
    pub async fn update_status(&self, booking_id: Uuid, status: &str) -> Result<Booking, ServiceError> {
        let status = validate_status(status)?;
        let scorer = self.scorer.prepare().await?;

        let mut tx = self.pool.begin().await.map_err(|e| ServiceError::Internal(e.into()))?;
        self.set_lock_timeout(&mut tx).await?;

        let stored = BookingsRepo::lock_by_id_tx(&mut tx, booking_id)
            .await
            .map_err(|e| ServiceError::from_db(e, "booking"))?
            .ok_or_else(|| ServiceError::NotFound("booking".to_string()))?;

        let snapshot = BookingSnapshot {
            status: status.clone(),
            ..stored.snapshot()
        };
        let assessment = scorer.assess(&PriorityInputs::from_snapshot(&snapshot));
        let now = Utc::now();
        let updated = stored.rescored(&status, PriorityRecord::stamp(assessment, now), now);

        BookingsRepo::update_status_and_priority_tx(&mut tx, &updated)
            .await
            .map_err(|e| ServiceError::from_db(e, "booking"))?;
        tx.commit().await.map_err(|e| ServiceError::Internal(e.into()))?;

        tracing::info!(
            booking_id = %updated.booking_id,
            from = %stored.status,
            to = %updated.status,
            priority_score = updated.priority.priority_score,
            "booking status updated"
        );

        self.notifier.enqueue(NotificationEvent::BookingUpdated(updated.clone()));
        Ok(updated)
    }

    pub async fn list_bookings(
        &self,
        customer_id: Option<i64>,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, ServiceError> {
        Ok(self.bookings_repo.list(customer_id, filter).await?)
    }

    /// Takes the same row lock as booking creation, so an in-flight booking
    /// commits with either the old price or the new one.
    pub async fn update_service_price(
        &self,
        service_type_id: i64,
        price: Decimal,
    ) -> Result<ServiceType, ServiceError> {
        let price = validate_price(price)?;

        let mut tx = self.pool.begin().await.map_err(|e| ServiceError::Internal(e.into()))?;
        self.set_lock_timeout(&mut tx).await?;

        let current = CatalogRepo::lock_service_type_tx(&mut tx, service_type_id)
            .await
            .map_err(|e| ServiceError::from_db(e, "service type"))?
            .ok_or_else(|| ServiceError::NotFound("service type".to_string()))?;

        CatalogRepo::update_price_tx(&mut tx, service_type_id, price).await?;
        tx.commit().await.map_err(|e| ServiceError::Internal(e.into()))?;

        tracing::info!(service_type_id, old = %current.price, new = %price, "service price changed");
        Ok(ServiceType { price, ..current })
    }

    async fn set_lock_timeout(&self, tx: &mut Transaction<'_, Postgres>) -> Result<(), ServiceError> {
        sqlx::query(&format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout_ms))
            .execute(tx.as_mut())
            .await
            .map_err(|e| ServiceError::Internal(e.into()))?;
        Ok(())
    }
}

pub fn validate_create(req: &CreateBookingRequest) -> Result<(), ServiceError> {
    if req.party_size < 1 {
        return Err(ServiceError::Validation("party_size must be >= 1".to_string()));
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<String, ServiceError> {
    let status = status.trim().to_ascii_lowercase();
    if status.is_empty() {
        return Err(ServiceError::Validation("status must not be empty".to_string()));
    }
    if status.len() > MAX_STATUS_LEN {
        return Err(ServiceError::Validation(format!(
            "status must be at most {MAX_STATUS_LEN} characters"
        )));
    }
    Ok(status)
}

pub fn new_booking_snapshot(
    req: &CreateBookingRequest,
    current_price: Decimal,
    now: DateTime<Utc>,
) -> BookingSnapshot {
    BookingSnapshot {
        event_date: req.event_date,
        created_at: now,
        status: INITIAL_STATUS.to_string(),
        price_locked: current_price,
        party_size: req.party_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_bookings_start_pending_with_the_current_price() {
        let now = Utc::now();
        let req = CreateBookingRequest {
            service_type_id: 2,
            event_date: now + Duration::days(3),
            party_size: 2,
        };
        let snapshot = new_booking_snapshot(&req, Decimal::from(1_200_000), now);
        assert_eq!(snapshot.status, "pending");
        assert_eq!(snapshot.price_locked, Decimal::from(1_200_000));
        assert_eq!(PriorityInputs::from_snapshot(&snapshot).days_until_event, 3);
    }

    #[test]
    fn status_is_normalised_and_bounded() {
        assert_eq!(validate_status(" Paid ").unwrap(), "paid");
        assert!(validate_status("   ").is_err());
        assert!(validate_status(&"x".repeat(21)).is_err());
    }

    #[test]
    fn party_size_must_be_positive() {
        let req = CreateBookingRequest {
            service_type_id: 1,
            event_date: Utc::now(),
            party_size: 0,
        };
        assert!(matches!(validate_create(&req), Err(ServiceError::Validation(_))));
    }
}
