//! Needs a live Postgres: `DATABASE_URL=... cargo test -- --ignored`.

use beauty_bookings::domain::booking::CreateBookingRequest;
use beauty_bookings::domain::catalog::{CreatePackageRequest, CreateServiceTypeRequest};
use beauty_bookings::repo::bookings_repo::BookingsRepo;
use beauty_bookings::repo::catalog_repo::CatalogRepo;
use beauty_bookings::scoring::PriorityScorer;
use beauty_bookings::service::booking_service::BookingService;
use beauty_bookings::service::catalog_service::CatalogService;
use beauty_bookings::service::error::ServiceError;
use beauty_bookings::service::notifier::Notifier;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration as StdDuration;

async fn setup() -> anyhow::Result<(PgPool, BookingService, CatalogService)> {
    let url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new().max_connections(8).connect(&url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let (notifier, _rx) = Notifier::channel(64);
    let service = BookingService {
        pool: pool.clone(),
        bookings_repo: BookingsRepo { pool: pool.clone() },
        scorer: PriorityScorer::Rules,
        notifier,
        lock_timeout_ms: 2000,
    };
    let catalog = CatalogService {
        catalog_repo: CatalogRepo { pool: pool.clone() },
    };
    Ok((pool, service, catalog))
}

async fn customer(pool: &PgPool, name: &str) -> anyhow::Result<i64> {
    let row = sqlx::query("INSERT INTO customers (name, email) VALUES ($1, $2) RETURNING customer_id")
        .bind(name)
        .bind(format!("{}@example.test", uuid::Uuid::new_v4()))
        .fetch_one(pool)
        .await?;
    Ok(row.get("customer_id"))
}

#[tokio::test]
#[ignore]
async fn booking_waits_for_a_price_change_and_takes_the_new_price() {
    let (pool, service, catalog) = setup().await.unwrap();
    let suffix = uuid::Uuid::new_v4();
    let package = catalog
        .create_package(CreatePackageRequest {
            name: format!("Wedding {suffix}"),
            description: None,
        })
        .await
        .unwrap();
    let service_type = catalog
        .create_service_type(CreateServiceTypeRequest {
            package_id: package.package_id,
            name: "Bridal makeup".to_string(),
            description: None,
            price: Decimal::from(2_000_000),
        })
        .await
        .unwrap();
    let customer_id = customer(&pool, "Price Lock").await.unwrap();

    let service_type_id = service_type.service_type_id;
    let new_price = Decimal::from(2_400_000);

    // hold the row lock with an uncommitted price change
    let mut price_tx = pool.begin().await.unwrap();
    CatalogRepo::lock_service_type_tx(&mut price_tx, service_type_id)
        .await
        .unwrap()
        .unwrap();
    CatalogRepo::update_price_tx(&mut price_tx, service_type_id, new_price)
        .await
        .unwrap();

    let mut booking_call = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .create_booking(
                    customer_id,
                    CreateBookingRequest {
                        service_type_id,
                        event_date: Utc::now() + Duration::days(10),
                        party_size: 2,
                    },
                )
                .await
        })
    };

    let blocked = tokio::time::timeout(StdDuration::from_millis(300), &mut booking_call).await;
    assert!(blocked.is_err(), "booking committed while the price row was locked");

    price_tx.commit().await.unwrap();
    let booking = booking_call.await.unwrap().unwrap();
    assert_eq!(booking.price_locked, new_price);

    // later price changes never touch an existing booking
    service
        .update_service_price(service_type_id, Decimal::from(9_999_999))
        .await
        .unwrap();
    let stored = service.bookings_repo.find(booking.booking_id).await.unwrap().unwrap();
    assert_eq!(stored.price_locked, new_price);
}

#[tokio::test]
#[ignore]
async fn oversized_price_is_a_validation_error() {
    let (_pool, service, catalog) = setup().await.unwrap();
    let package = catalog
        .create_package(CreatePackageRequest {
            name: format!("Gala {}", uuid::Uuid::new_v4()),
            description: None,
        })
        .await
        .unwrap();
    let service_type = catalog
        .create_service_type(CreateServiceTypeRequest {
            package_id: package.package_id,
            name: "Hair".to_string(),
            description: None,
            price: Decimal::new(150_000_050, 2),
        })
        .await
        .unwrap();

    let err = service
        .update_service_price(service_type.service_type_id, Decimal::from(10_000_000_000i64))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let updated = service
        .update_service_price(service_type.service_type_id, Decimal::new(17_500_000_000, 4))
        .await
        .unwrap();
    assert_eq!(updated.price, Decimal::from(1_750_000));
}

#[tokio::test]
#[ignore]
async fn status_change_rescores_and_keeps_the_price() {
    let (pool, service, catalog) = setup().await.unwrap();
    let suffix = uuid::Uuid::new_v4();
    let package = catalog
        .create_package(CreatePackageRequest {
            name: format!("Party {suffix}"),
            description: None,
        })
        .await
        .unwrap();
    let service_type = catalog
        .create_service_type(CreateServiceTypeRequest {
            package_id: package.package_id,
            name: "Group styling".to_string(),
            description: None,
            price: Decimal::from(3_200_000),
        })
        .await
        .unwrap();
    let customer_id = customer(&pool, "Rescore").await.unwrap();

    let created = service
        .create_booking(
            customer_id,
            CreateBookingRequest {
                service_type_id: service_type.service_type_id,
                event_date: Utc::now() + Duration::days(1),
                party_size: 4,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.priority.priority_score, 40 + 5 + 30 + 15);

    let paid = service.update_status(created.booking_id, "paid").await.unwrap();
    assert_eq!(paid.priority.priority_score, 40 + 30 + 30 + 15);
    assert_eq!(paid.price_locked, created.price_locked);
}

#[tokio::test]
#[ignore]
async fn missing_rows_are_not_found() {
    let (_pool, service, _catalog) = setup().await.unwrap();
    let err = service
        .update_status(uuid::Uuid::new_v4(), "paid")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = service
        .create_booking(
            1,
            CreateBookingRequest {
                service_type_id: i64::MAX,
                event_date: Utc::now(),
                party_size: 1,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
