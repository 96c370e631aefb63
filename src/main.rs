use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use axum::Router;
use beauty_bookings::config::{AppConfig, PriorityModelKind};
use beauty_bookings::http::handlers::{bookings, ops, priority, segments, services};
use beauty_bookings::http::middleware::{admin_auth, rate_limit};
use beauty_bookings::notify::broadcast::BroadcastSink;
use beauty_bookings::notify::redis_stream::RedisStreamSink;
use beauty_bookings::notify::webhook::WebhookSink;
use beauty_bookings::notify::EventSink;
use beauty_bookings::repo::bookings_repo::BookingsRepo;
use beauty_bookings::repo::catalog_repo::CatalogRepo;
use beauty_bookings::scoring::model_handle::PriorityModelHandle;
use beauty_bookings::scoring::model_store::ModelStore;
use beauty_bookings::scoring::PriorityScorer;
use beauty_bookings::segmentation::SegmentationLimits;
use beauty_bookings::service::booking_service::BookingService;
use beauty_bookings::service::catalog_service::CatalogService;
use beauty_bookings::service::notifier::{Notifier, NotifierTask};
use beauty_bookings::service::segment_service::SegmentService;
use beauty_bookings::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const BROADCAST_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let bookings_repo = BookingsRepo { pool: pool.clone() };
    let catalog_repo = CatalogRepo { pool: pool.clone() };

    let scorer = match cfg.priority_model {
        PriorityModelKind::Rules => PriorityScorer::Rules,
        PriorityModelKind::Clustered => {
            let store = ModelStore::new(&cfg.redis_url, &cfg.priority_model_key)?;
            let handle = PriorityModelHandle::new(Arc::new(bookings_repo.clone()), Some(store));
            // Bookings answer 503 until a model exists; a later retrain fills it in.
            if let Err(e) = handle.init().await {
                tracing::warn!("priority model not ready at startup: {}", e);
            }
            PriorityScorer::Clustered(handle)
        }
    };
    tracing::info!(strategy = scorer.strategy(), "priority scorer configured");

    let segment_service = SegmentService {
        bookings_repo: bookings_repo.clone(),
        limits: SegmentationLimits { max_k: cfg.segment_max_k },
        default_k: cfg.segment_default_k,
    };

    let broadcast = BroadcastSink::new(BROADCAST_CAPACITY);
    let mut sinks: Vec<Arc<dyn EventSink>> = vec![
        Arc::new(broadcast.clone()),
        Arc::new(RedisStreamSink {
            redis_client: redis_client.clone(),
            stream_key: cfg.stream_key.clone(),
        }),
    ];
    if !cfg.notify_webhook_urls.is_empty() {
        sinks.push(Arc::new(WebhookSink {
            client: reqwest::Client::new(),
            target_urls: cfg.notify_webhook_urls.clone(),
        }));
    }

    let (notifier, rx) = Notifier::channel(cfg.notify_queue_capacity);
    let notifier_task = NotifierTask {
        rx,
        sinks,
        segments: Some(segment_service.clone()),
    };
    tokio::spawn(notifier_task.run());

    let booking_service = BookingService {
        pool: pool.clone(),
        bookings_repo,
        scorer,
        notifier,
        lock_timeout_ms: cfg.lock_timeout_ms,
    };

    let state = AppState {
        booking_service,
        catalog_service: CatalogService { catalog_repo },
        segment_service,
        broadcast,
        redis_client: redis_client.clone(),
    };

    let admin_routes = Router::new()
        .route("/segments", get(segments::list_segments))
        .route("/segments/stream", get(segments::stream_segments))
        .route("/bookings", get(bookings::list_all_bookings))
        .route("/bookings/:booking_id", patch(bookings::update_booking_status))
        .route("/services/packages", post(services::create_package))
        .route("/services/types", post(services::create_service_type))
        .route("/services/types/:service_type_id", patch(services::update_service_price))
        .route("/priority/model/retrain", post(priority::retrain_model))
        .layer(from_fn_with_state(
            cfg.internal_api_key.clone(),
            admin_auth::require_internal_api_key,
        ));

    let app = Router::new()
        .route("/health", get(ops::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .route("/services/packages", get(services::list_packages))
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/me", get(bookings::list_my_bookings))
        .route("/priority/calculate", post(priority::calculate_priority))
        .merge(admin_routes)
        .layer(from_fn_with_state(
            rate_limit::RateLimitState {
                redis_client,
                max_per_minute: cfg.rate_limit_per_minute,
            },
            rate_limit::enforce,
        ))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
