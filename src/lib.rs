pub mod config;
pub mod domain {
    pub mod booking;
    pub mod catalog;
    pub mod segment;
}
pub mod http {
    pub mod handlers {
        pub mod bookings;
        pub mod ops;
        pub mod priority;
        pub mod segments;
        pub mod services;
    }
    pub mod middleware {
        pub mod admin_auth;
        pub mod rate_limit;
    }
}
pub mod notify;
pub mod repo {
    pub mod bookings_repo;
    pub mod catalog_repo;
}
pub mod scoring;
pub mod segmentation;
pub mod service {
    pub mod booking_service;
    pub mod catalog_service;
    pub mod error;
    pub mod notifier;
    pub mod segment_service;
}

#[derive(Clone)]
pub struct AppState {
    pub booking_service: service::booking_service::BookingService,
    pub catalog_service: service::catalog_service::CatalogService,
    pub segment_service: service::segment_service::SegmentService,
    pub broadcast: notify::broadcast::BroadcastSink,
    pub redis_client: redis::Client,
}
