use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceType {
    pub service_type_id: i64,
    pub package_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub package_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub service_types: Vec<ServiceType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceTypeRequest {
    pub package_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateServicePriceRequest {
    pub price: Decimal,
}

pub const MAX_CATALOG_NAME_LEN: usize = 120;
pub const PRICE_SCALE: u32 = 2;
pub const MAX_PRICE_CENTS: i64 = 999_999_999_999;
