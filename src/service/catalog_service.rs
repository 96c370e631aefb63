use crate::domain::catalog::{
    CreatePackageRequest, CreateServiceTypeRequest, Package, ServiceType, MAX_CATALOG_NAME_LEN,
    MAX_PRICE_CENTS, PRICE_SCALE,
};
use crate::repo::catalog_repo::CatalogRepo;
use crate::service::error::ServiceError;
use rust_decimal::Decimal;

#[derive(Clone)]
pub struct CatalogService {
    pub catalog_repo: CatalogRepo,
}

impl CatalogService {
    pub async fn list_packages(&self) -> Result<Vec<Package>, ServiceError> {
        Ok(self.catalog_repo.list_packages().await?)
    }

    pub async fn create_package(&self, req: CreatePackageRequest) -> Result<Package, ServiceError> {
        let name = validate_name(&req.name)?;
        if self.catalog_repo.package_name_taken(&name).await? {
            return Err(ServiceError::Conflict(format!("package '{name}' already exists")));
        }

        let package = self
            .catalog_repo
            .create_package(&name, req.description.as_deref())
            .await?;
        tracing::info!(package_id = package.package_id, name = %package.name, "package created");
        Ok(package)
    }

    pub async fn create_service_type(&self, req: CreateServiceTypeRequest) -> Result<ServiceType, ServiceError> {
        let name = validate_name(&req.name)?;
        let price = validate_price(req.price)?;
        if !self.catalog_repo.package_exists(req.package_id).await? {
            return Err(ServiceError::NotFound("package".to_string()));
        }

        let service_type = self
            .catalog_repo
            .create_service_type(req.package_id, &name, req.description.as_deref(), price)
            .await
            .map_err(|e| ServiceError::from_db(e, "package"))?;
        tracing::info!(
            service_type_id = service_type.service_type_id,
            package_id = service_type.package_id,
            price = %service_type.price,
            "service type created"
        );
        Ok(service_type)
    }
}

pub fn validate_name(raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_CATALOG_NAME_LEN {
        return Err(ServiceError::Validation(format!(
            "name must be at most {MAX_CATALOG_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Prices must fit `NUMERIC(12, 2)`. Returns the value as it will be stored.
pub fn validate_price(price: Decimal) -> Result<Decimal, ServiceError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ServiceError::Validation("price must be >= 0".to_string()));
    }
    if price > max_price() {
        return Err(ServiceError::Validation(format!("price must be at most {}", max_price())));
    }
    let price = price.normalize();
    if price.scale() > PRICE_SCALE {
        return Err(ServiceError::Validation(format!(
            "price must have at most {PRICE_SCALE} decimal places"
        )));
    }
    Ok(price)
}

fn max_price() -> Decimal {
    Decimal::new(MAX_PRICE_CENTS, PRICE_SCALE)
}
