use crate::domain::catalog::{Package, ServiceType};
use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct CatalogRepo {
    pub pool: PgPool,
}

impl CatalogRepo {
    /// Row-locks the service type for the rest of the transaction so the
    /// price read here is the one the booking commits with.
    pub async fn lock_service_type_tx(
        tx: &mut Transaction<'_, Postgres>,
        service_type_id: i64,
    ) -> Result<Option<ServiceType>> {
        let row = sqlx::query(
            "SELECT service_type_id, package_id, name, description, price FROM service_types WHERE service_type_id = $1 FOR UPDATE",
        )
        .bind(service_type_id)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(row.as_ref().map(service_type_from_row))
    }

    pub async fn update_price_tx(
        tx: &mut Transaction<'_, Postgres>,
        service_type_id: i64,
        price: Decimal,
    ) -> Result<()> {
        sqlx::query("UPDATE service_types SET price = $2, updated_at = now() WHERE service_type_id = $1")
            .bind(service_type_id)
            .bind(price)
            .execute(tx.as_mut())
            .await?;
        Ok(())
    }

    pub async fn list_packages(&self) -> Result<Vec<Package>> {
        let package_rows = sqlx::query("SELECT package_id, name, description FROM packages ORDER BY package_id ASC")
            .fetch_all(&self.pool)
            .await?;
        let type_rows = sqlx::query(
            "SELECT service_type_id, package_id, name, description, price FROM service_types ORDER BY service_type_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut packages: BTreeMap<i64, Package> = package_rows
            .into_iter()
            .map(|r| {
                let package_id: i64 = r.get("package_id");
                (
                    package_id,
                    Package {
                        package_id,
                        name: r.get("name"),
                        description: r.get("description"),
                        service_types: Vec::new(),
                    },
                )
            })
            .collect();

        for row in &type_rows {
            let service_type = service_type_from_row(row);
            if let Some(package) = packages.get_mut(&service_type.package_id) {
                package.service_types.push(service_type);
            }
        }

        Ok(packages.into_values().collect())
    }

    pub async fn package_name_taken(&self, name: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM packages WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn package_exists(&self, package_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM packages WHERE package_id = $1")
            .bind(package_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn create_package(&self, name: &str, description: Option<&str>) -> Result<Package> {
        let row = sqlx::query(
            "INSERT INTO packages (name, description) VALUES ($1, $2) RETURNING package_id, name, description",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(Package {
            package_id: row.get("package_id"),
            name: row.get("name"),
            description: row.get("description"),
            service_types: Vec::new(),
        })
    }

    pub async fn create_service_type(
        &self,
        package_id: i64,
        name: &str,
        description: Option<&str>,
        price: Decimal,
    ) -> Result<ServiceType> {
        let row = sqlx::query(
            r#"
            INSERT INTO service_types (package_id, name, description, price)
            VALUES ($1, $2, $3, $4)
            RETURNING service_type_id, package_id, name, description, price
            "#,
        )
        .bind(package_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;

        Ok(service_type_from_row(&row))
    }
}

fn service_type_from_row(r: &PgRow) -> ServiceType {
    ServiceType {
        service_type_id: r.get("service_type_id"),
        package_id: r.get("package_id"),
        name: r.get("name"),
        description: r.get("description"),
        price: r.get("price"),
    }
}
