//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use stockroom_app::ports::DeviceRepository;
use stockroom_domain::device::{Device, NewDevice};
use stockroom_domain::error::StockroomError;
use stockroom_domain::id::DeviceId;
use stockroom_domain::search::name_contains;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let inventory_name: String = row.try_get("inventory_name")?;
        let description: String = row.try_get("description")?;
        let photo: Option<String> = row.try_get("photo")?;

        Ok(Self(Device {
            id: DeviceId::new(id),
            inventory_name,
            description,
            photo,
        }))
    }
}

const INSERT: &str = "INSERT INTO inventory (inventory_name, description, photo) VALUES (?, ?, ?)";
const SELECT_BY_ID: &str =
    "SELECT id, inventory_name, description, photo FROM inventory WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, inventory_name, description, photo FROM inventory ORDER BY id";
const UPDATE: &str =
    "UPDATE inventory SET inventory_name = ?, description = ?, photo = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM inventory WHERE id = ?";

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn create(
        &self,
        device: NewDevice,
    ) -> impl Future<Output = Result<Device, StockroomError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&device.inventory_name)
                .bind(&device.description)
                .bind(&device.photo)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(device.into_device(DeviceId::new(result.last_insert_rowid())))
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&device.inventory_name)
                .bind(&device.description)
                .bind(&device.photo)
                .bind(device.id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok((result.rows_affected() > 0).then_some(device))
        }
    }

    fn delete(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, StockroomError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            let Some(existing) = Wrapper::maybe(row) else {
                return Ok(None);
            };

            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok((result.rows_affected() > 0).then_some(existing))
        }
    }

    fn find_by_name(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Device>, StockroomError>> + Send {
        let pool = self.pool.clone();
        let query = query.to_string();
        async move {
            // SQLite's LIKE and lower() only fold ASCII, so names are matched here.
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows
                .into_iter()
                .map(|w| w.0)
                .filter(|device| name_contains(&device.inventory_name, &query))
                .collect())
        }
    }
}
