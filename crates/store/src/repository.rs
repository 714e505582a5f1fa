use crate::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use core_types::{NewImage, NewOrder, Order, OrderUpdate, ProcessingStatus, StoredImage};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

/// The `Repository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: PgPool,
}

/// Optional pre-filters the store can apply when listing orders.
///
/// These mirror a subset of the ranking filters (status equality, queue and
/// name/phone substring, pickup-day range). The ranking engine is idempotent
/// over pre-filtered input, so callers may use these for efficiency or fetch
/// everything and let the engine do the work.
#[derive(Debug, Clone, Default)]
pub struct OrderFilters {
    pub processing_status: Option<ProcessingStatus>,
    pub queue_substring: Option<String>,
    pub search_text: Option<String>,
    pub pickup_day: Option<NaiveDate>,
}

/// This struct represents a row fetched from the orders table.
#[derive(Debug, Clone, FromRow)]
struct DbOrder {
    id: Uuid,
    queue_number: i32,
    customer_name: String,
    customer_phone: String,
    service_type: String,
    notes: Option<String>,
    pickup_date: DateTime<Utc>,
    price: Decimal,
    payment_status: bool,
    processing_status: String,
    image_refs: Json<Vec<Uuid>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbOrder> for Order {
    type Error = StoreError;

    fn try_from(row: DbOrder) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            queue_number: row.queue_number,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            service_type: row.service_type.parse()?,
            notes: row.notes,
            pickup_date: row.pickup_date,
            price: row.price,
            payment_status: row.payment_status,
            processing_status: row.processing_status.parse()?,
            image_refs: row.image_refs.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// This struct represents a row fetched from the images table.
#[derive(Debug, Clone, FromRow)]
struct DbImage {
    id: Uuid,
    filename: String,
    mime_type: String,
    data: Vec<u8>,
    size_bytes: i64,
    width: Option<i32>,
    height: Option<i32>,
    order_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<DbImage> for StoredImage {
    fn from(row: DbImage) -> Self {
        StoredImage {
            id: row.id,
            filename: row.filename,
            mime_type: row.mime_type,
            data: row.data,
            size_bytes: row.size_bytes,
            width: row.width,
            height: row.height,
            order_id: row.order_id,
            created_at: row.created_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, queue_number, customer_name, customer_phone, service_type, \
     notes, pickup_date, price, payment_status, processing_status, image_refs, \
     created_at, updated_at";

impl Repository {
    /// Creates a new `Repository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches orders, optionally narrowed by the store-side filters,
    /// newest queue number first.
    pub async fn list_orders(&self, filters: &OrderFilters) -> Result<Vec<Order>, StoreError> {
        let query = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::text IS NULL OR processing_status = $1)
              AND ($2::text IS NULL OR queue_number::text LIKE '%' || $2 || '%')
              AND ($3::text IS NULL
                   OR customer_name ILIKE '%' || $3 || '%'
                   OR customer_phone LIKE '%' || $3 || '%')
              AND ($4::timestamptz IS NULL
                   OR (pickup_date >= $4 AND pickup_date < $4 + INTERVAL '1 day'))
            ORDER BY queue_number DESC
            "#
        );

        let rows = sqlx::query_as::<_, DbOrder>(&query)
            .bind(filters.processing_status.map(|s| s.as_str()))
            .bind(filters.queue_substring.as_deref())
            .bind(filters.search_text.as_deref())
            .bind(
                filters
                    .pickup_day
                    .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc()),
            )
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Fetches a single order by its id.
    pub async fn get_order(&self, id: Uuid) -> Result<Order, StoreError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query_as::<_, DbOrder>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::RowNotFound = e {
                    StoreError::NotFound
                } else {
                    e.into()
                }
            })?;

        row.try_into()
    }

    /// Creates a new order, assigning the next queue number
    /// (`max + 1`, starting at 1) and both timestamps.
    ///
    /// Any images referenced by the payload are linked to the new order in
    /// the same transaction. The UNIQUE constraint on `queue_number` backs
    /// the assignment against concurrent writers.
    pub async fn create_order(&self, new_order: &NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let next_queue: i32 =
            sqlx::query_scalar("SELECT COALESCE(MAX(queue_number), 0) + 1 FROM orders")
                .fetch_one(&mut *tx)
                .await?;

        let query = format!(
            r#"
            INSERT INTO orders (
                id, queue_number, customer_name, customer_phone, service_type,
                notes, pickup_date, price, payment_status, processing_status, image_refs
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, DbOrder>(&query)
            .bind(Uuid::new_v4())
            .bind(next_queue)
            .bind(&new_order.customer_name)
            .bind(&new_order.customer_phone)
            .bind(new_order.service_type.as_str())
            .bind(new_order.notes.as_deref())
            .bind(new_order.pickup_date)
            .bind(new_order.price)
            .bind(new_order.payment_status)
            .bind(new_order.processing_status.as_str())
            .bind(Json(new_order.image_refs.clone()))
            .fetch_one(&mut *tx)
            .await?;

        if !new_order.image_refs.is_empty() {
            sqlx::query("UPDATE images SET order_id = $1 WHERE id = ANY($2)")
                .bind(row.id)
                .bind(&new_order.image_refs)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(order_id = %row.id, queue_number = next_queue, "created order");
        row.try_into()
    }

    /// Applies a partial update to an order and bumps `updated_at`.
    /// `None` fields leave the stored value untouched; the queue number is
    /// never reassigned.
    pub async fn update_order(
        &self,
        id: Uuid,
        update: &OrderUpdate,
    ) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            UPDATE orders SET
                customer_name = COALESCE($2, customer_name),
                customer_phone = COALESCE($3, customer_phone),
                service_type = COALESCE($4, service_type),
                notes = COALESCE($5, notes),
                pickup_date = COALESCE($6, pickup_date),
                price = COALESCE($7, price),
                payment_status = COALESCE($8, payment_status),
                processing_status = COALESCE($9, processing_status),
                image_refs = COALESCE($10, image_refs),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, DbOrder>(&query)
            .bind(id)
            .bind(update.customer_name.as_deref())
            .bind(update.customer_phone.as_deref())
            .bind(update.service_type.map(|s| s.as_str()))
            .bind(update.notes.as_deref())
            .bind(update.pickup_date)
            .bind(update.price)
            .bind(update.payment_status)
            .bind(update.processing_status.map(|s| s.as_str()))
            .bind(update.image_refs.clone().map(Json))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::RowNotFound = e {
                    StoreError::NotFound
                } else {
                    e.into()
                }
            })?;

        if let Some(image_refs) = &update.image_refs {
            if !image_refs.is_empty() {
                sqlx::query("UPDATE images SET order_id = $1 WHERE id = ANY($2)")
                    .bind(id)
                    .bind(image_refs)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        row.try_into()
    }

    /// Deletes an order. Linked images go with it; the cascade is an
    /// explicit policy backed by the `ON DELETE CASCADE` foreign key, so no
    /// orphaned blobs accumulate.
    pub async fn delete_order(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        tracing::info!(order_id = %id, "deleted order and its linked images");
        Ok(())
    }

    /// Fetches the paid orders created inside `[start, end]`, oldest first.
    /// This feeds the reporting engine its candidate set.
    pub async fn list_paid_orders_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError> {
        let query = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE payment_status = TRUE AND created_at >= $1 AND created_at <= $2
            ORDER BY created_at ASC
            "#
        );

        let rows = sqlx::query_as::<_, DbOrder>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Stores a freshly uploaded image, optionally linked to an order.
    pub async fn save_image(&self, new_image: &NewImage) -> Result<StoredImage, StoreError> {
        let row = sqlx::query_as::<_, DbImage>(
            r#"
            INSERT INTO images (id, filename, mime_type, data, size_bytes, width, height, order_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, filename, mime_type, data, size_bytes, width, height, order_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_image.filename)
        .bind(&new_image.mime_type)
        .bind(&new_image.data)
        .bind(new_image.data.len() as i64)
        .bind(new_image.width)
        .bind(new_image.height)
        .bind(new_image.order_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(image_id = %row.id, size_bytes = row.size_bytes, "stored image");
        Ok(row.into())
    }

    /// Fetches a stored image, binary content included.
    pub async fn get_image(&self, id: Uuid) -> Result<StoredImage, StoreError> {
        let row = sqlx::query_as::<_, DbImage>(
            "SELECT id, filename, mime_type, data, size_bytes, width, height, order_id, created_at \
             FROM images WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::RowNotFound = e {
                StoreError::NotFound
            } else {
                e.into()
            }
        })?;

        Ok(row.into())
    }

    /// Deletes an image by its own identifier, independent of any order.
    pub async fn delete_image(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Points the given images' back-references at an order.
    pub async fn link_images_to_order(
        &self,
        image_ids: &[Uuid],
        order_id: Uuid,
    ) -> Result<(), StoreError> {
        if image_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("UPDATE images SET order_id = $1 WHERE id = ANY($2)")
            .bind(order_id)
            .bind(image_ids)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
