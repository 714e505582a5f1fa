use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use base64::Engine as _;
use chrono::{NaiveDate, Utc};
use core_types::{NewImage, NewOrder, Order, OrderUpdate, Period};
use ranking::{RankParams, SortBy, SortOrder, Tab};
use reporting::ReportingEngine;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// # GET /api/orders
///
/// Query params mirror the ranking options: `tab`, `status`, `queue`,
/// `search`, `pickup_date`, `sort_by`, `sort_order`. The store hands over
/// the order book and the ranking engine produces the view.
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let params = build_rank_params(query)?;
    let orders = state
        .repo
        .list_orders(&store::OrderFilters::default())
        .await?;
    let ranked = ranking::rank(&orders, &params, Utc::now());
    Ok(Json(ranked))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub tab: Option<Tab>,
    /// Processing status as text; empty or "all" means no filter.
    pub status: Option<String>,
    pub queue: Option<String>,
    pub search: Option<String>,
    pub pickup_date: Option<NaiveDate>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

/// Translates the raw query string into engine parameters. The "all"/empty
/// status sentinel becomes `None`; anything else must parse as a real status.
fn build_rank_params(query: ListOrdersQuery) -> Result<RankParams, AppError> {
    let status_filter = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse()?),
    };

    Ok(RankParams {
        tab: query.tab.unwrap_or_default(),
        status_filter,
        queue_substring: query.queue,
        search_text: query.search,
        pickup_date_exact: query.pickup_date,
        sort_by: query.sort_by.unwrap_or_default(),
        sort_order: query.sort_order.unwrap_or_default(),
    })
}

/// # POST /api/orders
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(new_order): Json<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    validate_new_order(&new_order, state.settings.uploads.max_images_per_order)?;
    let order = state.repo.create_order(&new_order).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

fn validate_new_order(new_order: &NewOrder, max_images: usize) -> Result<(), AppError> {
    if new_order.customer_name.trim().is_empty() {
        return Err(AppError::Validation(
            "customerName must not be empty".to_string(),
        ));
    }
    if new_order.customer_phone.trim().is_empty() {
        return Err(AppError::Validation(
            "customerPhone must not be empty".to_string(),
        ));
    }
    if new_order.price < Decimal::ZERO {
        return Err(AppError::Validation(
            "price must not be negative".to_string(),
        ));
    }
    if new_order.image_refs.len() > max_images {
        return Err(AppError::Validation(format!(
            "an order may carry at most {max_images} images"
        )));
    }
    Ok(())
}

/// # GET /api/orders/:id
pub async fn get_order(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Order>, AppError> {
    let order = state.repo.get_order(id).await?;
    Ok(Json(order))
}

/// # PUT /api/orders/:id
pub async fn update_order(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<OrderUpdate>,
) -> Result<Json<Order>, AppError> {
    validate_order_update(&update, state.settings.uploads.max_images_per_order)?;
    let order = state.repo.update_order(id, &update).await?;
    Ok(Json(order))
}

fn validate_order_update(update: &OrderUpdate, max_images: usize) -> Result<(), AppError> {
    if let Some(name) = &update.customer_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "customerName must not be empty".to_string(),
            ));
        }
    }
    if let Some(phone) = &update.customer_phone {
        if phone.trim().is_empty() {
            return Err(AppError::Validation(
                "customerPhone must not be empty".to_string(),
            ));
        }
    }
    if let Some(price) = update.price {
        if price < Decimal::ZERO {
            return Err(AppError::Validation(
                "price must not be negative".to_string(),
            ));
        }
    }
    if let Some(image_refs) = &update.image_refs {
        if image_refs.len() > max_images {
            return Err(AppError::Validation(format!(
                "an order may carry at most {max_images} images"
            )));
        }
    }
    Ok(())
}

/// # DELETE /api/orders/:id
pub async fn delete_order(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.repo.delete_order(id).await?;
    Ok(Json(json!({ "message": "Order deleted successfully" })))
}

/// # GET /api/reports/income?period=&date=
///
/// `period` defaults to `daily`; an unrecognized value is a 400, never
/// coerced. `date` defaults to today (UTC). The store narrows the order
/// book to the report window and the reporting engine does the rest.
pub async fn income_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<reporting::IncomeReport>, AppError> {
    let period: Period = query.period.as_deref().unwrap_or("daily").parse()?;
    let anchor = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let (window_start, window_end) = ReportingEngine::report_window(period, anchor);
    let orders = state
        .repo
        .list_paid_orders_in_window(window_start, window_end)
        .await?;

    let report = ReportingEngine::new().build_report(&orders, period, anchor);
    Ok(Json(report))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
    pub date: Option<NaiveDate>,
}

/// # POST /api/images
///
/// Multipart upload: a `file` part with the image bytes, plus an optional
/// `orderId` part to link the image immediately. Enforces the configured
/// MIME allow-list and size cap.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut filename = None;
    let mut mime_type = None;
    let mut data: Option<Vec<u8>> = None;
    let mut order_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                filename = field.file_name().map(|n| n.replace(char::is_whitespace, "_"));
                mime_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file: {e}")))?;
                data = Some(bytes.to_vec());
            }
            Some("orderId") | Some("order_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read orderId: {e}")))?;
                if !raw.is_empty() {
                    order_id = Some(raw.parse::<Uuid>().map_err(|_| {
                        AppError::Validation(format!("orderId is not a valid id: {raw}"))
                    })?);
                }
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::Validation("missing file part".to_string()))?;
    let mime_type =
        mime_type.ok_or_else(|| AppError::Validation("file part has no content type".to_string()))?;

    let uploads = &state.settings.uploads;
    if !uploads.allowed_mime_types.contains(&mime_type) {
        return Err(AppError::Validation(format!(
            "file type not supported: {mime_type}; allowed: {}",
            uploads.allowed_mime_types.join(", ")
        )));
    }
    if data.len() > uploads.max_image_bytes {
        return Err(AppError::Validation(format!(
            "file size exceeds the {} byte limit",
            uploads.max_image_bytes
        )));
    }

    let new_image = NewImage {
        filename: filename.unwrap_or_else(|| "upload".to_string()),
        mime_type,
        data,
        // Dimension probing needs an image decoder; left unset like the
        // metadata columns allow.
        width: None,
        height: None,
        order_id,
    };
    let image = state.repo.save_image(&new_image).await?;

    let data_url = format!(
        "data:{};base64,{}",
        image.mime_type,
        base64::engine::general_purpose::STANDARD.encode(&image.data)
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "imageId": image.id,
            "dataUrl": data_url,
            "filename": image.filename,
            "size": image.size_bytes,
            "mimeType": image.mime_type,
        })),
    ))
}

/// # GET /api/images/:id
///
/// JSON metadata plus a base64 data URL, for clients that inline images.
pub async fn get_image(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let image = state.repo.get_image(id).await?;

    let data_url = format!(
        "data:{};base64,{}",
        image.mime_type,
        base64::engine::general_purpose::STANDARD.encode(&image.data)
    );

    Ok(Json(json!({
        "id": image.id,
        "filename": image.filename,
        "mimeType": image.mime_type,
        "size": image.size_bytes,
        "width": image.width,
        "height": image.height,
        "orderId": image.order_id,
        "dataUrl": data_url,
        "createdAt": image.created_at,
    })))
}

/// # GET /api/images/:id/blob
///
/// The raw bytes with the stored content type, for direct `<img>` sources.
pub async fn get_image_blob(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let image = state.repo.get_image(id).await?;
    Ok(([(header::CONTENT_TYPE, image.mime_type)], image.data))
}

/// # DELETE /api/images/:id
pub async fn delete_image(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.repo.delete_image(id).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{ProcessingStatus, ServiceType};
    use rust_decimal_macros::dec;

    fn new_order() -> NewOrder {
        NewOrder {
            customer_name: "Malee".to_string(),
            customer_phone: "0812345678".to_string(),
            service_type: ServiceType::Sew,
            notes: None,
            pickup_date: "2026-09-01T00:00:00Z".parse().unwrap(),
            price: dec!(350),
            payment_status: false,
            processing_status: ProcessingStatus::NotStarted,
            image_refs: vec![],
        }
    }

    #[test]
    fn status_sentinels_mean_no_filter() {
        for sentinel in [None, Some(String::new()), Some("all".to_string())] {
            let params = build_rank_params(ListOrdersQuery {
                status: sentinel,
                ..ListOrdersQuery::default()
            })
            .unwrap();
            assert!(params.status_filter.is_none());
        }
    }

    #[test]
    fn real_status_values_are_parsed() {
        let params = build_rank_params(ListOrdersQuery {
            status: Some("in_progress".to_string()),
            ..ListOrdersQuery::default()
        })
        .unwrap();
        assert_eq!(params.status_filter, Some(ProcessingStatus::InProgress));
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = build_rank_params(ListOrdersQuery {
            status: Some("paused".to_string()),
            ..ListOrdersQuery::default()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn defaults_match_the_working_view() {
        let params = build_rank_params(ListOrdersQuery::default()).unwrap();
        assert_eq!(params.tab, Tab::Ongoing);
        assert_eq!(params.sort_by, SortBy::Priority);
        assert_eq!(params.sort_order, SortOrder::Asc);
    }

    #[test]
    fn blank_customer_name_is_rejected() {
        let mut order = new_order();
        order.customer_name = "   ".to_string();
        assert!(matches!(
            validate_new_order(&order, 5),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut order = new_order();
        order.price = dec!(-1);
        assert!(matches!(
            validate_new_order(&order, 5),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn too_many_image_refs_are_rejected() {
        let mut order = new_order();
        order.image_refs = (0..6).map(|_| Uuid::new_v4()).collect();
        assert!(matches!(
            validate_new_order(&order, 5),
            Err(AppError::Validation(_))
        ));
        order.image_refs.truncate(5);
        assert!(validate_new_order(&order, 5).is_ok());
    }

    #[test]
    fn update_validation_only_checks_provided_fields() {
        assert!(validate_order_update(&OrderUpdate::default(), 5).is_ok());

        let update = OrderUpdate {
            price: Some(dec!(-10)),
            ..OrderUpdate::default()
        };
        assert!(matches!(
            validate_order_update(&update, 5),
            Err(AppError::Validation(_))
        ));
    }
}
