use actix_web::{HttpResponse, Responder, post, web};
use serde_json::json;

use crate::forms::price_lists::BatchPricesPayload;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::feature_flags::StaticFeatureFlags;
use crate::services::price_lists::PriceListBatchHandler;
use crate::workflows::LocalWorkflowEngine;

/// Batch handler wired to the SQLite repository, as registered in `main`.
pub type PriceBatchHandler = PriceListBatchHandler<
    DieselRepository,
    LocalWorkflowEngine<DieselRepository>,
    StaticFeatureFlags,
>;

#[post("/admin/price-lists/{id}/prices/batch")]
/// Add, update or replace the prices of a price list in one batch.
///
/// Responds with `{"price_list": ...}` holding the list as it is after the
/// batch committed.
pub async fn batch_update_prices(
    path: web::Path<i32>,
    payload: web::Json<BatchPricesPayload>,
    handler: web::Data<PriceBatchHandler>,
) -> impl Responder {
    let price_list_id = path.into_inner();

    let request = match payload.into_inner().into_batch_request(price_list_id) {
        Ok(request) => request,
        Err(err) => return error_response(&ServiceError::from(err)),
    };

    match handler.handle(&request) {
        Ok(view) => HttpResponse::Ok().json(json!({ "price_list": view })),
        Err(err) => {
            if matches!(err, ServiceError::ConflictAborted(_)) {
                log::error!("Failed to update prices of price list {price_list_id}: {err}");
            }
            error_response(&err)
        }
    }
}

fn error_response(err: &ServiceError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        ServiceError::NotFound(_) => HttpResponse::NotFound().json(body),
        ServiceError::InvalidArgument(_) => HttpResponse::BadRequest().json(body),
        ServiceError::ConflictAborted(_) => HttpResponse::Conflict().json(body),
    }
}
