use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ObservationCardService;
use crate::cache::observation_card_cache_key;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

/// 删除观察卡
pub async fn delete_card(
    service: &ObservationCardService,
    request: &HttpRequest,
    card_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 先取出卡面信息，删除成功后用于失效缓存
    let existing = match storage.get_observation_card_by_id(card_id).await {
        Ok(Some(card)) => card,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ObservationCardNotFound,
                "观察卡不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询观察卡失败", &e)),
    };

    match storage.delete_observation_card(card_id).await {
        Ok(true) => {
            info!("Observation card {} deleted", card_id);
            let cache = service.get_cache(request);
            cache
                .remove(&observation_card_cache_key(
                    existing.subject_id,
                    &existing.phase.to_string(),
                ))
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("观察卡删除成功")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationCardNotFound,
            "观察卡不存在",
        ))),
        Err(e) => Ok(storage_error_response("删除观察卡失败", &e)),
    }
}
