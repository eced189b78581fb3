use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ObservationCardService;
use crate::cache::observation_card_cache_key;
use crate::models::observation_cards::requests::UpdateObservationCardRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{EvalError, validate_structure};
use crate::services::{eval_error_response, storage_error_response};

/// 更新观察卡结构
///
/// 已有评价不会因此重算：评价记录里保存了当时的选择与得分。
pub async fn update_card(
    service: &ObservationCardService,
    request: &HttpRequest,
    card_id: i64,
    req: UpdateObservationCardRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(issues) = validate_structure(&req.structure) {
        return Ok(eval_error_response(EvalError::Validation(issues)));
    }

    match storage.update_observation_card(card_id, req).await {
        Ok(Some(card)) => {
            info!("Observation card {} updated", card_id);
            // 更新后失效缓存
            let cache = service.get_cache(request);
            cache
                .remove(&observation_card_cache_key(
                    card.subject_id,
                    &card.phase.to_string(),
                ))
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(card, "观察卡更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationCardNotFound,
            "观察卡不存在",
        ))),
        Err(e) => Ok(storage_error_response("更新观察卡失败", &e)),
    }
}
