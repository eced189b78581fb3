use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ObservationCardService;
use crate::cache::observation_card_cache_key;
use crate::models::observation_cards::requests::CreateObservationCardRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{EvalError, validate_structure};
use crate::services::{eval_error_response, storage_error_response};

pub async fn create_card(
    service: &ObservationCardService,
    request: &HttpRequest,
    created_by: i64,
    req: CreateObservationCardRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 结构校验先行，不合法的观察卡不落库
    if let Err(issues) = validate_structure(&req.structure) {
        return Ok(eval_error_response(EvalError::Validation(issues)));
    }

    // 课题必须存在
    match storage.get_subject_by_id(req.subject_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "课题不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询课题失败", &e)),
    }

    let subject_id = req.subject_id;
    let phase = req.phase;

    match storage.create_observation_card(created_by, req).await {
        Ok(card) => {
            info!(
                "Observation card created for subject {} phase {} by {}",
                subject_id, phase, created_by
            );
            // 新卡直接失效缓存，下一次读取回源
            let cache = service.get_cache(request);
            cache
                .remove(&observation_card_cache_key(subject_id, &phase.to_string()))
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(card, "观察卡创建成功")))
        }
        Err(e) => Ok(storage_error_response("创建观察卡失败", &e)),
    }
}
