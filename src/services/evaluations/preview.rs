use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::ApiResponse;
use crate::models::evaluations::requests::PreviewScoreRequest;
use crate::models::evaluations::responses::PreviewScoreResponse;
use crate::scoring::{EvalError, compute_score, round_for_presentation, validate_structure};
use crate::services::observation_cards::detail::load_card_cached;
use crate::services::{eval_error_response, storage_error_response};

/// 分数预览
///
/// 与正式提交共用 `compute_score`，保证预览值与提交后的落库值一致；
/// 不做阶段门禁（允许在小组评价完成前预览个人分数），也不写任何数据。
pub async fn preview_score(
    service: &EvaluationService,
    request: &HttpRequest,
    req: PreviewScoreRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    let card = match load_card_cached(&storage, &cache, req.subject_id, req.phase).await {
        Ok(Some(card)) => card,
        Ok(None) => {
            return Ok(eval_error_response(EvalError::ObservationCardMissing {
                subject_id: req.subject_id,
                phase: req.phase,
            }));
        }
        Err(e) => return Ok(storage_error_response("查询观察卡失败", &e)),
    };

    if let Err(issues) = validate_structure(&card.structure) {
        return Ok(eval_error_response(EvalError::Validation(issues)));
    }

    match compute_score(&card.structure, &req.selections, req.role) {
        Ok(score) => {
            let response = PreviewScoreResponse {
                score: round_for_presentation(score),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "预览计算完成")))
        }
        Err(err) => Ok(eval_error_response(err)),
    }
}
