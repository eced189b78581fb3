use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::ApiResponse;
use crate::models::evaluations::requests::EvaluationHistoryQuery;
use crate::models::evaluations::responses::EvaluationHistoryResponse;
use crate::services::storage_error_response;

/// 查询评价历史（全部轮次，追加保留）
pub async fn list_history(
    service: &EvaluationService,
    request: &HttpRequest,
    query: EvaluationHistoryQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_evaluation_history(query.subject_id, query.target_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(
                EvaluationHistoryResponse { items },
                "查询成功",
            ))),
        Err(e) => Ok(storage_error_response("查询评价历史失败", &e)),
    }
}
