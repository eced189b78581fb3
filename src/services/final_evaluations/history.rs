use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinalEvaluationService;
use crate::models::ApiResponse;
use crate::models::final_evaluations::requests::FinalEvaluationQuery;
use crate::models::final_evaluations::responses::FinalEvaluationHistoryResponse;
use crate::services::storage_error_response;

/// 查询最终评价历史（全部轮次，追加保留）
pub async fn list_history(
    service: &FinalEvaluationService,
    request: &HttpRequest,
    query: FinalEvaluationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_final_evaluation_history(query.subject_id, query.target_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FinalEvaluationHistoryResponse { items },
            "查询成功",
        ))),
        Err(e) => Ok(storage_error_response("查询最终评价历史失败", &e)),
    }
}
