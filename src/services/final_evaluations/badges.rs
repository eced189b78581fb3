use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinalEvaluationService;
use crate::models::ApiResponse;
use crate::services::storage_error_response;

/// 列出学生的全部徽章
pub async fn list_student_badges(
    service: &FinalEvaluationService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_badges_for_student(student_id).await {
        Ok(badges) => Ok(HttpResponse::Ok().json(ApiResponse::success(badges, "查询成功"))),
        Err(e) => Ok(storage_error_response("查询徽章失败", &e)),
    }
}
