use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;
use crate::utils::validate::validate_name;

/// 创建课题
///
/// 课题本体由平台维护，这里只收评价引擎需要的最小字段。
pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    created_by: i64,
    req: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = validate_name(&req.name) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, e)));
    }

    let storage = service.get_storage(request);

    match storage.create_subject(created_by, req).await {
        Ok(subject) => {
            info!("Subject {} created by {}", subject.name, created_by);
            Ok(HttpResponse::Created().json(ApiResponse::success(subject, "课题创建成功")))
        }
        Err(e) => Ok(storage_error_response("创建课题失败", &e)),
    }
}
