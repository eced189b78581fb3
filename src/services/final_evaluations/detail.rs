use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinalEvaluationService;
use crate::models::final_evaluations::requests::FinalEvaluationQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

/// 查询当前轮次的最终评价
///
/// 当前轮次由流程记录决定：小组课题跟随小组，非小组课题跟随学生。
pub async fn get_current(
    service: &FinalEvaluationService,
    request: &HttpRequest,
    query: FinalEvaluationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let subject = match storage.get_subject_by_id(query.subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "课题不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询课题失败", &e)),
    };

    let workflow_target = if subject.team_based {
        match storage
            .get_team_for_student(query.subject_id, query.target_id)
            .await
        {
            Ok(Some(membership)) => membership.team_id,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::TeamNotFound,
                    "该学生未加入此课题的任何小组",
                )));
            }
            Err(e) => return Ok(storage_error_response("查询学生小组归属失败", &e)),
        }
    } else {
        query.target_id
    };

    let workflow = match storage
        .get_or_create_workflow(query.subject_id, workflow_target)
        .await
    {
        Ok(workflow) => workflow,
        Err(e) => return Ok(storage_error_response("查询评价流程失败", &e)),
    };

    match storage
        .get_final_evaluation(query.subject_id, query.target_id, workflow.current_attempt)
        .await
    {
        Ok(Some(final_evaluation)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(final_evaluation, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FinalEvaluationNotFound,
            "当前轮次尚未计算最终评价",
        ))),
        Err(e) => Ok(storage_error_response("查询最终评价失败", &e)),
    }
}
