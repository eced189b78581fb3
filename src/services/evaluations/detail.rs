use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::evaluations::requests::EvaluationDetailQuery;
use crate::models::observation_cards::entities::EvaluationPhase;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

/// 查询单条评价
///
/// 不带轮次时取当前轮次：小组阶段的轮次挂在小组（target 即小组），
/// 个人阶段的轮次在小组课题下跟随学生所在小组。
pub async fn get_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    query: EvaluationDetailQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let attempt = match query.attempt_number {
        Some(attempt) => attempt,
        None => {
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

            let workflow_target = if subject.team_based
                && query.phase == EvaluationPhase::IndividualOral
            {
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

            match storage
                .get_or_create_workflow(query.subject_id, workflow_target)
                .await
            {
                Ok(workflow) => workflow.current_attempt,
                Err(e) => return Ok(storage_error_response("查询评价流程失败", &e)),
            }
        }
    };

    match storage
        .get_evaluation(query.subject_id, query.phase, query.target_id, attempt)
        .await
    {
        Ok(Some(evaluation)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(evaluation, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "该轮次尚无此阶段的评价",
        ))),
        Err(e) => Ok(storage_error_response("查询评价失败", &e)),
    }
}
