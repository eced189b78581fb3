use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::evaluations::requests::EvaluationStateQuery;
use crate::models::evaluations::responses::EvaluationStateResponse;
use crate::models::observation_cards::entities::EvaluationPhase;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{PhaseSnapshot, derive_state};
use crate::services::storage_error_response;

/// 查询流程状态
///
/// `target_id` 是学生 ID（小组课题会自动解析到其小组查小组评价），
/// 状态由当前轮次的记录推导，不单独落库。
pub async fn get_state(
    service: &EvaluationService,
    request: &HttpRequest,
    query: EvaluationStateQuery,
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

    // 小组课题：轮次与小组评价都挂在小组上
    let (workflow_target, team_id) = if subject.team_based {
        match storage
            .get_team_for_student(query.subject_id, query.target_id)
            .await
        {
            Ok(Some(membership)) => (membership.team_id, Some(membership.team_id)),
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::TeamNotFound,
                    "该学生未加入此课题的任何小组",
                )));
            }
            Err(e) => return Ok(storage_error_response("查询学生小组归属失败", &e)),
        }
    } else {
        (query.target_id, None)
    };

    let workflow = match storage
        .get_or_create_workflow(query.subject_id, workflow_target)
        .await
    {
        Ok(workflow) => workflow,
        Err(e) => return Ok(storage_error_response("查询评价流程失败", &e)),
    };
    let attempt = workflow.current_attempt;

    let has_group = match team_id {
        Some(team_id) => {
            match storage
                .get_evaluation(query.subject_id, EvaluationPhase::Group, team_id, attempt)
                .await
            {
                Ok(result) => result.is_some(),
                Err(e) => return Ok(storage_error_response("查询小组评价失败", &e)),
            }
        }
        None => false,
    };

    let has_individual = match storage
        .get_evaluation(
            query.subject_id,
            EvaluationPhase::IndividualOral,
            query.target_id,
            attempt,
        )
        .await
    {
        Ok(result) => result.is_some(),
        Err(e) => return Ok(storage_error_response("查询个人评价失败", &e)),
    };

    let has_final = match storage
        .get_final_evaluation(query.subject_id, query.target_id, attempt)
        .await
    {
        Ok(result) => result.is_some(),
        Err(e) => return Ok(storage_error_response("查询最终评价失败", &e)),
    };

    let snapshot = PhaseSnapshot {
        team_based: subject.team_based,
        current_attempt: attempt,
        has_group_evaluation: has_group,
        has_individual_evaluation: has_individual,
        has_final_evaluation: has_final,
    };

    let response = EvaluationStateResponse {
        state: derive_state(&snapshot),
        team_based: subject.team_based,
        current_attempt: attempt,
        has_group_evaluation: has_group,
        has_individual_evaluation: has_individual,
        finalized: has_final,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
