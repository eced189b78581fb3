use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FinalEvaluationService;
use crate::models::final_evaluations::requests::AllowRetryRequest;
use crate::models::final_evaluations::responses::AllowRetryResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::workflow::ensure_retry_allowed;
use crate::services::{eval_error_response, storage_error_response};

/// 允许重试
///
/// 仅当当前轮次的最终评价为未通过且评价人已允许重试时开放；
/// 轮次 +1 后流程回到第一个适用阶段，历史轮次全部保留。
/// 小组课题的轮次挂在小组上，重试会为全组重新打开小组阶段。
pub async fn allow_retry(
    service: &FinalEvaluationService,
    request: &HttpRequest,
    req: AllowRetryRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let subject = match storage.get_subject_by_id(req.subject_id).await {
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
            .get_team_for_student(req.subject_id, req.target_id)
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
        req.target_id
    };

    let workflow = match storage
        .get_or_create_workflow(req.subject_id, workflow_target)
        .await
    {
        Ok(workflow) => workflow,
        Err(e) => return Ok(storage_error_response("查询评价流程失败", &e)),
    };

    let final_evaluation = match storage
        .get_final_evaluation(req.subject_id, req.target_id, workflow.current_attempt)
        .await
    {
        Ok(Some(final_evaluation)) => final_evaluation,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FinalEvaluationNotFound,
                "当前轮次尚未计算最终评价",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询最终评价失败", &e)),
    };

    if let Err(err) = ensure_retry_allowed(&final_evaluation) {
        return Ok(eval_error_response(err));
    }

    match storage
        .increment_workflow_attempt(req.subject_id, workflow_target)
        .await
    {
        Ok(workflow) => {
            info!(
                "Retry granted for subject {} target {}: attempt {} -> {}",
                req.subject_id,
                req.target_id,
                final_evaluation.attempt_number,
                workflow.current_attempt
            );
            let response = AllowRetryResponse {
                subject_id: req.subject_id,
                target_id: req.target_id,
                new_attempt_number: workflow.current_attempt,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "已开启新一轮评价")))
        }
        Err(e) => Ok(storage_error_response("更新评价流程失败", &e)),
    }
}
