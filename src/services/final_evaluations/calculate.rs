use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FinalEvaluationService;
use crate::models::evaluations::entities::Evaluation;
use crate::models::final_evaluations::requests::{CalculateFinalRequest, SaveFinalEvaluationRequest};
use crate::models::final_evaluations::responses::FinalEvaluationResponse;
use crate::models::final_evaluations::entities::EvaluationStatus;
use crate::models::observation_cards::entities::EvaluationPhase;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{finalize, workflow::ensure_finalize_allowed};
use crate::services::{eval_error_response, storage_error_response};
use crate::storage::Storage;

/// 计算最终评价
///
/// 显式触发，不随个人评价自动执行；同一轮次重复调用只是覆盖重算。
/// 首次判定通过时幂等颁发徽章，徽章事件仅记录，推送由平台负责。
pub async fn calculate_final(
    service: &FinalEvaluationService,
    request: &HttpRequest,
    req: CalculateFinalRequest,
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

    // 小组课题：轮次跟随小组；小组分取小组评价
    let team_id = if subject.team_based {
        match storage
            .get_team_for_student(req.subject_id, req.target_id)
            .await
        {
            Ok(Some(membership)) => Some(membership.team_id),
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::TeamNotFound,
                    "该学生未加入此课题的任何小组",
                )));
            }
            Err(e) => return Ok(storage_error_response("查询学生小组归属失败", &e)),
        }
    } else {
        None
    };

    let workflow_target = team_id.unwrap_or(req.target_id);
    let workflow = match storage
        .get_or_create_workflow(req.subject_id, workflow_target)
        .await
    {
        Ok(workflow) => workflow,
        Err(e) => return Ok(storage_error_response("查询评价流程失败", &e)),
    };
    let attempt = workflow.current_attempt;

    let group_evaluation: Option<Evaluation> = match team_id {
        Some(team_id) => {
            match storage
                .get_evaluation(req.subject_id, EvaluationPhase::Group, team_id, attempt)
                .await
            {
                Ok(result) => result,
                Err(e) => return Ok(storage_error_response("查询小组评价失败", &e)),
            }
        }
        None => None,
    };

    let individual_evaluation = match storage
        .get_evaluation(
            req.subject_id,
            EvaluationPhase::IndividualOral,
            req.target_id,
            attempt,
        )
        .await
    {
        Ok(result) => result,
        Err(e) => return Ok(storage_error_response("查询个人评价失败", &e)),
    };

    if let Err(err) = ensure_finalize_allowed(
        subject.team_based,
        group_evaluation.is_some(),
        individual_evaluation.is_some(),
    ) {
        return Ok(eval_error_response(err));
    }
    let individual_evaluation = individual_evaluation.expect("checked above");

    let outcome = finalize(
        group_evaluation.as_ref().map(|e| e.calculated_score),
        individual_evaluation.calculated_score,
    );

    // retry_allowed 只做传递：个人评价优先，小组评价兜底，默认不允许
    let retry_allowed = individual_evaluation
        .retry_allowed
        .or_else(|| group_evaluation.as_ref().and_then(|e| e.retry_allowed))
        .unwrap_or(false);

    // 首次通过时颁发徽章（唯一索引保证幂等）
    let awarded_badges = if outcome.status == EvaluationStatus::Passed {
        award_badge_for(&storage, req.target_id, req.subject_id).await?
    } else {
        vec![]
    };

    let save = SaveFinalEvaluationRequest {
        subject_id: req.subject_id,
        target_id: req.target_id,
        group_score: outcome.group_score,
        individual_score: outcome.individual_score,
        final_score: outcome.final_score,
        final_percentage: outcome.final_percentage,
        status: outcome.status,
        badge_awarded: outcome.status == EvaluationStatus::Passed,
        retry_allowed,
        attempt_number: attempt,
    };

    match storage.save_final_evaluation(save).await {
        Ok(final_evaluation) => {
            info!(
                "Final evaluation saved for subject {} target {} attempt {}: {} ({:.2}%)",
                req.subject_id,
                req.target_id,
                attempt,
                final_evaluation.status,
                final_evaluation.final_percentage
            );
            let response = FinalEvaluationResponse {
                final_evaluation,
                awarded_badges,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "最终评价计算完成")))
        }
        Err(e) => Ok(storage_error_response("写入最终评价失败", &e)),
    }
}

/// 幂等颁发徽章并记录事件
async fn award_badge_for(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    subject_id: i64,
) -> ActixResult<Vec<crate::models::final_evaluations::entities::Badge>> {
    match storage.award_badge(student_id, subject_id).await {
        Ok(Some(badge)) => {
            // 徽章事件：推送与展示由平台通知服务消费
            info!(
                event = "badge_awarded",
                student_id, subject_id, "Badge awarded to student {student_id} for subject {subject_id}"
            );
            Ok(vec![badge])
        }
        Ok(None) => Ok(vec![]),
        Err(e) => {
            // 徽章颁发失败不阻断定稿，记录后继续
            tracing::error!("颁发徽章失败: {e}");
            Ok(vec![])
        }
    }
}
