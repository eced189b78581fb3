use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EvaluationService;
use crate::models::evaluations::entities::group_selections;
use crate::models::evaluations::requests::{SaveEvaluationRequest, SubmitGroupEvaluationRequest};
use crate::models::evaluations::responses::SubmitEvaluationResponse;
use crate::models::observation_cards::entities::EvaluationPhase;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{
    EvalError, compute_score, round_for_presentation, validate_structure,
    workflow::ensure_group_submit_allowed,
};
use crate::services::observation_cards::detail::load_card_cached;
use crate::services::{eval_error_response, storage_error_response};
use crate::utils::validate::validate_feedback_summary;

/// 提交小组阶段评价
///
/// 评价对象是小组；同一轮次重复提交覆盖原评价（评价人订正）。
pub async fn submit_group_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    grader_id: i64,
    req: SubmitGroupEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    if let Some(feedback) = &req.feedback_summary {
        if let Err(e) = validate_feedback_summary(feedback) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, e)));
        }
    }

    // 课题必须存在且为小组课题
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

    if let Err(err) = ensure_group_submit_allowed(subject.team_based) {
        return Ok(eval_error_response(err));
    }

    // 小组必须属于该课题
    match storage.get_team_by_id(req.team_id).await {
        Ok(Some(team)) if team.subject_id == req.subject_id => {}
        Ok(Some(_)) | Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeamNotFound,
                "小组不存在或不属于该课题",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询小组失败", &e)),
    }

    // 小组阶段观察卡必须已创建
    let card = match load_card_cached(&storage, &cache, req.subject_id, EvaluationPhase::Group)
        .await
    {
        Ok(Some(card)) => card,
        Ok(None) => {
            return Ok(eval_error_response(EvalError::ObservationCardMissing {
                subject_id: req.subject_id,
                phase: EvaluationPhase::Group,
            }));
        }
        Err(e) => return Ok(storage_error_response("查询观察卡失败", &e)),
    };

    // 观察卡可编辑，打分前防御性地再校验一次
    if let Err(issues) = validate_structure(&card.structure) {
        return Ok(eval_error_response(EvalError::Validation(issues)));
    }

    // 小组阶段不做角色过滤，所有指标均适用
    let score = match compute_score(&card.structure, &req.selections, None) {
        Ok(score) => score,
        Err(err) => return Ok(eval_error_response(err)),
    };

    // 小组课题的轮次跟随小组
    let workflow = match storage
        .get_or_create_workflow(req.subject_id, req.team_id)
        .await
    {
        Ok(workflow) => workflow,
        Err(e) => return Ok(storage_error_response("查询评价流程失败", &e)),
    };

    let save = SaveEvaluationRequest {
        subject_id: req.subject_id,
        phase: EvaluationPhase::Group,
        target_id: req.team_id,
        submission_id: req.submission_id,
        grader_id,
        section_evaluations: group_selections(&req.selections),
        feedback_summary: req.feedback_summary,
        retry_allowed: req.retry_allowed,
        calculated_score: score,
        attempt_number: workflow.current_attempt,
    };

    match storage.save_evaluation(save).await {
        Ok(evaluation) => {
            info!(
                "Group evaluation saved for subject {} team {} attempt {} (score {:.2})",
                req.subject_id, req.team_id, workflow.current_attempt, score
            );
            let response = SubmitEvaluationResponse {
                evaluation,
                score: round_for_presentation(score),
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(response, "小组评价提交成功")))
        }
        Err(e) => Ok(storage_error_response("写入小组评价失败", &e)),
    }
}
