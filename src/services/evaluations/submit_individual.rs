use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EvaluationService;
use crate::models::evaluations::entities::group_selections;
use crate::models::evaluations::requests::{
    SaveEvaluationRequest, SubmitIndividualEvaluationRequest,
};
use crate::models::evaluations::responses::SubmitEvaluationResponse;
use crate::models::observation_cards::entities::{EvaluationPhase, StudentRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::{
    EvalError, compute_score, round_for_presentation, validate_structure,
    workflow::ensure_individual_submit_allowed,
};
use crate::services::observation_cards::detail::load_card_cached;
use crate::services::{eval_error_response, storage_error_response};
use crate::utils::validate::validate_feedback_summary;

/// 提交个人答辩阶段评价
///
/// 小组课题：学生的轮次跟随其小组，且当前轮次的小组评价必须已存在；
/// 指标按学生在小组中的角色过滤。非小组课题跳过这两条，不做角色过滤。
pub async fn submit_individual_evaluation(
    service: &EvaluationService,
    request: &HttpRequest,
    grader_id: i64,
    req: SubmitIndividualEvaluationRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    if let Some(feedback) = &req.feedback_summary {
        if let Err(e) = validate_feedback_summary(feedback) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, e)));
        }
    }

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

    // 小组课题：定位学生的小组，轮次与阶段门禁都挂在小组上
    let (workflow_target, role_filter): (i64, Option<StudentRole>) = if subject.team_based {
        match storage
            .get_team_for_student(req.subject_id, req.student_id)
            .await
        {
            Ok(Some(membership)) => (membership.team_id, Some(membership.role)),
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::TeamNotFound,
                    "该学生未加入此课题的任何小组",
                )));
            }
            Err(e) => return Ok(storage_error_response("查询学生小组归属失败", &e)),
        }
    } else {
        (req.student_id, None)
    };

    let workflow = match storage
        .get_or_create_workflow(req.subject_id, workflow_target)
        .await
    {
        Ok(workflow) => workflow,
        Err(e) => return Ok(storage_error_response("查询评价流程失败", &e)),
    };

    // 阶段门禁：小组课题必须先有当前轮次的小组评价
    if subject.team_based {
        let group_evaluation = match storage
            .get_evaluation(
                req.subject_id,
                EvaluationPhase::Group,
                workflow_target,
                workflow.current_attempt,
            )
            .await
        {
            Ok(evaluation) => evaluation,
            Err(e) => return Ok(storage_error_response("查询小组评价失败", &e)),
        };
        if let Err(err) =
            ensure_individual_submit_allowed(subject.team_based, group_evaluation.is_some())
        {
            return Ok(eval_error_response(err));
        }
    }

    // 个人答辩阶段观察卡必须已创建
    let card = match load_card_cached(
        &storage,
        &cache,
        req.subject_id,
        EvaluationPhase::IndividualOral,
    )
    .await
    {
        Ok(Some(card)) => card,
        Ok(None) => {
            return Ok(eval_error_response(EvalError::ObservationCardMissing {
                subject_id: req.subject_id,
                phase: EvaluationPhase::IndividualOral,
            }));
        }
        Err(e) => return Ok(storage_error_response("查询观察卡失败", &e)),
    };

    if let Err(issues) = validate_structure(&card.structure) {
        return Ok(eval_error_response(EvalError::Validation(issues)));
    }

    let score = match compute_score(&card.structure, &req.selections, role_filter) {
        Ok(score) => score,
        Err(err) => return Ok(eval_error_response(err)),
    };

    let save = SaveEvaluationRequest {
        subject_id: req.subject_id,
        phase: EvaluationPhase::IndividualOral,
        target_id: req.student_id,
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
                "Individual evaluation saved for subject {} student {} attempt {} (score {:.2})",
                req.subject_id, req.student_id, workflow.current_attempt, score
            );
            let response = SubmitEvaluationResponse {
                evaluation,
                score: round_for_presentation(score),
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(response, "个人评价提交成功")))
        }
        Err(e) => Ok(storage_error_response("写入个人评价失败", &e)),
    }
}
