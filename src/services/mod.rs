pub mod evaluations;
pub mod final_evaluations;
pub mod observation_cards;
pub mod subjects;

pub use evaluations::EvaluationService;
pub use final_evaluations::FinalEvaluationService;
pub use observation_cards::ObservationCardService;
pub use subjects::SubjectService;

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::EvalSystemError;
use crate::models::{ApiResponse, ErrorCode};
use crate::scoring::EvalError;

/// 把打分核心的结构化错误映射为统一响应
///
/// 校验类错误把全部问题放进 data，评价人一次就能改完。
pub(crate) fn eval_error_response(err: EvalError) -> HttpResponse {
    match err {
        EvalError::Validation(issues) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error(ErrorCode::ValidationFailed, issues, "观察卡或评价选择不合法"),
        ),
        EvalError::CriterionRequired(missing) => {
            HttpResponse::UnprocessableEntity().json(ApiResponse::error(
                ErrorCode::CriterionRequired,
                missing,
                "以下适用指标缺少选择",
            ))
        }
        EvalError::ObservationCardMissing { subject_id, phase } => {
            HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::ObservationCardMissing,
                format!("课题 {subject_id} 的 {phase} 阶段尚未创建观察卡"),
            ))
        }
        EvalError::PhaseOrderViolation(detail) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::PhaseOrderViolation, detail),
        ),
        EvalError::RetryNotAllowed(detail) => HttpResponse::UnprocessableEntity()
            .json(ApiResponse::error_empty(ErrorCode::RetryNotAllowed, detail)),
    }
}

/// 把存储层错误映射为统一响应
///
/// 唯一约束冲突单独给 409，提示调用方携带最新状态重试。
pub(crate) fn storage_error_response(context: &str, err: &EvalSystemError) -> HttpResponse {
    if err.is_conflict() {
        return HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ConcurrentModification,
            err.message(),
        ));
    }
    error!("{context}: {err}");
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {err}"),
    ))
}
