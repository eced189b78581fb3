//! 打分核心的结构化错误
//!
//! 所有错误都是值，不用于控制流；校验类错误一次性返回全部问题，
//! 便于评价人一次改完。

use std::fmt;

use serde::Serialize;
use ts_rs::TS;

use crate::models::observation_cards::entities::EvaluationPhase;

/// 单条校验问题（定位 + 描述）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/scoring.ts")]
pub struct ValidationIssue {
    pub location: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// 缺少选择的适用指标
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/scoring.ts")]
pub struct MissingCriterion {
    pub section_name: String,
    pub criterion_name: String,
}

/// 打分与流程错误
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// 观察卡或选择不合法（全部问题一次返回）
    Validation(Vec<ValidationIssue>),
    /// 适用指标缺少选择（全部缺项一次返回）
    CriterionRequired(Vec<MissingCriterion>),
    /// 请求的阶段没有观察卡
    ObservationCardMissing {
        subject_id: i64,
        phase: EvaluationPhase,
    },
    /// 阶段顺序不满足（小组课题需先完成小组评价）
    PhaseOrderViolation(String),
    /// 当前最终评价不允许重试
    RetryNotAllowed(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Validation(issues) => {
                write!(f, "validation failed with {} issue(s)", issues.len())
            }
            EvalError::CriterionRequired(missing) => {
                write!(f, "{} applicable criteria missing a selection", missing.len())
            }
            EvalError::ObservationCardMissing { subject_id, phase } => {
                write!(
                    f,
                    "no observation card for subject {subject_id} phase {phase}"
                )
            }
            EvalError::PhaseOrderViolation(detail) => {
                write!(f, "phase order violation: {detail}")
            }
            EvalError::RetryNotAllowed(detail) => write!(f, "retry not allowed: {detail}"),
        }
    }
}

impl std::error::Error for EvalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_counts_all_issues() {
        let err = EvalError::Validation(vec![
            ValidationIssue::new("card", "weights do not sum to 100"),
            ValidationIssue::new("section \"quality\"", "duplicate criterion name"),
        ]);
        assert!(err.to_string().contains("2 issue(s)"));
    }

    #[test]
    fn test_display_missing_criteria() {
        let err = EvalError::CriterionRequired(vec![MissingCriterion {
            section_name: "quality".into(),
            criterion_name: "clarity".into(),
        }]);
        assert!(err.to_string().contains("1 applicable criteria"));
    }
}
