//! 评价阶段状态机
//!
//! 状态不单独持久化，而是由已存在的评价记录推导：
//! 小组评价、个人评价、最终评价各自存在与否 + 当前轮次，唯一确定状态。
//! 非小组课题的「小组阶段」视为天然满足，直接进入个人阶段。

use serde::Serialize;
use ts_rs::TS;

use crate::models::final_evaluations::entities::{EvaluationStatus, FinalEvaluation};
use crate::scoring::EvalError;

/// 一个 (课题, 对象) 的流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/scoring.ts")]
pub enum WorkflowState {
    NotStarted,
    GroupInProgress,
    GroupComplete,
    IndividualInProgress,
    IndividualComplete,
    Finalized,
}

/// 推导状态所需的记录快照（当前轮次）
#[derive(Debug, Clone, Copy)]
pub struct PhaseSnapshot {
    pub team_based: bool,
    pub current_attempt: i32,
    pub has_group_evaluation: bool,
    pub has_individual_evaluation: bool,
    pub has_final_evaluation: bool,
}

/// 由记录快照推导当前状态
pub fn derive_state(snapshot: &PhaseSnapshot) -> WorkflowState {
    if snapshot.has_final_evaluation {
        return WorkflowState::Finalized;
    }
    if snapshot.has_individual_evaluation {
        return WorkflowState::IndividualComplete;
    }
    if snapshot.team_based {
        if snapshot.has_group_evaluation {
            return WorkflowState::GroupComplete;
        }
        // 重试后回到小组阶段；首轮尚未开始
        if snapshot.current_attempt > 1 {
            WorkflowState::GroupInProgress
        } else {
            WorkflowState::NotStarted
        }
    } else {
        // 非小组课题的小组阶段视为已满足，直接处于个人阶段
        WorkflowState::IndividualInProgress
    }
}

/// 小组评价只对小组课题开放
pub fn ensure_group_submit_allowed(team_based: bool) -> Result<(), EvalError> {
    if team_based {
        Ok(())
    } else {
        Err(EvalError::PhaseOrderViolation(
            "非小组课题没有小组评价阶段".to_string(),
        ))
    }
}

/// 个人评价的前置校验：小组课题必须先有当前轮次的小组评价
pub fn ensure_individual_submit_allowed(
    team_based: bool,
    has_group_evaluation: bool,
) -> Result<(), EvalError> {
    if team_based && !has_group_evaluation {
        return Err(EvalError::PhaseOrderViolation(
            "当前轮次的小组评价尚未提交，不能进行个人评价".to_string(),
        ));
    }
    Ok(())
}

/// 定稿的前置校验：所需阶段评价必须齐全
pub fn ensure_finalize_allowed(
    team_based: bool,
    has_group_evaluation: bool,
    has_individual_evaluation: bool,
) -> Result<(), EvalError> {
    if team_based && !has_group_evaluation {
        return Err(EvalError::PhaseOrderViolation(
            "当前轮次的小组评价尚未提交，不能计算最终评价".to_string(),
        ));
    }
    if !has_individual_evaluation {
        return Err(EvalError::PhaseOrderViolation(
            "当前轮次的个人评价尚未提交，不能计算最终评价".to_string(),
        ));
    }
    Ok(())
}

/// 重试的前置校验：仅在最终评价为未通过且评价人允许重试时开放
pub fn ensure_retry_allowed(final_evaluation: &FinalEvaluation) -> Result<(), EvalError> {
    if final_evaluation.status != EvaluationStatus::Failed {
        return Err(EvalError::RetryNotAllowed(
            "最终评价已通过，无需重试".to_string(),
        ));
    }
    if !final_evaluation.retry_allowed {
        return Err(EvalError::RetryNotAllowed(
            "评价人未允许本次重试".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(
        team_based: bool,
        attempt: i32,
        group: bool,
        individual: bool,
        final_eval: bool,
    ) -> PhaseSnapshot {
        PhaseSnapshot {
            team_based,
            current_attempt: attempt,
            has_group_evaluation: group,
            has_individual_evaluation: individual,
            has_final_evaluation: final_eval,
        }
    }

    fn final_evaluation(status: EvaluationStatus, retry_allowed: bool) -> FinalEvaluation {
        FinalEvaluation {
            id: 1,
            subject_id: 1,
            target_id: 1,
            group_score: None,
            individual_score: 55.0,
            final_score: 55.0,
            final_percentage: 55.0,
            status,
            badge_awarded: false,
            retry_allowed,
            attempt_number: 1,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_team_state_progression() {
        assert_eq!(
            derive_state(&snapshot(true, 1, false, false, false)),
            WorkflowState::NotStarted
        );
        assert_eq!(
            derive_state(&snapshot(true, 1, true, false, false)),
            WorkflowState::GroupComplete
        );
        assert_eq!(
            derive_state(&snapshot(true, 1, true, true, false)),
            WorkflowState::IndividualComplete
        );
        assert_eq!(
            derive_state(&snapshot(true, 1, true, true, true)),
            WorkflowState::Finalized
        );
    }

    #[test]
    fn test_retry_reopens_team_workflow() {
        assert_eq!(
            derive_state(&snapshot(true, 2, false, false, false)),
            WorkflowState::GroupInProgress
        );
    }

    #[test]
    fn test_individual_subject_skips_group_phase() {
        assert_eq!(
            derive_state(&snapshot(false, 1, false, false, false)),
            WorkflowState::IndividualInProgress
        );
        assert_eq!(
            derive_state(&snapshot(false, 1, false, true, false)),
            WorkflowState::IndividualComplete
        );
    }

    #[test]
    fn test_group_submit_rejected_for_individual_subject() {
        assert!(ensure_group_submit_allowed(false).is_err());
        assert!(ensure_group_submit_allowed(true).is_ok());
    }

    #[test]
    fn test_individual_gated_on_group_for_team_subject() {
        let err = ensure_individual_submit_allowed(true, false).unwrap_err();
        assert!(matches!(err, EvalError::PhaseOrderViolation(_)));
        assert!(ensure_individual_submit_allowed(true, true).is_ok());
    }

    #[test]
    fn test_individual_not_gated_for_individual_subject() {
        assert!(ensure_individual_submit_allowed(false, false).is_ok());
    }

    #[test]
    fn test_finalize_requires_all_phases() {
        assert!(ensure_finalize_allowed(true, false, true).is_err());
        assert!(ensure_finalize_allowed(true, true, false).is_err());
        assert!(ensure_finalize_allowed(true, true, true).is_ok());
        // 非小组课题只需要个人评价
        assert!(ensure_finalize_allowed(false, false, true).is_ok());
    }

    #[test]
    fn test_retry_only_when_failed_and_allowed() {
        assert!(ensure_retry_allowed(&final_evaluation(EvaluationStatus::Failed, true)).is_ok());
        assert!(ensure_retry_allowed(&final_evaluation(EvaluationStatus::Failed, false)).is_err());
        assert!(ensure_retry_allowed(&final_evaluation(EvaluationStatus::Passed, true)).is_err());
    }
}
