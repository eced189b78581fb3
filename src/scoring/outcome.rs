//! 最终结果计算
//!
//! 小组课题：最终得分 = 小组分 + 个人分，折算百分比 = 最终得分 / 200 × 100；
//! 非小组课题：最终得分 = 个人分，折算百分比即个人分。
//! 通过线是固定常量，不随观察卡配置。

use crate::models::final_evaluations::entities::EvaluationStatus;

/// 通过线（按折算百分比）
pub const PASS_THRESHOLD: f64 = 60.0;

/// 一次定稿的计算结果（不含持久化字段）
#[derive(Debug, Clone, PartialEq)]
pub struct FinalOutcome {
    pub group_score: Option<f64>,
    pub individual_score: f64,
    pub final_score: f64,
    pub final_percentage: f64,
    pub status: EvaluationStatus,
}

/// 合并阶段得分并判定通过与否
///
/// `retry_allowed` 由评价人在阶段评价中显式记录，这里只做传递，
/// 因此不出现在本函数签名中。
pub fn finalize(group_score: Option<f64>, individual_score: f64) -> FinalOutcome {
    let (final_score, final_percentage) = match group_score {
        Some(group) => {
            let total = group + individual_score;
            (total, total / 200.0 * 100.0)
        }
        None => (individual_score, individual_score / 100.0 * 100.0),
    };

    let status = if final_percentage >= PASS_THRESHOLD {
        EvaluationStatus::Passed
    } else {
        EvaluationStatus::Failed
    };

    FinalOutcome {
        group_score,
        individual_score,
        final_score,
        final_percentage,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 小组 70 + 个人 50 = 120 / 200 = 60%，恰好压线通过
    #[test]
    fn test_team_outcome_on_threshold_passes() {
        let outcome = finalize(Some(70.0), 50.0);
        assert_eq!(outcome.final_score, 120.0);
        assert!((outcome.final_percentage - 60.0).abs() < 1e-9);
        assert_eq!(outcome.status, EvaluationStatus::Passed);
    }

    /// 个人课题 55 分未过线
    #[test]
    fn test_individual_outcome_below_threshold_fails() {
        let outcome = finalize(None, 55.0);
        assert_eq!(outcome.final_score, 55.0);
        assert!((outcome.final_percentage - 55.0).abs() < 1e-9);
        assert_eq!(outcome.status, EvaluationStatus::Failed);
    }

    #[test]
    fn test_team_outcome_below_threshold_fails() {
        let outcome = finalize(Some(50.0), 60.0);
        assert!((outcome.final_percentage - 55.0).abs() < 1e-9);
        assert_eq!(outcome.status, EvaluationStatus::Failed);
    }

    #[test]
    fn test_individual_outcome_full_marks() {
        let outcome = finalize(None, 100.0);
        assert!((outcome.final_percentage - 100.0).abs() < 1e-9);
        assert_eq!(outcome.status, EvaluationStatus::Passed);
    }

    /// 纯函数：重复计算结果一致（定稿按轮次幂等的基础）
    #[test]
    fn test_finalize_is_pure() {
        assert_eq!(finalize(Some(70.0), 50.0), finalize(Some(70.0), 50.0));
    }
}
