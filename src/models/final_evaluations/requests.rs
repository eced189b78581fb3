use serde::Deserialize;
use ts_rs::TS;

// 计算最终评价请求（显式触发，按当前轮次幂等）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct CalculateFinalRequest {
    pub subject_id: i64,
    pub target_id: i64,
}

// 允许重试请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct AllowRetryRequest {
    pub subject_id: i64,
    pub target_id: i64,
}

// 最终评价查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct FinalEvaluationQuery {
    pub subject_id: i64,
    pub target_id: i64,
}

/// 最终评价写入载荷（按 (课题, 对象, 轮次) upsert，重算覆盖当前轮次）
#[derive(Debug, Clone)]
pub struct SaveFinalEvaluationRequest {
    pub subject_id: i64,
    pub target_id: i64,
    pub group_score: Option<f64>,
    pub individual_score: f64,
    pub final_score: f64,
    pub final_percentage: f64,
    pub status: crate::models::final_evaluations::entities::EvaluationStatus,
    pub badge_awarded: bool,
    pub retry_allowed: bool,
    pub attempt_number: i32,
}
