use serde::Serialize;
use ts_rs::TS;

use crate::models::final_evaluations::entities::{Badge, FinalEvaluation};

/// 最终评价响应（附带本次新颁发的徽章）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct FinalEvaluationResponse {
    pub final_evaluation: FinalEvaluation,
    pub awarded_badges: Vec<Badge>,
}

/// 重试响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct AllowRetryResponse {
    pub subject_id: i64,
    pub target_id: i64,
    pub new_attempt_number: i32,
}

/// 最终评价历史响应（全部轮次，追加保留）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct FinalEvaluationHistoryResponse {
    pub items: Vec<FinalEvaluation>,
}
