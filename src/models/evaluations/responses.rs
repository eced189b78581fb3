use serde::Serialize;
use ts_rs::TS;

use crate::models::evaluations::entities::Evaluation;
use crate::scoring::WorkflowState;

/// 分数预览响应（展示值保留两位小数）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct PreviewScoreResponse {
    pub score: f64,
}

/// 评价提交响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SubmitEvaluationResponse {
    pub evaluation: Evaluation,
    pub score: f64,
}

/// 流程状态响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationStateResponse {
    pub state: WorkflowState,
    pub team_based: bool,
    pub current_attempt: i32,
    pub has_group_evaluation: bool,
    pub has_individual_evaluation: bool,
    pub finalized: bool,
}

/// 评价历史响应（按轮次与阶段排列，无分页）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationHistoryResponse {
    pub items: Vec<Evaluation>,
}
