use serde::Deserialize;
use ts_rs::TS;

use crate::models::evaluations::entities::{SectionEvaluation, Selection};
use crate::models::observation_cards::entities::{EvaluationPhase, StudentRole};

// 提交小组阶段评价
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SubmitGroupEvaluationRequest {
    pub subject_id: i64,
    pub team_id: i64,
    pub submission_id: i64,
    pub selections: Vec<Selection>,
    pub feedback_summary: Option<String>,
    pub retry_allowed: Option<bool>,
}

// 提交个人答辩阶段评价
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SubmitIndividualEvaluationRequest {
    pub subject_id: i64,
    pub student_id: i64,
    pub submission_id: i64,
    pub selections: Vec<Selection>,
    pub feedback_summary: Option<String>,
    pub retry_allowed: Option<bool>,
}

// 分数预览（提交前的实时计算，与提交路径共用同一打分实现）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct PreviewScoreRequest {
    pub subject_id: i64,
    pub phase: EvaluationPhase,
    pub role: Option<StudentRole>,
    pub selections: Vec<Selection>,
}

// 流程状态查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationStateQuery {
    pub subject_id: i64,
    pub target_id: i64,
}

// 评价历史查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationHistoryQuery {
    pub subject_id: i64,
    pub target_id: i64,
}

// 单条评价查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationDetailQuery {
    pub subject_id: i64,
    pub phase: EvaluationPhase,
    pub target_id: i64,
    pub attempt_number: Option<i32>,
}

/// 阶段评价写入载荷（service 层组装，storage 层按唯一键 upsert）
///
/// 同一轮次重复提交会覆盖原评价（评价人订正），不会产生新轮次。
#[derive(Debug, Clone)]
pub struct SaveEvaluationRequest {
    pub subject_id: i64,
    pub phase: EvaluationPhase,
    pub target_id: i64,
    pub submission_id: i64,
    pub grader_id: i64,
    pub section_evaluations: Vec<SectionEvaluation>,
    pub feedback_summary: Option<String>,
    pub retry_allowed: Option<bool>,
    pub calculated_score: f64,
    pub attempt_number: i32,
}
