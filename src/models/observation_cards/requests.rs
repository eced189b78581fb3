use serde::Deserialize;
use ts_rs::TS;

use super::entities::{CardStructure, EvaluationPhase};

// 创建观察卡请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct CreateObservationCardRequest {
    pub subject_id: i64,
    pub phase: EvaluationPhase,
    pub structure: CardStructure,
}

// 更新观察卡请求（仅结构可变）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct UpdateObservationCardRequest {
    pub structure: CardStructure,
}

// 校验观察卡请求（纯校验，不落库）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct ValidateObservationCardRequest {
    pub structure: CardStructure,
}

// 观察卡列表查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct ObservationCardListQuery {
    pub subject_id: Option<i64>,
    pub phase: Option<EvaluationPhase>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
