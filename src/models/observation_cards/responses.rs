use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::observation_cards::entities::ObservationCard;
use crate::scoring::ValidationIssue;

/// 观察卡校验结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

/// 观察卡列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct ObservationCardListResponse {
    pub items: Vec<ObservationCard>,
    pub pagination: PaginationInfo,
}
