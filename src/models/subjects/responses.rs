use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::subjects::entities::{Subject, Team, TeamMember};

/// 课题列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectListResponse {
    pub items: Vec<Subject>,
    pub pagination: PaginationInfo,
}

/// 小组详情响应（含成员）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct TeamDetailResponse {
    pub team: Team,
    pub members: Vec<TeamMember>,
}
