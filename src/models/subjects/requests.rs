use serde::Deserialize;
use ts_rs::TS;

use crate::models::observation_cards::entities::StudentRole;

// 创建课题请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub team_based: bool,
}

// 创建小组请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateTeamRequest {
    pub subject_id: i64,
    pub name: String,
    pub members: Vec<CreateTeamMemberRequest>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateTeamMemberRequest {
    pub student_id: i64,
    pub role: StudentRole,
}

// 课题列表查询
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub team_based: Option<bool>,
}
