use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::observation_cards::entities::StudentRole;

// 课题（被评价的项目单元，平台侧维护，这里只保留评价引擎需要的字段）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub team_based: bool,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 小组
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Team {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 小组成员（角色决定个人阶段的指标过滤）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct TeamMember {
    pub id: i64,
    pub team_id: i64,
    pub student_id: i64,
    pub role: StudentRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// 学生的小组归属（用于个人阶段前置校验与角色过滤）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct TeamMembership {
    pub team_id: i64,
    pub role: StudentRole,
}
