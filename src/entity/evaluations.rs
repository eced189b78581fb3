//! 阶段评价实体
//!
//! (subject_id, phase, target_id, attempt_number) 上有唯一索引，
//! 并发写入冲突由该索引兜底。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_id: i64,
    pub phase: String,
    pub target_id: i64,
    pub submission_id: i64,
    pub grader_id: i64,
    #[sea_orm(column_type = "Text")]
    pub section_evaluations: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback_summary: Option<String>,
    pub retry_allowed: Option<bool>,
    pub calculated_score: f64,
    pub attempt_number: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
