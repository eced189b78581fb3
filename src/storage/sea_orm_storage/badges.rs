//! 徽章存储操作
//!
//! 颁发走 check-then-create，(student_id, subject_id) 唯一索引兜底并发，
//! 重复颁发在任何路径下都不会产生第二条记录。

use super::SeaOrmStorage;
use crate::entity::badges::{ActiveModel, Column, Entity as Badges, Model};
use crate::errors::{EvalSystemError, Result};
use crate::models::final_evaluations::entities::Badge;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl Model {
    pub(crate) fn into_badge(self) -> Badge {
        Badge {
            id: self.id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            awarded_at: chrono::DateTime::from_timestamp(self.awarded_at, 0).unwrap_or_default(),
        }
    }
}

impl SeaOrmStorage {
    /// 幂等颁发徽章；已有徽章时返回 None
    pub async fn award_badge_impl(
        &self,
        student_id: i64,
        subject_id: i64,
    ) -> Result<Option<Badge>> {
        if self.get_badge_impl(student_id, subject_id).await?.is_some() {
            return Ok(None);
        }

        let model = ActiveModel {
            student_id: Set(student_id),
            subject_id: Set(subject_id),
            awarded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(badge) => Ok(Some(badge.into_badge())),
            // 并发颁发：另一个写入已成功，视为已颁发
            Err(e) if Self::is_unique_violation(&e) => Ok(None),
            Err(e) => Err(EvalSystemError::database_operation(format!(
                "颁发徽章失败: {e}"
            ))),
        }
    }

    /// 查询徽章
    pub async fn get_badge_impl(&self, student_id: i64, subject_id: i64) -> Result<Option<Badge>> {
        let result = Badges::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询徽章失败: {e}")))?;

        Ok(result.map(|m| m.into_badge()))
    }

    /// 列出学生的全部徽章
    pub async fn list_badges_for_student_impl(&self, student_id: i64) -> Result<Vec<Badge>> {
        let models = Badges::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::AwardedAt)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询徽章列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_badge()).collect())
    }
}
