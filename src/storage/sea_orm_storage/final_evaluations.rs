//! 最终评价存储操作

use super::SeaOrmStorage;
use crate::entity::final_evaluations::{ActiveModel, Column, Entity as FinalEvaluations, Model};
use crate::errors::{EvalSystemError, Result};
use crate::models::final_evaluations::{
    entities::{EvaluationStatus, FinalEvaluation},
    requests::SaveFinalEvaluationRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl Model {
    pub(crate) fn try_into_final_evaluation(self) -> Result<FinalEvaluation> {
        let status: EvaluationStatus = self
            .status
            .parse()
            .map_err(|e: String| EvalSystemError::serialization(e))?;
        Ok(FinalEvaluation {
            id: self.id,
            subject_id: self.subject_id,
            target_id: self.target_id,
            group_score: self.group_score,
            individual_score: self.individual_score,
            final_score: self.final_score,
            final_percentage: self.final_percentage,
            status,
            badge_awarded: self.badge_awarded,
            retry_allowed: self.retry_allowed,
            attempt_number: self.attempt_number,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}

impl SeaOrmStorage {
    /// 写入最终评价（同轮次重算覆盖）
    pub async fn save_final_evaluation_impl(
        &self,
        req: SaveFinalEvaluationRequest,
    ) -> Result<FinalEvaluation> {
        let now = chrono::Utc::now().timestamp();

        let existing = FinalEvaluations::find()
            .filter(Column::SubjectId.eq(req.subject_id))
            .filter(Column::TargetId.eq(req.target_id))
            .filter(Column::AttemptNumber.eq(req.attempt_number))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询最终评价失败: {e}")))?;

        let result = match existing {
            Some(current) => {
                let model = ActiveModel {
                    id: Set(current.id),
                    group_score: Set(req.group_score),
                    individual_score: Set(req.individual_score),
                    final_score: Set(req.final_score),
                    final_percentage: Set(req.final_percentage),
                    status: Set(req.status.to_string()),
                    badge_awarded: Set(req.badge_awarded),
                    retry_allowed: Set(req.retry_allowed),
                    created_at: Set(now),
                    ..Default::default()
                };
                model.update(&self.db).await.map_err(|e| {
                    EvalSystemError::database_operation(format!("更新最终评价失败: {e}"))
                })?
            }
            None => {
                let model = ActiveModel {
                    subject_id: Set(req.subject_id),
                    target_id: Set(req.target_id),
                    group_score: Set(req.group_score),
                    individual_score: Set(req.individual_score),
                    final_score: Set(req.final_score),
                    final_percentage: Set(req.final_percentage),
                    status: Set(req.status.to_string()),
                    badge_awarded: Set(req.badge_awarded),
                    retry_allowed: Set(req.retry_allowed),
                    attempt_number: Set(req.attempt_number),
                    created_at: Set(now),
                    ..Default::default()
                };
                model.insert(&self.db).await.map_err(|e| {
                    if Self::is_unique_violation(&e) {
                        EvalSystemError::concurrent_modification(
                            "同一轮次的最终评价已被写入，请获取最新状态后重试",
                        )
                    } else {
                        EvalSystemError::database_operation(format!("写入最终评价失败: {e}"))
                    }
                })?
            }
        };

        result.try_into_final_evaluation()
    }

    /// 获取某轮次的最终评价
    pub async fn get_final_evaluation_impl(
        &self,
        subject_id: i64,
        target_id: i64,
        attempt_number: i32,
    ) -> Result<Option<FinalEvaluation>> {
        let result = FinalEvaluations::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::TargetId.eq(target_id))
            .filter(Column::AttemptNumber.eq(attempt_number))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询最终评价失败: {e}")))?;

        result.map(|m| m.try_into_final_evaluation()).transpose()
    }

    /// 列出某对象的全部最终评价（所有轮次，追加保留）
    pub async fn list_final_evaluation_history_impl(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<Vec<FinalEvaluation>> {
        let models = FinalEvaluations::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::TargetId.eq(target_id))
            .order_by_asc(Column::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| {
                EvalSystemError::database_operation(format!("查询最终评价历史失败: {e}"))
            })?;

        models
            .into_iter()
            .map(|m| m.try_into_final_evaluation())
            .collect()
    }
}
