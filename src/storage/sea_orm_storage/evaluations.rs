//! 阶段评价与评价流程存储操作
//!
//! 评价按 (subject_id, phase, target_id, attempt_number) upsert：
//! 同轮次重复提交覆盖原记录（评价人订正），并发插入冲突由唯一索引兜底。

use super::SeaOrmStorage;
use crate::entity::evaluation_workflows::{
    ActiveModel as WorkflowActiveModel, Column as WorkflowColumn, Entity as EvaluationWorkflows,
};
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations, Model};
use crate::errors::{EvalSystemError, Result};
use crate::models::evaluations::{
    entities::{Evaluation, EvaluationWorkflowRecord, SectionEvaluation},
    requests::SaveEvaluationRequest,
};
use crate::models::observation_cards::entities::EvaluationPhase;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl Model {
    pub(crate) fn try_into_evaluation(self) -> Result<Evaluation> {
        let section_evaluations: Vec<SectionEvaluation> =
            serde_json::from_str(&self.section_evaluations).map_err(|e| {
                EvalSystemError::serialization(format!("评价选择反序列化失败: {e}"))
            })?;
        let phase: EvaluationPhase = self
            .phase
            .parse()
            .map_err(|e: String| EvalSystemError::serialization(e))?;
        Ok(Evaluation {
            id: self.id,
            subject_id: self.subject_id,
            phase,
            target_id: self.target_id,
            submission_id: self.submission_id,
            grader_id: self.grader_id,
            section_evaluations,
            feedback_summary: self.feedback_summary,
            retry_allowed: self.retry_allowed,
            calculated_score: self.calculated_score,
            attempt_number: self.attempt_number,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}

impl SeaOrmStorage {
    /// 写入阶段评价（同轮次覆盖）
    pub async fn save_evaluation_impl(&self, req: SaveEvaluationRequest) -> Result<Evaluation> {
        let now = chrono::Utc::now().timestamp();
        let sections_json = serde_json::to_string(&req.section_evaluations)
            .map_err(|e| EvalSystemError::serialization(format!("评价选择序列化失败: {e}")))?;

        let existing = Evaluations::find()
            .filter(Column::SubjectId.eq(req.subject_id))
            .filter(Column::Phase.eq(req.phase.to_string()))
            .filter(Column::TargetId.eq(req.target_id))
            .filter(Column::AttemptNumber.eq(req.attempt_number))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评价失败: {e}")))?;

        let result = match existing {
            // 同轮次订正：覆盖原评价
            Some(current) => {
                let model = ActiveModel {
                    id: Set(current.id),
                    submission_id: Set(req.submission_id),
                    grader_id: Set(req.grader_id),
                    section_evaluations: Set(sections_json),
                    feedback_summary: Set(req.feedback_summary),
                    retry_allowed: Set(req.retry_allowed),
                    calculated_score: Set(req.calculated_score),
                    created_at: Set(now),
                    ..Default::default()
                };
                model.update(&self.db).await.map_err(|e| {
                    EvalSystemError::database_operation(format!("更新评价失败: {e}"))
                })?
            }
            None => {
                let model = ActiveModel {
                    subject_id: Set(req.subject_id),
                    phase: Set(req.phase.to_string()),
                    target_id: Set(req.target_id),
                    submission_id: Set(req.submission_id),
                    grader_id: Set(req.grader_id),
                    section_evaluations: Set(sections_json),
                    feedback_summary: Set(req.feedback_summary),
                    retry_allowed: Set(req.retry_allowed),
                    calculated_score: Set(req.calculated_score),
                    attempt_number: Set(req.attempt_number),
                    created_at: Set(now),
                    ..Default::default()
                };
                model.insert(&self.db).await.map_err(|e| {
                    if Self::is_unique_violation(&e) {
                        EvalSystemError::concurrent_modification(
                            "同一轮次的评价已被其他评价人写入，请获取最新状态后重试",
                        )
                    } else {
                        EvalSystemError::database_operation(format!("写入评价失败: {e}"))
                    }
                })?
            }
        };

        result.try_into_evaluation()
    }

    /// 获取某轮次的阶段评价
    pub async fn get_evaluation_impl(
        &self,
        subject_id: i64,
        phase: EvaluationPhase,
        target_id: i64,
        attempt_number: i32,
    ) -> Result<Option<Evaluation>> {
        let result = Evaluations::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::Phase.eq(phase.to_string()))
            .filter(Column::TargetId.eq(target_id))
            .filter(Column::AttemptNumber.eq(attempt_number))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评价失败: {e}")))?;

        result.map(|m| m.try_into_evaluation()).transpose()
    }

    /// 列出某对象的全部阶段评价（按轮次、阶段排列）
    pub async fn list_evaluation_history_impl(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<Vec<Evaluation>> {
        let models = Evaluations::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::TargetId.eq(target_id))
            .order_by_asc(Column::AttemptNumber)
            .order_by_asc(Column::Phase)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评价历史失败: {e}")))?;

        models.into_iter().map(|m| m.try_into_evaluation()).collect()
    }

    /// 获取或创建评价流程记录
    pub async fn get_or_create_workflow_impl(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<EvaluationWorkflowRecord> {
        let existing = EvaluationWorkflows::find()
            .filter(WorkflowColumn::SubjectId.eq(subject_id))
            .filter(WorkflowColumn::TargetId.eq(target_id))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评价流程失败: {e}")))?;

        if let Some(workflow) = existing {
            return Ok(EvaluationWorkflowRecord {
                subject_id: workflow.subject_id,
                target_id: workflow.target_id,
                current_attempt: workflow.current_attempt,
            });
        }

        let model = WorkflowActiveModel {
            subject_id: Set(subject_id),
            target_id: Set(target_id),
            current_attempt: Set(1),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(workflow) => Ok(EvaluationWorkflowRecord {
                subject_id: workflow.subject_id,
                target_id: workflow.target_id,
                current_attempt: workflow.current_attempt,
            }),
            // 并发创建时读回已有记录即可
            Err(e) if Self::is_unique_violation(&e) => {
                let workflow = EvaluationWorkflows::find()
                    .filter(WorkflowColumn::SubjectId.eq(subject_id))
                    .filter(WorkflowColumn::TargetId.eq(target_id))
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        EvalSystemError::database_operation(format!("查询评价流程失败: {e}"))
                    })?
                    .ok_or_else(|| {
                        EvalSystemError::database_operation("评价流程记录创建后未找到")
                    })?;
                Ok(EvaluationWorkflowRecord {
                    subject_id: workflow.subject_id,
                    target_id: workflow.target_id,
                    current_attempt: workflow.current_attempt,
                })
            }
            Err(e) => Err(EvalSystemError::database_operation(format!(
                "创建评价流程失败: {e}"
            ))),
        }
    }

    /// 轮次 +1（重试）
    pub async fn increment_workflow_attempt_impl(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<EvaluationWorkflowRecord> {
        let workflow = EvaluationWorkflows::find()
            .filter(WorkflowColumn::SubjectId.eq(subject_id))
            .filter(WorkflowColumn::TargetId.eq(target_id))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评价流程失败: {e}")))?
            .ok_or_else(|| EvalSystemError::not_found("评价流程记录不存在"))?;

        let next_attempt = workflow.current_attempt + 1;
        let model = WorkflowActiveModel {
            id: Set(workflow.id),
            current_attempt: Set(next_attempt),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("更新评价流程失败: {e}")))?;

        Ok(EvaluationWorkflowRecord {
            subject_id: updated.subject_id,
            target_id: updated.target_id,
            current_attempt: updated.current_attempt,
        })
    }
}
