use std::sync::Arc;

use crate::models::{
    evaluations::{
        entities::{Evaluation, EvaluationWorkflowRecord},
        requests::SaveEvaluationRequest,
    },
    final_evaluations::{
        entities::{Badge, FinalEvaluation},
        requests::SaveFinalEvaluationRequest,
    },
    observation_cards::{
        entities::{EvaluationPhase, ObservationCard},
        requests::{
            CreateObservationCardRequest, ObservationCardListQuery, UpdateObservationCardRequest,
        },
        responses::ObservationCardListResponse,
    },
    subjects::{
        entities::{Subject, Team, TeamMember, TeamMembership},
        requests::{CreateSubjectRequest, CreateTeamRequest, SubjectListQuery},
        responses::SubjectListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 课题管理方法
    // 创建课题
    async fn create_subject(&self, created_by: i64, subject: CreateSubjectRequest)
    -> Result<Subject>;
    // 通过ID获取课题信息
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    // 列出课题
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;

    /// 小组管理方法
    // 创建小组（含成员）
    async fn create_team(&self, team: CreateTeamRequest) -> Result<Team>;
    // 通过ID获取小组信息
    async fn get_team_by_id(&self, team_id: i64) -> Result<Option<Team>>;
    // 列出小组成员
    async fn list_team_members(&self, team_id: i64) -> Result<Vec<TeamMember>>;
    // 查找学生在某课题下的小组归属（个人阶段前置校验与角色过滤用）
    async fn get_team_for_student(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Option<TeamMembership>>;

    /// 观察卡管理方法
    // 创建观察卡
    async fn create_observation_card(
        &self,
        created_by: i64,
        card: CreateObservationCardRequest,
    ) -> Result<ObservationCard>;
    // 更新观察卡结构
    async fn update_observation_card(
        &self,
        card_id: i64,
        update: UpdateObservationCardRequest,
    ) -> Result<Option<ObservationCard>>;
    // 按 (课题, 阶段) 获取观察卡
    async fn get_observation_card(
        &self,
        subject_id: i64,
        phase: EvaluationPhase,
    ) -> Result<Option<ObservationCard>>;
    // 通过ID获取观察卡
    async fn get_observation_card_by_id(&self, card_id: i64) -> Result<Option<ObservationCard>>;
    // 列出观察卡
    async fn list_observation_cards_with_pagination(
        &self,
        query: ObservationCardListQuery,
    ) -> Result<ObservationCardListResponse>;
    // 删除观察卡
    async fn delete_observation_card(&self, card_id: i64) -> Result<bool>;

    /// 阶段评价方法
    // 按唯一键写入阶段评价（同轮次覆盖；并发插入冲突返回 ConcurrentModification）
    async fn save_evaluation(&self, evaluation: SaveEvaluationRequest) -> Result<Evaluation>;
    // 获取某轮次的阶段评价
    async fn get_evaluation(
        &self,
        subject_id: i64,
        phase: EvaluationPhase,
        target_id: i64,
        attempt_number: i32,
    ) -> Result<Option<Evaluation>>;
    // 列出某对象的全部阶段评价（所有轮次）
    async fn list_evaluation_history(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<Vec<Evaluation>>;

    /// 评价流程方法
    // 获取或创建流程记录（首次创建时轮次为 1）
    async fn get_or_create_workflow(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<EvaluationWorkflowRecord>;
    // 轮次 +1（重试），返回新轮次
    async fn increment_workflow_attempt(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<EvaluationWorkflowRecord>;

    /// 最终评价方法
    // 按 (课题, 对象, 轮次) 写入最终评价（重算覆盖）
    async fn save_final_evaluation(
        &self,
        record: SaveFinalEvaluationRequest,
    ) -> Result<FinalEvaluation>;
    // 获取某轮次的最终评价
    async fn get_final_evaluation(
        &self,
        subject_id: i64,
        target_id: i64,
        attempt_number: i32,
    ) -> Result<Option<FinalEvaluation>>;
    // 列出某对象的全部最终评价（所有轮次）
    async fn list_final_evaluation_history(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<Vec<FinalEvaluation>>;

    /// 徽章方法
    // 幂等颁发徽章；已有徽章时返回 None
    async fn award_badge(&self, student_id: i64, subject_id: i64) -> Result<Option<Badge>>;
    // 查询徽章
    async fn get_badge(&self, student_id: i64, subject_id: i64) -> Result<Option<Badge>>;
    // 列出学生的全部徽章
    async fn list_badges_for_student(&self, student_id: i64) -> Result<Vec<Badge>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
