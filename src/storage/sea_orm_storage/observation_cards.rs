//! 观察卡存储操作
//!
//! 结构列以 JSON 文本存储；(subject_id, phase) 唯一索引保证每个阶段一张卡。

use super::SeaOrmStorage;
use crate::entity::observation_cards::{ActiveModel, Column, Entity as ObservationCards, Model};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PaginationInfo,
    observation_cards::{
        entities::{CardStructure, EvaluationPhase, ObservationCard},
        requests::{
            CreateObservationCardRequest, ObservationCardListQuery, UpdateObservationCardRequest,
        },
        responses::ObservationCardListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl Model {
    pub(crate) fn try_into_observation_card(self) -> Result<ObservationCard> {
        let structure: CardStructure = serde_json::from_str(&self.structure).map_err(|e| {
            EvalSystemError::serialization(format!("观察卡结构反序列化失败: {e}"))
        })?;
        let phase: EvaluationPhase = self
            .phase
            .parse()
            .map_err(|e: String| EvalSystemError::serialization(e))?;
        Ok(ObservationCard {
            id: self.id,
            subject_id: self.subject_id,
            phase,
            structure,
            created_by: self.created_by,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: chrono::DateTime::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}

impl SeaOrmStorage {
    /// 创建观察卡
    pub async fn create_observation_card_impl(
        &self,
        created_by: i64,
        req: CreateObservationCardRequest,
    ) -> Result<ObservationCard> {
        let now = chrono::Utc::now().timestamp();
        let structure_json = serde_json::to_string(&req.structure)
            .map_err(|e| EvalSystemError::serialization(format!("观察卡结构序列化失败: {e}")))?;

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            phase: Set(req.phase.to_string()),
            structure: Set(structure_json),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if Self::is_unique_violation(&e) {
                EvalSystemError::concurrent_modification(format!(
                    "该课题的 {} 阶段已存在观察卡",
                    req.phase
                ))
            } else {
                EvalSystemError::database_operation(format!("创建观察卡失败: {e}"))
            }
        })?;

        result.try_into_observation_card()
    }

    /// 更新观察卡结构
    pub async fn update_observation_card_impl(
        &self,
        card_id: i64,
        update: UpdateObservationCardRequest,
    ) -> Result<Option<ObservationCard>> {
        let existing = ObservationCards::find_by_id(card_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询观察卡失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let structure_json = serde_json::to_string(&update.structure)
            .map_err(|e| EvalSystemError::serialization(format!("观察卡结构序列化失败: {e}")))?;

        let model = ActiveModel {
            id: Set(card_id),
            structure: Set(structure_json),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("更新观察卡失败: {e}")))?;

        self.get_observation_card_by_id_impl(card_id).await
    }

    /// 按 (课题, 阶段) 获取观察卡
    pub async fn get_observation_card_impl(
        &self,
        subject_id: i64,
        phase: EvaluationPhase,
    ) -> Result<Option<ObservationCard>> {
        let result = ObservationCards::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::Phase.eq(phase.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询观察卡失败: {e}")))?;

        result.map(|m| m.try_into_observation_card()).transpose()
    }

    /// 通过 ID 获取观察卡
    pub async fn get_observation_card_by_id_impl(
        &self,
        card_id: i64,
    ) -> Result<Option<ObservationCard>> {
        let result = ObservationCards::find_by_id(card_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询观察卡失败: {e}")))?;

        result.map(|m| m.try_into_observation_card()).transpose()
    }

    /// 列出观察卡（分页）
    pub async fn list_observation_cards_with_pagination_impl(
        &self,
        query: ObservationCardListQuery,
    ) -> Result<ObservationCardListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = ObservationCards::find();

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        if let Some(phase) = query.phase {
            select = select.filter(Column::Phase.eq(phase.to_string()));
        }

        select = select.order_by_desc(Column::UpdatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询观察卡总数失败: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询观察卡页数失败: {e}"))
        })?;

        let cards = paginator.fetch_page(page - 1).await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询观察卡列表失败: {e}"))
        })?;

        let items = cards
            .into_iter()
            .map(|m| m.try_into_observation_card())
            .collect::<Result<Vec<_>>>()?;

        Ok(ObservationCardListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 删除观察卡
    pub async fn delete_observation_card_impl(&self, card_id: i64) -> Result<bool> {
        let result = ObservationCards::delete_by_id(card_id)
            .exec(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除观察卡失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
