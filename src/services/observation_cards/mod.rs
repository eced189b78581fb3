pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;
pub mod validate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::observation_cards::requests::{
    CreateObservationCardRequest, ObservationCardListQuery, UpdateObservationCardRequest,
    ValidateObservationCardRequest,
};
use crate::storage::Storage;

pub struct ObservationCardService {
    storage: Option<Arc<dyn Storage>>,
}

impl ObservationCardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    /// 校验观察卡（纯校验，不落库）
    pub async fn validate_card(
        &self,
        request: &HttpRequest,
        req: ValidateObservationCardRequest,
    ) -> ActixResult<HttpResponse> {
        validate::validate_card(self, request, req).await
    }

    /// 创建观察卡
    pub async fn create_card(
        &self,
        request: &HttpRequest,
        created_by: i64,
        req: CreateObservationCardRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_card(self, request, created_by, req).await
    }

    /// 更新观察卡结构
    pub async fn update_card(
        &self,
        request: &HttpRequest,
        card_id: i64,
        req: UpdateObservationCardRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_card(self, request, card_id, req).await
    }

    /// 获取观察卡详情
    pub async fn get_card(&self, request: &HttpRequest, card_id: i64) -> ActixResult<HttpResponse> {
        detail::get_card(self, request, card_id).await
    }

    /// 按 (课题, 阶段) 获取观察卡
    pub async fn get_card_by_phase(
        &self,
        request: &HttpRequest,
        subject_id: i64,
        phase: &str,
    ) -> ActixResult<HttpResponse> {
        detail::get_card_by_phase(self, request, subject_id, phase).await
    }

    /// 列出观察卡
    pub async fn list_cards(
        &self,
        request: &HttpRequest,
        query: ObservationCardListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_cards(self, request, query).await
    }

    /// 删除观察卡
    pub async fn delete_card(
        &self,
        request: &HttpRequest,
        card_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_card(self, request, card_id).await
    }
}
