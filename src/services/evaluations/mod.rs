pub mod detail;
pub mod history;
pub mod preview;
pub mod state;
pub mod submit_group;
pub mod submit_individual;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::evaluations::requests::{
    EvaluationDetailQuery, EvaluationHistoryQuery, EvaluationStateQuery, PreviewScoreRequest,
    SubmitGroupEvaluationRequest, SubmitIndividualEvaluationRequest,
};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
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

    /// 提交小组阶段评价
    pub async fn submit_group_evaluation(
        &self,
        request: &HttpRequest,
        grader_id: i64,
        req: SubmitGroupEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        submit_group::submit_group_evaluation(self, request, grader_id, req).await
    }

    /// 提交个人答辩阶段评价
    pub async fn submit_individual_evaluation(
        &self,
        request: &HttpRequest,
        grader_id: i64,
        req: SubmitIndividualEvaluationRequest,
    ) -> ActixResult<HttpResponse> {
        submit_individual::submit_individual_evaluation(self, request, grader_id, req).await
    }

    /// 分数预览（与提交路径共用打分实现）
    pub async fn preview_score(
        &self,
        request: &HttpRequest,
        req: PreviewScoreRequest,
    ) -> ActixResult<HttpResponse> {
        preview::preview_score(self, request, req).await
    }

    /// 查询流程状态
    pub async fn get_state(
        &self,
        request: &HttpRequest,
        query: EvaluationStateQuery,
    ) -> ActixResult<HttpResponse> {
        state::get_state(self, request, query).await
    }

    /// 查询单条评价
    pub async fn get_evaluation(
        &self,
        request: &HttpRequest,
        query: EvaluationDetailQuery,
    ) -> ActixResult<HttpResponse> {
        detail::get_evaluation(self, request, query).await
    }

    /// 查询评价历史
    pub async fn list_history(
        &self,
        request: &HttpRequest,
        query: EvaluationHistoryQuery,
    ) -> ActixResult<HttpResponse> {
        history::list_history(self, request, query).await
    }
}
