pub mod badges;
pub mod calculate;
pub mod detail;
pub mod history;
pub mod retry;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::final_evaluations::requests::{
    AllowRetryRequest, CalculateFinalRequest, FinalEvaluationQuery,
};
use crate::storage::Storage;

pub struct FinalEvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl FinalEvaluationService {
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

    /// 计算最终评价（显式触发，按当前轮次幂等）
    pub async fn calculate_final(
        &self,
        request: &HttpRequest,
        req: CalculateFinalRequest,
    ) -> ActixResult<HttpResponse> {
        calculate::calculate_final(self, request, req).await
    }

    /// 允许重试（轮次 +1，历史保留）
    pub async fn allow_retry(
        &self,
        request: &HttpRequest,
        req: AllowRetryRequest,
    ) -> ActixResult<HttpResponse> {
        retry::allow_retry(self, request, req).await
    }

    /// 查询当前轮次的最终评价
    pub async fn get_current(
        &self,
        request: &HttpRequest,
        query: FinalEvaluationQuery,
    ) -> ActixResult<HttpResponse> {
        detail::get_current(self, request, query).await
    }

    /// 查询最终评价历史
    pub async fn list_history(
        &self,
        request: &HttpRequest,
        query: FinalEvaluationQuery,
    ) -> ActixResult<HttpResponse> {
        history::list_history(self, request, query).await
    }

    /// 列出学生的全部徽章
    pub async fn list_student_badges(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        badges::list_student_badges(self, request, student_id).await
    }
}
