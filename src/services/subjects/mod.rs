pub mod create;
pub mod detail;
pub mod list;
pub mod teams;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::subjects::requests::{CreateSubjectRequest, CreateTeamRequest, SubjectListQuery};
use crate::storage::Storage;

pub struct SubjectService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubjectService {
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

    /// 创建课题
    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        created_by: i64,
        req: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_subject(self, request, created_by, req).await
    }

    /// 获取课题详情
    pub async fn get_subject(
        &self,
        request: &HttpRequest,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_subject(self, request, subject_id).await
    }

    /// 列出课题
    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        query: SubjectListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_subjects(self, request, query).await
    }

    /// 创建小组
    pub async fn create_team(
        &self,
        request: &HttpRequest,
        req: CreateTeamRequest,
    ) -> ActixResult<HttpResponse> {
        teams::create_team(self, request, req).await
    }

    /// 获取小组详情（含成员）
    pub async fn get_team(&self, request: &HttpRequest, team_id: i64) -> ActixResult<HttpResponse> {
        teams::get_team(self, request, team_id).await
    }
}
