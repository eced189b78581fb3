use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::models::subjects::requests::CreateTeamRequest;
use crate::models::subjects::responses::TeamDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;
use crate::utils::validate::validate_name;

/// 创建小组（含成员及其角色）
pub async fn create_team(
    service: &SubjectService,
    request: &HttpRequest,
    req: CreateTeamRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = validate_name(&req.name) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, e)));
    }

    if req.members.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "小组至少要有一名成员",
        )));
    }

    let storage = service.get_storage(request);

    // 课题必须存在且为小组课题
    match storage.get_subject_by_id(req.subject_id).await {
        Ok(Some(subject)) if subject.team_based => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "非小组课题不能创建小组",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "课题不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询课题失败", &e)),
    }

    match storage.create_team(req).await {
        Ok(team) => {
            info!("Team {} created for subject {}", team.name, team.subject_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(team, "小组创建成功")))
        }
        Err(e) => Ok(storage_error_response("创建小组失败", &e)),
    }
}

/// 获取小组详情（含成员）
pub async fn get_team(
    service: &SubjectService,
    request: &HttpRequest,
    team_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let team = match storage.get_team_by_id(team_id).await {
        Ok(Some(team)) => team,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeamNotFound,
                "小组不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询小组失败", &e)),
    };

    match storage.list_team_members(team_id).await {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TeamDetailResponse { team, members },
            "查询成功",
        ))),
        Err(e) => Ok(storage_error_response("查询小组成员失败", &e)),
    }
}
