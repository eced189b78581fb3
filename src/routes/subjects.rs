use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::subjects::requests::{CreateSubjectRequest, CreateTeamRequest, SubjectListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::SubjectService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubjectService 实例
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

// 创建课题
pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    SUBJECT_SERVICE
        .create_subject(&req, user_id, body.into_inner())
        .await
}

// 获取课题详情
pub async fn get_subject(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(&req, path.0).await
}

// 列出课题
pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectListQuery>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(&req, query.into_inner()).await
}

// 创建小组
pub async fn create_team(
    req: HttpRequest,
    body: web::Json<CreateTeamRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.create_team(&req, body.into_inner()).await
}

// 获取小组详情
pub async fn get_team(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_team(&req, path.0).await
}

// 配置路由
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出课题 - 所有登录用户可访问
                    .route(web::get().to(list_subjects))
                    // 创建课题 - 仅指导教师和管理员
                    .route(
                        web::post()
                            .to(create_subject)
                            .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
                    ),
            )
            // 创建小组 - 仅指导教师和管理员
            .service(
                web::resource("/teams")
                    .route(web::post().to(create_team))
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
            )
            // 小组详情 - 所有登录用户可访问
            .service(web::resource("/teams/{id}").route(web::get().to(get_team)))
            // 课题详情 - 所有登录用户可访问
            .service(web::resource("/{id}").route(web::get().to(get_subject))),
    );
}
