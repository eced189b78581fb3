use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::observation_cards::requests::{
    CreateObservationCardRequest, ObservationCardListQuery, UpdateObservationCardRequest,
    ValidateObservationCardRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ObservationCardService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ObservationCardService 实例
static OBSERVATION_CARD_SERVICE: Lazy<ObservationCardService> =
    Lazy::new(ObservationCardService::new_lazy);

// 校验观察卡（纯校验）
pub async fn validate_card(
    req: HttpRequest,
    body: web::Json<ValidateObservationCardRequest>,
) -> ActixResult<HttpResponse> {
    OBSERVATION_CARD_SERVICE
        .validate_card(&req, body.into_inner())
        .await
}

// 创建观察卡
pub async fn create_card(
    req: HttpRequest,
    body: web::Json<CreateObservationCardRequest>,
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

    OBSERVATION_CARD_SERVICE
        .create_card(&req, user_id, body.into_inner())
        .await
}

// 获取观察卡详情
pub async fn get_card(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    OBSERVATION_CARD_SERVICE.get_card(&req, path.0).await
}

// 按 (课题, 阶段) 获取观察卡
pub async fn get_card_by_phase(
    req: HttpRequest,
    path: web::Path<(i64, String)>,
) -> ActixResult<HttpResponse> {
    let (subject_id, phase) = path.into_inner();
    OBSERVATION_CARD_SERVICE
        .get_card_by_phase(&req, subject_id, &phase)
        .await
}

// 更新观察卡
pub async fn update_card(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateObservationCardRequest>,
) -> ActixResult<HttpResponse> {
    OBSERVATION_CARD_SERVICE
        .update_card(&req, path.0, body.into_inner())
        .await
}

// 删除观察卡
pub async fn delete_card(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    OBSERVATION_CARD_SERVICE.delete_card(&req, path.0).await
}

// 列出观察卡
pub async fn list_cards(
    req: HttpRequest,
    query: web::Query<ObservationCardListQuery>,
) -> ActixResult<HttpResponse> {
    OBSERVATION_CARD_SERVICE
        .list_cards(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_observation_cards_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/observation-cards")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列出观察卡 - 所有登录用户可访问
                    .route(web::get().to(list_cards))
                    // 创建观察卡 - 仅指导教师和管理员
                    .route(
                        web::post()
                            .to(create_card)
                            .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
                    ),
            )
            // 纯校验 - 仅指导教师和管理员
            .service(
                web::resource("/validate")
                    .route(web::post().to(validate_card))
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
            )
            // 按课题与阶段查询 - 所有登录用户可访问
            .service(
                web::resource("/subject/{subject_id}/phase/{phase}")
                    .route(web::get().to(get_card_by_phase)),
            )
            .service(
                web::resource("/{id}")
                    // 获取观察卡详情 - 所有登录用户可访问
                    .route(web::get().to(get_card))
                    // 更新观察卡 - 仅指导教师和管理员
                    .route(
                        web::put()
                            .to(update_card)
                            .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
                    )
                    // 删除观察卡 - 仅指导教师和管理员
                    .route(
                        web::delete()
                            .to(delete_card)
                            .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
                    ),
            ),
    );
}
