use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::final_evaluations::requests::{
    AllowRetryRequest, CalculateFinalRequest, FinalEvaluationQuery,
};
use crate::models::users::entities::UserRole;
use crate::services::FinalEvaluationService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 FinalEvaluationService 实例
static FINAL_EVALUATION_SERVICE: Lazy<FinalEvaluationService> =
    Lazy::new(FinalEvaluationService::new_lazy);

// 计算最终评价
pub async fn calculate_final(
    req: HttpRequest,
    body: web::Json<CalculateFinalRequest>,
) -> ActixResult<HttpResponse> {
    FINAL_EVALUATION_SERVICE
        .calculate_final(&req, body.into_inner())
        .await
}

// 允许重试
pub async fn allow_retry(
    req: HttpRequest,
    body: web::Json<AllowRetryRequest>,
) -> ActixResult<HttpResponse> {
    FINAL_EVALUATION_SERVICE
        .allow_retry(&req, body.into_inner())
        .await
}

// 查询当前轮次的最终评价
pub async fn get_current(
    req: HttpRequest,
    query: web::Query<FinalEvaluationQuery>,
) -> ActixResult<HttpResponse> {
    FINAL_EVALUATION_SERVICE
        .get_current(&req, query.into_inner())
        .await
}

// 查询最终评价历史
pub async fn list_history(
    req: HttpRequest,
    query: web::Query<FinalEvaluationQuery>,
) -> ActixResult<HttpResponse> {
    FINAL_EVALUATION_SERVICE
        .list_history(&req, query.into_inner())
        .await
}

// 查询学生徽章
pub async fn list_student_badges(
    req: HttpRequest,
    path: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    FINAL_EVALUATION_SERVICE
        .list_student_badges(&req, path.0)
        .await
}

// 配置路由
pub fn configure_final_evaluations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/final-evaluations")
            .wrap(middlewares::RequireJWT)
            // 计算最终评价 - 仅指导教师和管理员
            .service(
                web::resource("/calculate")
                    .route(web::post().to(calculate_final))
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
            )
            // 允许重试 - 仅指导教师和管理员
            .service(
                web::resource("/retry")
                    .route(web::post().to(allow_retry))
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
            )
            // 当前轮次最终评价 - 所有登录用户可访问
            .service(web::resource("/current").route(web::get().to(get_current)))
            // 最终评价历史 - 所有登录用户可访问
            .service(web::resource("/history").route(web::get().to(list_history)))
            // 学生徽章 - 所有登录用户可访问
            .service(
                web::resource("/badges/{student_id}").route(web::get().to(list_student_badges)),
            ),
    );
}
