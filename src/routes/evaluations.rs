use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT};
use crate::models::evaluations::requests::{
    EvaluationDetailQuery, EvaluationHistoryQuery, EvaluationStateQuery, PreviewScoreRequest,
    SubmitGroupEvaluationRequest, SubmitIndividualEvaluationRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::EvaluationService;

// 懒加载的全局 EvaluationService 实例
static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

// 提交小组阶段评价
pub async fn submit_group_evaluation(
    req: HttpRequest,
    body: web::Json<SubmitGroupEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let grader_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    EVALUATION_SERVICE
        .submit_group_evaluation(&req, grader_id, body.into_inner())
        .await
}

// 提交个人答辩阶段评价
pub async fn submit_individual_evaluation(
    req: HttpRequest,
    body: web::Json<SubmitIndividualEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    let grader_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    EVALUATION_SERVICE
        .submit_individual_evaluation(&req, grader_id, body.into_inner())
        .await
}

// 分数预览
pub async fn preview_score(
    req: HttpRequest,
    body: web::Json<PreviewScoreRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .preview_score(&req, body.into_inner())
        .await
}

// 查询流程状态
pub async fn get_state(
    req: HttpRequest,
    query: web::Query<EvaluationStateQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_state(&req, query.into_inner()).await
}

// 查询单条评价
pub async fn get_evaluation(
    req: HttpRequest,
    query: web::Query<EvaluationDetailQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .get_evaluation(&req, query.into_inner())
        .await
}

// 查询评价历史
pub async fn list_history(
    req: HttpRequest,
    query: web::Query<EvaluationHistoryQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_history(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_evaluations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            // 提交小组评价 - 仅指导教师和管理员
            .service(
                web::resource("/group")
                    .route(web::post().to(submit_group_evaluation))
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
            )
            // 提交个人评价 - 仅指导教师和管理员
            .service(
                web::resource("/individual")
                    .route(web::post().to(submit_individual_evaluation))
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
            )
            // 分数预览 - 仅指导教师和管理员（与提交路径同一计算）
            .service(
                web::resource("/preview")
                    .route(web::post().to(preview_score))
                    .wrap(middlewares::RequireRole::new_any(UserRole::grader_roles())),
            )
            // 流程状态 - 所有登录用户可访问
            .service(web::resource("/state").route(web::get().to(get_state)))
            // 单条评价 - 所有登录用户可访问
            .service(web::resource("/detail").route(web::get().to(get_evaluation)))
            // 评价历史 - 所有登录用户可访问
            .service(web::resource("/history").route(web::get().to(list_history))),
    );
}
