use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationCardService;
use crate::models::ApiResponse;
use crate::models::observation_cards::requests::ValidateObservationCardRequest;
use crate::models::observation_cards::responses::ValidationReport;
use crate::scoring::validate_structure;

/// 纯校验接口：返回完整的问题清单，不写任何数据
pub async fn validate_card(
    _service: &ObservationCardService,
    _request: &HttpRequest,
    req: ValidateObservationCardRequest,
) -> ActixResult<HttpResponse> {
    let report = match validate_structure(&req.structure) {
        Ok(()) => ValidationReport {
            valid: true,
            issues: vec![],
        },
        Err(issues) => ValidationReport {
            valid: false,
            issues,
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(report, "校验完成")))
}
