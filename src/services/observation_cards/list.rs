use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ObservationCardService;
use crate::models::ApiResponse;
use crate::models::observation_cards::requests::ObservationCardListQuery;
use crate::services::storage_error_response;

/// 列出观察卡
pub async fn list_cards(
    service: &ObservationCardService,
    request: &HttpRequest,
    query: ObservationCardListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_observation_cards_with_pagination(query).await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "查询成功"))),
        Err(e) => Ok(storage_error_response("查询观察卡列表失败", &e)),
    }
}
