use std::str::FromStr;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ObservationCardService;
use crate::cache::{CacheResult, ObjectCache, observation_card_cache_key};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::observation_cards::entities::{EvaluationPhase, ObservationCard};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;
use crate::storage::Storage;

/// 先查缓存再回源数据库，命中失败时把最新定义写回缓存
///
/// 缓存的是已入库的观察卡原文；打分前仍会做防御性结构校验，
/// 缓存不改变正确性，只省一次数据库往返。
pub(crate) async fn load_card_cached(
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
    subject_id: i64,
    phase: EvaluationPhase,
) -> Result<Option<ObservationCard>> {
    let key = observation_card_cache_key(subject_id, &phase.to_string());

    if let CacheResult::Found(json) = cache.get_raw(&key).await {
        match serde_json::from_str::<ObservationCard>(&json) {
            Ok(card) => return Ok(Some(card)),
            Err(_) => {
                cache.remove(&key).await;
                info!("Failed to deserialize observation card from cache for key: {key}");
            }
        }
    }

    let card = storage.get_observation_card(subject_id, phase).await?;

    if let Some(card) = &card {
        if let Ok(json) = serde_json::to_string(card) {
            let ttl = AppConfig::get().cache.default_ttl;
            cache.insert_raw(key, json, ttl).await;
        }
    }

    Ok(card)
}

/// 通过 ID 获取观察卡
pub async fn get_card(
    service: &ObservationCardService,
    request: &HttpRequest,
    card_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_observation_card_by_id(card_id).await {
        Ok(Some(card)) => Ok(HttpResponse::Ok().json(ApiResponse::success(card, "查询成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationCardNotFound,
            "观察卡不存在",
        ))),
        Err(e) => Ok(storage_error_response("查询观察卡失败", &e)),
    }
}

/// 按 (课题, 阶段) 获取观察卡
pub async fn get_card_by_phase(
    service: &ObservationCardService,
    request: &HttpRequest,
    subject_id: i64,
    phase: &str,
) -> ActixResult<HttpResponse> {
    let phase = match EvaluationPhase::from_str(phase) {
        Ok(p) => p,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, e)));
        }
    };

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    match load_card_cached(&storage, &cache, subject_id, phase).await {
        Ok(Some(card)) => Ok(HttpResponse::Ok().json(ApiResponse::success(card, "查询成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ObservationCardNotFound,
            "该课题在此阶段尚未创建观察卡",
        ))),
        Err(e) => Ok(storage_error_response("查询观察卡失败", &e)),
    }
}
