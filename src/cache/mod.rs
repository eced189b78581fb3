//! 对象缓存层
//!
//! 可插拔的缓存后端（Moka 内存缓存 / Redis），通过注册表按名称选择。
//! 评价引擎用它缓存已校验的观察卡，键为 `observation_card:{subject_id}:{phase}`，
//! 观察卡创建/更新/删除时失效。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 观察卡缓存键
pub fn observation_card_cache_key(subject_id: i64, phase: &str) -> String {
    format!("observation_card:{subject_id}:{phase}")
}
