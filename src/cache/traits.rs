use async_trait::async_trait;

/// 缓存查询结果
///
/// `ExistsButNoValue` 表示后端出错或暂不可用，调用方应直接回源，
/// 与确定的 `NotFound` 区分开。
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

/// 对象缓存后端接口
///
/// 值以字符串存取，序列化由调用方负责。
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}
