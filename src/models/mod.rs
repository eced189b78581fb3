pub mod common;
pub mod evaluations;
pub mod final_evaluations;
pub mod observation_cards;
pub mod subjects;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::PaginationInfo;
pub use common::response::ApiResponse;

/// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
