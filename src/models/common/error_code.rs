//! 业务错误码定义
//!
//! 错误码采用五位数字，前三位对应 HTTP 状态，后两位为业务细分。
//! 统一响应中以数值下发（`code as i32`）。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 400xx 请求错误
    BadRequest = 40000,

    // 401xx 未认证
    Unauthorized = 40100,

    // 403xx 无权限
    Forbidden = 40300,

    // 404xx 资源不存在
    NotFound = 40400,
    SubjectNotFound = 40401,
    ObservationCardNotFound = 40402,
    EvaluationNotFound = 40403,
    FinalEvaluationNotFound = 40404,
    TeamNotFound = 40405,

    // 409xx 写入冲突
    ConcurrentModification = 40900,

    // 422xx 业务校验失败
    ValidationFailed = 42200,
    CriterionRequired = 42201,
    PhaseOrderViolation = 42202,
    ObservationCardMissing = 42203,
    RetryNotAllowed = 42204,

    // 500xx 服务器内部错误
    InternalServerError = 50000,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::ValidationFailed as i32, 42200);
        assert_eq!(ErrorCode::PhaseOrderViolation as i32, 42202);
        assert_eq!(ErrorCode::ConcurrentModification as i32, 40900);
    }
}
