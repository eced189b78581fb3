//! 评价打分核心
//!
//! 观察卡校验、加权打分、阶段流程与最终结果计算。
//! 本模块内全部为纯同步函数：输入完整、输出确定，不持有任何共享状态，
//! 持久化与身份均由上层 service 注入。
//!
//! - `validator`: 观察卡结构与权重校验
//! - `aggregator`: 自底向上的加权平均打分
//! - `workflow`: 阶段顺序状态机（小组 → 个人 → 定稿 → 重试）
//! - `outcome`: 最终得分、通过判定与徽章决策

pub mod aggregator;
pub mod error;
pub mod node;
pub mod outcome;
pub mod validator;
pub mod workflow;

pub use aggregator::{compute_score, round_for_presentation};
pub use error::{EvalError, MissingCriterion, ValidationIssue};
pub use outcome::{FinalOutcome, PASS_THRESHOLD, finalize};
pub use validator::validate_structure;
pub use workflow::{PhaseSnapshot, WorkflowState, derive_state};
