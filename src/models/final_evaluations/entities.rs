use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 最终评价状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub enum EvaluationStatus {
    Passed, // 通过
    Failed, // 未通过
}

impl EvaluationStatus {
    pub const PASSED: &'static str = "passed";
    pub const FAILED: &'static str = "failed";
}

impl<'de> Deserialize<'de> for EvaluationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            EvaluationStatus::PASSED => Ok(EvaluationStatus::Passed),
            EvaluationStatus::FAILED => Ok(EvaluationStatus::Failed),
            _ => Err(serde::de::Error::custom(format!(
                "无效的评价状态: '{s}'. 支持的状态: passed, failed"
            ))),
        }
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationStatus::Passed => write!(f, "{}", EvaluationStatus::PASSED),
            EvaluationStatus::Failed => write!(f, "{}", EvaluationStatus::FAILED),
        }
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passed" => Ok(EvaluationStatus::Passed),
            "failed" => Ok(EvaluationStatus::Failed),
            _ => Err(format!("Invalid evaluation status: {s}")),
        }
    }
}

// 最终评价实体（每个 (课题, 对象, 轮次) 一条，新轮次追加而非覆盖）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct FinalEvaluation {
    pub id: i64,
    pub subject_id: i64,
    pub target_id: i64,
    pub group_score: Option<f64>,
    pub individual_score: f64,
    pub final_score: f64,
    pub final_percentage: f64,
    pub status: EvaluationStatus,
    pub badge_awarded: bool,
    pub retry_allowed: bool,
    pub attempt_number: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 徽章实体（每个 (学生, 课题) 仅颁发一次）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finalEvaluation.ts")]
pub struct Badge {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub awarded_at: chrono::DateTime<chrono::Utc>,
}
