use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评价阶段
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub enum EvaluationPhase {
    Group,          // 小组阶段
    IndividualOral, // 个人答辩阶段
}

impl EvaluationPhase {
    pub const GROUP: &'static str = "group";
    pub const INDIVIDUAL_ORAL: &'static str = "individual_oral";
}

impl<'de> Deserialize<'de> for EvaluationPhase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            EvaluationPhase::GROUP => Ok(EvaluationPhase::Group),
            EvaluationPhase::INDIVIDUAL_ORAL => Ok(EvaluationPhase::IndividualOral),
            _ => Err(serde::de::Error::custom(format!(
                "无效的评价阶段: '{s}'. 支持的阶段: group, individual_oral"
            ))),
        }
    }
}

impl std::fmt::Display for EvaluationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationPhase::Group => write!(f, "{}", EvaluationPhase::GROUP),
            EvaluationPhase::IndividualOral => {
                write!(f, "{}", EvaluationPhase::INDIVIDUAL_ORAL)
            }
        }
    }
}

impl std::str::FromStr for EvaluationPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group" => Ok(EvaluationPhase::Group),
            "individual_oral" => Ok(EvaluationPhase::IndividualOral),
            _ => Err(format!("Invalid evaluation phase: {s}")),
        }
    }
}

// 学生在小组中承担的角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub enum StudentRole {
    SystemDesigner,   // 系统设计
    HardwareEngineer, // 硬件工程
    Programmer,       // 程序开发
}

impl StudentRole {
    pub const SYSTEM_DESIGNER: &'static str = "system_designer";
    pub const HARDWARE_ENGINEER: &'static str = "hardware_engineer";
    pub const PROGRAMMER: &'static str = "programmer";
}

impl<'de> Deserialize<'de> for StudentRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for StudentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentRole::SystemDesigner => write!(f, "{}", StudentRole::SYSTEM_DESIGNER),
            StudentRole::HardwareEngineer => write!(f, "{}", StudentRole::HARDWARE_ENGINEER),
            StudentRole::Programmer => write!(f, "{}", StudentRole::PROGRAMMER),
        }
    }
}

impl std::str::FromStr for StudentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system_designer" => Ok(StudentRole::SystemDesigner),
            "hardware_engineer" => Ok(StudentRole::HardwareEngineer),
            "programmer" => Ok(StudentRole::Programmer),
            _ => Err(format!(
                "无效的学生角色: '{s}'. 支持的角色: system_designer, hardware_engineer, programmer"
            )),
        }
    }
}

/// 指标的适用角色范围
///
/// 线上格式为字符串数组：`["all"]` 或角色名的非空子集。
/// 空数组在反序列化时即被拒绝，不存在「空集合」这种非法状态。
#[derive(Debug, Clone, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
#[ts(type = "Array<string>")]
pub enum RoleScope {
    All,
    Roles(BTreeSet<StudentRole>),
}

impl RoleScope {
    /// 指标是否适用于给定角色过滤器
    ///
    /// 无过滤器（小组阶段）时一律适用。
    pub fn applies_to(&self, role: Option<StudentRole>) -> bool {
        match (self, role) {
            (RoleScope::All, _) => true,
            (_, None) => true,
            (RoleScope::Roles(roles), Some(role)) => roles.contains(&role),
        }
    }
}

impl Default for RoleScope {
    fn default() -> Self {
        RoleScope::All
    }
}

impl Serialize for RoleScope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            RoleScope::All => vec!["all".to_string()].serialize(serializer),
            RoleScope::Roles(roles) => roles
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RoleScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        if raw.is_empty() {
            return Err(serde::de::Error::custom(
                "适用角色不能为空数组，请使用 [\"all\"] 或至少一个角色",
            ));
        }
        if raw.iter().any(|s| s == "all") {
            if raw.len() > 1 {
                return Err(serde::de::Error::custom(
                    "适用角色 \"all\" 不能与其他角色混用",
                ));
            }
            return Ok(RoleScope::All);
        }
        let mut roles = BTreeSet::new();
        for s in raw {
            let role: StudentRole = s.parse().map_err(serde::de::Error::custom)?;
            roles.insert(role);
        }
        Ok(RoleScope::Roles(roles))
    }
}

/// 选项的固定六级分值
pub const OPTION_SCALE: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

/// 判断分值是否落在固定分值档上
pub fn is_on_option_scale(percentage: f64) -> bool {
    OPTION_SCALE.iter().any(|p| (p - percentage).abs() < f64::EPSILON)
}

// 评分选项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct ScoreOption {
    pub percentage: f64,
    pub description: String,
}

// 评价指标
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct Criterion {
    pub name: String,
    #[serde(default, rename = "applicable_roles")]
    pub roles: RoleScope,
    pub options: Vec<ScoreOption>,
}

impl Criterion {
    /// 查找给定分值对应的选项
    pub fn option_for(&self, percentage: f64) -> Option<&ScoreOption> {
        self.options
            .iter()
            .find(|o| (o.percentage - percentage).abs() < f64::EPSILON)
    }
}

// 评价小节
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct Section {
    pub name: String,
    pub weight: f64,
    pub criteria: Vec<Criterion>,
}

// 评价板块（可选的中间层级）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct Part {
    pub name: String,
    pub display_name: String,
    pub weight: f64,
    pub sections: Vec<Section>,
}

/// 观察卡结构
///
/// 两种形态：板块 → 小节 → 指标（完整评价表），或小节 → 指标（简化量规）。
/// 打分器通过统一的加权节点视图递归处理，两种形态共用一套实现。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub enum CardStructure {
    Parts { parts: Vec<Part> },
    Sections { sections: Vec<Section> },
}

// 观察卡实体（评价量规定义）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/observationCard.ts")]
pub struct ObservationCard {
    pub id: i64,
    pub subject_id: i64,
    pub phase: EvaluationPhase,
    pub structure: CardStructure,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_round_trip() {
        assert_eq!(
            "individual_oral".parse::<EvaluationPhase>().unwrap(),
            EvaluationPhase::IndividualOral
        );
        assert_eq!(EvaluationPhase::Group.to_string(), "group");
    }

    #[test]
    fn test_role_scope_empty_array_rejected() {
        let result: Result<RoleScope, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_role_scope_all() {
        let scope: RoleScope = serde_json::from_str(r#"["all"]"#).unwrap();
        assert_eq!(scope, RoleScope::All);
        assert!(scope.applies_to(Some(StudentRole::Programmer)));
        assert!(scope.applies_to(None));
    }

    #[test]
    fn test_role_scope_subset() {
        let scope: RoleScope = serde_json::from_str(r#"["programmer"]"#).unwrap();
        assert!(scope.applies_to(Some(StudentRole::Programmer)));
        assert!(!scope.applies_to(Some(StudentRole::HardwareEngineer)));
        // 无角色过滤（小组阶段）时所有指标均适用
        assert!(scope.applies_to(None));
    }

    #[test]
    fn test_role_scope_all_mixed_with_roles_rejected() {
        let result: Result<RoleScope, _> = serde_json::from_str(r#"["all", "programmer"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_option_scale() {
        assert!(is_on_option_scale(60.0));
        assert!(!is_on_option_scale(55.0));
    }

    #[test]
    fn test_card_structure_both_shapes_deserialize() {
        let with_parts = r#"{"parts":[{"name":"impl","display_name":"实施","weight":100.0,"sections":[]}]}"#;
        let card: CardStructure = serde_json::from_str(with_parts).unwrap();
        assert!(matches!(card, CardStructure::Parts { .. }));

        let with_sections = r#"{"sections":[{"name":"quality","weight":100.0,"criteria":[]}]}"#;
        let card: CardStructure = serde_json::from_str(with_sections).unwrap();
        assert!(matches!(card, CardStructure::Sections { .. }));
    }
}
