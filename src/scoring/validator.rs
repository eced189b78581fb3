//! 观察卡结构校验
//!
//! 在创建/更新观察卡时调用，打分前还会再防御性地调用一次
//! （观察卡可编辑，不能假设库里的定义仍然合法）。
//! 所有问题一次收齐返回，而不是碰到第一个就停。

use std::collections::HashSet;

use crate::models::observation_cards::entities::{
    CardStructure, Criterion, OPTION_SCALE, is_on_option_scale,
};
use crate::scoring::ValidationIssue;
use crate::scoring::node::{NodeChildren, WeightedNode, card_nodes};

/// 各层级权重之和允许的误差
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// 校验观察卡结构，返回全部问题
pub fn validate_structure(structure: &CardStructure) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    let nodes = card_nodes(structure);

    if nodes.is_empty() {
        issues.push(ValidationIssue::new("card", "观察卡不能为空"));
    } else {
        check_sibling_nodes(&nodes, "card", &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// 校验同层节点：权重求和、名称唯一性，然后逐个下钻
fn check_sibling_nodes(nodes: &[WeightedNode], location: &str, issues: &mut Vec<ValidationIssue>) {
    let sum: f64 = nodes.iter().map(|n| n.weight).sum();
    if (sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
        issues.push(ValidationIssue::new(
            location,
            format!("权重之和必须为 100，实际为 {sum}"),
        ));
    }

    let mut seen = HashSet::new();
    for node in nodes {
        if node.name.trim().is_empty() {
            issues.push(ValidationIssue::new(location, "名称不能为空"));
        } else if !seen.insert(node.name) {
            issues.push(ValidationIssue::new(
                location,
                format!("名称 \"{}\" 在同一层级重复", node.name),
            ));
        }
        check_node(node, issues);
    }
}

fn check_node(node: &WeightedNode, issues: &mut Vec<ValidationIssue>) {
    let location = format!("\"{}\"", node.name);

    if !(0.0..=100.0).contains(&node.weight) {
        issues.push(ValidationIssue::new(
            location.clone(),
            format!("权重必须在 0 到 100 之间，实际为 {}", node.weight),
        ));
    }

    match &node.children {
        NodeChildren::Nodes(children) => {
            if children.is_empty() {
                issues.push(ValidationIssue::new(location, "板块下至少要有一个小节"));
            } else {
                check_sibling_nodes(children, &location, issues);
            }
        }
        NodeChildren::Criteria(criteria) => {
            if criteria.is_empty() {
                issues.push(ValidationIssue::new(location, "小节下至少要有一个指标"));
                return;
            }
            let mut seen = HashSet::new();
            for criterion in criteria.iter() {
                if criterion.name.trim().is_empty() {
                    issues.push(ValidationIssue::new(location.clone(), "指标名称不能为空"));
                } else if !seen.insert(criterion.name.as_str()) {
                    issues.push(ValidationIssue::new(
                        location.clone(),
                        format!("指标名称 \"{}\" 在小节内重复", criterion.name),
                    ));
                }
                check_criterion(criterion, &location, issues);
            }
        }
    }
}

fn check_criterion(criterion: &Criterion, parent: &str, issues: &mut Vec<ValidationIssue>) {
    let location = format!("{parent} > \"{}\"", criterion.name);

    if criterion.options.is_empty() {
        issues.push(ValidationIssue::new(location, "指标至少要有一个选项"));
        return;
    }

    let mut seen = Vec::new();
    for option in &criterion.options {
        if !is_on_option_scale(option.percentage) {
            issues.push(ValidationIssue::new(
                location.clone(),
                format!(
                    "选项分值 {} 不在固定分值档 {OPTION_SCALE:?} 上",
                    option.percentage
                ),
            ));
        }
        if seen
            .iter()
            .any(|p: &f64| (p - option.percentage).abs() < f64::EPSILON)
        {
            issues.push(ValidationIssue::new(
                location.clone(),
                format!("选项分值 {} 在指标内重复", option.percentage),
            ));
        }
        seen.push(option.percentage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::observation_cards::entities::{Part, RoleScope, ScoreOption, Section};

    fn option(pct: f64) -> ScoreOption {
        ScoreOption {
            percentage: pct,
            description: format!("{pct}% 描述"),
        }
    }

    fn criterion(name: &str) -> Criterion {
        Criterion {
            name: name.to_string(),
            roles: RoleScope::All,
            options: vec![option(0.0), option(60.0), option(100.0)],
        }
    }

    fn section(name: &str, weight: f64) -> Section {
        Section {
            name: name.to_string(),
            weight,
            criteria: vec![criterion("c1")],
        }
    }

    #[test]
    fn test_valid_sections_card_accepted() {
        let structure = CardStructure::Sections {
            sections: vec![section("a", 40.0), section("b", 60.0)],
        };
        assert!(validate_structure(&structure).is_ok());
    }

    #[test]
    fn test_weight_sum_within_tolerance_accepted() {
        let structure = CardStructure::Sections {
            sections: vec![section("a", 40.005), section("b", 60.0)],
        };
        assert!(validate_structure(&structure).is_ok());
    }

    #[test]
    fn test_weight_sum_off_rejected() {
        let structure = CardStructure::Sections {
            sections: vec![section("a", 40.0), section("b", 59.0)],
        };
        let issues = validate_structure(&structure).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("100")));
    }

    #[test]
    fn test_nested_weight_sum_checked_per_part() {
        let structure = CardStructure::Parts {
            parts: vec![
                Part {
                    name: "p1".to_string(),
                    display_name: "板块一".to_string(),
                    weight: 50.0,
                    sections: vec![section("a", 100.0)],
                },
                Part {
                    name: "p2".to_string(),
                    display_name: "板块二".to_string(),
                    weight: 50.0,
                    // 小节权重之和为 90，应当报错
                    sections: vec![section("b", 30.0), section("c", 60.0)],
                },
            ],
        };
        let issues = validate_structure(&structure).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].location.contains("p2"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let structure = CardStructure::Sections {
            sections: vec![section("a", 50.0), section("a", 50.0)],
        };
        let issues = validate_structure(&structure).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("重复")));
    }

    #[test]
    fn test_blank_name_rejected() {
        let structure = CardStructure::Sections {
            sections: vec![section("  ", 100.0)],
        };
        let issues = validate_structure(&structure).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("不能为空")));
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        let structure = CardStructure::Sections {
            sections: vec![section("a", 150.0), section("b", -50.0)],
        };
        let issues = validate_structure(&structure).unwrap_err();
        // 两个越界权重都要报出来（求和恰为 100，不报求和问题）
        assert_eq!(
            issues
                .iter()
                .filter(|i| i.message.contains("0 到 100"))
                .count(),
            2
        );
    }

    #[test]
    fn test_off_scale_option_rejected() {
        let mut c = criterion("c1");
        c.options.push(option(55.0));
        let structure = CardStructure::Sections {
            sections: vec![Section {
                name: "a".to_string(),
                weight: 100.0,
                criteria: vec![c],
            }],
        };
        let issues = validate_structure(&structure).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("55")));
    }

    #[test]
    fn test_all_issues_reported_at_once() {
        let structure = CardStructure::Sections {
            sections: vec![
                Section {
                    name: "a".to_string(),
                    weight: 30.0,
                    criteria: vec![],
                },
                Section {
                    name: "a".to_string(),
                    weight: 30.0,
                    criteria: vec![criterion("c1"), criterion("c1")],
                },
            ],
        };
        let issues = validate_structure(&structure).unwrap_err();
        // 权重和、重名小节、空指标列表、重名指标，一次全部返回
        assert!(issues.len() >= 4);
    }

    #[test]
    fn test_empty_card_rejected() {
        let structure = CardStructure::Sections { sections: vec![] };
        assert!(validate_structure(&structure).is_err());
    }
}
