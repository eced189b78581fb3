//! 自底向上的加权平均打分
//!
//! 小节得分 = 适用指标所选分值的算术平均；
//! 每层贡献 = 子节点得分 × (权重 / 100)，逐层求和到卡面总分。
//! 角色过滤会同时改变分子与分母：不适用的指标完全不参与小节均值。
//! 内部计算保持全精度，只在展示边界保留两位小数。

use std::collections::{HashMap, HashSet};

use crate::models::evaluations::entities::Selection;
use crate::models::observation_cards::entities::{CardStructure, StudentRole};
use crate::scoring::node::{NodeChildren, WeightedNode, card_nodes};
use crate::scoring::{EvalError, MissingCriterion, ValidationIssue};

/// 展示边界的两位小数舍入
pub fn round_for_presentation(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

struct ScoringPass<'a> {
    selections: HashMap<(&'a str, &'a str), &'a Selection>,
    known: HashSet<(&'a str, &'a str)>,
    missing: Vec<MissingCriterion>,
    invalid: Vec<ValidationIssue>,
}

/// 计算一次评价的卡面总分 (0–100)
///
/// `role` 为个人阶段的角色过滤；小组阶段传 `None`，所有指标均适用。
/// 预览与正式提交共用本函数，保证两条路径结果一致。
pub fn compute_score<'a>(
    structure: &'a CardStructure,
    selections: &'a [Selection],
    role: Option<StudentRole>,
) -> Result<f64, EvalError> {
    let mut pass = ScoringPass {
        selections: HashMap::new(),
        known: HashSet::new(),
        missing: Vec::new(),
        invalid: Vec::new(),
    };

    for sel in selections {
        let key = (sel.section_name.as_str(), sel.criterion_name.as_str());
        if pass.selections.insert(key, sel).is_some() {
            pass.invalid.push(ValidationIssue::new(
                format!("\"{}\" > \"{}\"", sel.section_name, sel.criterion_name),
                "同一指标提交了多条选择",
            ));
        }
    }

    let nodes = card_nodes(structure);
    let total = sibling_contribution(&nodes, role, &mut pass);

    // 指向不存在小节/指标的选择是校验错误，不能悄悄忽略
    for sel in selections {
        let key = (sel.section_name.as_str(), sel.criterion_name.as_str());
        if !pass.known.contains(&key) {
            pass.invalid.push(ValidationIssue::new(
                format!("\"{}\" > \"{}\"", sel.section_name, sel.criterion_name),
                "选择指向观察卡中不存在的指标",
            ));
        }
    }

    if !pass.invalid.is_empty() {
        return Err(EvalError::Validation(pass.invalid));
    }
    if !pass.missing.is_empty() {
        return Err(EvalError::CriterionRequired(pass.missing));
    }
    Ok(total)
}

/// 同层节点的加权贡献之和
fn sibling_contribution<'a>(
    nodes: &[WeightedNode<'a>],
    role: Option<StudentRole>,
    pass: &mut ScoringPass<'a>,
) -> f64 {
    nodes
        .iter()
        .map(|node| node_score(node, role, pass) * (node.weight / 100.0))
        .sum()
}

fn node_score<'a>(
    node: &WeightedNode<'a>,
    role: Option<StudentRole>,
    pass: &mut ScoringPass<'a>,
) -> f64 {
    match &node.children {
        NodeChildren::Nodes(children) => sibling_contribution(children, role, pass),
        NodeChildren::Criteria(criteria) => {
            let mut sum = 0.0;
            let mut count = 0u32;
            for criterion in criteria.iter() {
                pass.known.insert((node.name, criterion.name.as_str()));
                if !criterion.roles.applies_to(role) {
                    continue;
                }
                match pass.selections.get(&(node.name, criterion.name.as_str())) {
                    Some(sel) => {
                        if criterion.option_for(sel.selected_percentage).is_none() {
                            pass.invalid.push(ValidationIssue::new(
                                format!("\"{}\" > \"{}\"", node.name, criterion.name),
                                format!(
                                    "所选分值 {} 不在该指标的选项中",
                                    sel.selected_percentage
                                ),
                            ));
                        } else {
                            sum += sel.selected_percentage;
                        }
                        count += 1;
                    }
                    None => pass.missing.push(MissingCriterion {
                        section_name: node.name.to_string(),
                        criterion_name: criterion.name.clone(),
                    }),
                }
            }
            // 当前角色下没有任何适用指标的小节贡献 0 分，不能除以零
            if count == 0 {
                0.0
            } else {
                sum / f64::from(count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::observation_cards::entities::{
        Criterion, Part, RoleScope, ScoreOption, Section,
    };
    use std::collections::BTreeSet;

    fn option(pct: f64) -> ScoreOption {
        ScoreOption {
            percentage: pct,
            description: format!("{pct}%"),
        }
    }

    fn full_options() -> Vec<ScoreOption> {
        [0.0, 20.0, 40.0, 60.0, 80.0, 100.0]
            .iter()
            .map(|p| option(*p))
            .collect()
    }

    fn criterion(name: &str, roles: RoleScope) -> Criterion {
        Criterion {
            name: name.to_string(),
            roles,
            options: full_options(),
        }
    }

    fn section(name: &str, weight: f64, criteria: Vec<Criterion>) -> Section {
        Section {
            name: name.to_string(),
            weight,
            criteria,
        }
    }

    fn sel(section: &str, criterion: &str, pct: f64) -> Selection {
        Selection {
            section_name: section.to_string(),
            criterion_name: criterion.to_string(),
            selected_percentage: pct,
            selected_description: None,
        }
    }

    fn only(role: StudentRole) -> RoleScope {
        RoleScope::Roles(BTreeSet::from([role]))
    }

    /// 两个 50/50 小节各一个指标，选 80 和 60，总分应为 70
    #[test]
    fn test_two_sections_fifty_fifty() {
        let structure = CardStructure::Sections {
            sections: vec![
                section("a", 50.0, vec![criterion("c1", RoleScope::All)]),
                section("b", 50.0, vec![criterion("c2", RoleScope::All)]),
            ],
        };
        let selections = vec![sel("a", "c1", 80.0), sel("b", "c2", 60.0)];
        let score = compute_score(&structure, &selections, None).unwrap();
        assert!((score - 70.0).abs() < 1e-9);
    }

    /// 小节得分是适用指标的算术平均
    #[test]
    fn test_section_mean_over_criteria() {
        let structure = CardStructure::Sections {
            sections: vec![section(
                "a",
                100.0,
                vec![
                    criterion("c1", RoleScope::All),
                    criterion("c2", RoleScope::All),
                ],
            )],
        };
        let selections = vec![sel("a", "c1", 100.0), sel("a", "c2", 40.0)];
        let score = compute_score(&structure, &selections, None).unwrap();
        assert!((score - 70.0).abs() < 1e-9);
    }

    /// 板块 → 小节 两层权重逐层生效
    #[test]
    fn test_parts_shape_weighted_recursively() {
        let structure = CardStructure::Parts {
            parts: vec![
                Part {
                    name: "p1".to_string(),
                    display_name: "板块一".to_string(),
                    weight: 60.0,
                    sections: vec![section("a", 100.0, vec![criterion("c1", RoleScope::All)])],
                },
                Part {
                    name: "p2".to_string(),
                    display_name: "板块二".to_string(),
                    weight: 40.0,
                    sections: vec![
                        section("b", 50.0, vec![criterion("c2", RoleScope::All)]),
                        section("c", 50.0, vec![criterion("c3", RoleScope::All)]),
                    ],
                },
            ],
        };
        let selections = vec![
            sel("a", "c1", 100.0),
            sel("b", "c2", 80.0),
            sel("c", "c3", 40.0),
        ];
        // p1 = 100，p2 = 80*0.5 + 40*0.5 = 60；总分 = 100*0.6 + 60*0.4 = 84
        let score = compute_score(&structure, &selections, None).unwrap();
        assert!((score - 84.0).abs() < 1e-9);
    }

    /// 角色过滤同时改变分子与分母
    #[test]
    fn test_role_filter_changes_denominator() {
        let structure = CardStructure::Sections {
            sections: vec![section(
                "a",
                100.0,
                vec![
                    criterion("common", RoleScope::All),
                    criterion("coding", only(StudentRole::Programmer)),
                ],
            )],
        };
        let selections = vec![sel("a", "common", 60.0), sel("a", "coding", 100.0)];

        // 程序开发角色：两个指标都适用，均值 80
        let programmer =
            compute_score(&structure, &selections, Some(StudentRole::Programmer)).unwrap();
        assert!((programmer - 80.0).abs() < 1e-9);

        // 硬件角色：只有 common 适用，coding 连同其选择一起被排除
        let hardware = compute_score(
            &structure,
            &vec![sel("a", "common", 60.0)],
            Some(StudentRole::HardwareEngineer),
        )
        .unwrap();
        assert!((hardware - 60.0).abs() < 1e-9);

        // 无过滤（小组阶段）与程序开发角色在本例中一致
        let unfiltered = compute_score(&structure, &selections, None).unwrap();
        assert!((unfiltered - 80.0).abs() < 1e-9);
    }

    /// 当前角色下无适用指标的小节贡献 0，而不是除以零
    #[test]
    fn test_section_without_applicable_criteria_contributes_zero() {
        let structure = CardStructure::Sections {
            sections: vec![
                section("a", 50.0, vec![criterion("common", RoleScope::All)]),
                section("b", 50.0, vec![criterion("coding", only(StudentRole::Programmer))]),
            ],
        };
        let selections = vec![sel("a", "common", 100.0)];
        let score = compute_score(
            &structure,
            &selections,
            Some(StudentRole::HardwareEngineer),
        )
        .unwrap();
        assert!((score - 50.0).abs() < 1e-9);
    }

    /// 适用指标缺少选择是硬错误，且一次列出全部缺项
    #[test]
    fn test_missing_selections_all_listed() {
        let structure = CardStructure::Sections {
            sections: vec![section(
                "a",
                100.0,
                vec![
                    criterion("c1", RoleScope::All),
                    criterion("c2", RoleScope::All),
                    criterion("c3", RoleScope::All),
                ],
            )],
        };
        let selections = vec![sel("a", "c1", 60.0)];
        let err = compute_score(&structure, &selections, None).unwrap_err();
        match err {
            EvalError::CriterionRequired(missing) => {
                assert_eq!(missing.len(), 2);
                assert!(missing.iter().all(|m| m.section_name == "a"));
            }
            other => panic!("expected CriterionRequired, got {other:?}"),
        }
    }

    /// 对当前角色不适用的指标缺少选择不算错误
    #[test]
    fn test_inapplicable_criterion_not_required() {
        let structure = CardStructure::Sections {
            sections: vec![section(
                "a",
                100.0,
                vec![
                    criterion("common", RoleScope::All),
                    criterion("coding", only(StudentRole::Programmer)),
                ],
            )],
        };
        let selections = vec![sel("a", "common", 80.0)];
        let score = compute_score(
            &structure,
            &selections,
            Some(StudentRole::SystemDesigner),
        )
        .unwrap();
        assert!((score - 80.0).abs() < 1e-9);
    }

    /// 选项集之外的分值是校验错误，不做钳制
    #[test]
    fn test_off_option_percentage_rejected() {
        let mut c = criterion("c1", RoleScope::All);
        c.options = vec![option(0.0), option(100.0)];
        let structure = CardStructure::Sections {
            sections: vec![section("a", 100.0, vec![c])],
        };
        let selections = vec![sel("a", "c1", 60.0)];
        let err = compute_score(&structure, &selections, None).unwrap_err();
        assert!(matches!(err, EvalError::Validation(_)));
    }

    /// 指向不存在指标的选择是校验错误
    #[test]
    fn test_unknown_criterion_selection_rejected() {
        let structure = CardStructure::Sections {
            sections: vec![section("a", 100.0, vec![criterion("c1", RoleScope::All)])],
        };
        let selections = vec![sel("a", "c1", 60.0), sel("a", "ghost", 60.0)];
        let err = compute_score(&structure, &selections, None).unwrap_err();
        match err {
            EvalError::Validation(issues) => {
                assert!(issues.iter().any(|i| i.message.contains("不存在")));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    /// 纯函数：同一输入两次计算结果一致
    #[test]
    fn test_compute_is_pure() {
        let structure = CardStructure::Sections {
            sections: vec![
                section("a", 30.0, vec![criterion("c1", RoleScope::All)]),
                section("b", 70.0, vec![criterion("c2", RoleScope::All)]),
            ],
        };
        let selections = vec![sel("a", "c1", 20.0), sel("b", "c2", 80.0)];
        let first = compute_score(&structure, &selections, None).unwrap();
        let second = compute_score(&structure, &selections, None).unwrap();
        assert_eq!(first, second);
    }

    /// 单调性：调高任一选择的分值不会降低总分
    #[test]
    fn test_monotonic_in_each_selection() {
        let structure = CardStructure::Sections {
            sections: vec![
                section("a", 25.0, vec![criterion("c1", RoleScope::All)]),
                section(
                    "b",
                    75.0,
                    vec![
                        criterion("c2", RoleScope::All),
                        criterion("c3", RoleScope::All),
                    ],
                ),
            ],
        };
        let base = vec![
            sel("a", "c1", 40.0),
            sel("b", "c2", 20.0),
            sel("b", "c3", 60.0),
        ];
        let base_score = compute_score(&structure, &base, None).unwrap();

        for i in 0..base.len() {
            let mut raised = base.clone();
            raised[i].selected_percentage = 100.0;
            let raised_score = compute_score(&structure, &raised, None).unwrap();
            assert!(raised_score >= base_score);
        }
    }

    #[test]
    fn test_round_for_presentation() {
        assert_eq!(round_for_presentation(66.666_666), 66.67);
        assert_eq!(round_for_presentation(70.0), 70.0);
    }
}
