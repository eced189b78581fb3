//! 观察卡的统一加权节点视图
//!
//! 观察卡有两种形态（板块 → 小节 → 指标，或小节 → 指标）。
//! 校验器和打分器都不区分形态，而是把两种形态摊平成同一棵加权节点树，
//! 一套递归同时覆盖两条路径。

use crate::models::observation_cards::entities::{CardStructure, Criterion, Part, Section};

/// 带权节点：内部节点持有子节点，叶子节点持有指标列表
pub struct WeightedNode<'a> {
    pub name: &'a str,
    pub weight: f64,
    pub children: NodeChildren<'a>,
}

pub enum NodeChildren<'a> {
    Nodes(Vec<WeightedNode<'a>>),
    Criteria(&'a [Criterion]),
}

fn section_node(section: &Section) -> WeightedNode<'_> {
    WeightedNode {
        name: &section.name,
        weight: section.weight,
        children: NodeChildren::Criteria(&section.criteria),
    }
}

fn part_node(part: &Part) -> WeightedNode<'_> {
    WeightedNode {
        name: &part.name,
        weight: part.weight,
        children: NodeChildren::Nodes(part.sections.iter().map(section_node).collect()),
    }
}

/// 把观察卡结构摊平成顶层加权节点列表
pub fn card_nodes(structure: &CardStructure) -> Vec<WeightedNode<'_>> {
    match structure {
        CardStructure::Parts { parts } => parts.iter().map(part_node).collect(),
        CardStructure::Sections { sections } => sections.iter().map(section_node).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::observation_cards::entities::RoleScope;

    fn section(name: &str, weight: f64) -> Section {
        Section {
            name: name.to_string(),
            weight,
            criteria: vec![Criterion {
                name: "c1".to_string(),
                roles: RoleScope::All,
                options: vec![],
            }],
        }
    }

    #[test]
    fn test_sections_shape_flattens_to_leaf_nodes() {
        let structure = CardStructure::Sections {
            sections: vec![section("a", 40.0), section("b", 60.0)],
        };
        let nodes = card_nodes(&structure);
        assert_eq!(nodes.len(), 2);
        assert!(matches!(nodes[0].children, NodeChildren::Criteria(_)));
    }

    #[test]
    fn test_parts_shape_flattens_to_two_levels() {
        let structure = CardStructure::Parts {
            parts: vec![Part {
                name: "impl".to_string(),
                display_name: "实施".to_string(),
                weight: 100.0,
                sections: vec![section("a", 100.0)],
            }],
        };
        let nodes = card_nodes(&structure);
        assert_eq!(nodes.len(), 1);
        match &nodes[0].children {
            NodeChildren::Nodes(children) => {
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].name, "a");
            }
            NodeChildren::Criteria(_) => panic!("part node should contain section nodes"),
        }
    }
}
