use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::observation_cards::entities::EvaluationPhase;

// 评价人对单个指标的选择
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Selection {
    pub section_name: String,
    pub criterion_name: String,
    pub selected_percentage: f64,
    pub selected_description: Option<String>,
}

// 按小节归组后的选择（持久化形态）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SectionEvaluation {
    pub section_name: String,
    pub selections: Vec<CriterionSelection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CriterionSelection {
    pub criterion_name: String,
    pub selected_percentage: f64,
    pub selected_description: Option<String>,
}

/// 将平铺的选择列表按小节归组，保持首次出现的顺序
pub fn group_selections(selections: &[Selection]) -> Vec<SectionEvaluation> {
    let mut grouped: Vec<SectionEvaluation> = Vec::new();
    for sel in selections {
        let entry = grouped
            .iter_mut()
            .find(|g| g.section_name == sel.section_name);
        let target = match entry {
            Some(g) => g,
            None => {
                grouped.push(SectionEvaluation {
                    section_name: sel.section_name.clone(),
                    selections: Vec::new(),
                });
                grouped.last_mut().expect("just pushed")
            }
        };
        target.selections.push(CriterionSelection {
            criterion_name: sel.criterion_name.clone(),
            selected_percentage: sel.selected_percentage,
            selected_description: sel.selected_description.clone(),
        });
    }
    grouped
}

/// 将归组形态还原为平铺的选择列表
pub fn flatten_section_evaluations(sections: &[SectionEvaluation]) -> Vec<Selection> {
    sections
        .iter()
        .flat_map(|s| {
            s.selections.iter().map(|c| Selection {
                section_name: s.section_name.clone(),
                criterion_name: c.criterion_name.clone(),
                selected_percentage: c.selected_percentage,
                selected_description: c.selected_description.clone(),
            })
        })
        .collect()
}

// 单阶段评价实体（小组阶段的对象为小组，个人阶段的对象为学生）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub subject_id: i64,
    pub phase: EvaluationPhase,
    pub target_id: i64,
    pub submission_id: i64,
    pub grader_id: i64,
    pub section_evaluations: Vec<SectionEvaluation>,
    pub feedback_summary: Option<String>,
    pub retry_allowed: Option<bool>,
    pub calculated_score: f64,
    pub attempt_number: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 评价流程记录：一个 (课题, 对象) 的当前轮次
///
/// 轮次只增不减，历史评价按轮次号保留。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationWorkflowRecord {
    pub subject_id: i64,
    pub target_id: i64,
    pub current_attempt: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(section: &str, criterion: &str, pct: f64) -> Selection {
        Selection {
            section_name: section.to_string(),
            criterion_name: criterion.to_string(),
            selected_percentage: pct,
            selected_description: None,
        }
    }

    #[test]
    fn test_group_selections_preserves_order() {
        let selections = vec![
            sel("design", "clarity", 80.0),
            sel("impl", "robustness", 60.0),
            sel("design", "completeness", 40.0),
        ];
        let grouped = group_selections(&selections);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].section_name, "design");
        assert_eq!(grouped[0].selections.len(), 2);
        assert_eq!(grouped[1].section_name, "impl");
    }

    #[test]
    fn test_flatten_round_trip() {
        let selections = vec![
            sel("design", "clarity", 80.0),
            sel("design", "completeness", 40.0),
        ];
        let flat = flatten_section_evaluations(&group_selections(&selections));
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].criterion_name, "clarity");
        assert_eq!(flat[1].selected_percentage, 40.0);
    }
}
