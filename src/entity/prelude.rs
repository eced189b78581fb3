//! 预导入模块，方便使用

pub use super::badges::{ActiveModel as BadgeActiveModel, Entity as Badges, Model as BadgeModel};
pub use super::evaluation_workflows::{
    ActiveModel as EvaluationWorkflowActiveModel, Entity as EvaluationWorkflows,
    Model as EvaluationWorkflowModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::final_evaluations::{
    ActiveModel as FinalEvaluationActiveModel, Entity as FinalEvaluations,
    Model as FinalEvaluationModel,
};
pub use super::observation_cards::{
    ActiveModel as ObservationCardActiveModel, Entity as ObservationCards,
    Model as ObservationCardModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::team_members::{
    ActiveModel as TeamMemberActiveModel, Entity as TeamMembers, Model as TeamMemberModel,
};
pub use super::teams::{ActiveModel as TeamActiveModel, Entity as Teams, Model as TeamModel};
