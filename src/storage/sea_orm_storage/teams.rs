//! 小组存储操作

use super::SeaOrmStorage;
use crate::entity::team_members::{
    ActiveModel as TeamMemberActiveModel, Column as TeamMemberColumn, Entity as TeamMembers,
    Model as TeamMemberModel,
};
use crate::entity::teams::{ActiveModel, Column, Entity as Teams, Model};
use crate::errors::{EvalSystemError, Result};
use crate::models::subjects::{
    entities::{Team, TeamMember, TeamMembership},
    requests::CreateTeamRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
    Set,
};

impl Model {
    pub(crate) fn into_team(self) -> Team {
        Team {
            id: self.id,
            subject_id: self.subject_id,
            name: self.name,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}

impl TeamMemberModel {
    pub(crate) fn try_into_team_member(self) -> Result<TeamMember> {
        let role = self
            .role
            .parse()
            .map_err(|e: String| EvalSystemError::serialization(e))?;
        Ok(TeamMember {
            id: self.id,
            team_id: self.team_id,
            student_id: self.student_id,
            role,
            joined_at: chrono::DateTime::from_timestamp(self.joined_at, 0).unwrap_or_default(),
        })
    }
}

impl SeaOrmStorage {
    /// 创建小组（含成员）
    pub async fn create_team_impl(&self, req: CreateTeamRequest) -> Result<Team> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            subject_id: Set(req.subject_id),
            name: Set(req.name),
            created_at: Set(now),
            ..Default::default()
        };

        let team = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("创建小组失败: {e}")))?;

        for member in req.members {
            let member_model = TeamMemberActiveModel {
                team_id: Set(team.id),
                student_id: Set(member.student_id),
                role: Set(member.role.to_string()),
                joined_at: Set(now),
                ..Default::default()
            };
            member_model.insert(&self.db).await.map_err(|e| {
                EvalSystemError::database_operation(format!("添加小组成员失败: {e}"))
            })?;
        }

        Ok(team.into_team())
    }

    /// 通过 ID 获取小组
    pub async fn get_team_by_id_impl(&self, team_id: i64) -> Result<Option<Team>> {
        let result = Teams::find_by_id(team_id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询小组失败: {e}")))?;

        Ok(result.map(|m| m.into_team()))
    }

    /// 列出小组成员
    pub async fn list_team_members_impl(&self, team_id: i64) -> Result<Vec<TeamMember>> {
        let models = TeamMembers::find()
            .filter(TeamMemberColumn::TeamId.eq(team_id))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询小组成员失败: {e}")))?;

        models
            .into_iter()
            .map(|m| m.try_into_team_member())
            .collect()
    }

    /// 查找学生在某课题下的小组归属
    pub async fn get_team_for_student_impl(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Option<TeamMembership>> {
        let result = TeamMembers::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::team_members::Relation::Team.def(),
            )
            .filter(Column::SubjectId.eq(subject_id))
            .filter(TeamMemberColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                EvalSystemError::database_operation(format!("查询学生小组归属失败: {e}"))
            })?;

        match result {
            Some(member) => {
                let role = member
                    .role
                    .parse()
                    .map_err(|e: String| EvalSystemError::serialization(e))?;
                Ok(Some(TeamMembership {
                    team_id: member.team_id,
                    role,
                }))
            }
            None => Ok(None),
        }
    }
}
