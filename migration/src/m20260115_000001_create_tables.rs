use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建课题表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .col(
                        ColumnDef::new(Subjects::TeamBased)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Subjects::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建小组表
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teams::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .col(ColumnDef::new(Teams::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teams::Table, Teams::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建小组成员表
        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamMembers::TeamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(TeamMembers::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeamMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(TeamMembers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TeamMembers::Table, TeamMembers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建观察卡表（评价量规定义）
        manager
            .create_table(
                Table::create()
                    .table(ObservationCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ObservationCards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ObservationCards::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ObservationCards::Phase).string().not_null())
                    .col(
                        ColumnDef::new(ObservationCards::Structure)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ObservationCards::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ObservationCards::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ObservationCards::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ObservationCards::Table, ObservationCards::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评价表
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::Phase).string().not_null())
                    .col(ColumnDef::new(Evaluations::TargetId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Evaluations::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::GraderId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Evaluations::SectionEvaluations)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::FeedbackSummary)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(Evaluations::RetryAllowed).boolean().null())
                    .col(
                        ColumnDef::new(Evaluations::CalculatedScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::AttemptNumber)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建最终评价表
        manager
            .create_table(
                Table::create()
                    .table(FinalEvaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinalEvaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FinalEvaluations::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinalEvaluations::TargetId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinalEvaluations::GroupScore).double().null())
                    .col(
                        ColumnDef::new(FinalEvaluations::IndividualScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinalEvaluations::FinalScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinalEvaluations::FinalPercentage)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinalEvaluations::Status).string().not_null())
                    .col(
                        ColumnDef::new(FinalEvaluations::BadgeAwarded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FinalEvaluations::RetryAllowed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FinalEvaluations::AttemptNumber)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(FinalEvaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FinalEvaluations::Table, FinalEvaluations::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评价流程表（记录当前轮次）
        manager
            .create_table(
                Table::create()
                    .table(EvaluationWorkflows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationWorkflows::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationWorkflows::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationWorkflows::TargetId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationWorkflows::CurrentAttempt)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(EvaluationWorkflows::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationWorkflows::Table, EvaluationWorkflows::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建徽章表
        manager
            .create_table(
                Table::create()
                    .table(Badges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Badges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Badges::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Badges::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Badges::AwardedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Badges::Table, Badges::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 观察卡：每个 (课题, 阶段) 仅一张
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_observation_cards_subject_phase")
                    .table(ObservationCards::Table)
                    .col(ObservationCards::SubjectId)
                    .col(ObservationCards::Phase)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 评价：同一轮次内每个 (课题, 阶段, 对象) 至多一次成功写入
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_evaluations_subject_phase_target_attempt")
                    .table(Evaluations::Table)
                    .col(Evaluations::SubjectId)
                    .col(Evaluations::Phase)
                    .col(Evaluations::TargetId)
                    .col(Evaluations::AttemptNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 最终评价：每个 (课题, 对象, 轮次) 唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_final_evaluations_subject_target_attempt")
                    .table(FinalEvaluations::Table)
                    .col(FinalEvaluations::SubjectId)
                    .col(FinalEvaluations::TargetId)
                    .col(FinalEvaluations::AttemptNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 评价流程：每个 (课题, 对象) 唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_evaluation_workflows_subject_target")
                    .table(EvaluationWorkflows::Table)
                    .col(EvaluationWorkflows::SubjectId)
                    .col(EvaluationWorkflows::TargetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 徽章：每个 (学生, 课题) 仅颁发一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_badges_student_subject")
                    .table(Badges::Table)
                    .col(Badges::StudentId)
                    .col(Badges::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 小组成员：一名学生在一个小组中只有一条记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_team_members_team_student")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::TeamId)
                    .col(TeamMembers::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_members_student_id")
                    .table(TeamMembers::Table)
                    .col(TeamMembers::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_subject_id")
                    .table(Teams::Table)
                    .col(Teams::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_subject_target")
                    .table(Evaluations::Table)
                    .col(Evaluations::SubjectId)
                    .col(Evaluations::TargetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_final_evaluations_subject_target")
                    .table(FinalEvaluations::Table)
                    .col(FinalEvaluations::SubjectId)
                    .col(FinalEvaluations::TargetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_badges_student_id")
                    .table(Badges::Table)
                    .col(Badges::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Badges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationWorkflows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FinalEvaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ObservationCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Description,
    TeamBased,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Teams {
    #[sea_orm(iden = "teams")]
    Table,
    Id,
    SubjectId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamMembers {
    #[sea_orm(iden = "team_members")]
    Table,
    Id,
    TeamId,
    StudentId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum ObservationCards {
    #[sea_orm(iden = "observation_cards")]
    Table,
    Id,
    SubjectId,
    Phase,
    Structure,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    SubjectId,
    Phase,
    TargetId,
    SubmissionId,
    GraderId,
    SectionEvaluations,
    FeedbackSummary,
    RetryAllowed,
    CalculatedScore,
    AttemptNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FinalEvaluations {
    #[sea_orm(iden = "final_evaluations")]
    Table,
    Id,
    SubjectId,
    TargetId,
    GroupScore,
    IndividualScore,
    FinalScore,
    FinalPercentage,
    Status,
    BadgeAwarded,
    RetryAllowed,
    AttemptNumber,
    CreatedAt,
}

#[derive(DeriveIden)]
enum EvaluationWorkflows {
    #[sea_orm(iden = "evaluation_workflows")]
    Table,
    Id,
    SubjectId,
    TargetId,
    CurrentAttempt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Badges {
    #[sea_orm(iden = "badges")]
    Table,
    Id,
    StudentId,
    SubjectId,
    AwardedAt,
}
