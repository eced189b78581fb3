//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 评价与徽章相关的唯一索引在这里被转换成 ConcurrentModification 错误，
//! 由调用方决定是否携带新状态重试。

mod badges;
mod evaluations;
mod final_evaluations;
mod observation_cards;
mod subjects;
mod teams;

use crate::config::AppConfig;
use crate::errors::{EvalSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EvalSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EvalSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 判断数据库错误是否为唯一约束冲突
    ///
    /// SQLite / PostgreSQL / MySQL 的报错文案各不相同，这里统一按子串识别。
    pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
        let msg = err.to_string();
        msg.contains("UNIQUE constraint failed")
            || msg.contains("duplicate key value")
            || msg.contains("Duplicate entry")
    }
}

// Storage trait 实现
use crate::models::{
    evaluations::{
        entities::{Evaluation, EvaluationWorkflowRecord},
        requests::SaveEvaluationRequest,
    },
    final_evaluations::{
        entities::{Badge, FinalEvaluation},
        requests::SaveFinalEvaluationRequest,
    },
    observation_cards::{
        entities::{EvaluationPhase, ObservationCard},
        requests::{
            CreateObservationCardRequest, ObservationCardListQuery, UpdateObservationCardRequest,
        },
        responses::ObservationCardListResponse,
    },
    subjects::{
        entities::{Subject, Team, TeamMember, TeamMembership},
        requests::{CreateSubjectRequest, CreateTeamRequest, SubjectListQuery},
        responses::SubjectListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 课题模块
    async fn create_subject(
        &self,
        created_by: i64,
        subject: CreateSubjectRequest,
    ) -> Result<Subject> {
        self.create_subject_impl(created_by, subject).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    // 小组模块
    async fn create_team(&self, team: CreateTeamRequest) -> Result<Team> {
        self.create_team_impl(team).await
    }

    async fn get_team_by_id(&self, team_id: i64) -> Result<Option<Team>> {
        self.get_team_by_id_impl(team_id).await
    }

    async fn list_team_members(&self, team_id: i64) -> Result<Vec<TeamMember>> {
        self.list_team_members_impl(team_id).await
    }

    async fn get_team_for_student(
        &self,
        subject_id: i64,
        student_id: i64,
    ) -> Result<Option<TeamMembership>> {
        self.get_team_for_student_impl(subject_id, student_id).await
    }

    // 观察卡模块
    async fn create_observation_card(
        &self,
        created_by: i64,
        card: CreateObservationCardRequest,
    ) -> Result<ObservationCard> {
        self.create_observation_card_impl(created_by, card).await
    }

    async fn update_observation_card(
        &self,
        card_id: i64,
        update: UpdateObservationCardRequest,
    ) -> Result<Option<ObservationCard>> {
        self.update_observation_card_impl(card_id, update).await
    }

    async fn get_observation_card(
        &self,
        subject_id: i64,
        phase: EvaluationPhase,
    ) -> Result<Option<ObservationCard>> {
        self.get_observation_card_impl(subject_id, phase).await
    }

    async fn get_observation_card_by_id(&self, card_id: i64) -> Result<Option<ObservationCard>> {
        self.get_observation_card_by_id_impl(card_id).await
    }

    async fn list_observation_cards_with_pagination(
        &self,
        query: ObservationCardListQuery,
    ) -> Result<ObservationCardListResponse> {
        self.list_observation_cards_with_pagination_impl(query)
            .await
    }

    async fn delete_observation_card(&self, card_id: i64) -> Result<bool> {
        self.delete_observation_card_impl(card_id).await
    }

    // 阶段评价模块
    async fn save_evaluation(&self, evaluation: SaveEvaluationRequest) -> Result<Evaluation> {
        self.save_evaluation_impl(evaluation).await
    }

    async fn get_evaluation(
        &self,
        subject_id: i64,
        phase: EvaluationPhase,
        target_id: i64,
        attempt_number: i32,
    ) -> Result<Option<Evaluation>> {
        self.get_evaluation_impl(subject_id, phase, target_id, attempt_number)
            .await
    }

    async fn list_evaluation_history(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<Vec<Evaluation>> {
        self.list_evaluation_history_impl(subject_id, target_id)
            .await
    }

    // 评价流程模块
    async fn get_or_create_workflow(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<EvaluationWorkflowRecord> {
        self.get_or_create_workflow_impl(subject_id, target_id)
            .await
    }

    async fn increment_workflow_attempt(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<EvaluationWorkflowRecord> {
        self.increment_workflow_attempt_impl(subject_id, target_id)
            .await
    }

    // 最终评价模块
    async fn save_final_evaluation(
        &self,
        record: SaveFinalEvaluationRequest,
    ) -> Result<FinalEvaluation> {
        self.save_final_evaluation_impl(record).await
    }

    async fn get_final_evaluation(
        &self,
        subject_id: i64,
        target_id: i64,
        attempt_number: i32,
    ) -> Result<Option<FinalEvaluation>> {
        self.get_final_evaluation_impl(subject_id, target_id, attempt_number)
            .await
    }

    async fn list_final_evaluation_history(
        &self,
        subject_id: i64,
        target_id: i64,
    ) -> Result<Vec<FinalEvaluation>> {
        self.list_final_evaluation_history_impl(subject_id, target_id)
            .await
    }

    // 徽章模块
    async fn award_badge(&self, student_id: i64, subject_id: i64) -> Result<Option<Badge>> {
        self.award_badge_impl(student_id, subject_id).await
    }

    async fn get_badge(&self, student_id: i64, subject_id: i64) -> Result<Option<Badge>> {
        self.get_badge_impl(student_id, subject_id).await
    }

    async fn list_badges_for_student(&self, student_id: i64) -> Result<Vec<Badge>> {
        self.list_badges_for_student_impl(student_id).await
    }
}
