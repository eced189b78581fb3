//! EvalSystem - 项目化教学评价引擎后端服务
//!
//! 基于 Actix Web 构建的观察卡评价与打分系统后端。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），缓存已校验的观察卡
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `scoring`: 打分核心（观察卡校验、加权打分、阶段流程、最终结果）
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod scoring;
pub mod services;
pub mod storage;
pub mod utils;
