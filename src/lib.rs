//! LMS - 学习管理平台后端核心
//!
//! 基于 Actix Web 构建，负责院系、课程、模块、课时、作业、提交与选课的管理。
//!
//! # 架构
//! - `access`: 分层授权解析（全局角色 + 课程角色 + 祖先链状态）
//! - `aggregation`: 作业与选课统计
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `lifecycle`: 提交状态机与发布规则
//! - `media`: 附件存储
//! - `middlewares`: 身份认证中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod access;
pub mod aggregation;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod lifecycle;
pub mod media;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
