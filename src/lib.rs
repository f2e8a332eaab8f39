//! School Records - 教师、科目与班级分配管理后端服务
//!
//! 核心是分配与一致性引擎：关联记录与反向索引数组总是在同一个
//! 乐观事务中一起写入。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `repositories`: 单文档读写
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 分配引擎、级联删除、查询视图与一致性检查
//! - `store`: 文档存储层（内存 / SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod store;
pub mod utils;
