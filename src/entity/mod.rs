//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 store 模块中的文档模型分离。
//! SeaOrmStore 使用这些实体读写数据行，然后转换为 store 中的 `Document`。

pub mod documents;
