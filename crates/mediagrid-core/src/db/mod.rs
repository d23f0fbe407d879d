//! MediaGrid 数据库模块
//!
//! 包含媒体索引的连接管理和数据访问层

pub mod connection;
pub mod media_dao;
pub mod schema;

// 重新导出常用类型
pub use connection::{Database, DatabaseStats};
