//! MediaGrid 工具模块
//!
//! 包含错误类型定义

pub mod error;

pub use error::*;
