//! MediaGrid 服务模块
//!
//! 媒体索引查询、相册聚合、分页与增量加载

pub mod albums;
pub mod load_controller;
pub mod media_index;
pub mod photo_pager;
pub mod settings;
pub mod visibility;

// 重新导出常用类型
pub use albums::{AlbumAggregator, AlbumService};
pub use load_controller::{IncrementalLoadController, LoadOutcome, LoadState};
pub use media_index::{MediaIndexClient, SharedMediaIndex, SqliteMediaIndex};
pub use photo_pager::PhotoPager;
pub use settings::SettingsManager;
pub use visibility::{ImageRequest, VisibilityGate, VisibleRange};
