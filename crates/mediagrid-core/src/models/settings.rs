//! 应用程序设置数据模型

use serde::{Deserialize, Serialize};

/// 分页设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagingSettings {
    /// 每页照片数
    pub page_size: u32,
    /// 距离列表末尾多少项时触发加载下一页
    pub prefetch_distance: usize,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            page_size: 30,
            prefetch_distance: 5,
        }
    }
}

/// 缩略图请求设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThumbnailSettings {
    /// 请求的目标尺寸（像素）
    pub target_size: u32,
    /// 是否启用内存缓存
    pub memory_cache: bool,
    /// 是否启用磁盘缓存
    pub disk_cache: bool,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            target_size: 300,
            memory_cache: true,
            disk_cache: true,
        }
    }
}

/// 媒体库存储设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// 是否启用数据库 WAL 模式
    pub enable_wal: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { enable_wal: true }
    }
}

/// 应用程序设置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GallerySettings {
    /// 分页设置
    pub paging: PagingSettings,
    /// 缩略图设置
    pub thumbnail: ThumbnailSettings,
    /// 存储设置
    pub store: StoreSettings,
}
