//! 相册数据模型

use serde::{Deserialize, Serialize};

use super::media::content_uri_for;

/// 相册摘要（由媒体记录聚合而来）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    /// 相册ID
    pub album_id: String,
    /// 相册名
    pub display_name: String,
    /// 封面照片ID
    pub cover_id: i64,
    /// 照片数量
    pub item_count: u32,
}

impl AlbumSummary {
    /// 以首张照片创建相册摘要，计数从 0 开始
    pub fn new(album_id: String, display_name: String, cover_id: i64) -> Self {
        Self {
            album_id,
            display_name,
            cover_id,
            item_count: 0,
        }
    }

    /// 封面的内容 URI
    pub fn cover_uri(&self) -> String {
        content_uri_for(self.cover_id)
    }
}
