//! 媒体记录数据模型

use serde::{Deserialize, Serialize};

/// 外部存储图片的内容 URI 前缀
pub const EXTERNAL_IMAGES_URI: &str = "content://media/external/images/media";

/// 由记录 ID 拼出内容 URI
pub fn content_uri_for(id: i64) -> String {
    format!("{}/{}", EXTERNAL_IMAGES_URI, id)
}

/// 媒体库中的一条图片记录
///
/// 每次查询都会重新生成，不在查询之外保留身份。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    /// 记录ID（媒体库分配，稳定）
    pub id: i64,
    /// 所属相册（存储桶）ID
    pub album_id: Option<String>,
    /// 所属相册显示名
    pub album_name: Option<String>,
    /// 文件显示名
    pub display_name: String,
    /// 加入媒体库时间（秒）
    pub date_added: i64,
    /// 拍摄时间（毫秒）
    pub date_taken: i64,
    /// 修改时间（秒）
    pub date_modified: i64,
    /// 文件大小（字节）
    pub size: i64,
    /// 宽度
    pub width: i32,
    /// 高度
    pub height: i32,
    /// MIME 类型
    pub mime_type: String,
    /// 存储路径
    pub path: Option<String>,
}

impl MediaRecord {
    /// 图片加载器使用的内容 URI
    pub fn content_uri(&self) -> String {
        content_uri_for(self.id)
    }

    /// 是否属于某个相册（相册 ID 与名称都存在）
    pub fn has_album(&self) -> bool {
        self.album_id.is_some() && self.album_name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MediaRecord {
        MediaRecord {
            id: 42,
            album_id: Some("-1739773001".to_string()),
            album_name: Some("Camera".to_string()),
            display_name: "IMG_0042.jpg".to_string(),
            date_added: 1_700_000_000,
            date_taken: 1_700_000_000_000,
            date_modified: 1_700_000_000,
            size: 2048,
            width: 4000,
            height: 3000,
            mime_type: "image/jpeg".to_string(),
            path: Some("/storage/emulated/0/DCIM/Camera/IMG_0042.jpg".to_string()),
        }
    }

    #[test]
    fn test_content_uri() {
        assert_eq!(
            sample().content_uri(),
            "content://media/external/images/media/42"
        );
    }

    #[test]
    fn test_has_album() {
        let mut record = sample();
        assert!(record.has_album());
        record.album_name = None;
        assert!(!record.has_album());
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["albumId"], "-1739773001");
        assert_eq!(json["mimeType"], "image/jpeg");
        assert!(json.get("album_id").is_none());
    }
}
