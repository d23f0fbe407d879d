//! MediaGrid 数据模型模块
//!
//! 包含所有数据结构定义

pub mod album;
pub mod media;
pub mod query;
pub mod settings;

use chrono::NaiveDate;

use crate::utils::error::{AppError, AppResult};

// 重新导出常用类型
pub use album::AlbumSummary;
pub use media::{content_uri_for, MediaRecord, EXTERNAL_IMAGES_URI};
pub use query::MediaQuery;
pub use settings::{GallerySettings, PagingSettings, StoreSettings, ThumbnailSettings};

/// 拍摄时间范围（毫秒时间戳，两端包含）
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// 按 UTC 日期构建整天范围：`start` 当天 00:00:00.000 至 `end` 当天 23:59:59.999
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        let start = start
            .and_hms_milli_opt(0, 0, 0, 0)
            .ok_or_else(|| AppError::General(format!("无效的开始日期: {}", start)))?;
        let end = end
            .and_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| AppError::General(format!("无效的结束日期: {}", end)))?;

        Ok(Self {
            start: start.and_utc().timestamp_millis(),
            end: end.and_utc().timestamp_millis(),
        })
    }

    pub fn contains(&self, millis: i64) -> bool {
        self.start <= millis && millis <= self.end
    }
}

/// 查询范围
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MediaScope {
    /// 所有图片
    AllImages,
    /// 某个相册中的图片
    Album { album_id: String },
    /// 拍摄时间落在范围内的图片
    DateRange { start: i64, end: i64 },
}

impl MediaScope {
    pub fn album(album_id: impl Into<String>) -> Self {
        MediaScope::Album {
            album_id: album_id.into(),
        }
    }

    pub fn date_range(range: DateRange) -> Self {
        MediaScope::DateRange {
            start: range.start,
            end: range.end,
        }
    }

    /// 该范围的默认排序
    ///
    /// 相册与全部图片按修改时间倒序，时间范围按拍摄时间倒序。
    pub fn default_sort(&self) -> MediaSort {
        match self {
            MediaScope::AllImages | MediaScope::Album { .. } => MediaSort {
                field: MediaSortField::DateModified,
                order: SortOrder::Desc,
            },
            MediaScope::DateRange { .. } => MediaSort {
                field: MediaSortField::DateTaken,
                order: SortOrder::Desc,
            },
        }
    }
}

impl std::fmt::Display for MediaScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaScope::AllImages => write!(f, "all"),
            MediaScope::Album { album_id } => write!(f, "album:{}", album_id),
            MediaScope::DateRange { start, end } => write!(f, "date:{}..={}", start, end),
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// 媒体排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MediaSortField {
    #[default]
    DateModified,
    DateTaken,
}

impl MediaSortField {
    pub fn as_column(&self) -> &'static str {
        match self {
            MediaSortField::DateModified => "date_modified",
            MediaSortField::DateTaken => "datetaken",
        }
    }
}

/// 媒体排序选项
///
/// 主排序字段可能重复，因此总是追加 `_id` 作为同方向的次级排序键，
/// 保证 LIMIT/OFFSET 分页在时间戳相同时也不会重复或遗漏。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MediaSort {
    pub field: MediaSortField,
    pub order: SortOrder,
}

impl MediaSort {
    pub fn order_by_sql(&self) -> String {
        format!(
            "ORDER BY {} {}, _id {}",
            self.field.as_column(),
            self.order.as_sql(),
            self.order.as_sql()
        )
    }
}

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

impl PaginationParams {
    /// 校验并创建分页参数（页码从 1 开始，分页大小必须为正）
    pub fn new(page: i64, page_size: i64) -> AppResult<Self> {
        if page_size <= 0 {
            return Err(AppError::InvalidPageSize(page_size));
        }
        if page < 1 {
            return Err(AppError::InvalidPageNumber(page));
        }
        let page_size =
            u32::try_from(page_size).map_err(|_| AppError::InvalidPageSize(page_size))?;
        let page = u32::try_from(page).map_err(|_| AppError::InvalidPageNumber(page))?;

        // 偏移量必须能放进 SQLite 的 64 位整数
        (i64::from(page) - 1)
            .checked_mul(i64::from(page_size))
            .ok_or(AppError::InvalidPageNumber(i64::from(page)))?;

        Ok(Self { page, page_size })
    }

    /// 偏移量 `(page - 1) * page_size`
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1)
            .saturating_mul(i64::from(self.page_size))
            .max(0)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 30,
        }
    }
}

/// 一页照片
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPage {
    pub scope: MediaScope,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<MediaRecord>,
}

impl PhotoPage {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 返回条数少于分页大小，说明已到末尾
    pub fn is_last(&self) -> bool {
        self.items.len() < self.page_size as usize
    }
}
