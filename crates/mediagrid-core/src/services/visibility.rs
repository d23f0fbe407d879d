//! 可见性判定
//!
//! 根据渲染端上报的可见区间决定何时加载下一页，以及为哪些照片请求缩略图。

use serde::{Deserialize, Serialize};

use crate::models::{MediaRecord, PagingSettings, ThumbnailSettings};

/// 渲染端上报的可见区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRange {
    /// 第一个可见项的下标
    pub first: usize,
    /// 可见项数量
    pub count: usize,
}

impl VisibleRange {
    pub fn new(first: usize, count: usize) -> Self {
        Self { first, count }
    }

    /// 最后一个可见项的下标，`count == 0` 时为 `first`
    pub fn last_visible(&self) -> usize {
        self.first.saturating_add(self.count.saturating_sub(1))
    }

    /// 窗口 `first..=first + count`，两端都包含
    pub fn contains(&self, index: usize) -> bool {
        self.first <= index && index <= self.first.saturating_add(self.count)
    }
}

/// 缩略图请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    pub record_id: i64,
    pub index: usize,
    pub uri: String,
    /// `"{id}_{index}"`
    pub cache_key: String,
    pub target_size: u32,
    pub memory_cache: bool,
    pub disk_cache: bool,
}

/// 可见性判定器
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    prefetch_distance: usize,
    thumbnail: ThumbnailSettings,
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(&PagingSettings::default(), ThumbnailSettings::default())
    }
}

impl VisibilityGate {
    pub fn new(paging: &PagingSettings, thumbnail: ThumbnailSettings) -> Self {
        Self {
            prefetch_distance: paging.prefetch_distance,
            thumbnail,
        }
    }

    /// 可见区间接近末尾、当前没有加载且列表非空时返回 true
    pub fn should_load_more(&self, total: usize, range: VisibleRange, loading: bool) -> bool {
        total > 0 && !loading && range.last_visible().saturating_add(self.prefetch_distance) >= total
    }

    pub fn is_visible(&self, index: usize, range: VisibleRange) -> bool {
        range.contains(index)
    }

    /// 为可见区间内的照片生成缩略图请求，不可见项不生成
    pub fn image_requests(&self, photos: &[MediaRecord], range: VisibleRange) -> Vec<ImageRequest> {
        photos
            .iter()
            .enumerate()
            .skip(range.first)
            .take_while(|(index, _)| range.contains(*index))
            .map(|(index, record)| ImageRequest {
                record_id: record.id,
                index,
                uri: record.content_uri(),
                cache_key: format!("{}_{}", record.id, index),
                target_size: self.thumbnail.target_size,
                memory_cache: self.thumbnail.memory_cache,
                disk_cache: self.thumbnail.disk_cache,
            })
            .collect()
    }
}
