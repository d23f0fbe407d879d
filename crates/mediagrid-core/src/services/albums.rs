//! 相册聚合服务
//!
//! 通过一次全量查询把媒体记录折叠为相册列表

use indexmap::IndexMap;

use crate::models::{AlbumSummary, MediaQuery, MediaRecord, MediaScope};
use crate::services::media_index::SharedMediaIndex;
use crate::utils::error::AppResult;

/// 相册聚合器
///
/// 单次遍历、插入序保持的折叠：第一次出现的相册确定顺序和封面，
/// 之后同相册的记录只增加计数。
#[derive(Debug, Default)]
pub struct AlbumAggregator {
    albums: IndexMap<String, AlbumSummary>,
}

impl AlbumAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 折叠一条记录；缺少相册 ID 或相册名的记录被忽略
    pub fn push(&mut self, record: &MediaRecord) {
        let (Some(album_id), Some(album_name)) = (&record.album_id, &record.album_name) else {
            return;
        };

        self.albums
            .entry(album_id.clone())
            .or_insert_with(|| AlbumSummary::new(album_id.clone(), album_name.clone(), record.id))
            .item_count += 1;
    }

    /// 相册 ID 到摘要的映射，保持首次出现的顺序
    pub fn finish(self) -> IndexMap<String, AlbumSummary> {
        self.albums
    }

    /// 聚合一组已排序的记录
    pub fn aggregate<'a>(
        records: impl IntoIterator<Item = &'a MediaRecord>,
    ) -> IndexMap<String, AlbumSummary> {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.push(record);
        }
        aggregator.finish()
    }
}

/// 相册服务
#[derive(Clone)]
pub struct AlbumService {
    index: SharedMediaIndex,
}

impl AlbumService {
    pub fn new(index: SharedMediaIndex) -> Self {
        Self { index }
    }

    /// 按相册 ID 索引的全部相册
    ///
    /// 按修改时间倒序全量查询，封面即每个相册最新的一张图片。
    pub async fn album_map(&self) -> AppResult<IndexMap<String, AlbumSummary>> {
        let records = self
            .index
            .query(&MediaQuery::scoped(MediaScope::AllImages))
            .await?;

        let albums = AlbumAggregator::aggregate(&records);
        tracing::debug!(
            records = records.len(),
            albums = albums.len(),
            "相册聚合完成"
        );
        Ok(albums)
    }

    /// 获取所有相册列表
    pub async fn get_albums(&self) -> AppResult<Vec<AlbumSummary>> {
        Ok(self.album_map().await?.into_values().collect())
    }
}
