//! 照片分页服务

use crate::models::{MediaQuery, MediaRecord, MediaScope, PaginationParams, PhotoPage};
use crate::services::media_index::SharedMediaIndex;
use crate::utils::error::AppResult;

/// 照片分页器
///
/// 无状态，每次调用对应一次媒体库查询。
#[derive(Clone)]
pub struct PhotoPager {
    index: SharedMediaIndex,
}

impl PhotoPager {
    pub fn new(index: SharedMediaIndex) -> Self {
        Self { index }
    }

    /// 获取某个范围的第 `page` 页（从 1 开始）
    ///
    /// 参数在查询前校验；超出末尾的页返回空结果。
    pub async fn get_page(
        &self,
        scope: &MediaScope,
        page: i64,
        page_size: i64,
    ) -> AppResult<PhotoPage> {
        let pagination = PaginationParams::new(page, page_size)?;
        self.fetch(scope, &pagination).await
    }

    /// 使用已校验的分页参数查询
    pub async fn fetch(
        &self,
        scope: &MediaScope,
        pagination: &PaginationParams,
    ) -> AppResult<PhotoPage> {
        let query = MediaQuery::scoped(scope.clone()).paged(pagination);
        let items = self.index.query(&query).await?;

        tracing::debug!(
            scope = %scope,
            page = pagination.page,
            page_size = pagination.page_size,
            returned = items.len(),
            "获取照片分页"
        );

        Ok(PhotoPage {
            scope: scope.clone(),
            page: pagination.page,
            page_size: pagination.page_size,
            items,
        })
    }

    /// 根据 ID 获取单张照片
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<MediaRecord>> {
        let mut records = self.index.query(&MediaQuery::by_id(id)).await?;
        Ok(if records.is_empty() {
            None
        } else {
            Some(records.swap_remove(0))
        })
    }

    /// 范围内的照片总数
    pub async fn count(&self, scope: &MediaScope) -> AppResult<i64> {
        self.index.count(scope).await
    }
}
