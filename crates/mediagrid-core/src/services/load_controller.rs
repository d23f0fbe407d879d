//! 增量加载控制器
//!
//! 为一个照片列表会话维护已加载的照片、页码和加载状态。
//! 状态通过 `eyeball` 的可观察单元对外发布。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use eyeball::{SharedObservable, Subscriber};

use crate::models::{MediaRecord, MediaScope, PaginationParams, PagingSettings, PhotoPage};
use crate::services::photo_pager::PhotoPager;
use crate::sessions::CancelToken;
use crate::utils::error::{AppError, AppResult};

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadState {
    /// 没有会话
    Idle,
    /// 正在获取一页
    Loading,
    /// 至少完成过一次获取，处于空闲
    Loaded,
}

/// 一次加载调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LoadOutcome {
    /// 追加了第 `page` 页的 `count` 条记录
    Appended { page: u32, count: usize },
    /// 已有请求在进行中，本次调用被忽略
    AlreadyLoading,
    /// 尚未开始会话
    NoSession,
    /// 获取完成时会话已被重置或替换，结果被丢弃
    Discarded,
}

#[derive(Debug)]
struct Inner {
    scope: Option<MediaScope>,
    /// 已成功加载的页数
    loaded_pages: u32,
    in_flight: bool,
    token: CancelToken,
}

/// 增量加载控制器
pub struct IncrementalLoadController {
    pager: PhotoPager,
    page_size: u32,
    inner: Mutex<Inner>,
    photos: SharedObservable<Arc<Vec<MediaRecord>>>,
    loading: SharedObservable<bool>,
    state: SharedObservable<LoadState>,
}

impl std::fmt::Debug for IncrementalLoadController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalLoadController")
            .field("page_size", &self.page_size)
            .field("state", &self.state.get())
            .field("photos", &self.photos.get().len())
            .finish_non_exhaustive()
    }
}

impl IncrementalLoadController {
    /// 创建控制器；分页大小为 0 时返回 [`AppError::InvalidPageSize`]
    pub fn new(pager: PhotoPager, paging: &PagingSettings) -> AppResult<Self> {
        if paging.page_size == 0 {
            return Err(AppError::InvalidPageSize(0));
        }

        Ok(Self {
            pager,
            page_size: paging.page_size,
            inner: Mutex::new(Inner {
                scope: None,
                loaded_pages: 0,
                in_flight: false,
                token: CancelToken::new(0),
            }),
            photos: SharedObservable::new(Arc::new(Vec::new())),
            loading: SharedObservable::new(false),
            state: SharedObservable::new(LoadState::Idle),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pagination(&self, page: u32) -> AppResult<PaginationParams> {
        PaginationParams::new(i64::from(page), i64::from(self.page_size))
    }

    /// 开始新会话并加载第一页
    ///
    /// 进行中的旧请求会被取消，其结果被丢弃。失败时进入 Loaded（列表为空），
    /// 错误返回给调用者，可再次调用本方法重试。
    pub async fn start_session(&self, scope: MediaScope) -> AppResult<LoadOutcome> {
        let token = {
            let mut inner = self.lock();
            inner.token.cancel();
            inner.token = CancelToken::new(inner.token.epoch() + 1);
            inner.scope = Some(scope.clone());
            inner.loaded_pages = 0;
            inner.in_flight = true;

            self.photos.set(Arc::new(Vec::new()));
            self.loading.set(true);
            self.state.set(LoadState::Loading);
            inner.token.clone()
        };

        tracing::debug!(scope = %scope, epoch = token.epoch(), "开始照片会话");

        let result = match self.pagination(1) {
            Ok(pagination) => self.pager.fetch(&scope, &pagination).await,
            Err(e) => Err(e),
        };
        self.complete(&token, 1, result)
    }

    /// 加载下一页并追加到列表末尾
    ///
    /// 没有会话时返回 `NoSession`，已有请求在进行时返回 `AlreadyLoading`。
    /// 失败不会推进页码，下一次调用会重试同一页。
    pub async fn load_more(&self) -> AppResult<LoadOutcome> {
        let (scope, page, token) = {
            let mut inner = self.lock();
            let Some(scope) = inner.scope.clone() else {
                return Ok(LoadOutcome::NoSession);
            };
            if inner.in_flight {
                return Ok(LoadOutcome::AlreadyLoading);
            }
            inner.in_flight = true;

            self.loading.set(true);
            self.state.set(LoadState::Loading);
            (scope, inner.loaded_pages.saturating_add(1), inner.token.clone())
        };

        let result = match self.pagination(page) {
            Ok(pagination) => self.pager.fetch(&scope, &pagination).await,
            Err(e) => Err(e),
        };
        self.complete(&token, page, result)
    }

    /// 回到 Idle：清空列表，取消进行中的请求
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.token.cancel();
        inner.token = CancelToken::new(inner.token.epoch() + 1);
        inner.scope = None;
        inner.loaded_pages = 0;
        inner.in_flight = false;

        self.photos.set(Arc::new(Vec::new()));
        self.loading.set(false);
        self.state.set(LoadState::Idle);
    }

    /// 提交一次获取的结果
    fn complete(
        &self,
        token: &CancelToken,
        page: u32,
        result: AppResult<PhotoPage>,
    ) -> AppResult<LoadOutcome> {
        let mut inner = self.lock();
        if token.is_cancelled() {
            tracing::debug!(epoch = token.epoch(), page, "会话已失效，丢弃结果");
            return Ok(LoadOutcome::Discarded);
        }
        inner.in_flight = false;

        let outcome = match result {
            Ok(photo_page) => {
                let count = photo_page.len();
                inner.loaded_pages = page;

                let mut photos = Vec::clone(&self.photos.get());
                photos.extend(photo_page.items);
                self.photos.set(Arc::new(photos));

                tracing::debug!(page, count, "追加照片分页");
                Ok(LoadOutcome::Appended { page, count })
            }
            Err(e) => {
                tracing::warn!(page, "加载照片分页失败: {}", e);
                Err(e)
            }
        };

        self.loading.set(false);
        self.state.set(LoadState::Loaded);
        outcome
    }

    /// 当前会话范围
    pub fn scope(&self) -> Option<MediaScope> {
        self.lock().scope.clone()
    }

    /// 当前页码（从 1 开始）
    pub fn page(&self) -> u32 {
        self.lock().loaded_pages.max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 已加载照片的快照
    pub fn photos(&self) -> Arc<Vec<MediaRecord>> {
        self.photos.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn state(&self) -> LoadState {
        self.state.get()
    }

    pub fn subscribe_photos(&self) -> Subscriber<Arc<Vec<MediaRecord>>> {
        self.photos.subscribe()
    }

    pub fn subscribe_loading(&self) -> Subscriber<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_state(&self) -> Subscriber<LoadState> {
        self.state.subscribe()
    }
}
