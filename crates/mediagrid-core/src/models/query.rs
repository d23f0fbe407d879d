//! 媒体查询描述

use super::{MediaScope, MediaSort, PaginationParams};

/// 一次媒体库查询：范围 + 排序 + 可选的 LIMIT/OFFSET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub scope: MediaScope,
    pub sort: MediaSort,
    /// 仅查询指定 ID
    pub id: Option<i64>,
    /// 为 None 时不分页
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl MediaQuery {
    /// 某个范围的全量查询（使用范围的默认排序）
    pub fn scoped(scope: MediaScope) -> Self {
        let sort = scope.default_sort();
        Self {
            scope,
            sort,
            id: None,
            limit: None,
            offset: None,
        }
    }

    /// 单条记录查询
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::scoped(MediaScope::AllImages)
        }
    }

    pub fn sorted(mut self, sort: MediaSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn paged(mut self, pagination: &PaginationParams) -> Self {
        self.limit = Some(pagination.limit());
        self.offset = Some(pagination.offset());
        self
    }

    pub fn is_paged(&self) -> bool {
        self.limit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_query() {
        let pagination = PaginationParams::new(2, 2).unwrap();
        let query = MediaQuery::scoped(MediaScope::AllImages).paged(&pagination);
        assert_eq!(query.limit, Some(2));
        assert_eq!(query.offset, Some(2));
        assert!(query.is_paged());
    }

    #[test]
    fn test_by_id_is_unpaged() {
        let query = MediaQuery::by_id(9);
        assert_eq!(query.id, Some(9));
        assert!(!query.is_paged());
    }
}
