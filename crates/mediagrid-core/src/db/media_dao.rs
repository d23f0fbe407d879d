//! 媒体索引数据访问层

use rusqlite::{params, Row};

use crate::models::{MediaQuery, MediaRecord, MediaScope};
use crate::utils::error::AppResult;

use super::connection::Database;

/// 图片 MIME 过滤条件
const IMAGE_MIME_FILTER: &str = "mime_type LIKE 'image/%'";

/// 查询列（与 `row_to_media` 的读取顺序无关，按列名读取）
const MEDIA_COLUMNS: &str = "_id, bucket_id, bucket_display_name, _display_name, date_added, \
     datetaken, date_modified, _size, width, height, mime_type, _data";

struct ScopeCondition {
    sql: String,
    params: Vec<Box<dyn rusqlite::ToSql>>,
}

/// 构建范围过滤条件（总是包含图片 MIME 过滤）
fn build_scope_condition(scope: &MediaScope, id: Option<i64>) -> ScopeCondition {
    let mut clauses = vec![IMAGE_MIME_FILTER.to_string()];
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    match scope {
        MediaScope::AllImages => {}
        MediaScope::Album { album_id } => {
            clauses.push("bucket_id = ?".to_string());
            params.push(Box::new(album_id.clone()));
        }
        MediaScope::DateRange { start, end } => {
            clauses.push("datetaken >= ? AND datetaken <= ?".to_string());
            params.push(Box::new(*start));
            params.push(Box::new(*end));
        }
    }

    if let Some(id) = id {
        clauses.push("_id = ?".to_string());
        params.push(Box::new(id));
    }

    ScopeCondition {
        sql: format!("WHERE {}", clauses.join(" AND ")),
        params,
    }
}

/// 从数据库行映射到 MediaRecord
///
/// `_display_name` 与 `mime_type` 为必需列，为 NULL 时返回转换错误，由调用方跳过该行。
fn row_to_media(row: &Row<'_>) -> rusqlite::Result<MediaRecord> {
    Ok(MediaRecord {
        id: row.get("_id")?,
        album_id: row.get("bucket_id")?,
        album_name: row.get("bucket_display_name")?,
        display_name: row.get("_display_name")?,
        date_added: row.get::<_, Option<i64>>("date_added")?.unwrap_or(0),
        date_taken: row.get::<_, Option<i64>>("datetaken")?.unwrap_or(0),
        date_modified: row.get::<_, Option<i64>>("date_modified")?.unwrap_or(0),
        size: row.get::<_, Option<i64>>("_size")?.unwrap_or(0),
        width: row.get::<_, Option<i32>>("width")?.unwrap_or(0),
        height: row.get::<_, Option<i32>>("height")?.unwrap_or(0),
        mime_type: row.get("mime_type")?,
        path: row.get("_data")?,
    })
}

/// 行数据本身有问题（缺列值、类型不符），而不是查询失败
fn is_malformed_row(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
    )
}

impl Database {
    // ==================== 写入（宿主同步） ====================

    /// 插入或更新一条媒体记录
    pub fn upsert_media(&self, record: &MediaRecord) -> AppResult<()> {
        let conn = self.connection()?;
        Self::upsert_media_in(&conn, record)?;
        Ok(())
    }

    /// 批量插入或更新媒体记录（单个事务）
    pub fn upsert_media_batch(&self, records: &[MediaRecord]) -> AppResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let count = self.transaction(|conn| {
            let mut count = 0;
            for record in records {
                Self::upsert_media_in(conn, record)?;
                count += 1;
            }
            Ok(count)
        })?;

        tracing::debug!("批量写入 {} 条媒体记录", count);
        Ok(count)
    }

    fn upsert_media_in(conn: &rusqlite::Connection, record: &MediaRecord) -> rusqlite::Result<()> {
        let mut stmt = conn.prepare_cached(
            r#"
            INSERT INTO media (
                _id, bucket_id, bucket_display_name, _display_name, date_added,
                datetaken, date_modified, _size, width, height, mime_type, _data
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(_id) DO UPDATE SET
                bucket_id = excluded.bucket_id,
                bucket_display_name = excluded.bucket_display_name,
                _display_name = excluded._display_name,
                date_added = excluded.date_added,
                datetaken = excluded.datetaken,
                date_modified = excluded.date_modified,
                _size = excluded._size,
                width = excluded.width,
                height = excluded.height,
                mime_type = excluded.mime_type,
                _data = excluded._data
            "#,
        )?;

        stmt.execute(params![
            record.id,
            record.album_id,
            record.album_name,
            record.display_name,
            record.date_added,
            record.date_taken,
            record.date_modified,
            record.size,
            record.width,
            record.height,
            record.mime_type,
            record.path,
        ])?;

        Ok(())
    }

    /// 批量删除媒体记录
    pub fn delete_media_batch(&self, ids: &[i64]) -> AppResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        self.transaction(|conn| {
            let mut stmt = conn.prepare_cached("DELETE FROM media WHERE _id = ?1")?;
            let mut count = 0;
            for id in ids {
                count += stmt.execute(params![id])?;
            }
            Ok(count)
        })
    }

    // ==================== 查询 ====================

    /// 按查询描述读取媒体记录
    ///
    /// 无效行被跳过并记录警告；查询本身失败时返回错误。
    pub fn query_media(&self, query: &MediaQuery) -> AppResult<Vec<MediaRecord>> {
        let conn = self.connection()?;

        let condition = build_scope_condition(&query.scope, query.id);
        let mut sql = format!(
            "SELECT {} FROM media {} {}",
            MEDIA_COLUMNS,
            condition.sql,
            query.sort.order_by_sql()
        );
        let mut params_vec = condition.params;

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ? OFFSET ?");
            params_vec.push(Box::new(limit));
            params_vec.push(Box::new(query.offset.unwrap_or(0)));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), row_to_media)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            match row {
                Ok(record) => records.push(record),
                Err(e) if is_malformed_row(&e) => {
                    skipped += 1;
                    tracing::warn!("跳过无效媒体行: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::debug!(
            scope = %query.scope,
            limit = ?query.limit,
            offset = ?query.offset,
            returned = records.len(),
            skipped,
            "媒体查询完成"
        );

        Ok(records)
    }

    /// 统计某个范围内的图片数量
    pub fn count_media(&self, scope: &MediaScope) -> AppResult<i64> {
        let conn = self.connection()?;

        let condition = build_scope_condition(scope, None);
        let sql = format!("SELECT COUNT(DISTINCT _id) FROM media {}", condition.sql);
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            condition.params.iter().map(|p| p.as_ref()).collect();

        let total: i64 = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(total)
    }
}
