//! 数据库 Schema 定义
//!
//! 媒体索引表的列名与平台媒体库保持一致，方便宿主直接同步行数据。

/// 数据库版本
pub const SCHEMA_VERSION: i32 = 1;

/// 初始化 Schema SQL
///
/// 除 `_id` 外的列都允许为 NULL：媒体库里的脏数据在读取时跳过，而不是在写入时拒绝。
pub const INIT_SCHEMA: &str = r#"
-- 版本表
CREATE TABLE IF NOT EXISTS schema_version (
    version         INTEGER PRIMARY KEY,
    applied_at      TEXT NOT NULL
);

-- 媒体表
CREATE TABLE IF NOT EXISTS media (
    _id                 INTEGER PRIMARY KEY,
    bucket_id           TEXT,
    bucket_display_name TEXT,
    _display_name       TEXT,
    date_added          INTEGER,
    datetaken           INTEGER,
    date_modified       INTEGER,
    _size               INTEGER,
    width               INTEGER,
    height              INTEGER,
    mime_type           TEXT,
    _data               TEXT
);

CREATE INDEX IF NOT EXISTS idx_media_date_modified ON media(date_modified DESC, _id DESC);
CREATE INDEX IF NOT EXISTS idx_media_datetaken ON media(datetaken DESC, _id DESC);
CREATE INDEX IF NOT EXISTS idx_media_mime_type ON media(mime_type);
CREATE INDEX IF NOT EXISTS idx_media_bucket_date ON media(bucket_id, date_modified DESC, _id DESC);
"#;

/// 迁移脚本
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// 所有迁移脚本列表，按版本递增
pub const MIGRATIONS: &[Migration] = &[];
