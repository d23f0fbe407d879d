//! 数据库连接管理
//!
//! 提供 SQLite 媒体索引的连接和初始化功能

use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::StoreSettings;
use crate::paths::PathProvider;
use crate::utils::error::{AppError, AppResult};

use super::schema::{INIT_SCHEMA, MIGRATIONS, SCHEMA_VERSION};

/// 数据库连接管理器
#[derive(Clone)]
pub struct Database {
    /// 数据库连接（使用 Arc<Mutex> 实现线程安全）
    conn: Arc<Mutex<Connection>>,
    /// 数据库文件路径
    path: PathBuf,
}

impl Database {
    /// 打开或创建数据库
    pub fn open(path: PathBuf) -> AppResult<Self> {
        Self::open_with_settings(path, &StoreSettings::default())
    }

    /// 按存储设置打开或创建数据库
    pub fn open_with_settings(path: PathBuf, settings: &StoreSettings) -> AppResult<Self> {
        // 确保父目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };

        db.configure(settings)?;

        Ok(db)
    }

    /// 使用 PathProvider 打开数据库
    pub fn open_with_provider(
        provider: &dyn PathProvider,
        settings: &StoreSettings,
    ) -> AppResult<Self> {
        Self::open_with_settings(provider.database_path(), settings)
    }

    /// 打开内存数据库（用于测试）
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };

        db.configure(&StoreSettings::default())?;

        Ok(db)
    }

    /// 配置数据库连接
    fn configure(&self, settings: &StoreSettings) -> AppResult<()> {
        let conn = self.connection()?;

        if settings.enable_wal {
            // 启用 WAL 模式（读写并发）
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }

        conn.execute_batch(
            r#"
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;

        Ok(())
    }

    /// 初始化数据库 Schema
    pub fn init(&self) -> AppResult<()> {
        let conn = self.connection()?;

        // 检查是否已初始化
        let table_exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !table_exists {
            tracing::info!("初始化媒体索引 Schema...");

            conn.execute_batch(INIT_SCHEMA)?;

            conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![SCHEMA_VERSION, chrono::Utc::now().to_rfc3339()],
            )?;

            tracing::info!("媒体索引 Schema 初始化完成，版本: {}", SCHEMA_VERSION);
        } else {
            Self::migrate_internal(&conn)?;
        }

        Ok(())
    }

    /// 执行数据库迁移
    fn migrate_internal(conn: &Connection) -> AppResult<()> {
        let current_version: i32 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        tracing::debug!("当前数据库版本: {}", current_version);

        for migration in MIGRATIONS {
            if migration.version > current_version {
                tracing::info!(
                    "执行迁移 v{}: {}",
                    migration.version,
                    migration.description
                );

                conn.execute_batch(migration.sql)?;
                conn.execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, chrono::Utc::now().to_rfc3339()],
                )?;

                tracing::info!("迁移 v{} 完成", migration.version);
            }
        }

        Ok(())
    }

    /// 获取数据库连接（用于执行查询）
    pub fn connection(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            AppError::Database(rusqlite::Error::InvalidParameterName(e.to_string()))
        })
    }

    /// 执行事务
    pub fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// 获取数据库文件路径
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// 获取数据库统计信息
    pub fn stats(&self) -> AppResult<DatabaseStats> {
        let conn = self.connection()?;

        let media_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))
            .unwrap_or(0);

        let album_count: i64 = conn
            .query_row(
                "SELECT COUNT(DISTINCT bucket_id) FROM media WHERE bucket_id IS NOT NULL",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        let db_size = std::fs::metadata(&self.path)
            .map(|m| m.len() as i64)
            .unwrap_or(0);

        Ok(DatabaseStats {
            media_count,
            album_count,
            db_size,
        })
    }
}

/// 数据库统计信息
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    pub media_count: i64,
    pub album_count: i64,
    pub db_size: i64,
}
