//! SQLite 资源存储
//!
//! 提供 [`ResourceStore`] 的 SQLite 实现：
//! - 单连接 + `Arc<Mutex>`，线程安全
//! - 写操作在事务内完成
//! - 删除资源时级联删除译文
//!
//! # 使用示例
//!
//! ```rust
//! use std::path::Path;
//! use dblocale::data::store::{ResourceStore, SqliteResourceStore};
//!
//! let store = SqliteResourceStore::open(Path::new("resources.db"))?;
//! store.create_resource("Home.Title", "admin")?;
//! let resource = store.get_resource("Home.Title")?;
//! ```

use super::ResourceStore;
use crate::data::{DataError, Result};
use crate::models::{LanguageTag, Resource, ResourceItem};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS localization_resources (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        resource_key TEXT NOT NULL UNIQUE,
        author TEXT,
        modification_date TEXT NOT NULL,
        from_code INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS localization_resource_translations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        resource_id INTEGER NOT NULL
            REFERENCES localization_resources(id) ON DELETE CASCADE,
        language TEXT NOT NULL,
        value TEXT,
        UNIQUE(resource_id, language)
    );
";

/// 译文写入时自动创建资源所用的作者
const IMPLICIT_AUTHOR: &str = "system";

/// SQLite 资源存储
pub struct SqliteResourceStore {
    conn: Arc<Mutex<Connection>>,
    /// 数据库路径（用于错误报告）
    db_path: PathBuf,
}

/// 资源表的一行
struct ResourceRow {
    key: String,
    author: Option<String>,
    modification_date: Option<String>,
    from_code: bool,
}

impl ResourceRow {
    fn into_resource(self) -> Resource {
        let mut resource = Resource::new(self.key);
        resource.author = self.author;
        resource.modification_date = self.modification_date.as_deref().and_then(parse_timestamp);
        resource.from_code = self.from_code;
        resource
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

impl SqliteResourceStore {
    /// 打开（或创建）数据库文件并初始化表结构
    pub fn open(path: &Path) -> Result<Self> {
        // 创建父目录
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DataError::io(parent.to_path_buf(), e))?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn, path.to_path_buf())
    }

    /// 内存数据库（用于测试和一次性扫描）
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(db_path = %db_path.display(), "资源数据库已初始化");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        })
    }

    /// 获取数据库路径
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DataError::Concurrency(e.to_string()))
    }

    /// 在事务内执行写操作
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    fn find_resource_id(conn: &Connection, key: &str) -> Result<Option<i64>> {
        let id = conn
            .query_row(
                "SELECT id FROM localization_resources WHERE resource_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_resource(conn: &Connection, key: &str, author: &str, from_code: bool) -> Result<i64> {
        conn.execute(
            "INSERT INTO localization_resources (resource_key, author, modification_date, from_code)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, author, now(), from_code],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn create(&self, key: &str, author: &str, from_code: bool) -> Result<()> {
        self.transaction(|tx| {
            if Self::find_resource_id(tx, key)?.is_some() {
                return Err(DataError::DuplicateKey(key.to_string()));
            }
            Self::insert_resource(tx, key, author, from_code)?;
            Ok(())
        })?;

        tracing::debug!(key = %key, author = %author, from_code, "资源已创建");
        Ok(())
    }

    fn load_translations(conn: &Connection, resource_id: i64, resource: &mut Resource) -> Result<()> {
        let mut stmt = conn.prepare(
            "SELECT language, value FROM localization_resource_translations
             WHERE resource_id = ?1 ORDER BY language",
        )?;
        let rows = stmt
            .query_map(params![resource_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (language, value) in rows {
            resource.set_translation(LanguageTag::parse(&language)?, value);
        }
        Ok(())
    }
}

impl ResourceStore for SqliteResourceStore {
    fn get_resource(&self, key: &str) -> Result<Option<Resource>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT id, resource_key, author, modification_date, from_code
                 FROM localization_resources WHERE resource_key = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        ResourceRow {
                            key: row.get(1)?,
                            author: row.get(2)?,
                            modification_date: row.get(3)?,
                            from_code: row.get(4)?,
                        },
                    ))
                },
            )
            .optional()?;

        let Some((id, row)) = row else {
            return Ok(None);
        };

        let mut resource = row.into_resource();
        Self::load_translations(&conn, id, &mut resource)?;
        Ok(Some(resource))
    }

    fn get_available_languages(&self) -> Result<Vec<LanguageTag>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT language FROM localization_resource_translations
             WHERE language <> '' ORDER BY language",
        )?;
        let languages = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        languages.iter().map(|l| LanguageTag::parse(l)).collect()
    }

    fn get_all_resources(&self) -> Result<Vec<Resource>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT r.resource_key, r.author, r.modification_date, r.from_code, t.language, t.value
             FROM localization_resources r
             LEFT JOIN localization_resource_translations t ON t.resource_id = r.id
             ORDER BY r.resource_key, t.language",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    ResourceRow {
                        key: row.get(0)?,
                        author: row.get(1)?,
                        modification_date: row.get(2)?,
                        from_code: row.get(3)?,
                    },
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // 按资源键分组（结果已按键排序）
        let mut resources: Vec<Resource> = Vec::new();
        for (row, language, value) in rows {
            let is_new = resources.last().map(|r| r.key() != row.key).unwrap_or(true);
            if is_new {
                resources.push(row.into_resource());
            }
            if let (Some(language), Some(current)) = (language, resources.last_mut()) {
                current.set_translation(LanguageTag::parse(&language)?, value);
            }
        }

        Ok(resources)
    }

    fn get_all_translations(&self, key: &str, language: &LanguageTag) -> Result<Vec<ResourceItem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT r.resource_key, t.value
             FROM localization_resources r
             JOIN localization_resource_translations t ON t.resource_id = r.id
             WHERE t.language = ?2 AND substr(r.resource_key, 1, length(?1)) = ?1
             ORDER BY r.resource_key",
        )?;

        let items = stmt
            .query_map(params![key, language.as_str()], |row| {
                Ok(ResourceItem {
                    key: row.get(0)?,
                    language: language.clone(),
                    value: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn create_resource(&self, key: &str, author: &str) -> Result<()> {
        self.create(key, author, false)
    }

    fn create_resource_from_code(&self, key: &str, author: &str) -> Result<()> {
        self.create(key, author, true)
    }

    fn delete_resource(&self, key: &str) -> Result<()> {
        let deleted = self.transaction(|tx| {
            tx.execute(
                "DELETE FROM localization_resource_translations
                 WHERE resource_id IN (SELECT id FROM localization_resources WHERE resource_key = ?1)",
                params![key],
            )?;
            Ok(tx.execute(
                "DELETE FROM localization_resources WHERE resource_key = ?1",
                params![key],
            )?)
        })?;

        tracing::debug!(key = %key, deleted, "资源已删除");
        Ok(())
    }

    fn create_or_update_translation(
        &self,
        key: &str,
        language: &LanguageTag,
        value: Option<&str>,
    ) -> Result<()> {
        self.transaction(|tx| {
            let resource_id = match Self::find_resource_id(tx, key)? {
                Some(id) => id,
                None => Self::insert_resource(tx, key, IMPLICIT_AUTHOR, false)?,
            };

            tx.execute(
                "INSERT INTO localization_resource_translations (resource_id, language, value)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(resource_id, language) DO UPDATE SET value = excluded.value",
                params![resource_id, language.as_str(), value],
            )?;
            tx.execute(
                "UPDATE localization_resources SET modification_date = ?1 WHERE id = ?2",
                params![now(), resource_id],
            )?;
            Ok(())
        })?;

        tracing::debug!(key = %key, language = %language, "译文已写入");
        Ok(())
    }
}
