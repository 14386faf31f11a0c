use std::{
    error::Error,
    fmt,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use gfonts_store::models::{
    DatabaseStats,
    Font,
    FontStyle,
    Icon,
    IconCategory,
    IconStyle,
    IconVariant,
    NewFont,
    NewVariant,
    OrphanCounts,
    TagName,
    TagScore,
    Variant,
};
use gfonts_store::schema::{
    SCHEMA,
    TABLE_FONT_TAGS,
    TABLE_FONTS,
    TABLE_ICON_VARIANTS,
    TABLE_ICONS,
    TABLE_TAGS,
    TABLE_VARIANT_TAGS,
    TABLE_VARIANTS,
    VARIANT_FORMAT,
};
use rusqlite::{
    Connection,
    OpenFlags,
    OptionalExtension,
    Row,
    params,
    params_from_iter,
    types::Value,
};
use tracing::debug;

#[derive(Debug)]
pub enum StoreError {
    Sqlite(Box<rusqlite::Error>),
    RemoveFile { path: PathBuf, source: io::Error },
    Poisoned,
    InvalidInput(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "SQLite error: {err}"),
            Self::RemoveFile { path, source } => {
                write!(f, "failed to remove existing store {}: {source}", path.display())
            }
            Self::Poisoned => write!(f, "store connection lock poisoned"),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Optional substring filters for font searches; all supplied filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontFilter {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub is_variable: Option<bool>,
}

/// Optional substring filters for icon searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconFilter {
    pub name: Option<String>,
    pub category: Option<String>,
}

/// Result of an insert that ignores conflicts on the natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    Existing(i64),
}

impl InsertOutcome {
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Inserted(id) | Self::Existing(id) => id,
        }
    }

    #[must_use]
    pub const fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

const FONT_COLUMNS: &str = "fonts.id, fonts.family, fonts.subsets, fonts.category, fonts.version, \
     fonts.last_modified, fonts.default_variant, fonts.is_variable";
const ICON_COLUMNS: &str = "icons.id, icons.name, icons.category, icons.codepoint";
const VARIANT_COLUMNS: &str = "id, font_id, name, style, weight, local_path, url, format";

/// Shared handle to the relational store.
///
/// One connection is opened per process and serialized behind a mutex.
#[derive(Debug, Clone)]
pub struct SqliteFontStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteFontStore {
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens an existing store read-only.
    ///
    /// # Errors
    /// Returns `StoreError` if the file does not exist or cannot be opened.
    pub fn open_read_only(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens an empty in-memory store with the schema applied.
    ///
    /// # Errors
    /// Returns `StoreError` if the schema cannot be applied.
    pub fn open_in_memory() -> StoreResult<Self> {
        let store = Self::from_connection(Connection::open_in_memory()?);
        store.apply_schema()?;
        Ok(store)
    }

    /// Deletes any store at `path` and creates a new one with the schema applied.
    ///
    /// # Errors
    /// Returns `StoreError` if an existing file cannot be removed or the new
    /// store cannot be created.
    pub fn create_fresh(path: &Path) -> StoreResult<Self> {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed existing store"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::RemoveFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
        let store = Self::from_connection(Connection::open(path)?);
        store.apply_schema()?;
        Ok(store)
    }

    /// Creates every table that does not exist yet.
    ///
    /// # Errors
    /// Returns `StoreError` if the DDL fails.
    pub fn apply_schema(&self) -> StoreResult<()> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Runs `f` inside one transaction, committing only if it succeeds.
    ///
    /// # Errors
    /// Returns the error of `f`, or a `StoreError` if the transaction fails.
    pub fn write<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&CatalogWriter<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(StoreError::from)?;
        let output = f(&CatalogWriter { conn: &tx })?;
        tx.commit().map_err(StoreError::from)?;
        Ok(output)
    }

    /// Searches fonts by family, tag, category and variable flag.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn search_fonts(&self, filter: &FontFilter) -> StoreResult<Vec<Font>> {
        let mut query = FilteredQuery::new(format!("SELECT DISTINCT {FONT_COLUMNS} FROM fonts"));
        query.like("fonts.family", filter.name.as_deref());
        query.like("fonts.category", filter.category.as_deref());
        if let Some(is_variable) = filter.is_variable {
            query.equals("fonts.is_variable", Value::Integer(i64::from(is_variable)));
        }
        if query.like("tags.name", filter.tag.as_deref()) {
            query.join(
                "INNER JOIN font_tags ON fonts.id = font_tags.font_id \
                 INNER JOIN tags ON font_tags.tag_id = tags.id",
            );
        }
        let (sql, values) = query.finish("fonts.id");
        self.query_all(&sql, &values, font_from_row)
    }

    /// Searches icons by name and category.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn search_icons(&self, filter: &IconFilter) -> StoreResult<Vec<Icon>> {
        let mut query = FilteredQuery::new(format!("SELECT {ICON_COLUMNS} FROM icons"));
        query.like("icons.name", filter.name.as_deref());
        query.like("icons.category", filter.category.as_deref());
        let (sql, values) = query.finish("icons.id");
        self.query_all(&sql, &values, icon_from_row)
    }

    /// Lists tag names, optionally filtered by substring.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn search_font_tags(&self, name: Option<&str>) -> StoreResult<Vec<TagName>> {
        let mut query = FilteredQuery::new("SELECT tags.name FROM tags".to_string());
        query.like("tags.name", name);
        let (sql, values) = query.finish("tags.id");
        self.query_all(&sql, &values, |row| Ok(TagName { name: row.get(0)? }))
    }

    /// Lists distinct icon categories.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn icon_categories(&self) -> StoreResult<Vec<IconCategory>> {
        self.query_all(
            "SELECT DISTINCT category FROM icons ORDER BY category",
            &[],
            |row| Ok(IconCategory { category: row.get(0)? }),
        )
    }

    /// Lists distinct icon rendering styles.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn icon_styles(&self) -> StoreResult<Vec<IconStyle>> {
        self.query_all(
            "SELECT DISTINCT style FROM icon_variants ORDER BY style",
            &[],
            |row| Ok(IconStyle { style: row.get(0)? }),
        )
    }

    /// Counts fonts, variants and icons.
    ///
    /// # Errors
    /// Returns `StoreError` if a count query fails.
    pub fn database_stats(&self) -> StoreResult<DatabaseStats> {
        let conn = self.lock()?;
        Ok(DatabaseStats {
            fonts: count_rows(&conn, &format!("SELECT COUNT(*) FROM {TABLE_FONTS}"))?,
            variants: count_rows(&conn, &format!("SELECT COUNT(*) FROM {TABLE_VARIANTS}"))?,
            icons: count_rows(&conn, &format!("SELECT COUNT(*) FROM {TABLE_ICONS}"))?,
        })
    }

    /// Counts child rows that reference a missing parent.
    ///
    /// # Errors
    /// Returns `StoreError` if a count query fails.
    pub fn orphan_counts(&self) -> StoreResult<OrphanCounts> {
        let conn = self.lock()?;
        Ok(OrphanCounts {
            variants: count_orphans(&conn, TABLE_VARIANTS, "font_id", TABLE_FONTS)?,
            font_tags_font: count_orphans(&conn, TABLE_FONT_TAGS, "font_id", TABLE_FONTS)?,
            font_tags_tag: count_orphans(&conn, TABLE_FONT_TAGS, "tag_id", TABLE_TAGS)?,
            variant_tags_variant: count_orphans(&conn, TABLE_VARIANT_TAGS, "variant_id", TABLE_VARIANTS)?,
            variant_tags_tag: count_orphans(&conn, TABLE_VARIANT_TAGS, "tag_id", TABLE_TAGS)?,
            icon_variants: count_orphans(&conn, TABLE_ICON_VARIANTS, "icon_id", TABLE_ICONS)?,
        })
    }

    /// Fetches a font by exact family name.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn font_by_family(&self, family: &str) -> StoreResult<Option<Font>> {
        let conn = self.lock()?;
        let font = conn
            .query_row(
                &format!("SELECT {FONT_COLUMNS} FROM fonts WHERE fonts.family = ?1"),
                params![family],
                font_from_row,
            )
            .optional()?;
        Ok(font)
    }

    /// Fetches an icon by exact name.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn icon_by_name(&self, name: &str) -> StoreResult<Option<Icon>> {
        let conn = self.lock()?;
        let icon = conn
            .query_row(
                &format!("SELECT {ICON_COLUMNS} FROM icons WHERE icons.name = ?1"),
                params![name],
                icon_from_row,
            )
            .optional()?;
        Ok(icon)
    }

    /// Lists the variants of a font in load order.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn variants_for_font(&self, font_id: i64) -> StoreResult<Vec<Variant>> {
        self.query_all(
            &format!("SELECT {VARIANT_COLUMNS} FROM variants WHERE font_id = ? ORDER BY id"),
            &[Value::Integer(font_id)],
            variant_from_row,
        )
    }

    /// Lists the asset rows of an icon in load order.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn icon_variants_for_icon(&self, icon_id: i64) -> StoreResult<Vec<IconVariant>> {
        self.query_all(
            &format!("SELECT id, icon_id, style, path FROM {TABLE_ICON_VARIANTS} WHERE icon_id = ? ORDER BY id"),
            &[Value::Integer(icon_id)],
            |row| {
                Ok(IconVariant {
                    id: row.get(0)?,
                    icon_id: row.get(1)?,
                    style: row.get(2)?,
                    path: row.get(3)?,
                })
            },
        )
    }

    /// Lists the tags of a font with their relevance scores.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn tags_for_font(&self, font_id: i64) -> StoreResult<Vec<TagScore>> {
        self.query_all(
            &format!(
                "SELECT t.name, ft.value FROM {TABLE_FONT_TAGS} ft JOIN {TABLE_TAGS} t ON t.id = ft.tag_id \
                 WHERE ft.font_id = ? ORDER BY t.name"
            ),
            &[Value::Integer(font_id)],
            tag_score_from_row,
        )
    }

    /// Lists the tags of a variant with their relevance scores.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn tags_for_variant(&self, variant_id: i64) -> StoreResult<Vec<TagScore>> {
        self.query_all(
            &format!(
                "SELECT t.name, vt.value FROM {TABLE_VARIANT_TAGS} vt JOIN {TABLE_TAGS} t ON t.id = vt.tag_id \
                 WHERE vt.variant_id = ? ORDER BY t.name"
            ),
            &[Value::Integer(variant_id)],
            tag_score_from_row,
        )
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_all<T>(
        &self,
        sql: &str,
        values: &[Value],
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> StoreResult<Vec<T>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(values), map)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

/// Insert and lookup operations available inside [`SqliteFontStore::write`].
///
/// Every insert ignores conflicts on the natural key, so the first write wins.
pub struct CatalogWriter<'conn> {
    conn: &'conn Connection,
}

impl CatalogWriter<'_> {
    /// Inserts a font unless its family already exists.
    ///
    /// # Errors
    /// Returns `StoreError` if the write or the id lookup fails.
    pub fn insert_font(&self, font: &NewFont) -> StoreResult<InsertOutcome> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO fonts (family, subsets, category, version, last_modified, default_variant, is_variable) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        let changed = stmt.execute(params![
            font.family,
            font.subsets,
            font.category,
            font.version,
            font.last_modified,
            font.default_variant,
            font.is_variable,
        ])?;
        if changed > 0 {
            return Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid()));
        }
        let id = self
            .font_id(&font.family)?
            .ok_or_else(|| missing_after_ignore(TABLE_FONTS, &font.family))?;
        Ok(InsertOutcome::Existing(id))
    }

    /// Inserts a variant row; variants carry no natural key so every call adds a row.
    ///
    /// # Errors
    /// Returns `StoreError` if the write fails.
    pub fn insert_variant(&self, variant: &NewVariant) -> StoreResult<i64> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO variants (font_id, name, style, weight, local_path, url, format) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        stmt.execute(params![
            variant.font_id,
            variant.name,
            variant.style.as_str(),
            variant.weight,
            variant.url,
            variant.url,
            VARIANT_FORMAT,
        ])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts a tag unless its name already exists.
    ///
    /// # Errors
    /// Returns `StoreError` if the write or the id lookup fails.
    pub fn insert_tag(&self, name: &str, description: &str) -> StoreResult<InsertOutcome> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT OR IGNORE INTO tags (name, description) VALUES (?1, ?2)")?;
        if stmt.execute(params![name, description])? > 0 {
            return Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid()));
        }
        let id = self
            .tag_id(name)?
            .ok_or_else(|| missing_after_ignore("tags", name))?;
        Ok(InsertOutcome::Existing(id))
    }

    /// Associates a tag with a font; returns `false` if the pair already exists.
    ///
    /// # Errors
    /// Returns `StoreError` if the write fails.
    pub fn insert_font_tag(&self, font_id: i64, tag_id: i64, value: f64) -> StoreResult<bool> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO font_tags (font_id, tag_id, value) VALUES (?1, ?2, ?3)",
        )?;
        Ok(stmt.execute(params![font_id, tag_id, value])? > 0)
    }

    /// Associates a tag with a variant; returns `false` if the pair already exists.
    ///
    /// # Errors
    /// Returns `StoreError` if the write fails.
    pub fn insert_variant_tag(&self, variant_id: i64, tag_id: i64, value: f64) -> StoreResult<bool> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO variant_tags (variant_id, tag_id, value) VALUES (?1, ?2, ?3)",
        )?;
        Ok(stmt.execute(params![variant_id, tag_id, value])? > 0)
    }

    /// Inserts an icon unless its name already exists.
    ///
    /// # Errors
    /// Returns `StoreError` if the write or the id lookup fails.
    pub fn insert_icon(
        &self,
        name: &str,
        category: &str,
        codepoint: Option<&str>,
    ) -> StoreResult<InsertOutcome> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO icons (name, category, codepoint) VALUES (?1, ?2, ?3)",
        )?;
        if stmt.execute(params![name, category, codepoint])? > 0 {
            return Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid()));
        }
        let id = self
            .icon_id(name)?
            .ok_or_else(|| missing_after_ignore(TABLE_ICONS, name))?;
        Ok(InsertOutcome::Existing(id))
    }

    /// Records one asset path of an icon style.
    ///
    /// # Errors
    /// Returns `StoreError` if the write fails.
    pub fn insert_icon_variant(&self, icon_id: i64, style: &str, path: &str) -> StoreResult<i64> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO icon_variants (icon_id, style, path) VALUES (?1, ?2, ?3)",
        )?;
        stmt.execute(params![icon_id, style, path])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Resolves a family name to a font id.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn font_id(&self, family: &str) -> StoreResult<Option<i64>> {
        self.lookup_id("SELECT id FROM fonts WHERE family = ?1", family)
    }

    /// Resolves a tag name to a tag id.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn tag_id(&self, name: &str) -> StoreResult<Option<i64>> {
        self.lookup_id("SELECT id FROM tags WHERE name = ?1", name)
    }

    /// Resolves an icon name to an icon id.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn icon_id(&self, name: &str) -> StoreResult<Option<i64>> {
        self.lookup_id("SELECT id FROM icons WHERE name = ?1", name)
    }

    /// Resolves `(font, weight, style)` to a variant id.
    ///
    /// The triple is not unique; the earliest loaded variant wins.
    ///
    /// # Errors
    /// Returns `StoreError` if the query fails.
    pub fn variant_id(
        &self,
        font_id: i64,
        weight: i64,
        style: FontStyle,
    ) -> StoreResult<Option<i64>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id FROM variants WHERE font_id = ?1 AND weight = ?2 AND style = ?3 ORDER BY id LIMIT 1",
        )?;
        let id = stmt
            .query_row(params![font_id, weight, style.as_str()], |row| row.get(0))
            .optional()?;
        Ok(id)
    }

    fn lookup_id(&self, sql: &str, key: &str) -> StoreResult<Option<i64>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let id = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(id)
    }
}

/// Builds a `SELECT` with optional joins and `AND`-combined bound filters.
struct FilteredQuery {
    select: String,
    joins: Vec<&'static str>,
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl FilteredQuery {
    const fn new(select: String) -> Self {
        Self {
            select,
            joins: Vec::new(),
            clauses: Vec::new(),
            values: Vec::new(),
        }
    }

    fn join(&mut self, join: &'static str) {
        self.joins.push(join);
    }

    /// Adds a case-insensitive substring match; empty values are ignored.
    fn like(&mut self, column: &str, value: Option<&str>) -> bool {
        let Some(value) = value.filter(|value| !value.is_empty()) else {
            return false;
        };
        self.clauses.push(format!("{column} LIKE ? ESCAPE '\\'"));
        self.values.push(Value::Text(like_pattern(value)));
        true
    }

    fn equals(&mut self, column: &str, value: Value) {
        self.clauses.push(format!("{column} = ?"));
        self.values.push(value);
    }

    fn finish(self, order_by: &str) -> (String, Vec<Value>) {
        let mut sql = self.select;
        for join in self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
        (sql, self.values)
    }
}

/// Wraps a filter value in wildcards, escaping `LIKE` metacharacters.
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn count_rows(conn: &Connection, sql: &str) -> StoreResult<u64> {
    let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or_default())
}

/// Counts `child` rows whose `column` points at no row of `parent`.
fn count_orphans(conn: &Connection, child: &str, column: &str, parent: &str) -> StoreResult<u64> {
    count_rows(
        conn,
        &format!(
            "SELECT COUNT(*) FROM {child} c LEFT JOIN {parent} p ON c.{column} = p.id WHERE p.id IS NULL"
        ),
    )
}

fn missing_after_ignore(table: &str, key: &str) -> StoreError {
    StoreError::InvalidInput(format!("{table} row `{key}` was ignored but cannot be found"))
}

fn font_from_row(row: &Row<'_>) -> rusqlite::Result<Font> {
    Ok(Font {
        id: row.get(0)?,
        family: row.get(1)?,
        subsets: row.get(2)?,
        category: row.get(3)?,
        version: row.get(4)?,
        last_modified: row.get(5)?,
        default_variant: row.get(6)?,
        is_variable: row.get::<_, Option<bool>>(7)?.unwrap_or_default(),
    })
}

fn icon_from_row(row: &Row<'_>) -> rusqlite::Result<Icon> {
    Ok(Icon {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        codepoint: row.get(3)?,
    })
}

fn variant_from_row(row: &Row<'_>) -> rusqlite::Result<Variant> {
    Ok(Variant {
        id: row.get(0)?,
        font_id: row.get(1)?,
        name: row.get(2)?,
        style: row.get(3)?,
        weight: row.get(4)?,
        local_path: row.get(5)?,
        url: row.get(6)?,
        format: row.get(7)?,
    })
}

fn tag_score_from_row(row: &Row<'_>) -> rusqlite::Result<TagScore> {
    Ok(TagScore {
        name: row.get(0)?,
        value: row.get(1)?,
    })
}
