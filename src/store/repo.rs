//! Generic CRUD repository over the hierarchy tables.
//!
//! # Invariants
//! - Writes go through [`Entity::bind`], which validates before any SQL runs.
//! - A write whose parent id does not exist fails with
//!   [`AtlasError::ParentNotFound`] and persists nothing.
//! - Delete checks existence first, then dependent children.

use crate::error::{AtlasError, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::marker::PhantomData;
use tracing::debug;

/// Foreign key from an entity to its parent.
pub struct ParentLink {
    pub column: &'static str,
    pub kind: &'static str,
}

/// Table whose rows block deletion of an entity.
pub struct ChildGuard {
    pub table: &'static str,
    pub column: &'static str,
    pub kind_plural: &'static str,
}

/// A row type stored in the hierarchy.
pub trait Entity: Sized {
    /// Write payload.
    type Input;

    const KIND: &'static str;
    const TABLE: &'static str;
    /// Alias of `TABLE` inside `SELECT`.
    const ALIAS: &'static str;
    /// Columns in the order returned by [`Entity::read`], parent chain joined.
    const SELECT: &'static str;
    /// Writable columns, in the order returned by [`Entity::bind`].
    const COLUMNS: &'static [&'static str];
    const PARENT: Option<ParentLink>;
    const CHILDREN: Option<ChildGuard>;

    /// Read one entity starting at column `offset`.
    fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self>;

    /// Validate a payload and produce its column values.
    fn bind(input: &Self::Input) -> Result<Vec<Value>>;

    fn parent_id(_input: &Self::Input) -> Option<i64> {
        None
    }
}

pub struct Repository<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<E>,
}

impl<'conn, E: Entity> Repository<'conn, E> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// All rows, optionally restricted to one parent.
    pub fn list(&self, parent_id: Option<i64>) -> Result<Vec<E>> {
        match (parent_id, E::PARENT) {
            (None, _) => self.select("", &[]),
            (Some(id), Some(link)) => {
                self.select(&format!("WHERE {}.{} = ?1", E::ALIAS, link.column), &[Value::Integer(id)])
            }
            (Some(_), None) => Err(AtlasError::InvalidInput(format!(
                "{} has no parent to filter by",
                E::KIND
            ))),
        }
    }

    pub fn find(&self, id: i64) -> Result<Option<E>> {
        let sql = format!("{} WHERE {}.id = ?1", E::SELECT, E::ALIAS);
        let found = self
            .conn
            .query_row(&sql, params![id], |row| E::read(row, 0))
            .optional()?;
        Ok(found)
    }

    pub fn get(&self, id: i64) -> Result<E> {
        self.find(id)?.ok_or_else(|| not_found::<E>(id))
    }

    pub fn create(&self, input: &E::Input) -> Result<E> {
        let values = E::bind(input)?;
        let placeholders = (1..=values.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders
        );

        self.conn
            .execute(&sql, params_from_iter(values))
            .map_err(|e| write_error::<E>(e, input))?;

        let id = self.conn.last_insert_rowid();
        debug!(kind = E::KIND, id, "created");
        self.get(id)
    }

    /// Replace every writable field of an existing row.
    pub fn update(&self, id: i64, input: &E::Input) -> Result<E> {
        let mut values = E::bind(input)?;
        if !self.exists(id)? {
            return Err(not_found::<E>(id));
        }

        let assignments = E::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{} = ?{}", col, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            E::TABLE,
            assignments,
            values.len() + 1
        );
        values.push(Value::Integer(id));

        self.conn
            .execute(&sql, params_from_iter(values))
            .map_err(|e| write_error::<E>(e, input))?;

        debug!(kind = E::KIND, id, "updated");
        self.get(id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.exists(id)? {
            return Err(not_found::<E>(id));
        }

        if let Some(guard) = E::CHILDREN {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", guard.table, guard.column);
            let children: i64 = self.conn.query_row(&sql, params![id], |row| row.get(0))?;
            if children > 0 {
                return Err(AtlasError::Conflict(format!(
                    "cannot delete {} {}: it still has {} linked {}",
                    E::KIND,
                    id,
                    children,
                    guard.kind_plural
                )));
            }
        }

        let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
        self.conn.execute(&sql, params![id])?;
        debug!(kind = E::KIND, id, "deleted");
        Ok(())
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", E::TABLE);
        let hit: Option<i64> = self
            .conn
            .query_row(&sql, params![id], |row| row.get(0))
            .optional()?;
        Ok(hit.is_some())
    }

    /// `SELECT` with an extra clause, ordered by id.
    pub(crate) fn select(&self, clause: &str, args: &[Value]) -> Result<Vec<E>> {
        let sql = format!("{} {} ORDER BY {}.id", E::SELECT, clause, E::ALIAS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), |row| E::read(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn not_found<E: Entity>(id: i64) -> AtlasError {
    AtlasError::NotFound(format!("{} {} not found", E::KIND, id))
}

fn write_error<E: Entity>(err: rusqlite::Error, input: &E::Input) -> AtlasError {
    if let (Some(link), Some(id)) = (E::PARENT, E::parent_id(input)) {
        if is_foreign_key_violation(&err) {
            return AtlasError::ParentNotFound { kind: link.kind, id };
        }
    }
    err.into()
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

// ─── Shared validation helpers ──────────────────────────────────

/// Collects missing/invalid field names so one error reports all of them.
#[derive(Default)]
pub(crate) struct Checker {
    missing: Vec<&'static str>,
    invalid: Vec<String>,
}

impl Checker {
    pub fn text(&mut self, field: &'static str, value: &str) -> Value {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.missing.push(field);
        }
        Value::Text(trimmed.to_string())
    }

    pub fn population(&mut self, value: Option<i64>) -> Value {
        match value {
            None => self.missing.push("population"),
            Some(n) if n < 0 => self.invalid.push("population must be a non-negative number".into()),
            Some(_) => {}
        }
        Value::Integer(value.unwrap_or_default())
    }

    pub fn reference(&mut self, field: &'static str, value: Option<i64>) -> Value {
        if value.is_none() {
            self.missing.push(field);
        }
        Value::Integer(value.unwrap_or_default())
    }

    /// Decimal degrees in `[-limit, limit]`, kept as text.
    ///
    /// Only plain `-ddd.ddd` notation is accepted: no exponent, no `+`.
    pub fn degrees(&mut self, field: &'static str, value: &str, limit: f64) -> Value {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.missing.push(field);
        } else {
            match plain_decimal(trimmed).then(|| trimmed.parse::<f64>()) {
                Some(Ok(v)) if (-limit..=limit).contains(&v) => {}
                _ => self
                    .invalid
                    .push(format!("{} must be decimal degrees between -{} and {}", field, limit, limit)),
            }
        }
        Value::Text(trimmed.to_string())
    }

    pub fn finish(self, values: Vec<Value>) -> Result<Vec<Value>> {
        let mut problems = Vec::new();
        if !self.missing.is_empty() {
            problems.push(format!("missing required fields: {}", self.missing.join(", ")));
        }
        problems.extend(self.invalid);
        if problems.is_empty() {
            Ok(values)
        } else {
            Err(AtlasError::Validation(problems.join("; ")))
        }
    }
}

fn plain_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (whole, frac) = match unsigned.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && frac.map_or(true, digits)
}
