//! Statement orchestration: clause order, lifecycle, and the
//! parameterization decision.
//!
//! A [`Statement`] closes over one record value. Its lifecycle is
//! `unconfigured -> assembled -> rendered`: configuration (filter, condition,
//! pagination, separator, parameterization) happens first, then
//! [`assemble`](Statement::assemble) introspects the record exactly once,
//! and [`sql`](Statement::sql) renders the clause sequence any number of
//! times off that snapshot. Re-rendering never re-reads the record; build a
//! fresh statement to pick up new values.
//!
//! # Example
//!
//! ```ignore
//! use sqlforge::{insert, select, Condition};
//!
//! let stmt = insert(user).assemble();
//! let sql = stmt.sql()?;
//! let bound = stmt.values();
//!
//! let stmt = select(user)
//!     .cond(Condition::prepared().like("name", "%T%"))
//!     .page(1, 10)
//!     .assemble();
//! ```

use crate::adapter::{Adapter, QueryResult};
use crate::clause::{Clause, ClauseGen};
use crate::cond::Condition;
use crate::config::Config;
use crate::entity::{introspect, Entity, Field};
use crate::error::{ForgeError, ForgeResult};
use crate::value::Value;
use std::sync::Arc;

const INSERT_ORDER: &[Clause] = &[Clause::Insert, Clause::Values];
const REPLACE_ORDER: &[Clause] = &[Clause::Replace, Clause::Values];
const UPDATE_ORDER: &[Clause] = &[Clause::Update, Clause::Set, Clause::Where];
const DELETE_ORDER: &[Clause] = &[Clause::Delete, Clause::Where];
const SELECT_ORDER: &[Clause] = &[Clause::Select, Clause::From, Clause::Where, Clause::Limit];

/// One complete SQL operation over a single record value.
pub struct Statement<E: Entity> {
    entity: E,
    table: String,
    order: &'static [Clause],
    fields: Vec<Field>,
    filter: Option<Vec<String>>,
    cond: Option<Condition>,
    sep: String,
    /// Requested placeholder mode; on by default. Whether the rendered
    /// statement actually binds anything is decided by
    /// [`is_prepared`](Statement::is_prepared).
    prepared: bool,
    is_count: bool,
    limit: Option<u64>,
    offset: Option<u64>,
    assembled: bool,
    adapter: Option<Arc<dyn Adapter>>,
    config: Config,
}

impl<E: Entity> Statement<E> {
    fn with_order(entity: E, order: &'static [Clause]) -> Self {
        let table = entity.table().to_string();
        Self {
            entity,
            table,
            order,
            fields: Vec::new(),
            filter: None,
            cond: None,
            sep: " ".to_string(),
            prepared: true,
            is_count: false,
            limit: None,
            offset: None,
            assembled: false,
            adapter: None,
            config: Config::default(),
        }
    }

    /// Create an insert statement: `INSERT INTO ... VALUES(...)`
    pub fn insert(entity: E) -> Self {
        Self::with_order(entity, INSERT_ORDER)
    }

    /// Create a replace statement: `REPLACE INTO ... VALUES(...)`
    pub fn replace(entity: E) -> Self {
        Self::with_order(entity, REPLACE_ORDER)
    }

    /// Create an update statement: `UPDATE ... SET ... WHERE ...`
    pub fn update(entity: E) -> Self {
        Self::with_order(entity, UPDATE_ORDER)
    }

    /// Create a delete statement: `DELETE FROM ... WHERE ...`
    pub fn delete(entity: E) -> Self {
        Self::with_order(entity, DELETE_ORDER)
    }

    /// Create a select statement: `SELECT ... FROM ... WHERE ... LIMIT ...`
    pub fn select(entity: E) -> Self {
        Self::with_order(entity, SELECT_ORDER)
    }

    // ==================== Configuration ====================

    /// Keep only the named attributes (matched by attribute or column name)
    /// in generated clauses.
    pub fn filter<I, S>(mut self, keep: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = Some(keep.into_iter().map(Into::into).collect());
        self
    }

    /// Attach the WHERE condition. Without one, no WHERE clause is rendered.
    pub fn cond(mut self, cond: Condition) -> Self {
        self.cond = Some(cond);
        self
    }

    /// Replace the condition with an identity equality on the record's
    /// identity pair, always compiled in parameterized mode.
    ///
    /// Fails with [`ForgeError::MissingId`] when the record supplies no
    /// usable identity column.
    pub fn by_id(mut self) -> ForgeResult<Self> {
        let Some((column, value)) = self.entity.id() else {
            return Err(ForgeError::MissingId);
        };
        if column.is_empty() {
            return Err(ForgeError::MissingId);
        }
        self.cond = Some(Condition::prepared().eq(&format!("`{column}`"), value));
        Ok(self)
    }

    /// Request or suppress `?` placeholders for value-bearing clauses.
    /// Placeholders are the default; see [`is_prepared`](Statement::is_prepared)
    /// for the per-statement resolution.
    pub fn prepared(mut self, prepared: bool) -> Self {
        self.prepared = prepared;
        self
    }

    /// Render the SELECT clause as `SELECT COUNT(1)` (select statements only).
    pub fn count(mut self) -> Self {
        self.is_count = true;
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip `offset` rows; renders `LIMIT offset,n`.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Pagination helper: 1-based page number and page size.
    pub fn page(self, cur_page: u64, page_size: u64) -> Self {
        self.limit(page_size)
            .offset(cur_page.saturating_sub(1).saturating_mul(page_size))
    }

    /// Set the separator joining rendered clauses (default single space).
    pub fn separator(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    /// Join clauses with newlines for readable output.
    pub fn pretty(self) -> Self {
        self.separator("\n")
    }

    /// Bind an execution adapter to this statement (wins over the config's
    /// default adapter).
    pub fn adapter(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Attach statement configuration (debug logging, default adapter).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    // ==================== Lifecycle ====================

    /// Introspect the record into the field cache. Idempotent: the first
    /// call snapshots the record, later calls are no-ops.
    pub fn assemble(mut self) -> Self {
        if !self.assembled {
            self.fields = introspect(&self.entity, self.filter.as_deref());
            self.assembled = true;
        }
        self
    }

    /// Render the statement to SQL text.
    ///
    /// Fails with [`ForgeError::NotAssembled`] before
    /// [`assemble`](Statement::assemble) has run. Repeatable; always renders
    /// from the assembled snapshot.
    pub fn sql(&self) -> ForgeResult<String> {
        if !self.assembled {
            return Err(ForgeError::NotAssembled);
        }
        let clause_gen = ClauseGen::new(&self.table, &self.fields, self.prepared);
        let mut parts = Vec::with_capacity(self.order.len());
        for clause in self.order {
            match clause {
                Clause::Select => parts.push(clause_gen.select(self.is_count)),
                Clause::From => parts.push(clause_gen.from_clause()),
                Clause::Insert => parts.push(clause_gen.insert()),
                Clause::Replace => parts.push(clause_gen.replace()),
                Clause::Values => parts.push(clause_gen.values()),
                Clause::Update => parts.push(clause_gen.update()),
                Clause::Set => parts.push(clause_gen.set()),
                Clause::Delete => parts.push(clause_gen.delete()),
                Clause::Where => {
                    if let Some(cond) = &self.cond {
                        parts.push(clause_gen.where_clause(cond));
                    }
                }
                Clause::Limit => {
                    if let Some(limit) = self.limit {
                        parts.push(clause_gen.limit(limit, self.offset));
                    }
                }
            }
        }
        Ok(parts.join(&self.sep))
    }

    /// Like [`sql`](Statement::sql), but panics if the statement was not
    /// assembled.
    pub fn must_sql(&self) -> String {
        match self.sql() {
            Ok(sql) => sql,
            Err(err) => panic!("{err}"),
        }
    }

    /// One-shot convenience: assemble, then render.
    pub fn assemble_sql(self) -> String {
        self.assemble().must_sql()
    }

    // ==================== Parameterization ====================

    /// Whether the rendered statement carries `?` placeholders.
    ///
    /// True only when there is something to bind: a value-bearing clause
    /// (`SET`/`VALUES`) in the clause order with placeholders requested, or
    /// an attached condition built in parameterized mode. A statement with
    /// neither renders literal even when placeholders were requested, so
    /// e.g. `SELECT COUNT(1) FROM t` never becomes a prepared statement.
    pub fn is_prepared(&self) -> bool {
        if !self.has_value_clause() && self.cond.is_none() {
            return false;
        }
        self.prepared || self.cond.as_ref().is_some_and(Condition::is_prepared)
    }

    /// The ordered bound-value list pairing with the rendered placeholders:
    /// field values (when a value-bearing clause renders placeholders) then
    /// condition values. Empty when the statement resolves to literal mode.
    pub fn values(&self) -> Vec<Value> {
        if !self.is_prepared() {
            return Vec::new();
        }
        let mut out = Vec::new();
        if self.prepared && self.has_value_clause() {
            out.extend(self.fields.iter().map(|f| f.raw.clone()));
        }
        if let Some(cond) = &self.cond {
            out.extend(cond.values().iter().cloned());
        }
        out
    }

    /// Logical attribute names of the assembled (filter-aware) field list,
    /// in field order; used to decode result rows.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    fn has_value_clause(&self) -> bool {
        self.order
            .iter()
            .any(|c| matches!(c, Clause::Set | Clause::Values))
    }

    // ==================== Execution ====================

    /// Assemble, render, and run a mutating statement through the adapter;
    /// returns the affected row count.
    pub fn exec(self) -> ForgeResult<u64> {
        let adapter = self.resolve_adapter()?;
        let stmt = self.assemble();
        let sql = stmt.sql()?;
        let values = stmt.values();
        stmt.log_exec(&sql, &values);
        adapter.exec(&sql, &values)
    }

    /// Assemble, render, and run a query; returns a decodable row cursor.
    pub fn fetch(self) -> ForgeResult<QueryResult> {
        let adapter = self.resolve_adapter()?;
        let stmt = self.assemble();
        let sql = stmt.sql()?;
        let values = stmt.values();
        stmt.log_exec(&sql, &values);
        let rows = adapter.query(&sql, &values)?;
        Ok(QueryResult::new(stmt.names(), rows))
    }

    /// Run a query expected to yield one row, decoded into the bound record.
    ///
    /// Fails with [`ForgeError::NotFound`] when the query matches nothing.
    pub fn fetch_one(self) -> ForgeResult<E> {
        let adapter = self.resolve_adapter()?;
        let mut stmt = self.assemble();
        let sql = stmt.sql()?;
        let values = stmt.values();
        stmt.log_exec(&sql, &values);
        let mut result = QueryResult::new(stmt.names(), adapter.query(&sql, &values)?);
        if !result.decode(&mut stmt.entity) {
            return Err(ForgeError::not_found(stmt.table));
        }
        Ok(stmt.entity)
    }

    /// Run as a count query and return the single integer result. Sets the
    /// count flag when the caller has not.
    pub fn exec_count(mut self) -> ForgeResult<u64> {
        if !self.is_count {
            self = self.count();
        }
        let adapter = self.resolve_adapter()?;
        let stmt = self.assemble();
        let sql = stmt.sql()?;
        let values = stmt.values();
        stmt.log_exec(&sql, &values);
        let rows = adapter.query(&sql, &values)?;
        match rows.first().and_then(|row| row.first()) {
            Some(Value::Int(n)) => Ok(*n as u64),
            Some(other) => Err(ForgeError::decode(
                "COUNT(1)",
                format!("expected integer, got {other}"),
            )),
            None => Err(ForgeError::not_found(stmt.table)),
        }
    }

    fn resolve_adapter(&self) -> ForgeResult<Arc<dyn Adapter>> {
        self.adapter
            .clone()
            .or_else(|| self.config.adapter.clone())
            .ok_or(ForgeError::AdapterNotSet)
    }

    fn log_exec(&self, sql: &str, values: &[Value]) {
        if self.config.debug {
            let bound = values
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(",");
            tracing::debug!(target: "sqlforge", sql, values = %bound, "executing statement");
        }
    }
}

/// Create an insert statement for `entity`.
pub fn insert<E: Entity>(entity: E) -> Statement<E> {
    Statement::insert(entity)
}

/// Create a replace statement for `entity`.
pub fn replace<E: Entity>(entity: E) -> Statement<E> {
    Statement::replace(entity)
}

/// Create an update statement for `entity`.
pub fn update<E: Entity>(entity: E) -> Statement<E> {
    Statement::update(entity)
}

/// Create a delete statement for `entity`.
pub fn delete<E: Entity>(entity: E) -> Statement<E> {
    Statement::delete(entity)
}

/// Create a select statement for `entity`.
pub fn select<E: Entity>(entity: E) -> Statement<E> {
    Statement::select(entity)
}
