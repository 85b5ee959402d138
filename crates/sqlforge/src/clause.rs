//! Per-clause SQL rendering.
//!
//! [`ClauseGen`] is a pure renderer over introspected fields: given the table
//! name, the field cache, and the statement's parameterization mode it turns
//! each clause kind into text. Multi-field lists join with a comma and no
//! added whitespace; joining the clauses themselves is the statement's job.

use crate::cond::Condition;
use crate::entity::Field;

/// The clause kinds a statement order may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Clause {
    Select,
    From,
    Insert,
    Replace,
    Values,
    Update,
    Set,
    Delete,
    Where,
    Limit,
}

/// Renders individual clauses from a statement's field cache.
pub(crate) struct ClauseGen<'a> {
    table: &'a str,
    fields: &'a [Field],
    /// Placeholder mode for SET/VALUES payloads.
    prepared: bool,
}

impl<'a> ClauseGen<'a> {
    pub(crate) fn new(table: &'a str, fields: &'a [Field], prepared: bool) -> Self {
        Self {
            table,
            fields,
            prepared,
        }
    }

    /// `FROM `table``
    pub(crate) fn from_clause(&self) -> String {
        format!("FROM `{}`", self.table)
    }

    /// `INSERT INTO `table`(`c1`,`c2`,...)`
    pub(crate) fn insert(&self) -> String {
        format!("INSERT INTO `{}`({})", self.table, self.columns())
    }

    /// `REPLACE INTO `table`(`c1`,`c2`,...)`
    pub(crate) fn replace(&self) -> String {
        format!("REPLACE INTO `{}`({})", self.table, self.columns())
    }

    /// `VALUES(v1,v2,...)` — `?` per field in parameterized mode, in the same
    /// field order as the matching column list.
    pub(crate) fn values(&self) -> String {
        let vals = if self.prepared {
            self.join(|_| "?".to_string())
        } else {
            self.join(|f| f.literal.clone())
        };
        format!("VALUES({vals})")
    }

    /// `SELECT `c1`,`c2`,...` or `SELECT COUNT(1)` in count mode.
    pub(crate) fn select(&self, count: bool) -> String {
        let list = if count {
            "COUNT(1)".to_string()
        } else {
            self.columns()
        };
        format!("SELECT {list}")
    }

    /// `WHERE <compiled condition>`
    pub(crate) fn where_clause(&self, cond: &Condition) -> String {
        format!("WHERE {}", cond.make())
    }

    /// `UPDATE `table``
    pub(crate) fn update(&self) -> String {
        format!("UPDATE `{}`", self.table)
    }

    /// `SET `c1`=v1,`c2`=v2,...`
    pub(crate) fn set(&self) -> String {
        let assigns = if self.prepared {
            self.join(|f| format!("`{}`=?", f.column))
        } else {
            self.join(|f| format!("`{}`={}", f.column, f.literal))
        };
        format!("SET {assigns}")
    }

    /// `DELETE FROM `table``
    pub(crate) fn delete(&self) -> String {
        format!("DELETE FROM `{}`", self.table)
    }

    /// `LIMIT n`, or `LIMIT offset,n` when an offset is set.
    pub(crate) fn limit(&self, limit: u64, offset: Option<u64>) -> String {
        match offset {
            Some(off) => format!("LIMIT {off},{limit}"),
            None => format!("LIMIT {limit}"),
        }
    }

    fn columns(&self) -> String {
        self.join(|f| format!("`{}`", f.column))
    }

    fn join(&self, render: impl Fn(&Field) -> String) -> String {
        self.fields
            .iter()
            .map(render)
            .collect::<Vec<_>>()
            .join(",")
    }
}
