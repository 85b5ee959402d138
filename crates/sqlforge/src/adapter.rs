//! The execution boundary.
//!
//! The assembler itself never talks to a database. An [`Adapter`] takes
//! finished SQL text plus the ordered bound-value list and runs it against
//! whatever driver it wraps; blocking I/O, pooling, timeouts, and
//! cancellation all live behind this trait. Driver errors pass through
//! unmodified inside [`ForgeError::Adapter`](crate::ForgeError::Adapter).

use crate::entity::Entity;
use crate::error::ForgeResult;
use crate::value::Value;
use std::collections::VecDeque;

/// Executes finished SQL against a real database.
pub trait Adapter {
    /// Run a mutating statement; returns the number of affected rows.
    fn exec(&self, sql: &str, values: &[Value]) -> ForgeResult<u64>;

    /// Run a query; returns the result rows, one cell per selected column,
    /// in the column order the statement selected.
    fn query(&self, sql: &str, values: &[Value]) -> ForgeResult<Vec<Vec<Value>>>;
}

/// A cursor over query results that decodes rows back into records.
///
/// Decoding reverses introspection: each cell is written back through the
/// same logical-attribute-name mapping the statement selected with, so a
/// filtered statement decodes only the filtered attributes.
#[derive(Debug)]
pub struct QueryResult {
    names: Vec<&'static str>,
    rows: VecDeque<Vec<Value>>,
}

impl QueryResult {
    pub(crate) fn new(names: Vec<&'static str>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            names,
            rows: rows.into(),
        }
    }

    /// Whether any undecoded rows remain.
    pub fn has_next(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Number of undecoded rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decode the current row into `record` and advance the cursor.
    ///
    /// Returns `false` when the cursor is exhausted. Cells beyond the
    /// selected column list and kind-mismatched values are ignored.
    pub fn decode<E: Entity>(&mut self, record: &mut E) -> bool {
        let Some(row) = self.rows.pop_front() else {
            return false;
        };
        for (name, value) in self.names.iter().zip(row) {
            record.set_attr(name, value);
        }
        true
    }
}
