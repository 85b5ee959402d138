//! # sqlforge
//!
//! A declarative SQL statement assembler: typed records in, SQL text (plus
//! an ordered bound-value list in parameterized mode) out.
//!
//! ## Features
//!
//! - **Close to raw SQL**: statements are fixed clause sequences, no query
//!   planning, no relationship graph, no migrations
//! - **Typed records**: `#[derive(Entity)]` turns a struct into an ordered,
//!   typed field list at compile time
//! - **Two rendering modes**: literal values inline, or `?` placeholders
//!   with the raw values collected in matching order
//! - **Flat condition streams**: arbitrary AND/OR nesting from a linear
//!   token sequence, compiled through an explicit token tree
//! - **Execution at arm's length**: an [`Adapter`] trait is the only
//!   database boundary; the core never blocks
//!
//! ## Example
//!
//! ```ignore
//! use sqlforge::{insert, select, update, Condition, Entity};
//!
//! #[derive(Entity, Clone)]
//! #[entity(table = "user")]
//! struct User {
//!     #[field(id)]
//!     id: i32,
//!     name: String,
//!     age: i32,
//! }
//!
//! let user = User { id: 5, name: "Mike".into(), age: 18 };
//!
//! // INSERT INTO `user`(`id`,`name`,`age`) VALUES(?,?,?)
//! let stmt = insert(user.clone()).assemble();
//! let (sql, bound) = (stmt.sql()?, stmt.values());
//!
//! // UPDATE `user` SET `name`=?,`age`=? WHERE `id`=?
//! let stmt = update(user.clone()).filter(["name", "age"]).by_id()?.assemble();
//!
//! // SELECT `id`,`name`,`age` FROM `user` WHERE name LIKE ? LIMIT 0,10
//! let stmt = select(user)
//!     .cond(Condition::prepared().like("name", "%T%"))
//!     .page(1, 10)
//!     .assemble();
//! ```

pub mod adapter;
mod clause;
pub mod cond;
pub mod config;
pub mod entity;
pub mod error;
pub mod statement;
pub mod value;

pub use adapter::{Adapter, QueryResult};
pub use cond::Condition;
pub use config::Config;
pub use entity::{Attr, Entity, Field};
pub use error::{ForgeError, ForgeResult};
pub use statement::{delete, insert, replace, select, update, Statement};
pub use value::{Value, DATETIME_FORMAT};

#[cfg(feature = "derive")]
pub use sqlforge_derive::Entity;
