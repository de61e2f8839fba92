// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

//! Content selectors scope permissions, cleanup policies and previews to the
//! assets and components they match. This crate takes a selector expression
//! that the expression-language front end has already parsed and either
//! evaluates it against a set of variables or compiles it into a
//! parameterized SQL predicate for a relational store.
//!
//! # Example
//!
//! ```
//! use nexus_selector::{Expr, SelectorConfiguration, SelectorManager, SqlCompilerConfig};
//!
//! let manager = SelectorManager::new(SqlCompilerConfig::default().alias("format", "C.format"));
//! let selector = SelectorConfiguration::csel(
//! 	"maven-only",
//! 	Expr::equal(Expr::reference("format"), Expr::literal("maven2")),
//! );
//!
//! let fragment = manager.compile(&selector).unwrap();
//! assert_eq!(fragment.sql, "C.format = :param_0");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod manager;
pub mod selector;
pub mod sql;
pub mod value;
pub mod variable;

pub use ast::{CompareOp, Expr, Reference};
pub use config::SqlCompilerConfig;
pub use error::{Result, SelectorError};
pub use evaluate::{DirectEvaluator, Interpreter, TreeInterpreter};
pub use manager::{Mode, Outcome, SelectorManager};
pub use selector::SelectorConfiguration;
pub use sql::{SelectorSqlBuilder, SqlCompiler, SqlDialect, SqlFragment};
pub use value::Value;
pub use variable::{VariableSet, VariableSource};
