// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

//! Compilation of selector expressions into parameterized SQL predicates.

mod builder;
mod compiler;
mod dialect;

pub use builder::{DEFAULT_PARAMETER_NAME_PREFIX, DEFAULT_PARAMETER_PREFIX, SelectorSqlBuilder, SqlFragment};
pub use compiler::{SqlCompiler, compile};
pub use dialect::SqlDialect;
