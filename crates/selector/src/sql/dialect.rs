// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
	ast::Expr,
	error::SelectorError,
	sql::{SelectorSqlBuilder, compiler},
};

/// The SQL engine a selector is compiled for.
///
/// Dialects only differ in the handful of comparisons whose SQL semantics
/// diverge between engines; everything else is emitted by the base compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
	/// ANSI / H2 compatible output.
	#[default]
	#[serde(alias = "h2")]
	Generic,
	#[serde(alias = "postgresql")]
	Postgres,
}

pub(crate) type CompareFn = fn(&mut SelectorSqlBuilder, &Expr, &Expr) -> crate::Result<()>;

/// Per-dialect overrides of the comparison visits.
pub(crate) struct DialectTable {
	pub regex_match: CompareFn,
}

static GENERIC: DialectTable = DialectTable {
	regex_match: compiler::compile_regex_anchored,
};

static POSTGRES: DialectTable = DialectTable {
	regex_match: compile_regex_native,
};

impl SqlDialect {
	pub(crate) fn table(self) -> &'static DialectTable {
		match self {
			SqlDialect::Generic => &GENERIC,
			SqlDialect::Postgres => &POSTGRES,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			SqlDialect::Generic => "generic",
			SqlDialect::Postgres => "postgres",
		}
	}
}

impl Display for SqlDialect {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for SqlDialect {
	type Err = SelectorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"generic" | "h2" => Ok(SqlDialect::Generic),
			"postgres" | "postgresql" => Ok(SqlDialect::Postgres),
			_ => Err(SelectorError::InvalidDialect {
				name: s.to_string(),
			}),
		}
	}
}

// PostgreSQL's `~` already matches the whole pattern the way the anchored
// form does on H2, so the pattern is bound as written.
fn compile_regex_native(builder: &mut SelectorSqlBuilder, left: &Expr, right: &Expr) -> crate::Result<()> {
	compiler::compile_pattern(builder, left, right, "~", |pattern| pattern)
}
