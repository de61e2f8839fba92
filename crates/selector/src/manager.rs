// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use std::fmt::{Debug, Formatter};

use tracing::{debug, instrument, warn};

use crate::{
	config::SqlCompilerConfig,
	error::SelectorError,
	evaluate::{DirectEvaluator, Interpreter},
	selector::{CSEL, JEXL, SelectorConfiguration},
	sql::{SelectorSqlBuilder, SqlCompiler, SqlDialect, SqlFragment},
	variable::VariableSource,
};

/// How a selector should be run.
#[derive(Clone, Copy)]
pub enum Mode<'a> {
	/// Evaluate in memory against the given variables.
	Direct(&'a dyn VariableSource),
	/// Compile to a SQL predicate for the given dialect.
	Compile(SqlDialect),
}

impl Debug for Mode<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Mode::Direct(source) => f.debug_tuple("Direct").field(&source.variable_names()).finish(),
			Mode::Compile(dialect) => f.debug_tuple("Compile").field(dialect).finish(),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	Matched(bool),
	Sql(SqlFragment),
}

/// Entry point for running selectors, either directly or as SQL.
///
/// Holds only immutable configuration; every compilation works on its own
/// builder, so a manager can be shared freely between threads.
pub struct SelectorManager {
	config: SqlCompilerConfig,
	evaluator: DirectEvaluator,
}

impl SelectorManager {
	pub fn new(config: SqlCompilerConfig) -> Self {
		Self {
			config,
			evaluator: DirectEvaluator::default(),
		}
	}

	pub fn with_interpreter(config: SqlCompilerConfig, interpreter: impl Interpreter + 'static) -> Self {
		Self {
			config,
			evaluator: DirectEvaluator::new(interpreter),
		}
	}

	pub fn config(&self) -> &SqlCompilerConfig {
		&self.config
	}

	#[instrument(name = "selector::run", level = "debug", skip(self, selector, mode), fields(selector = %selector.name))]
	pub fn run(&self, selector: &SelectorConfiguration, mode: Mode<'_>) -> crate::Result<Outcome> {
		match mode {
			Mode::Direct(source) => self.evaluate(selector, source).map(Outcome::Matched),
			Mode::Compile(dialect) => self.compile_for(selector, dialect).map(Outcome::Sql),
		}
	}

	pub fn evaluate(&self, selector: &SelectorConfiguration, source: &dyn VariableSource) -> crate::Result<bool> {
		self.evaluator.evaluate(selector, source)
	}

	/// Compile with the configured dialect.
	pub fn compile(&self, selector: &SelectorConfiguration) -> crate::Result<SqlFragment> {
		self.compile_for(selector, self.config.dialect)
	}

	pub fn compile_for(&self, selector: &SelectorConfiguration, dialect: SqlDialect) -> crate::Result<SqlFragment> {
		let mut builder = self.config.builder();
		self.to_sql(selector, &mut builder, dialect)?;
		Ok(builder.into_fragment())
	}

	/// Compile `selector` into a caller-configured builder.
	#[instrument(name = "selector::to_sql", level = "trace", skip(self, selector, builder), fields(selector = %selector.name))]
	pub fn to_sql(
		&self,
		selector: &SelectorConfiguration,
		builder: &mut SelectorSqlBuilder,
		dialect: SqlDialect,
	) -> crate::Result<()> {
		match selector.selector_type.as_str() {
			CSEL => SqlCompiler::new(dialect).compile(&selector.expression, builder),
			JEXL => Err(SelectorError::SqlUnsupported {
				selector_type: selector.selector_type.clone(),
			}),
			other => Err(SelectorError::UnknownType {
				selector_type: other.to_string(),
			}),
		}
	}

	/// Combines every compilable selector into one disjunction, each wrapped
	/// in parentheses and given its own parameter namespace (`s0p`, `s1p`,
	/// ...). Selectors that are not `csel` or fail to compile are skipped.
	/// The builder is left cleared, with its own name prefix restored.
	#[instrument(name = "selector::to_sql_any", level = "debug", skip(self, selectors, builder))]
	pub fn to_sql_any(
		&self,
		selectors: &[SelectorConfiguration],
		builder: &mut SelectorSqlBuilder,
		dialect: SqlDialect,
	) -> Option<SqlFragment> {
		let name_prefix = builder.name_prefix().to_string();
		let mut parts = Vec::new();
		let mut combined = SqlFragment {
			sql: String::new(),
			parameters: Default::default(),
		};

		for selector in selectors.iter().filter(|s| s.selector_type == CSEL) {
			builder.clear_query_string();
			builder.parameter_name_prefix(format!("s{}p", parts.len()));

			match self.to_sql(selector, builder, dialect) {
				Ok(()) => {
					let fragment = builder.take_fragment();
					parts.push(format!("({})", fragment.sql));
					combined.parameters.extend(fragment.parameters);
				}
				Err(err) => {
					warn!(selector = %selector.name, error = %err, "problem evaluating selector as sql");
				}
			}
		}
		builder.clear_query_string();
		builder.parameter_name_prefix(name_prefix);

		combined.sql = match parts.len() {
			0 => return None,
			1 => parts.remove(0),
			_ => format!("({})", parts.join(" or ")),
		};

		debug!(sql = %combined.sql, parameters = combined.parameters.len(), "combined selector filter");
		Some(combined)
	}
}
