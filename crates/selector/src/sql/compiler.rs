// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use tracing::{debug, instrument};

use crate::{
	ast::{CompareOp, Expr},
	error::SelectorError,
	sql::{SelectorSqlBuilder, SqlDialect},
	value::Value,
};

/// Walks a selector expression and writes the equivalent SQL predicate into a
/// [`SelectorSqlBuilder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlCompiler {
	dialect: SqlDialect,
}

impl SqlCompiler {
	pub fn new(dialect: SqlDialect) -> Self {
		Self {
			dialect,
		}
	}

	pub fn dialect(&self) -> SqlDialect {
		self.dialect
	}

	/// Compile `expr`, appending to whatever the builder already holds.
	#[instrument(name = "selector::sql::compile", level = "trace", skip(self, expr, builder), fields(dialect = %self.dialect))]
	pub fn compile(&self, expr: &Expr, builder: &mut SelectorSqlBuilder) -> crate::Result<()> {
		if !expr.is_predicate() {
			return Err(SelectorError::invalid_expression(format!("'{expr}' is not a boolean expression")));
		}

		self.compile_expr(expr, builder)?;

		debug!(
			sql = builder.query_string(),
			parameters = builder.query_parameters().len(),
			"compiled selector expression"
		);
		Ok(())
	}

	fn compile_expr(&self, expr: &Expr, builder: &mut SelectorSqlBuilder) -> crate::Result<()> {
		match expr {
			Expr::And(left, right) => {
				self.compile_and_operand(left, builder)?;
				builder.append(" and ");
				self.compile_and_operand(right, builder)
			}
			Expr::Or(left, right) => {
				self.compile_expr(left, builder)?;
				builder.append(" or ");
				self.compile_expr(right, builder)
			}
			Expr::Compare {
				op,
				left,
				right,
			} => self.compile_compare(*op, left, right, builder),
			Expr::Reference(reference) => Err(SelectorError::invalid_expression(format!(
				"reference '{reference}' used outside a comparison"
			))),
			Expr::Literal(value) => Err(SelectorError::invalid_expression(format!(
				"literal '{value}' used outside a comparison"
			))),
		}
	}

	// AND binds tighter than OR, so an OR beneath an AND needs its grouping
	// spelled out.
	fn compile_and_operand(&self, expr: &Expr, builder: &mut SelectorSqlBuilder) -> crate::Result<()> {
		if expr.is_or() {
			builder.append("(");
			self.compile_expr(expr, builder)?;
			builder.append(")");
			Ok(())
		} else {
			self.compile_expr(expr, builder)
		}
	}

	fn compile_compare(
		&self,
		op: CompareOp,
		left: &Expr,
		right: &Expr,
		builder: &mut SelectorSqlBuilder,
	) -> crate::Result<()> {
		match op {
			CompareOp::Eq => compile_equal(builder, left, right),
			CompareOp::Ne => compile_not_equal(builder, left, right),
			CompareOp::StartsWith => compile_starts_with(builder, left, right),
			CompareOp::RegexMatch => (self.dialect.table().regex_match)(builder, left, right),
		}
	}
}

/// Compile `expr` for `dialect` into `builder`.
pub fn compile(expr: &Expr, dialect: SqlDialect, builder: &mut SelectorSqlBuilder) -> crate::Result<()> {
	SqlCompiler::new(dialect).compile(expr, builder)
}

fn compile_equal(builder: &mut SelectorSqlBuilder, left: &Expr, right: &Expr) -> crate::Result<()> {
	append_column(builder, left)?;
	builder.append_operator("=");
	append_operand(builder, right)
}

// `<>` is never true against NULL, but a missing value counts as "not equal"
// for selectors, so the null case is matched explicitly.
fn compile_not_equal(builder: &mut SelectorSqlBuilder, left: &Expr, right: &Expr) -> crate::Result<()> {
	builder.append("(");
	append_column(builder, left)?;
	builder.append(" is null or ");
	append_column(builder, left)?;
	builder.append_operator("<>");
	append_operand(builder, right)?;
	builder.append(")");
	Ok(())
}

// LIKE metacharacters inside the literal are passed through unescaped.
fn compile_starts_with(builder: &mut SelectorSqlBuilder, left: &Expr, right: &Expr) -> crate::Result<()> {
	compile_pattern(builder, left, right, "like", |prefix| format!("{prefix}%"))
}

/// Generic regex match. The `~` operator searches for a substring on H2, so
/// the pattern is anchored to force a whole-value match.
pub(crate) fn compile_regex_anchored(builder: &mut SelectorSqlBuilder, left: &Expr, right: &Expr) -> crate::Result<()> {
	compile_pattern(builder, left, right, "~", |pattern| format!("^({pattern})$"))
}

/// Emits `<column> <operator> <param>` where the parameter is the right hand
/// literal rewritten by `pattern`.
pub(crate) fn compile_pattern(
	builder: &mut SelectorSqlBuilder,
	left: &Expr,
	right: &Expr,
	operator: &str,
	pattern: impl FnOnce(String) -> String,
) -> crate::Result<()> {
	let Expr::Literal(value) = right else {
		return Err(SelectorError::invalid_expression(format!(
			"'{right}' must be a literal when used with '{operator}'"
		)));
	};

	append_column(builder, left)?;
	builder.append_operator(operator);
	builder.append_literal(Value::Utf8(pattern(value.to_string())));
	Ok(())
}

fn append_column(builder: &mut SelectorSqlBuilder, expr: &Expr) -> crate::Result<()> {
	match expr {
		Expr::Reference(reference) => {
			builder.append_property(reference)?;
			Ok(())
		}
		other => Err(SelectorError::invalid_expression(format!("expected a property reference, found '{other}'"))),
	}
}

// Literals become bound parameters; references compare against a second
// column and bind nothing.
fn append_operand(builder: &mut SelectorSqlBuilder, expr: &Expr) -> crate::Result<()> {
	match expr {
		Expr::Literal(value) => {
			builder.append_literal(value.clone());
			Ok(())
		}
		Expr::Reference(_) => append_column(builder, expr),
		other => Err(SelectorError::invalid_expression(format!("expected a literal or property, found '{other}'"))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn builder() -> SelectorSqlBuilder {
		let mut builder = SelectorSqlBuilder::new();
		builder.property_alias("a", "a_alias").property_alias("b", "b_alias").property_prefix("prop.");
		builder
	}

	fn a() -> Expr {
		Expr::reference("a")
	}

	fn b() -> Expr {
		Expr::reference("b")
	}

	fn compile_generic(expr: &Expr) -> SelectorSqlBuilder {
		let mut builder = builder();
		compile(expr, SqlDialect::Generic, &mut builder).unwrap();
		builder
	}

	#[test]
	fn test_equal() {
		let builder = compile_generic(&Expr::equal(a(), Expr::literal("woof")));
		assert_eq!(builder.query_string(), "a_alias = :param_0");
		assert_eq!(builder.query_parameters().get("param_0"), Some(&Value::utf8("woof")));
	}

	#[test]
	fn test_not_equal_is_null_safe() {
		let builder = compile_generic(&Expr::not_equal(a(), Expr::literal("woof")));
		assert_eq!(builder.query_string(), "(a_alias is null or a_alias <> :param_0)");
		assert_eq!(builder.query_parameters().len(), 1);
		assert_eq!(builder.query_parameters().get("param_0"), Some(&Value::utf8("woof")));
	}

	#[test]
	fn test_starts_with_appends_wildcard() {
		let builder = compile_generic(&Expr::starts_with(a(), Expr::literal("woof")));
		assert_eq!(builder.query_string(), "a_alias like :param_0");
		assert_eq!(builder.query_parameters().get("param_0"), Some(&Value::utf8("woof%")));
	}

	#[test]
	fn test_starts_with_leaves_metacharacters() {
		let builder = compile_generic(&Expr::starts_with(a(), Expr::literal("wo_f%")));
		assert_eq!(builder.query_parameters().get("param_0"), Some(&Value::utf8("wo_f%%")));
	}

	#[test]
	fn test_regex_generic_is_anchored() {
		let builder = compile_generic(&Expr::regex_match(a(), Expr::literal("woof")));
		assert_eq!(builder.query_string(), "a_alias ~ :param_0");
		assert_eq!(builder.query_parameters().get("param_0"), Some(&Value::utf8("^(woof)$")));
	}

	#[test]
	fn test_regex_postgres_is_unmodified() {
		let mut builder = builder();
		compile(&Expr::regex_match(a(), Expr::literal("woof")), SqlDialect::Postgres, &mut builder).unwrap();
		assert_eq!(builder.query_string(), "a_alias ~ :param_0");
		assert_eq!(builder.query_parameters().get("param_0"), Some(&Value::utf8("woof")));
	}

	#[test]
	fn test_and_wraps_nested_or() {
		let expr = Expr::and(
			Expr::equal(a(), Expr::literal("woof")),
			Expr::or(Expr::equal(b(), Expr::literal("meow")), Expr::equal(b(), Expr::literal("purr"))),
		);
		let builder = compile_generic(&expr);

		assert_eq!(builder.query_string(), "a_alias = :param_0 and (b_alias = :param_1 or b_alias = :param_2)");
		let values: Vec<_> = builder.query_parameters().values().cloned().collect();
		assert_eq!(values, vec![Value::utf8("woof"), Value::utf8("meow"), Value::utf8("purr")]);
	}

	#[test]
	fn test_or_does_not_wrap_nested_and() {
		let expr = Expr::or(
			Expr::and(Expr::equal(a(), Expr::literal("woof")), Expr::equal(b(), Expr::literal("meow"))),
			Expr::equal(b(), Expr::literal("purr")),
		);
		let builder = compile_generic(&expr);

		assert_eq!(builder.query_string(), "a_alias = :param_0 and b_alias = :param_1 or b_alias = :param_2");
	}

	#[test]
	fn test_or_on_left_of_and_is_wrapped() {
		let expr = Expr::and(
			Expr::or(Expr::equal(a(), Expr::literal(1)), Expr::equal(a(), Expr::literal(2))),
			Expr::not_equal(b(), Expr::literal(true)),
		);
		let builder = compile_generic(&expr);

		assert_eq!(
			builder.query_string(),
			"(a_alias = :param_0 or a_alias = :param_1) and (b_alias is null or b_alias <> :param_2)"
		);
		assert_eq!(builder.query_parameters().get("param_2"), Some(&Value::bool(true)));
	}

	#[test]
	fn test_column_comparison_binds_nothing() {
		let builder = compile_generic(&Expr::equal(a(), Expr::reference("dog.name")));
		assert_eq!(builder.query_string(), "a_alias = prop.name");
		assert!(builder.query_parameters().is_empty());
	}

	#[test]
	fn test_parameter_names_are_distinct() {
		let expr = Expr::or(
			Expr::and(Expr::equal(a(), Expr::literal("x")), Expr::starts_with(b(), Expr::literal("y"))),
			Expr::or(Expr::not_equal(a(), Expr::literal("z")), Expr::regex_match(b(), Expr::literal("w"))),
		);
		let builder = compile_generic(&expr);

		let names: Vec<_> = builder.query_parameters().keys().cloned().collect();
		assert_eq!(names, vec!["param_0", "param_1", "param_2", "param_3"]);
		for name in &names {
			assert!(builder.query_string().contains(&format!(":{name}")));
		}
	}

	#[test]
	fn test_unresolved_alias() {
		let mut builder = builder();
		let err = compile(&Expr::equal(Expr::reference("c"), Expr::literal("x")), SqlDialect::Generic, &mut builder)
			.unwrap_err();
		assert!(matches!(err, SelectorError::UnresolvedProperty { ref name } if name == "c"));
	}

	#[test]
	fn test_literal_outside_comparison() {
		let mut builder = builder();
		let err = compile(&Expr::literal(true), SqlDialect::Generic, &mut builder).unwrap_err();
		assert!(matches!(err, SelectorError::InvalidExpression { .. }));
	}

	#[test]
	fn test_starts_with_requires_literal() {
		let mut builder = builder();
		let err = compile(&Expr::starts_with(a(), Expr::reference("dog.name")), SqlDialect::Generic, &mut builder)
			.unwrap_err();
		assert!(matches!(err, SelectorError::InvalidExpression { .. }));
	}
}
