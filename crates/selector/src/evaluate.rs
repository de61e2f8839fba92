// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

//! Direct, in-memory evaluation of selectors against a [`VariableSource`].

use regex::Regex;
use tracing::instrument;

use crate::{
	ast::{CompareOp, Expr},
	error::SelectorError,
	selector::{CSEL, JEXL, SelectorConfiguration},
	value::Value,
	variable::VariableSource,
};

/// Selector types that can be evaluated directly.
pub const DIRECT_TYPES: [&str; 2] = [CSEL, JEXL];

/// Evaluates an expression tree to a boolean.
pub trait Interpreter: Send + Sync {
	fn interpret(&self, expr: &Expr, source: &dyn VariableSource) -> crate::Result<bool>;
}

/// Walks the tree directly. Missing variables are null: they equal nothing,
/// never start with or match anything, and are unequal to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeInterpreter;

impl Interpreter for TreeInterpreter {
	fn interpret(&self, expr: &Expr, source: &dyn VariableSource) -> crate::Result<bool> {
		match expr {
			Expr::And(left, right) => Ok(self.interpret(left, source)? && self.interpret(right, source)?),
			Expr::Or(left, right) => Ok(self.interpret(left, source)? || self.interpret(right, source)?),
			Expr::Compare {
				op,
				left,
				right,
			} => {
				let left = resolve(left, source)?;
				let right = resolve(right, source)?;
				compare(*op, left, right)
			}
			Expr::Literal(Value::Boolean(value)) => Ok(*value),
			Expr::Reference(reference) => match source.get(reference.path()) {
				Some(Value::Boolean(value)) => Ok(*value),
				Some(_) | None => Ok(false),
			},
			Expr::Literal(value) => {
				Err(SelectorError::invalid_expression(format!("literal '{value}' is not a boolean expression")))
			}
		}
	}
}

fn resolve<'a>(expr: &'a Expr, source: &'a dyn VariableSource) -> crate::Result<Option<&'a Value>> {
	match expr {
		Expr::Reference(reference) => Ok(source.get(reference.path())),
		Expr::Literal(value) => Ok(Some(value)),
		other => Err(SelectorError::invalid_expression(format!("'{other}' cannot be used as a comparison operand"))),
	}
}

fn compare(op: CompareOp, left: Option<&Value>, right: Option<&Value>) -> crate::Result<bool> {
	match op {
		CompareOp::Eq => Ok(equals(left, right)),
		CompareOp::Ne => Ok(not_equals(left, right)),
		CompareOp::StartsWith => match (left, right) {
			(Some(left), Some(prefix)) => Ok(left.to_string().starts_with(&prefix.to_string())),
			_ => Ok(false),
		},
		CompareOp::RegexMatch => match (left, right) {
			(Some(left), Some(pattern)) => Ok(full_match(&pattern.to_string())?.is_match(&left.to_string())),
			_ => Ok(false),
		},
	}
}

fn equals(left: Option<&Value>, right: Option<&Value>) -> bool {
	match (left, right) {
		(Some(left), Some(right)) => left.loosely_eq(right),
		_ => false,
	}
}

// An absent left side is unequal to everything. A present value compared
// against an absent column is neither equal nor unequal, as in SQL.
fn not_equals(left: Option<&Value>, right: Option<&Value>) -> bool {
	match (left, right) {
		(None, _) => true,
		(Some(left), Some(right)) => !left.loosely_eq(right),
		(Some(_), None) => false,
	}
}

fn full_match(pattern: &str) -> crate::Result<Regex> {
	Regex::new(&format!("^(?:{pattern})$")).map_err(|source| SelectorError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})
}

/// Dispatches a selector to the interpreter registered for its type.
pub struct DirectEvaluator {
	interpreter: Box<dyn Interpreter>,
}

impl Default for DirectEvaluator {
	fn default() -> Self {
		Self::new(TreeInterpreter)
	}
}

impl DirectEvaluator {
	pub fn new(interpreter: impl Interpreter + 'static) -> Self {
		Self {
			interpreter: Box::new(interpreter),
		}
	}

	#[instrument(name = "selector::evaluate", level = "trace", skip(self, selector, source), fields(selector = %selector.name))]
	pub fn evaluate(&self, selector: &SelectorConfiguration, source: &dyn VariableSource) -> crate::Result<bool> {
		if !DIRECT_TYPES.contains(&selector.selector_type.as_str()) {
			return Err(SelectorError::UnknownType {
				selector_type: selector.selector_type.clone(),
			});
		}

		self.interpreter.interpret(&selector.expression, source)
	}
}
