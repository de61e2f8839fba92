// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

//! Typed expression tree handed over by the expression-language front end.
//!
//! The front end has already validated operator arity, so every node carries
//! only what is needed to re-derive either a boolean or a SQL predicate.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
	Eq,
	Ne,
	StartsWith,
	RegexMatch,
}

impl Display for CompareOp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			CompareOp::Eq => f.write_str("=="),
			CompareOp::Ne => f.write_str("!="),
			CompareOp::StartsWith => f.write_str("=^"),
			CompareOp::RegexMatch => f.write_str("=~"),
		}
	}
}

/// A reference to either a declared selector variable (`a`) or a property of
/// the underlying record (`dog.name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference {
	path: String,
}

impl Reference {
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// Dotted references name a record property rather than a variable.
	pub fn is_property(&self) -> bool {
		self.path.contains('.')
	}

	/// The property name with its leading namespace stripped, `name` for
	/// `dog.name`. Bare references return the whole path.
	pub fn field(&self) -> &str {
		match self.path.split_once('.') {
			Some((_, field)) => field,
			None => &self.path,
		}
	}
}

impl Display for Reference {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.path)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
	And(Box<Expr>, Box<Expr>),
	Or(Box<Expr>, Box<Expr>),
	Compare {
		op: CompareOp,
		left: Box<Expr>,
		right: Box<Expr>,
	},
	Reference(Reference),
	Literal(Value),
}

impl Expr {
	pub fn and(left: Expr, right: Expr) -> Self {
		Expr::And(Box::new(left), Box::new(right))
	}

	pub fn or(left: Expr, right: Expr) -> Self {
		Expr::Or(Box::new(left), Box::new(right))
	}

	pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
		Expr::Compare {
			op,
			left: Box::new(left),
			right: Box::new(right),
		}
	}

	pub fn equal(left: Expr, right: Expr) -> Self {
		Self::compare(CompareOp::Eq, left, right)
	}

	pub fn not_equal(left: Expr, right: Expr) -> Self {
		Self::compare(CompareOp::Ne, left, right)
	}

	pub fn starts_with(left: Expr, right: Expr) -> Self {
		Self::compare(CompareOp::StartsWith, left, right)
	}

	pub fn regex_match(left: Expr, right: Expr) -> Self {
		Self::compare(CompareOp::RegexMatch, left, right)
	}

	pub fn reference(path: impl Into<String>) -> Self {
		Expr::Reference(Reference::new(path))
	}

	pub fn literal(value: impl Into<Value>) -> Self {
		Expr::Literal(value.into())
	}

	pub fn is_or(&self) -> bool {
		matches!(self, Expr::Or(..))
	}

	/// True for nodes that produce a boolean on their own.
	pub fn is_predicate(&self) -> bool {
		matches!(self, Expr::And(..) | Expr::Or(..) | Expr::Compare { .. })
	}
}

impl Display for Expr {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Expr::And(left, right) => write!(f, "({left} and {right})"),
			Expr::Or(left, right) => write!(f, "({left} or {right})"),
			Expr::Compare {
				op,
				left,
				right,
			} => write!(f, "{left} {op} {right}"),
			Expr::Reference(reference) => Display::fmt(reference, f),
			Expr::Literal(Value::Utf8(s)) => write!(f, "\"{s}\""),
			Expr::Literal(value) => Display::fmt(value, f),
		}
	}
}
