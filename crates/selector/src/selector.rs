// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::Expr;

/// Content selector expression language; evaluates directly and compiles to SQL.
pub const CSEL: &str = "csel";

/// Legacy JEXL selectors; direct evaluation only.
pub const JEXL: &str = "jexl";

/// Attribute holding the expression source text.
pub const EXPRESSION: &str = "expression";

/// A named selector: its type, free-form attributes, and the expression tree
/// the front end produced from `attributes["expression"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfiguration {
	pub name: String,
	#[serde(rename = "type")]
	pub selector_type: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub attributes: IndexMap<String, String>,
	pub expression: Expr,
}

impl SelectorConfiguration {
	pub fn new(name: impl Into<String>, selector_type: impl Into<String>, expression: Expr) -> Self {
		let mut attributes = IndexMap::new();
		attributes.insert(EXPRESSION.to_string(), expression.to_string());

		Self {
			name: name.into(),
			selector_type: selector_type.into(),
			description: None,
			attributes,
			expression,
		}
	}

	pub fn csel(name: impl Into<String>, expression: Expr) -> Self {
		Self::new(name, CSEL, expression)
	}

	pub fn jexl(name: impl Into<String>, expression: Expr) -> Self {
		Self::new(name, JEXL, expression)
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// The expression source text, when the caller recorded it.
	pub fn expression_source(&self) -> Option<&str> {
		self.attributes.get(EXPRESSION).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn woof() -> Expr {
		Expr::equal(Expr::reference("a"), Expr::literal("woof"))
	}

	#[test]
	fn test_expression_source_recorded() {
		let selector = SelectorConfiguration::csel("woof", woof());
		assert_eq!(selector.selector_type, CSEL);
		assert_eq!(selector.expression_source(), Some(r#"a == "woof""#));
		assert_eq!(selector.description, None);
	}

	#[test]
	fn test_with_description() {
		let selector = SelectorConfiguration::jexl("woof", woof()).with_description("matches woof");
		assert_eq!(selector.selector_type, JEXL);
		assert_eq!(selector.description.as_deref(), Some("matches woof"));
	}

	#[test]
	fn test_deserialize_without_optional_fields() {
		let selector: SelectorConfiguration = serde_json::from_str(
			r#"{
				"name": "woof",
				"type": "csel",
				"expression": {"compare": {"op": "eq", "left": {"reference": "a"}, "right": {"literal": "woof"}}}
			}"#,
		)
		.unwrap();

		assert_eq!(selector.selector_type, CSEL);
		assert_eq!(selector.expression, woof());
		assert_eq!(selector.description, None);
		assert_eq!(selector.expression_source(), None);
	}

	#[test]
	fn test_serialize_renames_type() {
		let json = serde_json::to_value(SelectorConfiguration::csel("woof", woof()).with_description("d")).unwrap();
		assert_eq!(json["type"], "csel");
		assert_eq!(json["description"], "d");
		assert_eq!(json["attributes"]["expression"], r#"a == "woof""#);
	}
}
