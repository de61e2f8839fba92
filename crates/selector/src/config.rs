// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::sql::{DEFAULT_PARAMETER_NAME_PREFIX, DEFAULT_PARAMETER_PREFIX, SelectorSqlBuilder, SqlDialect};

/// How selectors are rendered as SQL for one schema: the dialect, the column
/// each selector variable maps to, and the placeholder conventions of the
/// datastore that executes the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlCompilerConfig {
	pub dialect: SqlDialect,
	pub aliases: IndexMap<String, String>,
	pub property_prefix: String,
	pub parameter_prefix: String,
	pub parameter_name_prefix: String,
	pub parameter_suffix: String,
}

impl Default for SqlCompilerConfig {
	fn default() -> Self {
		Self {
			dialect: SqlDialect::default(),
			aliases: IndexMap::new(),
			property_prefix: String::new(),
			parameter_prefix: DEFAULT_PARAMETER_PREFIX.to_string(),
			parameter_name_prefix: DEFAULT_PARAMETER_NAME_PREFIX.to_string(),
			parameter_suffix: String::new(),
		}
	}
}

impl SqlCompilerConfig {
	pub fn from_json(json: &str) -> crate::Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn dialect(mut self, dialect: SqlDialect) -> Self {
		self.dialect = dialect;
		self
	}

	pub fn alias(mut self, name: impl Into<String>, column: impl Into<String>) -> Self {
		self.aliases.insert(name.into(), column.into());
		self
	}

	pub fn property_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.property_prefix = prefix.into();
		self
	}

	pub fn parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.parameter_prefix = prefix.into();
		self
	}

	pub fn parameter_name_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.parameter_name_prefix = prefix.into();
		self
	}

	pub fn parameter_suffix(mut self, suffix: impl Into<String>) -> Self {
		self.parameter_suffix = suffix.into();
		self
	}

	/// A fresh builder carrying this configuration.
	pub fn builder(&self) -> SelectorSqlBuilder {
		let mut builder = SelectorSqlBuilder::new();
		for (name, column) in &self.aliases {
			builder.property_alias(name.as_str(), column.as_str());
		}
		builder
			.property_prefix(self.property_prefix.as_str())
			.parameter_prefix(self.parameter_prefix.as_str())
			.parameter_name_prefix(self.parameter_name_prefix.as_str())
			.parameter_suffix(self.parameter_suffix.as_str());
		builder
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{ast::Reference, error::SelectorError, value::Value};

	#[test]
	fn test_from_json_defaults() {
		let config = SqlCompilerConfig::from_json("{}").unwrap();
		assert_eq!(config, SqlCompilerConfig::default());
		assert_eq!(config.parameter_prefix, ":");
		assert_eq!(config.parameter_name_prefix, "param_");
	}

	#[test]
	fn test_from_json() {
		let config = SqlCompilerConfig::from_json(
			r#"{
				"dialect": "postgresql",
				"aliases": {"path": "B.request_path", "format": "'maven2'"},
				"property_prefix": "B.",
				"parameter_prefix": "${",
				"parameter_suffix": "}"
			}"#,
		)
		.unwrap();

		assert_eq!(config.dialect, SqlDialect::Postgres);
		assert_eq!(config.aliases.get("path").map(String::as_str), Some("B.request_path"));
		assert_eq!(config.parameter_name_prefix, "param_");
	}

	#[test]
	fn test_from_json_invalid() {
		let err = SqlCompilerConfig::from_json(r#"{"dialect": "oracle"}"#).unwrap_err();
		assert!(matches!(err, SelectorError::Config(_)));
	}

	#[test]
	fn test_builder_carries_configuration() {
		let config = SqlCompilerConfig::default()
			.alias("path", "B.request_path")
			.property_prefix("B.")
			.parameter_prefix("#{p.")
			.parameter_suffix("}")
			.parameter_name_prefix("s0p");

		let mut builder = config.builder();
		builder.append_property(&Reference::new("path")).unwrap();
		builder.append_operator("=").append_literal(Value::utf8("x"));
		builder.append(" and ");
		builder.append_property(&Reference::new("asset.kind")).unwrap();

		assert_eq!(builder.query_string(), "B.request_path = #{p.s0p0} and B.kind");
	}
}
