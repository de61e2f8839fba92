// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ast::Reference, error::SelectorError, value::Value};

pub const DEFAULT_PARAMETER_PREFIX: &str = ":";
pub const DEFAULT_PARAMETER_NAME_PREFIX: &str = "param_";

/// Mutable state for a single selector compilation: the SQL text emitted so
/// far, the parameters bound to it, and the alias/prefix configuration used to
/// render references and placeholders.
///
/// A builder is owned by one caller at a time. Configure it, hand it to the
/// compiler, then read the query string and parameters back out.
#[derive(Debug, Clone)]
pub struct SelectorSqlBuilder {
	query: String,
	parameters: IndexMap<String, Value>,
	aliases: IndexMap<String, String>,
	property_prefix: String,
	parameter_prefix: String,
	parameter_name_prefix: String,
	parameter_suffix: String,
	next_parameter: usize,
}

impl Default for SelectorSqlBuilder {
	fn default() -> Self {
		Self {
			query: String::new(),
			parameters: IndexMap::new(),
			aliases: IndexMap::new(),
			property_prefix: String::new(),
			parameter_prefix: DEFAULT_PARAMETER_PREFIX.to_string(),
			parameter_name_prefix: DEFAULT_PARAMETER_NAME_PREFIX.to_string(),
			parameter_suffix: String::new(),
			next_parameter: 0,
		}
	}
}

impl SelectorSqlBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Maps a declared selector variable to the column expression it stands
	/// for, e.g. `path` to `B.request_path`.
	pub fn property_alias(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
		self.aliases.insert(name.into(), alias.into());
		self
	}

	/// Prepended to the field of dotted references, e.g. `prop.` turns
	/// `dog.name` into `prop.name`.
	pub fn property_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
		self.property_prefix = prefix.into();
		self
	}

	/// Placeholder marker written in front of every parameter name.
	pub fn parameter_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
		self.parameter_prefix = prefix.into();
		self
	}

	/// Placeholder marker written after every parameter name.
	pub fn parameter_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
		self.parameter_suffix = suffix.into();
		self
	}

	/// Stem of generated parameter names; names are this prefix followed by
	/// the parameter's index.
	pub fn parameter_name_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
		self.parameter_name_prefix = prefix.into();
		self
	}

	pub fn name_prefix(&self) -> &str {
		&self.parameter_name_prefix
	}

	pub fn alias(&self, name: &str) -> Option<&str> {
		self.aliases.get(name).map(String::as_str)
	}

	/// Binds `value` to the next free parameter name and returns the full
	/// placeholder to embed in the query text.
	pub fn next_parameter(&mut self, value: Value) -> String {
		let name = format!("{}{}", self.parameter_name_prefix, self.next_parameter);
		self.next_parameter += 1;

		let placeholder = format!("{}{}{}", self.parameter_prefix, name, self.parameter_suffix);
		self.parameters.insert(name, value);
		placeholder
	}

	pub fn append(&mut self, sql: &str) -> &mut Self {
		self.query.push_str(sql);
		self
	}

	/// Appends the column expression for a reference. Aliases win; otherwise a
	/// dotted reference renders as `property_prefix + field`. A bare name with
	/// no alias is an error.
	pub fn append_property(&mut self, reference: &Reference) -> crate::Result<&mut Self> {
		if let Some(alias) = self.aliases.get(reference.path()) {
			self.query.push_str(alias);
			return Ok(self);
		}

		if !reference.is_property() {
			return Err(SelectorError::UnresolvedProperty {
				name: reference.path().to_string(),
			});
		}

		self.query.push_str(&self.property_prefix);
		self.query.push_str(reference.field());
		Ok(self)
	}

	pub fn append_operator(&mut self, operator: &str) -> &mut Self {
		self.query.push(' ');
		self.query.push_str(operator);
		self.query.push(' ');
		self
	}

	pub fn append_literal(&mut self, value: Value) -> &mut Self {
		let placeholder = self.next_parameter(value);
		self.query.push_str(&placeholder);
		self
	}

	pub fn query_string(&self) -> &str {
		&self.query
	}

	pub fn query_parameters(&self) -> &IndexMap<String, Value> {
		&self.parameters
	}

	/// Drops the emitted text and parameters, keeping aliases and prefixes so
	/// the builder can compile the next selector.
	pub fn clear_query_string(&mut self) {
		self.query.clear();
		self.parameters.clear();
		self.next_parameter = 0;
	}

	/// Moves the current query and parameters out, leaving the builder cleared.
	pub fn take_fragment(&mut self) -> SqlFragment {
		let fragment = SqlFragment {
			sql: std::mem::take(&mut self.query),
			parameters: std::mem::take(&mut self.parameters),
		};
		self.next_parameter = 0;
		fragment
	}

	pub fn into_fragment(self) -> SqlFragment {
		SqlFragment {
			sql: self.query,
			parameters: self.parameters,
		}
	}
}

/// A compiled predicate: SQL text plus the parameters its placeholders
/// refer to, keyed by unprefixed name in binding order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlFragment {
	pub sql: String,
	pub parameters: IndexMap<String, Value>,
}

impl SqlFragment {
	pub fn parameter(&self, name: &str) -> Option<&Value> {
		self.parameters.get(name)
	}
}
