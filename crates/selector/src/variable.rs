// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::value::Value;

/// Name to value lookup that direct evaluation resolves references against.
pub trait VariableSource {
	/// Every name this source can resolve.
	fn variable_names(&self) -> Vec<&str>;

	fn get(&self, name: &str) -> Option<&Value>;
}

/// An insertion-ordered, owned variable source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableSet {
	variables: IndexMap<String, Value>,
}

impl VariableSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(name, value);
		self
	}

	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.variables.insert(name.into(), value.into());
		self
	}

	pub fn len(&self) -> usize {
		self.variables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.variables.is_empty()
	}
}

impl VariableSource for VariableSet {
	fn variable_names(&self) -> Vec<&str> {
		self.variables.keys().map(String::as_str).collect()
	}

	fn get(&self, name: &str) -> Option<&Value> {
		self.variables.get(name)
	}
}

impl<K, V> FromIterator<(K, V)> for VariableSet
where
	K: Into<String>,
	V: Into<Value>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			variables: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

impl VariableSource for HashMap<String, Value> {
	fn variable_names(&self) -> Vec<&str> {
		self.keys().map(String::as_str).collect()
	}

	fn get(&self, name: &str) -> Option<&Value> {
		HashMap::get(self, name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_variable_set_lookup() {
		let variables = VariableSet::new().with("path", "/org/foo").with("format", "maven2");
		assert_eq!(variables.get("path"), Some(&Value::utf8("/org/foo")));
		assert_eq!(variables.get("missing"), None);
		assert_eq!(variables.variable_names(), vec!["path", "format"]);
	}

	#[test]
	fn test_from_iter_keeps_order() {
		let variables: VariableSet = [("b", 1), ("a", 2)].into_iter().collect();
		assert_eq!(variables.len(), 2);
		assert_eq!(variables.variable_names(), vec!["b", "a"]);
	}

	#[test]
	fn test_hash_map_source() {
		let mut map = HashMap::new();
		map.insert("a".to_string(), Value::bool(true));
		assert_eq!(VariableSource::get(&map, "a"), Some(&Value::bool(true)));
		assert_eq!(map.variable_names(), vec!["a"]);
	}
}
