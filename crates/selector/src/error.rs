// SPDX-License-Identifier: EPL-1.0
// Copyright (c) 2025 Sonatype, Inc.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectorError>;

/// Errors raised while evaluating or compiling a selector.
#[derive(Debug, Error)]
pub enum SelectorError {
	#[error("unresolved property: '{name}'")]
	UnresolvedProperty {
		name: String,
	},

	#[error("unknown selector type: '{selector_type}'")]
	UnknownType {
		selector_type: String,
	},

	#[error("selector type '{selector_type}' cannot be compiled to sql")]
	SqlUnsupported {
		selector_type: String,
	},

	#[error("invalid selector expression: {reason}")]
	InvalidExpression {
		reason: String,
	},

	#[error("invalid regular expression '{pattern}'")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("unknown sql dialect: '{name}'")]
	InvalidDialect {
		name: String,
	},

	#[error("invalid compiler configuration: {0}")]
	Config(#[from] serde_json::Error),
}

impl SelectorError {
	pub(crate) fn invalid_expression(reason: impl Into<String>) -> Self {
		SelectorError::InvalidExpression {
			reason: reason.into(),
		}
	}
}
