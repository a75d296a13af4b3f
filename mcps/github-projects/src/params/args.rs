//! Lenient argument decoding
//!
//! rmcp rejects undecodable arguments with a protocol error. Tools here
//! report them as ordinary failed calls instead, so [`ToolArgs`] always
//! deserializes and keeps the decoding outcome for the server to inspect.

use rmcp::model::CallToolResult;
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use thiserror::Error;
use tracing::debug;

use crate::result::tool_error;

/// Why a tool's arguments could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing required parameter: {0}")]
    Missing(String),
    #[error("invalid parameter: {0}")]
    Invalid(String),
}

impl ParamError {
    fn from_serde(err: &serde_json::Error) -> Self {
        let message = err.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some(name) = rest.split('`').next() {
                return Self::Missing(name.to_string());
            }
        }
        Self::Invalid(message)
    }
}

/// Decode tool arguments; `null` counts as an empty object
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ParamError> {
    let value = if value.is_null() { Value::Object(Map::new()) } else { value };
    serde_json::from_value(value).map_err(|e| ParamError::from_serde(&e))
}

/// Tool arguments whose decoding failure is kept rather than raised
#[derive(Debug)]
pub struct ToolArgs<T>(Result<T, ParamError>);

impl<T: DeserializeOwned> ToolArgs<T> {
    pub fn from_value(value: Value) -> Self {
        Self(decode(value))
    }
}

impl<T> ToolArgs<T> {
    pub fn into_inner(self) -> Result<T, ParamError> {
        self.0
    }

    /// The decoded parameters, or the failed tool result to return as is
    pub fn accept(self) -> Result<T, CallToolResult> {
        self.0.map_err(|err| {
            debug!(error = %err, "rejecting tool arguments");
            tool_error(err.to_string())
        })
    }
}

impl<T> From<T> for ToolArgs<T> {
    fn from(params: T) -> Self {
        Self(Ok(params))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ToolArgs<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

impl<T: JsonSchema> JsonSchema for ToolArgs<T> {
    fn inline_schema() -> bool {
        T::inline_schema()
    }

    fn schema_name() -> Cow<'static, str> {
        T::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        T::schema_id()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        T::json_schema(generator)
    }
}
