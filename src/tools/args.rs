//! Typed access to a tool's argument bag, backed by its descriptor.

use rmcp::model::JsonObject;
use serde_json::Value as JsonValue;

use crate::core::error::DispatchError;
use crate::core::tool::{DefaultValue, ToolDescriptor};
use crate::domain::{Include, Limit};

pub struct Args<'a> {
    spec: &'static ToolDescriptor,
    raw: &'a JsonObject,
}

fn invalid(name: &'static str, expected: impl Into<String>) -> DispatchError {
    DispatchError::InvalidArgument {
        name,
        expected: expected.into(),
    }
}

impl<'a> Args<'a> {
    pub fn new(spec: &'static ToolDescriptor, raw: &'a JsonObject) -> Self {
        Self { spec, raw }
    }

    /// Fail on the first required property that is absent.
    pub fn check_required(&self) -> Result<(), DispatchError> {
        match self.spec.required_params().find(|p| self.value(p.name).is_none()) {
            Some(missing) => Err(DispatchError::MissingArgument(missing.name)),
            None => Ok(()),
        }
    }

    // `null` counts as absent.
    fn value(&self, name: &str) -> Option<&'a JsonValue> {
        self.raw.get(name).filter(|v| !v.is_null())
    }

    fn default_of(&self, name: &str) -> Option<DefaultValue> {
        self.spec.param(name).and_then(|p| p.default)
    }

    pub fn required_str(&self, name: &'static str) -> Result<&'a str, DispatchError> {
        self.optional_str(name)?
            .ok_or(DispatchError::MissingArgument(name))
    }

    /// Empty strings are treated as not supplied.
    pub fn optional_str(&self, name: &'static str) -> Result<Option<&'a str>, DispatchError> {
        match self.value(name) {
            None => Ok(None),
            Some(JsonValue::String(s)) if s.is_empty() => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(invalid(name, "a string")),
        }
    }

    pub fn optional_string(&self, name: &'static str) -> Result<Option<String>, DispatchError> {
        Ok(self.optional_str(name)?.map(str::to_owned))
    }

    pub fn required_object(&self, name: &'static str) -> Result<&'a JsonValue, DispatchError> {
        match self.value(name) {
            None => Err(DispatchError::MissingArgument(name)),
            Some(v) if v.is_object() => Ok(v),
            Some(_) => Err(invalid(name, "an object")),
        }
    }

    pub fn bool(&self, name: &'static str) -> Result<bool, DispatchError> {
        match self.value(name) {
            Some(JsonValue::Bool(b)) => Ok(*b),
            Some(_) => Err(invalid(name, "a boolean")),
            None => match self.default_of(name) {
                Some(DefaultValue::Boolean(b)) => Ok(b),
                _ => Err(DispatchError::MissingArgument(name)),
            },
        }
    }

    /// Integers saturate at the i64 range; fractional numbers truncate.
    pub fn int(&self, name: &'static str) -> Result<i64, DispatchError> {
        match self.value(name) {
            Some(JsonValue::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Ok(i)
                } else if n.as_u64().is_some() {
                    Ok(i64::MAX)
                } else {
                    // float-to-int `as` saturates
                    Ok(n.as_f64().map(|f| f as i64).unwrap_or_default())
                }
            }
            Some(_) => Err(invalid(name, "an integer")),
            None => match self.default_of(name) {
                Some(DefaultValue::Integer(i)) => Ok(i),
                _ => Err(DispatchError::MissingArgument(name)),
            },
        }
    }

    pub fn limit(&self) -> Result<Limit, DispatchError> {
        Ok(Limit::clamped(self.int("limit")?))
    }

    pub fn offset(&self) -> Result<u64, DispatchError> {
        Ok(self.int("offset")?.max(0) as u64)
    }

    pub fn include(&self) -> Result<Include, DispatchError> {
        let raw = match self.optional_str("include")? {
            Some(s) => s,
            None => match self.default_of("include") {
                Some(DefaultValue::String(s)) => s,
                _ => return Ok(Include::default()),
            },
        };
        raw.parse()
            .map_err(|_| invalid("include", format!("one of {}", Include::VALUES.join(", "))))
    }
}
