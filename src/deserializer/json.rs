use super::Deserializer;
use crate::transport::Response;
use crate::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Decode options for [`Json`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// RFC 6901 pointer selecting the sub-document to decode (e.g. `/data/items`).
    pub pointer: Option<String>,
    /// Decode an empty (or all-whitespace) body as `null` instead of failing.
    pub allow_empty: bool,
}

impl JsonOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.pointer = Some(pointer.into());
        self
    }

    pub fn with_allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

/// Decodes the body as JSON into `T` (a [`serde_json::Value`] by default).
pub struct Json<T = Value> {
    options: JsonOptions,
    _target: PhantomData<fn() -> T>,
}

impl<T> Json<T> {
    pub fn new() -> Self {
        Self::with_options(JsonOptions::default())
    }

    pub fn with_options(options: JsonOptions) -> Self {
        Self {
            options,
            _target: PhantomData,
        }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }
}

impl<T> Default for Json<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Json<T> {
    fn clone(&self) -> Self {
        Self::with_options(self.options.clone())
    }
}

impl<T> fmt::Debug for Json<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Json")
            .field("options", &self.options)
            .finish()
    }
}

impl<T: DeserializeOwned> Deserializer for Json<T> {
    type Output = T;

    fn deserialize(&self, response: Response) -> Result<T> {
        let body = response.bytes();
        if self.options.allow_empty && body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(Value::Null)?);
        }

        let Some(pointer) = self.options.pointer.as_deref() else {
            return Ok(serde_json::from_slice(body)?);
        };

        let mut document: Value = serde_json::from_slice(body)?;
        let selected = document.pointer_mut(pointer).map(Value::take).ok_or_else(|| {
            Error::validation_with_context(
                format!("json pointer '{}' selects nothing", pointer),
                ErrorContext::new()
                    .with_field_path(pointer)
                    .with_details(format!("response from {}", response.url()))
                    .with_source("json_deserializer"),
            )
        })?;
        Ok(serde_json::from_value(selected)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
