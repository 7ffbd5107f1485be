//! Deserialization of successful responses.
//!
//! # Deserializers
//!
//! A [`Deserializer`] turns one successful [`Response`] into a domain value. The
//! batch engine invokes it only after the whole batch has validated, once per
//! response and in submission order. Failed or unattempted requests are never
//! deserialized.
//!
//! | Variant       | Output                  | Selector names              |
//! |---------------|-------------------------|-----------------------------|
//! | [`Raw`]       | [`Response`]            | `default`, `raw`            |
//! | [`Json`]      | any `DeserializeOwned`  | `json`                      |
//! | [`Text`]      | `String`                | `text`                      |
//! | `Markup`      | `scraper::Html`         | `markup`, `html`, `bs4`     |
//!
//! `Markup` is only compiled with the `markup` feature. Selecting it by name
//! without the feature is a configuration error.
//!
//! Typed code picks a concrete deserializer. Configuration-driven code parses a
//! [`DeserializerKind`] and builds an [`AnyDeserializer`], which yields
//! [`Deserialized`].

mod json;
mod markup;
mod plain;

pub use json::{Json, JsonOptions};
#[cfg(feature = "markup")]
pub use markup::Markup;
pub use markup::MarkupOptions;
pub use plain::{Raw, Text};

use crate::transport::Response;
use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::str::FromStr;

/// Converts a successful response into `Self::Output`.
pub trait Deserializer: Send + Sync {
    type Output;

    fn deserialize(&self, response: Response) -> Result<Self::Output>;

    fn name(&self) -> &'static str;
}

/// Closed set of deserializer selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeserializerKind {
    Raw,
    Json,
    Text,
    Markup,
}

impl DeserializerKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeserializerKind::Raw => "default",
            DeserializerKind::Json => "json",
            DeserializerKind::Text => "text",
            DeserializerKind::Markup => "markup",
        }
    }

    /// Construct the deserializer this selector names.
    ///
    /// Fails if the selected backend is not compiled in.
    pub fn build(self, json: JsonOptions, markup: MarkupOptions) -> Result<AnyDeserializer> {
        match self {
            DeserializerKind::Raw => Ok(AnyDeserializer::Raw(Raw)),
            DeserializerKind::Json => Ok(AnyDeserializer::Json(Json::with_options(json))),
            DeserializerKind::Text => Ok(AnyDeserializer::Text(Text)),
            DeserializerKind::Markup => markup::build(markup),
        }
    }
}

impl FromStr for DeserializerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "raw" => Ok(DeserializerKind::Raw),
            "json" => Ok(DeserializerKind::Json),
            "text" => Ok(DeserializerKind::Text),
            "markup" | "html" | "bs4" => Ok(DeserializerKind::Markup),
            other => Err(Error::configuration_with_context(
                format!("unknown deserializer '{}'", other),
                ErrorContext::new()
                    .with_field_path("deserializer.kind")
                    .with_details("expected one of: default, json, text, markup")
                    .with_source("deserializer_selector"),
            )),
        }
    }
}

impl fmt::Display for DeserializerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A deserializer chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyDeserializer {
    Raw(Raw),
    Json(Json),
    Text(Text),
    #[cfg(feature = "markup")]
    Markup(Markup),
}

impl Default for AnyDeserializer {
    fn default() -> Self {
        AnyDeserializer::Raw(Raw)
    }
}

impl Deserializer for AnyDeserializer {
    type Output = Deserialized;

    fn deserialize(&self, response: Response) -> Result<Deserialized> {
        match self {
            AnyDeserializer::Raw(d) => d.deserialize(response).map(Deserialized::Raw),
            AnyDeserializer::Json(d) => d.deserialize(response).map(Deserialized::Json),
            AnyDeserializer::Text(d) => d.deserialize(response).map(Deserialized::Text),
            #[cfg(feature = "markup")]
            AnyDeserializer::Markup(d) => d.deserialize(response).map(Deserialized::Markup),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AnyDeserializer::Raw(d) => d.name(),
            AnyDeserializer::Json(d) => d.name(),
            AnyDeserializer::Text(d) => d.name(),
            #[cfg(feature = "markup")]
            AnyDeserializer::Markup(d) => d.name(),
        }
    }
}

/// Output of an [`AnyDeserializer`].
#[derive(Debug)]
pub enum Deserialized {
    Raw(Response),
    Json(serde_json::Value),
    Text(String),
    #[cfg(feature = "markup")]
    Markup(scraper::Html),
}

impl Deserialized {
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Deserialized::Raw(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Deserialized::Raw(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Deserialized::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Deserialized::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Deserialized::Text(s) => Some(s),
            _ => None,
        }
    }

    #[cfg(feature = "markup")]
    pub fn as_markup(&self) -> Option<&scraper::Html> {
        match self {
            Deserialized::Markup(html) => Some(html),
            _ => None,
        }
    }
}
