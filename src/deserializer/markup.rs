use super::AnyDeserializer;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Parse options for the markup deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupOptions {
    /// Parse as an HTML fragment rather than a full document.
    pub fragment: bool,
}

#[cfg(feature = "markup")]
pub(super) fn build(options: MarkupOptions) -> Result<AnyDeserializer> {
    Ok(AnyDeserializer::Markup(Markup::with_options(options)))
}

#[cfg(not(feature = "markup"))]
pub(super) fn build(_options: MarkupOptions) -> Result<AnyDeserializer> {
    Err(crate::Error::configuration_with_context(
        "markup deserializer is not available",
        crate::ErrorContext::new()
            .with_field_path("deserializer.kind")
            .with_details("rebuild requests-batch with the `markup` feature")
            .with_source("deserializer_selector"),
    ))
}

#[cfg(feature = "markup")]
pub use backend::Markup;

#[cfg(feature = "markup")]
mod backend {
    use super::MarkupOptions;
    use crate::deserializer::Deserializer;
    use crate::transport::Response;
    use crate::Result;
    use scraper::Html;

    /// Parses the body text into a traversable [`scraper::Html`] document.
    #[derive(Debug, Clone, Default)]
    pub struct Markup {
        options: MarkupOptions,
    }

    impl Markup {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_options(options: MarkupOptions) -> Self {
            Self { options }
        }
    }

    impl Deserializer for Markup {
        type Output = Html;

        fn deserialize(&self, response: Response) -> Result<Html> {
            let text = response.text();
            Ok(if self.options.fragment {
                Html::parse_fragment(&text)
            } else {
                Html::parse_document(&text)
            })
        }

        fn name(&self) -> &'static str {
            "markup"
        }
    }

}
