use super::Deserializer;
use crate::transport::Response;
use crate::Result;

/// Pass-through: returns the successful response unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Raw;

impl Deserializer for Raw {
    type Output = Response;

    fn deserialize(&self, response: Response) -> Result<Response> {
        Ok(response)
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

/// Body as a string (lossy UTF-8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Text;

impl Deserializer for Text {
    type Output = String;

    fn deserialize(&self, response: Response) -> Result<String> {
        Ok(response.text())
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
