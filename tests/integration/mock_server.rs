//! Mock HTTP server setup for integration tests

use mockito::{Mock, Server, ServerGuard};

/// Test fixture that owns a mock server for the duration of a test.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub fn new() -> Self {
        let server = Server::new();
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Absolute URL for a path on the mock server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a mock for a successful JSON response
    pub fn mock_json(&mut self, method: &str, path: &str, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }

    /// Create a mock for a plain-text response with the given status
    pub fn mock_text(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .create()
    }

    /// Create a mock for an error response
    pub fn mock_error(&mut self, path: &str, status: usize, error_body: &str) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(error_body)
            .create()
    }
}

/// A URL nothing listens on.
pub fn unreachable_url(path: &str) -> String {
    format!("http://127.0.0.1:1{}", path)
}
