//! Integration tests against a mock HTTP server, using the real HTTP transport.

mod batch;
mod error_handling;
mod mock_server;
