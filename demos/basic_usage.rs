//! Basic usage example
//!
//! Fetches a handful of JSON documents as one batch, then shows how a partial
//! failure is reported.
//!
//! Usage:
//!   REQUESTS_BATCH_LOG=debug cargo run --example basic_usage

use requests_batch::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    requests_batch::telemetry::init_tracing();

    // Nested groups are flattened depth-first; results come back in that order.
    let todos: Vec<serde_json::Value> = batch_request(
        requests![
            get("https://jsonplaceholder.typicode.com/todos/1"),
            [
                get("https://jsonplaceholder.typicode.com/todos/2"),
                get("https://jsonplaceholder.typicode.com/todos/3"),
            ],
        ],
        Json::<serde_json::Value>::new(),
        Strategy::bounded_concurrent(3)?,
    )?;
    for todo in &todos {
        println!("{} {}", todo["id"], todo["title"]);
    }

    // Configuration-driven: selectors are plain strings.
    let config = BatchConfig::new()
        .with_strategy("sequential")
        .with_deserializer("text");
    let result = submit(
        vec![
            get("https://jsonplaceholder.typicode.com/posts/1"),
            get("https://jsonplaceholder.typicode.com/does-not-exist"),
        ],
        &config,
    );

    match result {
        Ok(bodies) => println!("all {} requests succeeded", bodies.len()),
        Err(Error::Batch(err)) => {
            println!("{}", err);
            for (index, request, failure) in err.failures() {
                println!("  #{} {} -> {}", index, request, failure.class());
            }
            println!("accepted: {:?}", err.accepted());
        }
        Err(other) => return Err(other.into()),
    }

    Ok(())
}
