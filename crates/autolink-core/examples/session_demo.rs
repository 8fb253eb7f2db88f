//! Example: annotate a buffer, then undo
//!
//! Run with: RUST_LOG=debug cargo run --example session_demo

use autolink_core::{
    AutolinkConfig, AutolinkSession, ListProvider, MemorySurface, RunOutcome, UndoOutcome,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let provider = Arc::new(ListProvider::from_lines(
        "# known titles\nParis\nParis Commune\nLyon\nTemplate:Infobox\n",
    ));
    let session = AutolinkSession::new(provider, AutolinkConfig::default()).unwrap();

    let surface = MemorySurface::new(
        "{{Infobox|city=Lyon}}\nThe Paris Commune began in Paris; see [[Lyon]] and \
         https://example.org/Lyon <ref>Lyon archives</ref>. Lyon is next.",
    );

    println!("Before:\n{}\n", surface.text());

    match session.run(&surface).await.unwrap() {
        RunOutcome::Annotated(result) => println!(
            "After ({} links added, {} regions protected):\n{}\n",
            result.inserted, result.protected, result.text
        ),
        RunOutcome::Busy => println!("Session busy"),
    }

    assert_eq!(session.undo(&surface).unwrap(), UndoOutcome::Restored);
    println!("After undo:\n{}", surface.text());
}
