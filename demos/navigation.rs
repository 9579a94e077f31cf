//! Navigation walkthrough
//!
//! Drives a history over the in-memory host and prints every location the
//! subscriber receives, including the fallback taken once the host stops
//! accepting pushes.
//!
//! Run with `RUST_LOG=waypoint=debug cargo run --example navigation` to see
//! the library's own tracing output.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use waypoint::host::{MemoryHost, MemoryHostConfig};
use waypoint::{History, HistoryBuilder, Location};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
struct PageState {
    scroll: u32,
}

fn print_location(location: &Location<PageState>) {
    match &location.state {
        Some(state) => println!("  -> {} (scroll {})", location.path(), state.scroll),
        None => println!("  -> {}", location.path()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = MemoryHost::with_config(MemoryHostConfig {
        push_state_limit: Some(3),
        ..MemoryHostConfig::default()
    })?;
    let history: History<PageState> = HistoryBuilder::new()
        .host(host.clone())
        .title("demo")
        .build()?;

    println!("Start at {}", history.location().path());
    let subscription = history.subscribe(print_location);

    println!("\npush /articles, /articles/42, /articles/42#comments");
    history.push("/articles", Some(PageState { scroll: 0 }));
    history.push("/articles/42", Some(PageState { scroll: 300 }));
    history.push("/articles/42#comments", None);

    println!("\ngo(-2), delivered asynchronously");
    history.go(-2);
    host.dispatch_pending();

    println!("\nreplace /articles?sort=new");
    history.replace("/articles?sort=new", Some(PageState { scroll: 0 }))?;

    println!("\npush past the host's limit");
    history.push("/articles/43", Some(PageState { scroll: 10 }));
    println!("  fallback navigations: {:?}", host.assignments());

    subscription.unsubscribe();
    history.back();
    host.dispatch_pending();
    println!(
        "\nAfter unsubscribing, back() moved silently to {}",
        history.location().path()
    );

    Ok(())
}
