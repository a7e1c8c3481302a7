//! A pretend training loop with a bunny cheering it on.
//!
//! Run with `RUST_LOG=bunny=debug` to see the library's logs.

use std::io::{stderr, IsTerminal};
use std::thread;
use std::time::Duration;

use bunny::BunnyBuilder;
use color_eyre::Result;
use console::Color;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(stderr)
        .init();

    let epochs = BunnyBuilder::new()
        .desc("training")
        .unit("epoch")
        .colour(Color::Magenta)
        .hidden_if(!stderr().is_terminal())
        .build(1..=60)?;

    let mut loss = 1.0_f64;
    for epoch in epochs {
        thread::sleep(Duration::from_millis(80));
        loss *= 0.95;
        if epoch % 20 == 0 {
            tracing::info!(epoch, loss, "checkpoint");
        }
    }

    println!("Final loss: {loss:.4}");
    Ok(())
}
