//! flowtree binary
//!
//! Usage:
//!   flowtree <input_python_file.py>
//!
//! Parses the given Python file and prints a colorized nested tree of its
//! control-flow structure. Set RUST_LOG=debug to trace the walk on stderr.

use std::fs;
use std::process;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use flowtree::flow::render;
use flowtree::flow::visit::FlowBuilder;

fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 1 {
        println!("Usage: flowtree <input_python_file.py>");
        process::exit(1);
    }

    let path = &args[0];
    let source = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let tree = FlowBuilder::generate(&source, path)?;
    render::print(&tree);

    Ok(())
}
