//! # Gridwall CLI
//!
//! Usage:
//!   gridwall layout.json
//!   echo '{ ... }' | gridwall
//!   gridwall --example > layout.json

use std::env;
use std::fs;
use std::io::{self, Read};

use gridwall::GridwallError;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_layout_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).expect("Failed to read stdin");
        buf
    };

    match gridwall::summarize_json(&input) {
        Ok(summary) => {
            eprintln!(
                "✓ layout valid: {} item(s) on a {}x{} grid",
                summary.item_count, summary.grid_cols, summary.grid_rows
            );
        }
        Err(GridwallError::ValidationError(errors)) => {
            eprintln!("✗ layout rejected:");
            for error in &errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn example_layout_json() -> &'static str {
    r##"{
  "grid_cols": 4,
  "grid_rows": 3,
  "items": [
    { "content_id": 1, "x": 0, "y": 0, "w": 2, "h": 2 },
    { "content_id": 2, "x": 2, "y": 0, "w": 1, "h": 1 },
    { "content_id": 3, "x": 3, "y": 0, "w": 1, "h": 1 },
    { "content_id": 4, "x": 2, "y": 1, "w": 2, "h": 1 },
    { "content_id": 5, "x": 0, "y": 2, "w": 1, "h": 1 },
    { "content_id": 6, "x": 1, "y": 2, "w": 2, "h": 1 }
  ]
}
"##
}
