//! Generate CALCULATORS.md from the calculator registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-catalog
//! ```
//!
//! The generated file is written to `CALCULATORS.md` at the workspace root.

use std::fs;
use std::path::Path;

use calcora_core::catalog::generate_catalog_markdown;
use calcora_core::locale::LOCALES;
use calcora_core::registry::REGISTRY;

fn main() {
    if let Err(e) = REGISTRY.validate() {
        eprintln!("Calculator catalog is inconsistent: {}", e);
        std::process::exit(1);
    }

    println!("Generating CALCULATORS.md...");
    let markdown = generate_catalog_markdown(&REGISTRY, &LOCALES);
    let output_path = Path::new("CALCULATORS.md");

    match fs::write(output_path, &markdown) {
        Ok(()) => {
            println!("Successfully wrote {} bytes to {}", markdown.len(), output_path.display());
        }
        Err(e) => {
            eprintln!("Error writing file: {}", e);
            std::process::exit(1);
        }
    }
}
