//! Info command implementations (palette)

use std::process::ExitCode;

use crate::color::to_hex;
use crate::palette::PaletteIndex;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Execute the palette command
pub fn run_palette(json: bool) -> ExitCode {
    if json {
        let entries: Vec<serde_json::Value> = PaletteIndex::all()
            .map(|c| {
                serde_json::json!({
                    "index": c.get(),
                    "name": c.name(),
                    "hex": to_hex(c.rgb()),
                })
            })
            .collect();
        return match serde_json::to_string_pretty(&entries) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    print!("{}", format_palette());
    ExitCode::from(EXIT_SUCCESS)
}

/// Palette as an aligned text table.
fn format_palette() -> String {
    let mut out = String::new();
    for c in PaletteIndex::all() {
        out.push_str(&format!("{:>2}  {:<14} {}\n", c.get(), c.name(), to_hex(c.rgb())));
    }
    out
}
