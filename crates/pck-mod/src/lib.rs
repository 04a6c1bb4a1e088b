//! Shared plumbing for the `dev-sync` and `mod-launcher` binaries.

use clap::builder::{styling::AnsiColor, Styles};

pub mod commands;
pub mod errors;
pub mod utils;

/// Colored/styled help output used by both binaries.
pub fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default())
}
