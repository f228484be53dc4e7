//! Main entry point for the fontlease GUI application.
//!
//! Registers fonts with the operating system's font table for the
//! lifetime of the session and releases every one of them again on exit.

mod app;
mod helpers;
mod message;
mod styles;
mod types;
mod update;
mod view;

use clap::Parser;
use std::path::PathBuf;

/// Register fonts with the system for the current session only.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fontlease", version, about)]
pub struct LaunchOptions {
    /// Font files to register at startup
    pub fonts: Vec<PathBuf>,

    /// Show the main window even when fonts were preloaded
    #[arg(short = 'D', long)]
    pub display: bool,
}

fn main() -> iced::Result {
    app::run(LaunchOptions::parse())
}

#[cfg(test)]
mod tests;
