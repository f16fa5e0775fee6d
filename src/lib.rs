//! Roadside library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod geo;
pub mod headless;
pub mod location;
pub mod services;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// How the session is presented.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum Frontend {
    /// Interactive terminal map
    #[default]
    Tui,
    /// One JSON snapshot per line on stdout
    Headless,
}
