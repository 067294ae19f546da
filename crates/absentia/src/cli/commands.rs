//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Dashboard command arguments.
#[derive(Debug, Default, Args)]
pub struct DashCommand {
    /// Dataset file to load instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// The query (matched against district names, case-insensitive)
    pub query: String,

    /// Dataset file to load instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// District name (first case-insensitive substring match wins)
    pub name: String,

    /// Dataset file to load instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_dash_command_default() {
        let cmd = DashCommand::default();
        assert!(cmd.dataset.is_none());
    }

    #[test]
    fn test_search_command_debug() {
        let cmd = SearchCommand {
            query: "lake".to_string(),
            dataset: None,
            format: OutputFormat::Plain,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("query"));
        assert!(debug_str.contains("lake"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_output_format_clone() {
        let format = OutputFormat::Table;
        let cloned = format;
        assert_eq!(format, cloned);
    }
}
