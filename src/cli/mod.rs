// src/cli/mod.rs
// CLI module for FileFlow commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod run;
pub mod serve;
pub mod tool;

// Re-export command handlers
pub use config::run_config;
pub use run::run_command;
pub use serve::run_mcp_server;
pub use tool::run_tool;

#[derive(Parser)]
#[command(name = "fileflow")]
#[command(about = "Filesystem and interactive shell tools over MCP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio (default)
    Serve,

    /// Execute a tool directly
    Tool {
        /// Tool name (e.g. create_file, run_command)
        #[arg(index = 1)]
        name: String,

        /// JSON arguments (e.g. '{"path": ".", "filename": "notes.txt"}')
        #[arg(index = 2)]
        args: String,
    },

    /// Run a shell command here, confirming its prompts on this terminal
    Run {
        /// Working directory (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Confirmation policy override: auto, terminal, approve, deny
        #[arg(long, env = "FILEFLOW_CONFIRM")]
        confirm: Option<String>,

        /// Command line passed to the shell, as one quoted string
        /// (e.g. 'grep "a b" notes.txt')
        #[arg(index = 1)]
        command: String,
    },

    /// Show resolved configuration and validation results
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_takes_command_line_verbatim() {
        let cli =
            Cli::try_parse_from(["fileflow", "run", "--dir", "/tmp", "grep \"a b\" notes.txt"])
                .unwrap();
        match cli.command {
            Some(Commands::Run { dir, command, .. }) => {
                assert_eq!(dir, Some(PathBuf::from("/tmp")));
                assert_eq!(command, "grep \"a b\" notes.txt");
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_rejects_split_words() {
        // Re-joining separate words would lose their quoting
        assert!(Cli::try_parse_from(["fileflow", "run", "grep", "a b", "notes.txt"]).is_err());
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["fileflow"]).unwrap();
        assert!(cli.command.is_none());
    }
}
