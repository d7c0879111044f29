//! src/tools/mod.rs
//! Tool implementations shared by the MCP server and the CLI

pub mod core;

// Re-export public API for CLI dispatcher, tests, and external callers
pub use core::{
    // Trait
    ToolContext,
    // Tool handlers
    create_dir,
    create_file,
    delete_dir,
    delete_file,
    meta_data,
    move_dir,
    move_file,
    run_command,
    search_file,
    write_file,
};
