//! Command-line host for the Rela relationship graph.
//!
//! The binary owns a [`GraphStore`](rela_graph::GraphStore) restored from a
//! snapshot file and exposes the traversal and suggestion queries as
//! subcommands.
//!
//! # Modules
//!
//! - [`cli`]: clap argument and subcommand definitions
//! - [`config`]: `RelaConfig` loaded with confyg
//! - [`app`]: `RelaCli`, logging setup and command dispatch
//! - [`graph_handlers`]: `rela graph ...` implementations
//! - [`config_handlers`]: `rela config ...` implementations

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod graph_handlers;

pub use app::RelaCli;
pub use cli::CliArgs;
pub use config::RelaConfig;
