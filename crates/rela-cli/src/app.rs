//! The `rela` application: configuration, logging, and command dispatch.

use crate::cli::{CliArgs, Command, GraphCommand, GraphSubcommand};
use crate::config::RelaConfig;
use crate::config_handlers;
use crate::graph_handlers::{self, PathsOptions, SuggestArgs};
use rela_core::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// CLI application state.
pub struct RelaCli {
    name: String,
    config: Arc<RelaConfig>,
    version: String,
}

impl RelaCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = RelaConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create with an already-loaded config.
    pub fn new(name: impl Into<String>, config: RelaConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The loaded configuration.
    pub fn config(&self) -> &RelaConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` if set, otherwise `warn`/`info`/`debug` from the
    /// verbosity flags. Library `log` records are captured as well.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Graph(graph_cmd)) => {
                let output = self.handle_graph(graph_cmd).await?;
                println!("{output}");
                Ok(())
            }
            Some(Command::Config(config_cmd)) => config_handlers::handle_config_command(
                args.config.as_deref(),
                &self.config,
                config_cmd.command,
            ),
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Restore the snapshot and run one graph query, returning its output.
    pub async fn handle_graph(&self, command: GraphCommand) -> Result<String> {
        let path = self.config.snapshot_path(command.snapshot.as_deref())?;
        let store = graph_handlers::open_store(&path)?;
        let format = command.format;
        tracing::debug!("Running {:?} against {}", command.command, path.display());

        match command.command {
            GraphSubcommand::Stats => graph_handlers::handle_stats(&store, format).await,
            GraphSubcommand::Neighbors {
                id,
                relationship,
                direction,
            } => {
                graph_handlers::handle_neighbors(
                    &store,
                    &id,
                    relationship.as_deref(),
                    direction,
                    format,
                )
                .await
            }
            GraphSubcommand::Path { from, to } => {
                graph_handlers::handle_path(&store, &from, &to, format).await
            }
            GraphSubcommand::Paths {
                from,
                to,
                max_depth,
                timeout_ms,
            } => {
                let options = PathsOptions {
                    from,
                    to,
                    max_depth,
                    timeout_ms,
                };
                graph_handlers::handle_paths(&store, &self.config, options, format).await
            }
            GraphSubcommand::Component { id } => {
                graph_handlers::handle_component(&store, &id, format).await
            }
            GraphSubcommand::Communities => {
                graph_handlers::handle_communities(&store, format).await
            }
            GraphSubcommand::Centrality { id, limit } => {
                graph_handlers::handle_centrality(&store, id.as_deref(), limit, format).await
            }
            GraphSubcommand::Suggest {
                id,
                limit,
                min_similarity,
                exclude_connected,
            } => {
                let args = SuggestArgs {
                    id,
                    limit,
                    min_similarity,
                    exclude_connected,
                };
                graph_handlers::handle_suggest(&store, &self.config, args, format).await
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
