/*!
 * nodectl CLI - Command Line Interface
 *
 * Every invocation loads configuration, opens one connection to the
 * coordination server, runs a single command and exits.
 */

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use nodectl::{
    commands::{self, NodeCommand},
    config::{CliConfig, LogLevel},
    error::{Result, EXIT_SUCCESS},
    logging,
    node::ColumnCatalog,
    output::{OutputFormat, Renderer},
    prompt::TerminalConfirm,
    service,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "nodectl")]
#[command(version, about = "Manage the nodes registered with a mesh coordination server", long_about = None)]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options accepted by every subcommand
#[derive(Args)]
struct GlobalArgs {
    /// Print structured output instead of a table
    #[arg(short = 'o', long, value_enum, global = true)]
    output: Option<OutputFormat>,

    /// Configuration file (default: <config dir>/nodectl/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// gRPC address of the coordination server
    #[arg(long, value_name = "URL", global = true)]
    address: Option<String>,

    /// API key used to authenticate against the server
    #[arg(long, value_name = "KEY", global = true)]
    api_key: Option<String>,

    /// Connect timeout and per-call deadline in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Enable debug logging (ignored when --log-level is given)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Log level; takes precedence over --verbose
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    /// Write logs to this file (JSON) instead of stderr
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the nodes of the coordination server
    #[command(subcommand, visible_aliases = ["node", "machine", "machines"])]
    Nodes(NodesCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum NodesCommands {
    /// Register a pending node into a namespace
    Register {
        /// Namespace that will own the node
        #[arg(short = 'n', long)]
        namespace: String,

        /// Registration key shown by the node
        #[arg(short = 'k', long)]
        key: String,
    },

    /// List nodes
    #[command(visible_aliases = ["ls", "show"])]
    List {
        /// Only show nodes of this namespace
        #[arg(short = 'n', long)]
        namespace: Option<String>,

        /// Columns to show, comma separated
        /// (id, name, nodekey, namespace, ip_addresses, ephemeral,
        /// last_seen, online, expired, tags, routes)
        #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
        columns: Vec<String>,
    },

    /// Expire a node, forcing it to authenticate again
    #[command(visible_aliases = ["logout", "exp", "e"])]
    Expire {
        /// Node identifier (ID)
        #[arg(short = 'i', long)]
        identifier: u64,
    },

    /// Delete a node
    #[command(visible_alias = "del")]
    Delete {
        /// Node identifier (ID)
        #[arg(short = 'i', long)]
        identifier: u64,

        /// Do not ask for confirmation
        #[arg(long)]
        force: bool,
    },

    /// Move a node to another namespace
    #[command(visible_alias = "mv")]
    Move {
        /// Node identifier (ID)
        #[arg(short = 'i', long)]
        identifier: u64,

        /// Destination namespace
        #[arg(short = 'n', long)]
        namespace: String,
    },
}

impl From<NodesCommands> for NodeCommand {
    fn from(command: NodesCommands) -> Self {
        match command {
            NodesCommands::Register { namespace, key } => NodeCommand::Register { namespace, key },
            NodesCommands::List { namespace, columns } => NodeCommand::List { namespace, columns },
            NodesCommands::Expire { identifier } => NodeCommand::Expire { id: identifier },
            NodesCommands::Delete { identifier, force } => NodeCommand::Delete {
                id: identifier,
                force,
            },
            NodesCommands::Move {
                identifier,
                namespace,
            } => NodeCommand::Move {
                id: identifier,
                namespace,
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let color = console::colors_enabled();
    let mut renderer = Renderer::new(cli.globals.output, color);

    let code = match run(cli, &mut renderer, color) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            debug!("Command failed ({}): {}", e.category(), e);
            let mut stderr = io::stderr();
            if renderer.render_error(&mut stderr, &e).is_err() {
                eprintln!("Error: {}", e);
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, renderer: &mut Renderer, color: bool) -> Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "nodectl", &mut io::stdout());
            Ok(())
        }
        Commands::Nodes(command) => {
            let config = load_config(&cli.globals)?;
            *renderer = Renderer::new(cli.globals.output.or(config.output), color);
            logging::init_logging(&config, cli.globals.verbose, cli.globals.log_level)?;
            run_nodes(command.into(), &config, renderer)
        }
    }
}

/// Defaults, then config file, then environment, then flags
fn load_config(globals: &GlobalArgs) -> Result<CliConfig> {
    let mut config = CliConfig::load(globals.config.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok())?;

    if let Some(ref address) = globals.address {
        config.address = address.clone();
    }
    if let Some(ref key) = globals.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(timeout) = globals.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(level) = globals.log_level {
        config.log_level = level;
    }
    if let Some(ref log) = globals.log {
        config.log_file = Some(log.clone());
    }

    config.validate()?;
    Ok(config)
}

fn run_nodes(command: NodeCommand, config: &CliConfig, renderer: &Renderer) -> Result<()> {
    let catalog = ColumnCatalog::standard();

    // Bad parameters must fail before a connection is even attempted
    command.validate(&catalog)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        let service = service::connect(config, command.error_context()).await?;
        commands::execute(&service, &mut TerminalConfirm, &catalog, command).await
    })?;

    let mut stdout = io::stdout().lock();
    renderer.render(&mut stdout, &outcome, &catalog, Utc::now())?;
    stdout.flush()?;
    Ok(())
}
