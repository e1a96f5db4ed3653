//! opsictl - command line client for OPSI servers
//!
//! Subcommands:
//! - `opsictl info` - Show server version and licensed modules
//! - `opsictl clients` - List managed clients
//! - `opsictl products` - List products, optionally by type
//! - `opsictl client-products <client>` - Show product state on a client
//! - `opsictl set-action <client> <action> <product>...` - Request an action
//! - `opsictl upload <file>` - Stage a package on the WebDAV share
//! - `opsictl install <file>` - Upload and install a package on the depot
//! - `opsictl uninstall <product>` - Remove a package from the depot
//! - `opsictl config` - Print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use opsiclient::{ProductAction, ProductType};
use opsiconf::{ConfigSources, OpsiConfig};

mod commands;

#[derive(Parser)]
#[command(name = "opsictl")]
#[command(about = "Command line client for OPSI servers")]
#[command(version)]
struct Cli {
    /// Config file, replaces ./opsiclient.toml
    #[arg(short, long, global = true, env = "OPSI_CONFIG")]
    config: Option<String>,

    /// JSON-RPC endpoint (e.g., https://opsi.example.org:4447/rpc)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[arg(short, long, global = true)]
    username: Option<String>,

    #[arg(short, long, global = true)]
    password: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show backend information
    Info,

    /// List managed clients
    Clients,

    /// List products
    Products {
        /// Only products of this type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,
    },

    /// Show the products assigned to a client
    ClientProducts {
        /// Client id (e.g., pc1.example.org)
        client_id: String,
    },

    /// Request an action for products on a client, assigning them if needed
    SetAction {
        /// Client id
        client_id: String,

        /// setup, uninstall, update, always, once, custom or none
        action: ProductAction,

        /// Product ids
        #[arg(required = true)]
        products: Vec<String>,
    },

    /// Upload a package file to the WebDAV share
    Upload {
        /// Local package file
        file: PathBuf,

        /// Directory below the share root
        #[arg(long, default_value = "")]
        path: String,
    },

    /// Upload a package and install it on the depot
    Install {
        /// Local package file
        file: PathBuf,

        /// Package is already on the share; only install it
        #[arg(long)]
        skip_upload: bool,

        /// Install deadline in seconds
        #[arg(long, default_value = "180")]
        timeout: u64,
    },

    /// Uninstall a product's package from the depot
    Uninstall {
        /// Product id
        product_id: String,

        /// Uninstall deadline in seconds
        #[arg(long, default_value = "180")]
        timeout: u64,
    },

    /// Print the effective configuration (password masked)
    Config {
        /// Also list config files and environment overrides
        #[arg(long)]
        sources: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Netboot,
    Localboot,
}

impl From<KindArg> for ProductType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Netboot => ProductType::NetBoot,
            KindArg::Localboot => ProductType::LocalBoot,
        }
    }
}

impl Cli {
    /// Load config files and env, then apply command line flags on top.
    fn load_config(&self) -> Result<(OpsiConfig, ConfigSources)> {
        let path = self.config.as_deref().map(opsiconf::expand_path);
        let (mut config, sources) = OpsiConfig::load_with_sources_from(path.as_deref())
            .context("Failed to load configuration")?;

        if let Some(endpoint) = &self.endpoint {
            config.server.endpoint = endpoint.clone();
        }
        if let Some(username) = &self.username {
            config.server.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.server.password = password.clone();
        }
        if self.insecure {
            config.server.accept_invalid_certs = true;
        }

        Ok((config, sources))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, sources) = cli.load_config()?;

    let filter = tracing_subscriber::EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Config { sources: show } = cli.command {
        return commands::show_config(&config, show.then_some(&sources));
    }

    config.validate().context("Incomplete configuration")?;
    let out = commands::Output { json: cli.json };

    match cli.command {
        Commands::Info => commands::info(&config, out).await?,
        Commands::Clients => commands::clients(&config, out).await?,
        Commands::Products { kind } => {
            commands::products(&config, kind.map(ProductType::from), out).await?
        }
        Commands::ClientProducts { client_id } => {
            commands::client_products(&config, &client_id, out).await?
        }
        Commands::SetAction {
            client_id,
            action,
            products,
        } => commands::set_action(&config, &client_id, action, &products).await?,
        Commands::Upload { file, path } => commands::upload(&config, &file, &path).await?,
        Commands::Install {
            file,
            skip_upload,
            timeout,
        } => commands::install(&config, &file, skip_upload, timeout).await?,
        Commands::Uninstall {
            product_id,
            timeout,
        } => commands::uninstall(&config, &product_id, timeout).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
