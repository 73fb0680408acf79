use clap::{Parser, Subcommand};
use gif_gallery::{config, manifest, output, server, storage};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "gif-gallery")]
#[command(about = "Backend for the GIF gallery mini-app")]
#[command(long_about = "\
Backend for the GIF gallery mini-app

Routes:

  GET /.well-known/farcaster.json   Mini-app manifest
  GET /api/gallery/storage          Gallery items from the storage backend
  GET /api/readiness                SDK readiness ({isReady, error})

Configuration (later layers win):

  1. stock defaults                 see 'gif-gallery gen-config'
  2. --config <file>                sparse TOML, unknown keys rejected
  3. environment                    NEXT_PUBLIC_URL, FARCASTER_HEADER,
                                    FARCASTER_PAYLOAD, FARCASTER_SIGNATURE,
                                    HOST, PORT, GALLERY_STORAGE_FILE,
                                    GALLERY_STORAGE_URL, READINESS_DELAY_MS

Logging is controlled with RUST_LOG (default: gif_gallery=info).")]
#[command(version = env!("GIF_GALLERY_VERSION"))]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Print the manifest JSON for the effective configuration
    Manifest,
    /// List the configured storage once and report the result
    CheckStorage,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gif_gallery=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            let config = config::load_config(cli.config.as_deref())?;
            output::print_config_summary(&config);
            runtime()?.block_on(server::serve(config))?;
        }
        Command::Manifest => {
            let config = config::load_config(cli.config.as_deref())?;
            let manifest = manifest::build_manifest(&config.manifest);
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::CheckStorage => {
            let config = config::load_config(cli.config.as_deref())?;
            let store = storage::from_config(&config.storage);
            let result = runtime()?.block_on(store.list_items());
            output::print_storage_check(&store.describe(), &result);
            result?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
