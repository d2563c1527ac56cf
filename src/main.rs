use anyhow::Result;
use clap::{Parser, Subcommand};
use kolpilot::persona::PersonaCatalog;
use kolpilot::{app, Config};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// `kolpilot` - automated social-engagement engine.
#[derive(Parser, Debug)]
#[command(name = "kolpilot")]
#[command(version)]
#[command(about = "Scores inbound posts and engages in persona.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.kolpilot/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the engagement engine (default)
    Run {
        /// Keep everything in memory and never touch the platform
        #[arg(long)]
        dry_run: bool,

        /// Enable outbound posting regardless of the config setting
        #[arg(long)]
        post: bool,
    },

    /// List the persona catalog
    Personas,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Run {
        dry_run: false,
        post: false,
    }) {
        Commands::Run { dry_run, post } => {
            if post {
                config.engine.post_enabled = true;
            }
            app::run(config, dry_run).await
        }
        Commands::Personas => {
            let catalog = PersonaCatalog::with_defaults();
            let mut personas = catalog.all();
            personas.sort_by(|a, b| a.name.cmp(&b.name));
            for persona in personas {
                println!("{:<14} {}", persona.name, persona.describe());
            }
            Ok(())
        }
    }
}
