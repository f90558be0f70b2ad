mod commands;
mod output;
mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "blendlab",
    version,
    about = "Compose essential oil blends, see their chemical composition and get an AI analysis"
)]
struct Cli {
    /// Directory holding the working blend, saved blends, API key and settings
    #[arg(long, global = true, env = "BLENDLAB_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Custom oil catalog JSON file (default: built-in catalog)
    #[arg(long, global = true, env = "BLENDLAB_CATALOG", value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Output format: table (default) or json
    #[arg(short, long, global = true, default_value = "table")]
    output: String,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the oil catalog
    Oils {
        #[command(subcommand)]
        action: OilsAction,
    },
    /// Edit the blend under construction
    Blend {
        #[command(subcommand)]
        action: BlendAction,
    },
    /// Ask the AI service to analyze the current blend
    Analyze {
        /// Model to use instead of the one in settings.json
        #[arg(long)]
        model: Option<String>,
    },
    /// Save, load and delete named blends
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Manage the Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
enum OilsAction {
    /// List oils in the catalog
    List,
    /// Show an oil's composition
    Show {
        /// Oil id (e.g., "lavender")
        id: String,
    },
    /// Validate a custom catalog file
    Validate {
        /// Path to JSON catalog file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum BlendAction {
    /// Add one drop of an oil
    Add {
        /// Oil id (e.g., "lavender")
        oil: String,
    },
    /// Set the drop count of an oil in the blend (must be at least 1)
    Set {
        oil: String,
        drops: u32,
    },
    /// Remove an oil from the blend
    Remove {
        oil: String,
    },
    /// Show the blend, its composition and the current analysis
    Show,
}

#[derive(Subcommand)]
enum SavedAction {
    /// List saved blends, oldest first
    List,
    /// Save the current blend (it must have been analyzed)
    Save {
        /// Name for the saved blend
        name: String,
    },
    /// Replace the current blend with a saved one
    Load {
        id: String,
    },
    /// Show a saved blend without loading it
    Show {
        id: String,
    },
    /// Delete a saved blend
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store an API key (obfuscated, not encrypted)
    Set {
        key: String,
    },
    /// Show whether a key is configured (masked)
    Show,
    /// Check a key against the service (default: the configured key)
    Test {
        key: Option<String>,
        /// Model to use instead of the one in settings.json
        #[arg(long)]
        model: Option<String>,
    },
    /// Delete the stored API key
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "blendlab_core=info,blendlab=info",
        _ => "blendlab_core=debug,blendlab=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context::new(cli.data_dir, cli.catalog, cli.output);

    let result = match cli.command {
        Commands::Oils { action } => match action {
            OilsAction::List => commands::oils::list(&ctx),
            OilsAction::Show { id } => commands::oils::show(&ctx, &id),
            OilsAction::Validate { file } => commands::oils::validate(&file),
        },
        Commands::Blend { action } => match action {
            BlendAction::Add { oil } => commands::blend::add(&ctx, &oil),
            BlendAction::Set { oil, drops } => commands::blend::set(&ctx, &oil, drops),
            BlendAction::Remove { oil } => commands::blend::remove(&ctx, &oil),
            BlendAction::Show => commands::blend::show(&ctx),
        },
        Commands::Analyze { model } => commands::analyze::run(&ctx, model),
        Commands::Saved { action } => match action {
            SavedAction::List => commands::saved::list(&ctx),
            SavedAction::Save { name } => commands::saved::save(&ctx, &name),
            SavedAction::Load { id } => commands::saved::load(&ctx, &id),
            SavedAction::Show { id } => commands::saved::show(&ctx, &id),
            SavedAction::Delete { id, yes } => commands::saved::delete(&ctx, &id, yes),
        },
        Commands::Key { action } => match action {
            KeyAction::Set { key } => commands::key::set(&ctx, &key),
            KeyAction::Show => commands::key::show(&ctx),
            KeyAction::Test { key, model } => commands::key::test(&ctx, key, model),
            KeyAction::Delete { yes } => commands::key::delete(&ctx, yes),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
