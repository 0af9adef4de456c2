//! # engine_app: asset tool
//!
//! Command-line front end for game object assets. Every subcommand loads
//! files through an [`AssetLoader`](engine_asset::AssetLoader) configured
//! from `ENGINE_ASSET_ROOT` and the global flags.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use engine_asset::{AssetLoader, LoaderConfig};

#[derive(Parser)]
#[command(name = "engine_app", about = "Inspect, validate and convert game object assets")]
struct Args {
    /// Directory that asset references resolve against
    #[arg(long, global = true)]
    asset_root: Option<PathBuf>,

    /// Keep components with unrecognised tags instead of rejecting the file
    #[arg(long, global = true)]
    allow_unknown: bool,

    /// Leave rotation quaternions exactly as stored
    #[arg(long, global = true)]
    no_normalize: bool,

    /// Deepest allowed child nesting
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load files and report every validation issue
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the object hierarchy
    Show { file: PathBuf },
    /// List referenced pipeline, texture and model files
    Refs {
        file: PathBuf,
        /// Report references whose file is missing under the asset root
        #[arg(long)]
        check: bool,
    },
    /// Re-encode a file, choosing the output format from its extension.
    /// Without an output the other format is written next to the input.
    Convert {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    /// Print freshly generated UIDs
    Uid {
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Give every object a fresh UID and write the result
    Reassign { input: PathBuf, output: PathBuf },
}

impl Args {
    fn loader_config(&self) -> LoaderConfig {
        let mut config = LoaderConfig::from_env()
            .with_unknown_components(self.allow_unknown)
            .with_normalize_rotations(!self.no_normalize);
        if let Some(root) = &self.asset_root {
            config = config.with_asset_root(root.clone());
        }
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let loader = AssetLoader::new(args.loader_config());

    match args.command {
        Command::Validate { files } => commands::validate(&loader, &files),
        Command::Show { file } => commands::show(&loader, &file),
        Command::Refs { file, check } => commands::refs(&loader, &file, check),
        Command::Convert { input, output } => {
            commands::convert(&loader, &input, output.as_deref()).map(|_| ())
        }
        Command::Uid { count } => commands::uid(count),
        Command::Reassign { input, output } => commands::reassign(&loader, &input, &output),
    }
}
