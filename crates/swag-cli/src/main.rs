use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use swag_cli::commands::{self, DocumentSource};
use swag_core::compile::NamingStyle;
use swag_core::config::{self, CONFIG_FILE_NAME, SwagConfig};

#[derive(Parser)]
#[command(
    name = "swag",
    about = "Turn a Swagger document's definitions into typed models",
    long_about = "Given a Swagger URL that points to JSON, swag filters the document down to its \
                  definitions and passes them to an external generator (quicktype by default), \
                  which emits model code in one of its supported languages. Swift is the \
                  default language.",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a Swagger document and generate models from its definitions
    Generate {
        /// URL of the Swagger JSON document
        url: String,

        /// Output language: objc | java | ts | js | swift
        #[arg(short, long)]
        lang: Option<String>,

        /// Directory for the model file and generated source
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip checking the definitions against the bundled model
        #[arg(long)]
        skip_check: bool,
    },

    /// Compile a document's definitions and optionally decode a sample
    Check {
        /// URL of the Swagger JSON document
        #[arg(conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,

        /// Read the document from a local file instead
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Definition to decode the sample against
        #[arg(short, long, requires = "sample")]
        model: Option<String>,

        /// JSON file to decode against `--model`
        #[arg(short, long, requires = "model")]
        sample: Option<PathBuf>,

        /// Internal field naming: preserve | snake_case | camel_case
        #[arg(long)]
        naming: Option<NamingStyle>,
    },

    /// Initialize a new swag configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            url,
            lang,
            output_dir,
            skip_check,
        } => cmd_generate(url, lang, output_dir, skip_check).await,

        Commands::Check {
            url,
            file,
            model,
            sample,
            naming,
        } => cmd_check(url, file, model.zip(sample), naming).await,

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swag", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SwagConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

async fn cmd_generate(
    url: String,
    lang: Option<String>,
    output_dir: Option<PathBuf>,
    skip_check: bool,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    commands::generate(&cfg, &url, lang.as_deref(), output_dir.as_deref(), skip_check).await?;
    Ok(())
}

async fn cmd_check(
    url: Option<String>,
    file: Option<PathBuf>,
    sample: Option<(String, PathBuf)>,
    naming: Option<NamingStyle>,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let source = match (url, file) {
        (_, Some(path)) => DocumentSource::File(path),
        (Some(url), None) => DocumentSource::Url(url),
        (None, None) => anyhow::bail!("either a URL or --file is required"),
    };
    let sample = sample.as_ref().map(|(name, path)| (name.as_str(), path.as_path()));
    let output = commands::check(&cfg, &source, sample, naming).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
