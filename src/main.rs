//! relaise - CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use relaise::clipboard::copy_to_clipboard;
use relaise::config::{Config, ConfigOverrides, ReleaseType};
use relaise::error::{ConfigError, GitError};
use relaise::git::{History, build_release_payload, find_latest_semantic_tag, open_repository};
use relaise::llm::{HttpExecutor, Provider, build_request, generate_notes};
use relaise::prompt::NotesPrompt;

/// Generate AI-powered release notes from your git commit history.
///
/// Collects every commit since the latest annotated semantic version tag
/// (e.g. v1.2.3) and asks the configured provider to turn them into release
/// notes. Preferences are read from ~/.relaise/config.yaml and can be
/// overridden per run.
#[derive(Parser, Debug)]
#[command(name = "relaise")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    generate: GenerateArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set up or update the saved configuration
    Config(ConfigArgs),

    /// Show the latest annotated semantic version tag
    Tag {
        /// Path to the git repository
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },

    /// List every commit reachable from HEAD, oldest first
    Log {
        /// Path to the git repository
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the git repository
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Tone for the release notes
    #[arg(long)]
    mood: Option<String>,

    /// Bullet style for lists
    #[arg(long = "style", alias = "bullet-style")]
    bullet_style: Option<String>,

    /// Release type used to propose the next tag
    #[arg(long, value_enum)]
    release_type: Option<ReleaseType>,

    /// Language for the release notes
    #[arg(long)]
    language: Option<String>,

    /// Group changes into sections (pass `=false` to turn off a saved setting)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    include_sections: Option<bool>,

    /// Use emojis in the release notes (pass `=false` to turn off a saved setting)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    emojis: Option<bool>,

    /// Copy the release notes to the clipboard (pass `=false` to turn off a saved setting)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    copy: Option<bool>,

    /// Print the prompt instead of calling the provider
    #[arg(long)]
    dry_run: bool,
}

impl GenerateArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mood: self.mood.clone(),
            release_type: self.release_type,
            bullet_style: self.bullet_style.clone(),
            include_sections: self.include_sections,
            language: self.language.clone(),
            emojis: self.emojis,
            copy: self.copy,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// API key for the provider
    #[arg(long)]
    api_key: Option<String>,

    /// AI service provider
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Custom API endpoint (e.g. a local Ollama server)
    #[arg(long)]
    base_url: Option<String>,

    /// Tone for the release notes
    #[arg(long)]
    mood: Option<String>,

    /// Type of release: major/minor/patch
    #[arg(long, value_enum)]
    release_type: Option<ReleaseType>,

    /// Bullet style for lists
    #[arg(long)]
    bullet_style: Option<String>,

    /// Group changes into sections (true/false)
    #[arg(long)]
    include_sections: Option<bool>,

    /// Language for the release notes
    #[arg(long)]
    language: Option<String>,

    /// Use emojis in the release notes (true/false)
    #[arg(long, alias = "use-emojis")]
    emojis: Option<bool>,

    /// Copy the release notes to the clipboard (true/false)
    #[arg(long)]
    copy: Option<bool>,
}

impl From<ConfigArgs> for ConfigOverrides {
    fn from(args: ConfigArgs) -> Self {
        ConfigOverrides {
            api_key: args.api_key,
            provider: args.provider,
            model: args.model,
            base_url: args.base_url,
            mood: args.mood,
            release_type: args.release_type,
            bullet_style: args.bullet_style,
            include_sections: args.include_sections,
            language: args.language,
            emojis: args.emojis,
            copy: args.copy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::Config(args)) => run_config(args),
        Some(Command::Tag { repo }) => run_tag(&repo),
        Some(Command::Log { repo }) => run_log(&repo),
        None => run_generate(cli.generate).await,
    }
}

/// Log to stderr so release notes on stdout stay pipeable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    // Step 1: Load configuration and apply flags
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(ConfigError::NotFound(path)) if args.dry_run => {
            debug!(path = %path.display(), "No config file, using defaults for dry run");
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    args.overrides().apply(&mut config);

    // Step 2: Resolve the release range
    let repo = open_repository(&args.repo)?;
    let payload = build_release_payload(&repo).context("Failed to collect commits")?;

    if payload.is_empty() {
        println!("No changes since {}. Nothing to release.", payload.tag_name);
        return Ok(());
    }

    eprintln!(
        "Found {} commits since {}",
        payload.messages.len(),
        payload.tag_name
    );

    // Step 3: Build the prompt
    let prompt = NotesPrompt::new(payload, &config);

    if args.dry_run {
        print_dry_run(&prompt, &config);
        return Ok(());
    }

    // Step 4: Call the provider
    config.require_api_key()?;
    let executor = HttpExecutor::from_config(&config)?;
    let notes = generate_notes(&prompt, &config, &executor)
        .await
        .context("Failed to generate release notes")?;

    println!("{}", notes.trim_end());

    if config.copy {
        match copy_to_clipboard(&notes) {
            Ok(()) => eprintln!("✓ Copied release notes to clipboard"),
            Err(e) => warn!("Could not copy release notes: {}", e),
        }
    }

    Ok(())
}

fn print_dry_run(prompt: &NotesPrompt, config: &Config) {
    let request = build_request(prompt, config);

    println!("--- System ---\n{}\n", request.system);
    println!("--- Commits ---\n{}", request.prompt);
    println!("--- Directives ---");
    for directive in &request.directives {
        println!("- {}", directive);
    }
}

fn run_config(args: ConfigArgs) -> Result<()> {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => Config::default(),
        Err(e) => return Err(e).context("Existing configuration is unreadable"),
    };

    ConfigOverrides::from(args).apply(&mut config);

    let path = config.save().context("Failed to save config")?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn run_tag(repo_path: &Path) -> Result<()> {
    let repo = open_repository(repo_path)?;

    match find_latest_semantic_tag(&repo)?.require() {
        Ok(tag) => {
            println!("{} (version {})", tag.name, tag.version);
            println!("  target: {}", tag.target_oid);
            if let Some(tagger) = &tag.tagger {
                println!("  tagger: {}", tagger);
            }
            let message = tag.message.as_deref().map(str::trim).unwrap_or_default();
            if !message.is_empty() {
                println!("  message: {}", message);
            }
        }
        Err(e @ GitError::NoSemanticTags) => {
            println!("{}. The next release will be the initial release.", e);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn run_log(repo_path: &Path) -> Result<()> {
    let repo = open_repository(repo_path)?;

    let mut records = History::from_head(&repo)?
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read commit history")?;
    records.reverse();

    for record in &records {
        println!(
            "{} {} {}",
            record.short_hash(),
            record.timestamp.format("%Y-%m-%d"),
            record.subject()
        );
    }

    Ok(())
}
