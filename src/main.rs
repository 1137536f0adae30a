use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use swapmark::ops::Session;
use swapmark::settings::SettingsStore;
use swapmark::splitter::count_words;
use swapmark::Rule;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "swapmark")]
#[command(about = "Rule-based find/replace for prose, with case preservation and word-balanced splitting")]
#[command(version)]
struct Args {
    /// Settings file holding all modes
    #[arg(long, global = true, env = "SWAPMARK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Emit debug-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the rules of a mode to a text and print the result
    Replace {
        /// Input file, or '-' / omitted for stdin
        input: Option<PathBuf>,
        /// Mode to use instead of the current one
        #[arg(long)]
        mode: Option<String>,
        /// Also write highlighted HTML markup to this file
        #[arg(long)]
        markup: Option<PathBuf>,
    },
    /// Split a document into word-balanced parts
    Split {
        input: Option<PathBuf>,
        /// Number of parts
        #[arg(short, long, default_value_t = 2)]
        parts: usize,
    },
    /// Count words in a text
    Count { input: Option<PathBuf> },
    /// Manage modes
    #[command(subcommand)]
    Mode(ModeCommand),
    /// Manage the rules of a mode
    #[command(subcommand)]
    Rule(RuleCommand),
    /// Write all rules as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Append rules from a CSV file
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum ModeCommand {
    /// List modes, marking the current one
    List,
    /// Make a mode current
    Use { name: String },
    /// Create an empty mode and make it current
    Add { name: String },
    /// Copy the current mode under a new name
    Copy { name: String },
    Rename { old: String, new: String },
    Delete { name: String },
    /// Flip match-case on the current mode
    ToggleCase,
    /// Flip whole-word on the current mode
    ToggleWord,
}

#[derive(Subcommand, Debug)]
enum RuleCommand {
    /// Print the rules of a mode
    List {
        #[arg(long)]
        mode: Option<String>,
    },
    /// Append a rule
    Add {
        find: String,
        replace: String,
        #[arg(long)]
        mode: Option<String>,
    },
    /// Remove one rule by its number in `rule list`
    Remove {
        index: usize,
        #[arg(long)]
        mode: Option<String>,
    },
    /// Remove every rule of a mode
    Clear {
        #[arg(long)]
        mode: Option<String>,
    },
}

/// Read the whole input from a file, or stdin for `None` / `-`
async fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: logs go to stderr as JSON so stdout carries only results
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    let store = SettingsStore::new(args.settings.clone().unwrap_or_else(SettingsStore::default_path));
    let mut session = Session::open(store).await;

    run(args.command, &mut session).await?;

    // Persistence is explicit: only mutating commands mark the session dirty
    if session.save_if_dirty().await? {
        info!(path = %session.store().path().display(), "Settings saved");
    }
    Ok(())
}

async fn run(command: Command, session: &mut Session) -> Result<()> {
    match command {
        Command::Replace { input, mode, markup } => {
            let text = read_input(input.as_deref()).await?;
            let output = session.replace(mode.as_deref(), &text)?;
            for skipped in &output.skipped_rules {
                warn!(error = %skipped, "Rule skipped");
            }
            if let Some(path) = markup {
                tokio::fs::write(&path, &output.markup)
                    .await
                    .with_context(|| format!("Failed to write markup to {}", path.display()))?;
            }
            print!("{}", output.plain_text);
            eprintln!("Replaced {} occurrence(s)", output.match_count);
        }
        Command::Split { input, parts } => {
            let text = read_input(input.as_deref()).await?;
            let result = swapmark::ops::split(&text, parts)?;
            for (index, part) in result.parts.iter().enumerate() {
                println!("--- part {} ({} words) ---", index + 1, part.word_count);
                println!("{}", part.text);
            }
        }
        Command::Count { input } => {
            let text = read_input(input.as_deref()).await?;
            println!("{}", count_words(&text));
        }
        Command::Mode(command) => run_mode(command, session)?,
        Command::Rule(command) => run_rule(command, session)?,
        Command::Export { out } => {
            let csv = session.export_csv();
            match out {
                Some(path) => tokio::fs::write(&path, csv)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{csv}"),
            }
        }
        Command::Import { file } => {
            let csv = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = session.import_csv(&csv)?;
            for error in &report.errors {
                warn!(error = %error, "Import row skipped");
            }
            if report.imported == 0 {
                anyhow::bail!("No valid rows found in {}", file.display());
            }
            println!(
                "Imported {} rule(s), skipped {} row(s), created {} mode(s)",
                report.imported,
                report.skipped,
                report.created_modes.len()
            );
        }
    }
    Ok(())
}

fn run_mode(command: ModeCommand, session: &mut Session) -> Result<()> {
    match command {
        ModeCommand::List => {
            let settings = session.settings();
            for set in settings.modes() {
                let marker = if set.name == settings.current_mode() { "*" } else { " " };
                println!(
                    "{marker} {} ({} rules, match case: {}, whole word: {})",
                    set.name,
                    set.pairs.len(),
                    set.match_case,
                    set.whole_word
                );
            }
        }
        ModeCommand::Use { name } => {
            session.settings_mut().switch_mode(&name)?;
            println!("Switched to {name}");
        }
        ModeCommand::Add { name } => {
            session.settings_mut().add_mode(&name)?;
        }
        ModeCommand::Copy { name } => {
            session.settings_mut().copy_mode(&name)?;
        }
        ModeCommand::Rename { old, new } => {
            session.settings_mut().rename_mode(&old, &new)?;
        }
        ModeCommand::Delete { name } => {
            session.settings_mut().delete_mode(&name)?;
        }
        ModeCommand::ToggleCase => {
            let enabled = session.settings_mut().toggle_match_case();
            println!("Match case: {}", if enabled { "on" } else { "off" });
        }
        ModeCommand::ToggleWord => {
            let enabled = session.settings_mut().toggle_whole_word();
            println!("Whole word: {}", if enabled { "on" } else { "off" });
        }
    }
    Ok(())
}

fn run_rule(command: RuleCommand, session: &mut Session) -> Result<()> {
    match command {
        RuleCommand::List { mode } => {
            let settings = session.settings();
            let set = settings.mode(mode.as_deref().unwrap_or(settings.current_mode()))?;
            for (index, rule) in set.pairs.iter().enumerate() {
                println!("{}\t{}\t{}", index + 1, rule.find, rule.replace);
            }
        }
        RuleCommand::Add { find, replace, mode } => {
            if find.is_empty() {
                anyhow::bail!("Find string must not be empty");
            }
            let settings = session.settings_mut();
            let mode = mode.unwrap_or_else(|| settings.current_mode().to_string());
            settings.mode_mut(&mode)?.pairs.push(Rule::new(find, replace));
        }
        RuleCommand::Remove { index, mode } => {
            let settings = session.settings_mut();
            let mode = mode.unwrap_or_else(|| settings.current_mode().to_string());
            let position = index.checked_sub(1).context("Rule numbers start at 1")?;
            let removed = settings
                .remove_pair(&mode, position)
                .with_context(|| format!("Cannot remove rule {index} from mode {mode}"))?;
            println!("Removed {}\t{}", removed.find, removed.replace);
        }
        RuleCommand::Clear { mode } => {
            let settings = session.settings_mut();
            let mode = mode.unwrap_or_else(|| settings.current_mode().to_string());
            settings.mode_mut(&mode)?.pairs.clear();
        }
    }
    Ok(())
}
