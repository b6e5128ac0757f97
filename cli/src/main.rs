use std::{
    collections::HashSet,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use console::style;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;
use worksafe_core::{
    assemble, change_summary, format_as_email, Category, Config, DetectOptions, Detection, Engine,
};

/// Worksafe CLI entry point.
#[derive(Debug, Parser)]
#[command(
    name = "worksafe",
    about = "Rewrite hostile, profane, and hedging text into workplace-safe prose."
)]
struct Args {
    /// Path to config file (YAML). Defaults to worksafe.yml if present.
    #[arg(long, default_value = "worksafe.yml")]
    config: PathBuf,

    /// Emit JSON output for automation.
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Print only the rewritten text.
    #[arg(long, action = ArgAction::SetTrue)]
    rewrite: bool,

    /// Lay the rewritten text out as an email (implies --rewrite).
    #[arg(long, action = ArgAction::SetTrue)]
    email: bool,

    /// Also rewrite sarcastic phrases.
    #[arg(long, action = ArgAction::SetTrue)]
    sarcasm: bool,

    /// Exit non-zero when any change would be made.
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,

    /// Suppress per-file output.
    #[arg(long, action = ArgAction::SetTrue)]
    quiet: bool,

    /// Files or directories to check. Reads stdin when empty or `-`.
    #[arg(value_name = "PATH", num_args = 0..)]
    paths: Vec<PathBuf>,

    /// Glob patterns to skip while walking directories.
    #[arg(long, value_name = "GLOB", num_args = 0..)]
    ignore: Vec<String>,

    /// Report only these categories (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "CAT[,CAT]")]
    only: Vec<String>,

    /// Drop these categories (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "CAT[,CAT]")]
    disable: Vec<String>,

    /// Set config overrides (repeatable as key=value). Example: --set clause.window=8
    #[arg(long = "set", value_name = "KEY=VALUE", num_args = 0..)]
    sets: Vec<String>,
}

/// 1-based line and column (in characters) of a detection start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    line: usize,
    column: usize,
}

#[derive(Debug, Serialize)]
struct FileResult {
    path: String,
    change_count: usize,
    summary: String,
    changes: Vec<Detection>,
    transformed: String,
}

#[derive(Debug, Serialize)]
struct OutputReport {
    files: Vec<FileResult>,
    total_changes: usize,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    run(args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.config)?;
    apply_overrides(&mut cfg, &args.sets)?;
    let engine = Engine::new(cfg).context("Invalid configuration")?;
    let options = DetectOptions {
        sarcasm_mode: args.sarcasm || engine.config().sarcasm_mode,
    };
    let filter = CategoryFilter::new(&args.only, &args.disable)?;

    let inputs = if args.paths.is_empty() || args.paths.iter().all(|p| p.as_os_str() == "-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        vec![("<stdin>".to_string(), text)]
    } else {
        let ignore = build_ignore_set(&args.ignore)?;
        let mut files = collect_files(&args.paths, ignore.as_ref())?;
        files.sort();
        let mut inputs = Vec::with_capacity(files.len());
        for path in files {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            inputs.push((path.to_string_lossy().to_string(), text));
        }
        inputs
    };
    debug!(inputs = inputs.len(), "collected inputs");

    let mut results = Vec::with_capacity(inputs.len());
    for (path, text) in inputs {
        let mut changes = engine.detect(&text, &options);
        filter.apply(&mut changes);
        let transformed = assemble(&text, &changes);

        if args.email || args.rewrite {
            if !args.json {
                let output = if args.email {
                    format_as_email(&transformed)
                } else {
                    transformed.clone()
                };
                print!("{output}");
                if !output.ends_with('\n') {
                    println!();
                }
            }
        } else if !args.quiet && !args.json {
            print_human_report(&path, &text, &changes);
        }

        results.push(FileResult {
            path,
            change_count: changes.len(),
            summary: change_summary(&changes),
            changes,
            transformed,
        });
    }

    let total_changes = results.iter().map(|r| r.change_count).sum::<usize>();
    if args.json {
        let output = OutputReport {
            files: results,
            total_changes,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !args.quiet && !args.rewrite && !args.email {
        println!("\n{} file(s), {} change(s)", results.len(), total_changes);
    }

    if args.check && total_changes > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn build_ignore_set(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob {pattern}"))?);
    }
    Ok(Some(builder.build()?))
}

fn collect_files(paths: &[PathBuf], ignore: Option<&GlobSet>) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut walker = WalkDir::new(path).into_iter();
            while let Some(entry_res) = walker.next() {
                let entry = entry_res?;
                let entry_path = entry.path();
                if ignore.map_or(false, |set| set.is_match(entry_path)) {
                    if entry.file_type().is_dir() {
                        walker.skip_current_dir();
                    }
                    continue;
                }
                if entry.file_type().is_file() && is_supported(entry_path) {
                    files.push(entry_path.to_path_buf());
                }
            }
        } else if path.is_file() {
            if ignore.map_or(false, |set| set.is_match(path)) {
                continue;
            }
            files.push(path.clone());
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "txt" | "md" | "markdown" | "eml" | "text"
        ),
        None => false,
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "config not found, using defaults");
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("Invalid config structure in {}", path.display()))
}

fn parse_category(name: &str) -> Option<Category> {
    let n = name.trim().to_lowercase();
    match n.as_str() {
        "clause-rewrite-attack" | "clause-attack" | "attack" => Some(Category::ClauseAttack),
        "clause-rewrite-frustration" | "clause-frustration" | "frustration" => {
            Some(Category::ClauseFrustration)
        }
        "aggressive" => Some(Category::Aggressive),
        "passive-aggressive" => Some(Category::PassiveAggressive),
        "sarcasm" => Some(Category::Sarcasm),
        "persuasion-hedging" | "hedging" => Some(Category::PersuasionHedging),
        "persuasion-apologies" | "apologies" => Some(Category::PersuasionApologies),
        "persuasion-qualifiers" | "qualifiers" => Some(Category::PersuasionQualifiers),
        "persuasion-commitments" | "commitments" => Some(Category::PersuasionCommitments),
        "persuasion-validation" | "validation" => Some(Category::PersuasionValidation),
        "persuasion-followups" | "followups" | "follow-ups" => {
            Some(Category::PersuasionFollowups)
        }
        "profanity" => Some(Category::Profanity),
        "insult" | "insults" => Some(Category::Insult),
        _ => None,
    }
}

/// Category names expand to sets; `persuasion` covers all six subcategories.
fn parse_category_set(names: &[String]) -> anyhow::Result<HashSet<Category>> {
    let mut set = HashSet::new();
    for name in names.iter().filter(|n| !n.trim().is_empty()) {
        if name.trim().eq_ignore_ascii_case("persuasion") {
            set.extend(Category::ALL.into_iter().filter(|c| c.is_persuasion()));
            continue;
        }
        match parse_category(name) {
            Some(category) => {
                set.insert(category);
            }
            None => bail!("Unknown category `{}`", name.trim()),
        }
    }
    Ok(set)
}

#[derive(Debug, Default)]
struct CategoryFilter {
    only: HashSet<Category>,
    disable: HashSet<Category>,
}

impl CategoryFilter {
    fn new(only: &[String], disable: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            only: parse_category_set(only)?,
            disable: parse_category_set(disable)?,
        })
    }

    fn allows(&self, category: Category) -> bool {
        if !self.only.is_empty() && !self.only.contains(&category) {
            return false;
        }
        !self.disable.contains(&category)
    }

    /// Dropping detections never creates overlaps, so the rest stay valid.
    fn apply(&self, changes: &mut Vec<Detection>) {
        changes.retain(|d| self.allows(d.category));
    }
}

fn apply_overrides(cfg: &mut Config, sets: &[String]) -> anyhow::Result<()> {
    for kv in sets {
        let mut parts = kv.splitn(2, '=');
        let key = parts.next().unwrap_or("").trim();
        let val = parts.next().unwrap_or("").trim();
        if key.is_empty() {
            continue;
        }
        match key {
            "sarcasm_mode" => cfg.sarcasm_mode = matches!(val, "true" | "1" | "yes"),
            "fuzzy.max_edit_distance" => {
                cfg.fuzzy.max_edit_distance = parse_value(key, val)?;
            }
            "fuzzy.min_word_length" => cfg.fuzzy.min_word_length = parse_value(key, val)?,
            "fuzzy.max_length_delta" => cfg.fuzzy.max_length_delta = parse_value(key, val)?,
            "fuzzy.extra_safe_words" => cfg.fuzzy.extra_safe_words.extend(
                val.split(',')
                    .map(str::trim)
                    .filter(|w| !w.is_empty())
                    .map(str::to_lowercase),
            ),
            "clause.window" => cfg.clause.window = parse_value(key, val)?,
            "clause.threshold" => cfg.clause.threshold = parse_value(key, val)?,
            "sequences.max_gap" => cfg.sequences.max_gap = parse_value(key, val)?,
            _ => warn!(key, "ignoring unknown override"),
        }
    }
    Ok(())
}

fn parse_value<T>(key: &str, val: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    val.parse::<T>()
        .with_context(|| format!("Invalid value `{val}` for {key}"))
}

fn location(text: &str, offset: usize) -> Location {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    Location {
        line,
        column: before[line_start..].chars().count() + 1,
    }
}

fn print_human_report(path: &str, text: &str, changes: &[Detection]) {
    println!("{} ({})", style(path).bold(), change_summary(changes));
    if changes.is_empty() {
        println!("  {}", style("clean").green());
        return;
    }
    for change in changes {
        let loc = location(text, change.start);
        println!(
            "  [{}] {}:{} {}",
            style(change.category).yellow(),
            loc.line,
            loc.column,
            style(&change.original).red()
        );
        if change.replacement.is_empty() {
            println!("      → (removed)");
        } else {
            println!("      → {}", style(&change.replacement).green());
        }
    }
}
