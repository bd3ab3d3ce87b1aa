use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use tabula_core::Money;
use tabula_engine::{BatchOptions, BatchResult, Categorizer, Engine, ExistingRecord, SourceDocument};

/// Convert OCR text dumps of bank statements into normalized transactions.
///
/// Each `.txt` file in the input directory is treated as the recovered text
/// of one statement. Parsed transactions are written as CSV (or JSON with
/// `--json`); per-document failures are reported without aborting the run.
#[derive(Parser, Debug)]
#[command(name = "tabula", version, about)]
struct Args {
    /// Directory containing one .txt file per statement
    #[arg(long)]
    input: PathBuf,

    /// CSV snapshot of already-recorded transactions (date,description,amount)
    #[arg(long)]
    existing: Option<PathBuf>,

    /// Where to write the transaction CSV (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// TOML rule file overriding the built-in category keywords
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Leave categories empty instead of auto-assigning them
    #[arg(long)]
    no_categorize: bool,

    /// Keep transactions that identity-match the existing snapshot
    #[arg(long)]
    no_duplicate_check: bool,

    /// Emit the full batch result as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let documents = load_documents(&args.input)?;
    if documents.is_empty() {
        bail!("no .txt documents found in {}", args.input.display());
    }
    tracing::info!(documents = documents.len(), input = %args.input.display(), "loaded input documents");

    let existing = match &args.existing {
        Some(path) => load_existing(path)?,
        None => Vec::new(),
    };

    let categorizer = match &args.rules {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading rules file {}", path.display()))?;
            Categorizer::from_toml(&content)
                .with_context(|| format!("parsing rules file {}", path.display()))?
        }
        None => Categorizer::default(),
    };

    let options = BatchOptions {
        auto_category: !args.no_categorize,
        duplicate_check: !args.no_duplicate_check,
    };

    let engine = Engine::new(categorizer);
    let result = engine.process(&documents, &existing, &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        write_csv(&result, args.output.as_deref())?;
    }

    eprintln!("{}", result.summary());
    for warning in &result.warnings {
        eprintln!("  warning: {}: {}", warning.source, warning.message);
    }
    for error in &result.errors {
        eprintln!("  error: {}: {}", error.source, error.message);
    }

    Ok(())
}

/// One document per `.txt` file, sorted by name so runs are reproducible.
fn load_documents(dir: &Path) -> Result<Vec<SourceDocument>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading input directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("txt")))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(SourceDocument::new(id, text));
    }
    Ok(documents)
}

/// Snapshot rows are `date,description,amount` with an ISO date. A bad row
/// is a fatal setup error, not a per-document one: deduplicating against a
/// half-read snapshot would silently re-import records.
fn load_existing(path: &Path) -> Result<Vec<ExistingRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("snapshot row {}", i + 2))?;
        let date_field = row.get(0).unwrap_or_default().trim();
        let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d")
            .with_context(|| format!("snapshot row {}: bad date '{date_field}'", i + 2))?;
        let description = row.get(1).unwrap_or_default().trim().to_string();
        let amount_field = row.get(2).unwrap_or_default();
        let amount = Money::parse(amount_field)
            .with_context(|| format!("snapshot row {}: bad amount '{amount_field}'", i + 2))?;
        records.push(ExistingRecord { date, description, amount });
    }
    Ok(records)
}

fn write_csv(result: &BatchResult, output: Option<&Path>) -> Result<()> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record([
        "id",
        "date",
        "description",
        "category",
        "amount",
        "type",
        "balance",
        "bank",
        "account",
        "statement_period",
        "processed_date",
        "source_file",
    ])?;
    for t in &result.transactions {
        csv.write_record([
            t.id.to_string(),
            t.date.to_string(),
            t.description.clone(),
            t.category.map(|c| c.to_string()).unwrap_or_default(),
            t.amount.to_decimal().to_string(),
            t.kind.to_string(),
            t.balance.map(|b| b.to_decimal().to_string()).unwrap_or_default(),
            t.bank.clone(),
            t.account.clone(),
            t.statement_period.clone(),
            t.processed_date.to_rfc3339(),
            t.source_file.clone(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}
