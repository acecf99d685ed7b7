use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use taggable_core::{
    normalize_tags, Document, DocumentId, DocumentStore, NewDocument, Scope, TagInput, TagMatch,
    Taggable, TaggedCollection,
};
use taggable_doc_store::StoreBackend;

mod settings;

pub use settings::{
    Settings, SettingsFlags, BACKEND_ENV, COLLECTION_ENV, DEFAULT_COLLECTION, STORE_ENV,
};

#[derive(Parser)]
#[command(name = "taggable")]
#[command(about = "Tag records in a JSON document store and query them by tag", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Store backend: file|memory (overrides TAGGABLE_BACKEND)
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store file (overrides TAGGABLE_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Collection to operate on (overrides TAGGABLE_COLLECTION)
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Settings file (JSON or TOML) with `backend`, `store` and `collection` keys
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a record
    Create(CreateArgs),

    /// Replace the tags of a record
    Tag(TagArgs),

    /// Print a record with its tag list
    Show(ShowArgs),

    /// Find records by tag
    Find(FindArgs),

    /// List every tag used in the collection
    Tags,

    /// Per-tag record counts, optionally scoped
    Counts(CountsArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Field assignment `name=value`; values are read as JSON when they parse
    #[arg(long = "field", value_parser = parse_assignment)]
    fields: Vec<(String, Value)>,

    /// Comma separated tags
    #[arg(long)]
    tags: Option<String>,
}

#[derive(Args)]
struct TagArgs {
    id: u64,

    /// Comma separated tags; omit to clear
    tags: Option<String>,
}

#[derive(Args)]
struct ShowArgs {
    id: u64,
}

#[derive(Args)]
struct FindArgs {
    /// Tags to match; each argument may itself be comma separated
    tags: Vec<String>,

    /// Records with at least one of the tags (default)
    #[arg(long, group = "mode")]
    any: bool,

    /// Records with every one of the tags
    #[arg(long, group = "mode")]
    all: bool,

    /// Records with none of the tags
    #[arg(long, group = "mode")]
    none: bool,
}

impl FindArgs {
    fn mode(&self) -> TagMatch {
        if self.all {
            TagMatch::AllOf
        } else if self.none {
            TagMatch::NoneOf
        } else {
            TagMatch::AnyOf
        }
    }
}

#[derive(Args)]
struct CountsArgs {
    /// Scope restriction `name=value`, repeatable
    #[arg(long = "scope", value_parser = parse_assignment)]
    scope: Vec<(String, Value)>,
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = Settings::resolve(SettingsFlags {
        backend: cli.backend,
        store: cli.store,
        collection: cli.collection,
        config: cli.config,
    })?;
    let location = match settings.store.backend {
        StoreBackend::File => settings.store.path.display().to_string(),
        StoreBackend::Memory => "memory".to_string(),
    };
    log::debug!("Using store {location} (collection {})", settings.collection);
    let store = settings
        .store
        .open()
        .await
        .with_context(|| format!("Cannot open store {location}"))?;
    let records = TaggedCollection::new(store, settings.collection);

    match cli.command {
        Commands::Create(args) => run_create(&records, args).await,
        Commands::Tag(args) => run_tag(&records, args).await,
        Commands::Show(args) => run_show(&records, args).await,
        Commands::Find(args) => run_find(&records, args).await,
        Commands::Tags => print_json(&records.tag_list().await?),
        Commands::Counts(args) => run_counts(&records, args).await,
    }
}

type Records = TaggedCollection<Arc<dyn DocumentStore>>;

async fn run_create(records: &Records, args: CreateArgs) -> Result<()> {
    let mut document = NewDocument::new().with_tag_list(args.tags);
    for (name, value) in args.fields {
        if name == taggable_core::ID_FIELD || name == taggable_core::TAGS_FIELD {
            return Err(anyhow!("Field '{name}' is reserved"));
        }
        document = document.with_field(name, value);
    }
    let created = records.create(document).await?;
    log::info!("Created record #{}", created.id);
    print_json(&created)
}

async fn run_tag(records: &Records, args: TagArgs) -> Result<()> {
    let mut document = records.get(DocumentId(args.id)).await?;
    document.set_tag_list(args.tags);
    records.save(&document).await?;
    log::info!("Record #{} now has {} tags", document.id, document.tags.len());
    print_json(&document)
}

async fn run_show(records: &Records, args: ShowArgs) -> Result<()> {
    let document = records.get(DocumentId(args.id)).await?;
    print_json(&json!({
        "document": document,
        "tag_list": document.tag_list(),
    }))
}

async fn run_find(records: &Records, args: FindArgs) -> Result<()> {
    let tags: Vec<String> = args.tags.iter().flat_map(|t| normalize_tags(t.as_str())).collect();
    let found: Vec<Document> = records.tagged(args.mode(), TagInput::List(tags)).await?;
    log::debug!("{} records matched", found.len());
    print_json(&found)
}

async fn run_counts(records: &Records, args: CountsArgs) -> Result<()> {
    let scope: Scope = args.scope.into_iter().collect();
    print_json(&records.all_tags(&scope).await?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    print_stdout(&serde_json::to_string_pretty(value)?)
}

fn print_stdout(text: &str) -> Result<()> {
    write_line(io::stdout().lock(), text)
}

/// A closed reader (e.g. `| head`) ends output quietly.
fn write_line(mut out: impl Write, text: &str) -> Result<()> {
    if let Err(err) = out
        .write_all(text.as_bytes())
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}
