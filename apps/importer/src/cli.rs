//! Command-line interface.

use crate::commands::{self, ImportOptions};
use crate::config::Config;
use crate::db::SqliteRepository;
use crate::media::MediaFolder;
use anyhow::Context;
use arq_core::note_type::fields;
use arq_core::{MarkerConfig, ARQ_NOTE_TYPE};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "arq-importer")]
#[command(about = "Import pasted question/answer text as flashcards")]
pub struct Cli {
    /// Collection database (defaults to $ARQ_COLLECTION or the local data directory)
    #[arg(long, global = true)]
    pub collection: Option<PathBuf>,

    /// Media folder (defaults to $ARQ_MEDIA_DIR or collection.media next to the database)
    #[arg(long, global = true)]
    pub media_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install or upgrade the note type
    Init,
    /// Import a question set
    Import(ImportArgs),
    /// Show how a text would be split into questions
    Preview(PreviewArgs),
    /// List the notes imported under a title
    Show(ShowArgs),
}

/// How lines are told apart.
#[derive(Args, Debug, Clone)]
pub struct MarkerArgs {
    /// Text that marks question lines (or answer lines with --answer-marker)
    #[arg(long, default_value = "?")]
    pub qa_marker: String,

    /// Treat --qa-marker as marking answers instead of questions
    #[arg(long)]
    pub answer_marker: bool,

    /// Line prefix of chapter headings
    #[arg(long)]
    pub chapter_marker: Option<String>,

    /// Line prefix of extra notes following an answer
    #[arg(long)]
    pub extra_marker: Option<String>,
}

impl From<MarkerArgs> for MarkerConfig {
    fn from(args: MarkerArgs) -> Self {
        Self {
            qa_marker: args.qa_marker,
            question_marker: !args.answer_marker,
            chapter_marker: args.chapter_marker,
            extra_marker: args.extra_marker,
        }
    }
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Text file to import, or - for stdin
    pub input: PathBuf,

    /// Title of the question set
    #[arg(short, long)]
    pub title: String,

    /// Deck to add notes to
    #[arg(short, long, default_value = "Default")]
    pub deck: String,

    /// Space separated tags
    #[arg(long, default_value = "")]
    pub tags: String,

    /// Number of leading questions already imported under this title
    #[arg(long, default_value_t = 0)]
    pub previously_imported: usize,

    /// Do not write the question set script to the media folder
    #[arg(long)]
    pub no_media: bool,

    #[command(flatten)]
    pub markers: MarkerArgs,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Text file to parse, or - for stdin
    pub input: PathBuf,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub markers: MarkerArgs,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Title of the question set
    pub title: String,

    /// Print notes as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = Config::from_env().with_overrides(self.collection, self.media_dir);

        match self.command {
            Command::Init => run_init(&config),
            Command::Import(args) => run_import(&config, args),
            Command::Preview(args) => run_preview(args),
            Command::Show(args) => run_show(&config, args),
        }
    }
}

fn open_repository(config: &Config) -> anyhow::Result<SqliteRepository> {
    if let Some(parent) = config.collection_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tracing::debug!(path = %config.collection_path.display(), "opening collection");
    SqliteRepository::open(&config.collection_path)
        .with_context(|| format!("opening {}", config.collection_path.display()))
}

fn run_init(config: &Config) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    let status = commands::ensure_note_type(&repo, &ARQ_NOTE_TYPE)?;
    println!("{}", serde_json::to_string(&status)?);
    Ok(())
}

fn run_import(config: &Config, args: ImportArgs) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let repo = open_repository(config)?;
    commands::ensure_note_type(&repo, &ARQ_NOTE_TYPE)?;

    let mut media = if args.no_media {
        None
    } else {
        Some(MediaFolder::open(&config.media_dir)?)
    };

    let options = ImportOptions {
        title: args.title,
        text,
        deck: args.deck,
        tags: args.tags,
        markers: args.markers.into(),
        previously_imported: args.previously_imported,
    };
    let summary = commands::import_text(&repo, media.as_mut(), &options)?;

    println!("{} notes added.", summary.added);
    if let Some(entry) = &summary.media {
        println!("Wrote {} ({})", entry.name, entry.sha256);
    }
    Ok(())
}

fn run_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let records = commands::preview_text(&text, &args.markers.into())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for (idx, record) in records.iter().enumerate() {
        println!("#{}", idx + 1);
        if !record.chapter.is_empty() {
            println!("  chapter:  {}", record.chapter);
        }
        println!("  question: {}", record.question);
        println!("  answer:   {}", record.answer);
        if !record.extra.is_empty() {
            println!("  extra:    {}", record.extra);
        }
    }
    Ok(())
}

fn run_show(config: &Config, args: ShowArgs) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    let notes = commands::show_question_set(&repo, &args.title)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    for shown in &notes {
        let field = |name: &str| shown.note.fields.get(name).map(String::as_str).unwrap_or("");
        println!("#{} [{}]", field(fields::NUMBER), shown.deck);
        println!("  question: {}", field(fields::QUESTION));
        println!("  answer:   {}", field(fields::ANSWER));
    }
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
