//! `mapmind-cli`: terminal client for the MapMind server and Kroki encoder.
//!
//! `generate` posts to `/api/generate` and records successes in a local
//! history file. `encode`/`decode` work offline against the payload codec.

mod storage;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand, ValueEnum};
use mapkit::{
    DEFAULT_KROKI_ROOT, DecodeError, Depth, DiagramRenderer, DiagramStyle, GenerationRequest, GenerationResult,
    HistoryEntry, HistoryStore, ImageError, KrokiRenderer, OutputFormat, ParseError, RenderLinks, StorageError,
    UploadedImage, decode_payload, encode_payload,
};
use serde_json::Value;
use storage::FileStorage;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status} ({code}): {message}")]
    Server { status: u16, code: String, message: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid image: {0}")]
    Image(#[from] ImageError),
    #[error("invalid generation result: {0}")]
    Parse(#[from] ParseError),
    #[error("invalid diagram payload: {0}")]
    Decode(#[from] DecodeError),
    #[error("history storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("nothing to generate from; pass TEXT or --image")]
    EmptyInput,
    #[error("{0} not found")]
    NotFound(String),
}

#[derive(Parser, Debug)]
#[command(name = "mapmind-cli", about = "MapMind concept-map generator CLI")]
struct Cli {
    #[arg(long, env = "MAPMIND_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "MAPMIND_HISTORY_FILE", default_value = ".mapmind_history.json")]
    history_file: PathBuf,

    #[arg(long, env = "MAPMIND_KROKI_URL", default_value = DEFAULT_KROKI_ROOT)]
    kroki_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    history_file: PathBuf,
    renderer: KrokiRenderer,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the server health endpoint.
    Ping,
    /// Generate a concept map from text and/or an image.
    Generate(GenerateArgs),
    /// Encode Mermaid source into render URLs.
    Encode(EncodeArgs),
    /// Recover Mermaid source from a payload or render URL.
    Decode { input: String },
    History(HistoryCommand),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    text: Option<String>,

    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long, default_value = "detailed")]
    depth: Depth,

    #[arg(long, default_value = "hierarchical")]
    style: DiagramStyle,

    #[arg(long, default_value_t = false)]
    no_history: bool,

    #[arg(long, default_value_t = false, help = "Print the raw result as JSON")]
    json: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    #[arg(long, help = "Mermaid source file; reads stdin when omitted")]
    file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::All)]
    format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Svg,
    Png,
    Jpeg,
    All,
}

impl FormatArg {
    fn formats(self) -> Vec<OutputFormat> {
        match self {
            Self::Svg => vec![OutputFormat::Svg],
            Self::Png => vec![OutputFormat::Png],
            Self::Jpeg => vec![OutputFormat::Jpeg],
            Self::All => OutputFormat::ALL.to_vec(),
        }
    }
}

#[derive(Args, Debug)]
struct HistoryCommand {
    #[command(subcommand)]
    command: HistorySubcommand,
}

#[derive(Subcommand, Debug)]
enum HistorySubcommand {
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Show {
        id: String,
    },
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let ctx = CliContext {
        base_url: cli.base_url.trim_end_matches('/').to_owned(),
        history_file: cli.history_file,
        renderer: KrokiRenderer::new(&cli.kroki_url),
    };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Generate(args) => run_generate(&ctx, args).await,
        Command::Encode(args) => run_encode(&ctx, args),
        Command::Decode { input } => run_decode(&ctx, &input),
        Command::History(history) => run_history(&ctx, history),
    }
}

// =============================================================================
// SERVER COMMANDS
// =============================================================================

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let response = client.get(format!("{}/healthz", ctx.base_url)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Server {
            status: status.as_u16(),
            code: "E_UNHEALTHY".to_owned(),
            message: "health check failed".to_owned(),
        });
    }
    println!("ok");
    Ok(())
}

async fn run_generate(ctx: &CliContext, args: GenerateArgs) -> Result<(), CliError> {
    let image = args.image.as_deref().map(read_image).transpose()?;
    let request = GenerationRequest { text: args.text.unwrap_or_default(), image, depth: args.depth, style: args.style };
    if !request.has_input() {
        return Err(CliError::EmptyInput);
    }

    tracing::info!(depth = %request.depth, style = %request.style, has_image = request.image.is_some(), "generating");
    let result = post_generate(ctx, &request).await?;

    if !args.no_history {
        let mut store = HistoryStore::open(FileStorage::new(&ctx.history_file));
        let entry = HistoryEntry::from_generation(&request, &result, now_ms());
        tracing::debug!(id = %entry.id, path = %ctx.history_file.display(), "recording history entry");
        if let Err(e) = store.record(entry) {
            tracing::warn!(error = %e, path = %ctx.history_file.display(), "history: persist failed");
        }
    }

    if args.json {
        return print_json(&serde_json::to_value(&result)?);
    }
    print_result(&result, RenderLinks::build(&ctx.renderer, &result.diagram_code).as_ref());
    Ok(())
}

async fn post_generate(ctx: &CliContext, request: &GenerationRequest) -> Result<GenerationResult, CliError> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/generate", ctx.base_url))
        .json(request)
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(server_error(status.as_u16(), &body));
    }
    Ok(GenerationResult::from_json(&body)?)
}

/// Lift an `{ code, message }` error body, falling back to the raw text.
fn server_error(status: u16, body: &str) -> CliError {
    let value = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
    let field = |name: &str| value.get(name).and_then(Value::as_str).map(ToOwned::to_owned);
    CliError::Server {
        status,
        code: field("code").unwrap_or_else(|| "E_UNKNOWN".to_owned()),
        message: field("message").unwrap_or_else(|| body.trim().to_owned()),
    }
}

fn read_image(path: &Path) -> Result<UploadedImage, CliError> {
    let bytes = fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(UploadedImage::from_bytes(&bytes, mime.essence_str())?)
}

// =============================================================================
// OFFLINE COMMANDS
// =============================================================================

fn run_encode(ctx: &CliContext, args: EncodeArgs) -> Result<(), CliError> {
    let source = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    for format in args.format.formats() {
        let Some(url) = ctx.renderer.render_url(&source, format) else {
            tracing::warn!("diagram source is empty; nothing to encode");
            return Err(CliError::EmptyInput);
        };
        if args.format == FormatArg::All {
            println!("{format}: {url}");
        } else {
            println!("{url}");
        }
    }
    Ok(())
}

fn run_decode(ctx: &CliContext, input: &str) -> Result<(), CliError> {
    let source = decode_payload(payload_of(&ctx.renderer, input))?;
    println!("{source}");
    Ok(())
}

/// Accept either a bare payload or a full render URL from `renderer`.
fn payload_of<'a>(renderer: &KrokiRenderer, input: &'a str) -> &'a str {
    let input = input.trim();
    renderer.payload_from_url(input).unwrap_or(input)
}

fn run_history(ctx: &CliContext, history: HistoryCommand) -> Result<(), CliError> {
    let mut store = HistoryStore::open(FileStorage::new(&ctx.history_file));
    match history.command {
        HistorySubcommand::List { json } => {
            if json {
                return print_json(&serde_json::to_value(store.entries())?);
            }
            if store.is_empty() {
                println!("no history");
            }
            for entry in store.entries() {
                println!("{}  {}  {}", entry.id, entry.created_label(), one_line(&entry.input_summary, 60));
            }
            Ok(())
        }
        HistorySubcommand::Show { id } => {
            let entry = store.get(&id).ok_or_else(|| CliError::NotFound(format!("history entry {id}")))?;
            let result = entry.to_result();
            print_result(&result, RenderLinks::build(&ctx.renderer, &result.diagram_code).as_ref());
            Ok(())
        }
        HistorySubcommand::Clear => {
            store.clear()?;
            println!("history cleared");
            Ok(())
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_result(result: &GenerationResult, links: Option<&RenderLinks>) {
    println!("{}", result.diagram_code.trim_end());
    if let Some(explanation) = result.explanation.as_deref().filter(|e| !e.trim().is_empty()) {
        println!("\n{explanation}");
    }
    if !result.questions.is_empty() {
        println!("\nQuestions:");
        for (i, question) in result.questions.iter().enumerate() {
            println!("  {}. {question}", i + 1);
        }
    }
    if let Some(links) = links {
        println!();
        for format in OutputFormat::ALL {
            println!("{format}: {}", links.get(format));
        }
    }
}

/// First line of `text`, truncated to `max` characters.
fn one_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= max {
        return line.to_owned();
    }
    let cut: String = line.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
