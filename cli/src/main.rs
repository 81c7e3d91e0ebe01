use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::{Args, Parser, Subcommand, ValueEnum};
use drawings::{BodyMap, Canvas, FloorPlan};
use genogram::{LayoutConfig, LayoutError};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot tell the media type of {0}; use .png, .jpg, .jpeg, .gif, .webp, or .pdf")]
    UnknownMediaType(PathBuf),
    #[error("nothing to generate from; pass text or --file")]
    EmptyInput,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Parser, Debug)]
#[command(name = "carechart-cli", about = "Genogram layout and care-chart document CLI")]
struct Cli {
    #[arg(long, env = "CARECHART_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// Lay out a genogram document locally and print the result.
    Layout(LayoutArgs),
    /// Manage stored documents on the server.
    Docs(DocsCommand),
    /// Ask the server to generate a genogram document.
    Generate(GenerateArgs),
    /// Render a floor plan or body map file to SVG locally.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Document file, or - for stdin.
    file: PathBuf,
    #[arg(long)]
    origin_x: Option<f64>,
    #[arg(long)]
    origin_y: Option<f64>,
    #[arg(long)]
    slot_width: Option<f64>,
    #[arg(long)]
    band_spacing: Option<f64>,
    #[arg(long)]
    band_stagger: Option<f64>,
}

impl LayoutArgs {
    fn config(&self) -> LayoutConfig {
        let default = LayoutConfig::default();
        LayoutConfig {
            origin_x: self.origin_x.unwrap_or(default.origin_x),
            origin_y: self.origin_y.unwrap_or(default.origin_y),
            slot_width: self.slot_width.unwrap_or(default.slot_width),
            band_spacing: self.band_spacing.unwrap_or(default.band_spacing),
            band_stagger: self.band_stagger.unwrap_or(default.band_stagger),
        }
    }
}

#[derive(Args, Debug)]
struct DocsCommand {
    #[command(subcommand)]
    command: DocsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DocsSubcommand {
    List {
        namespace: String,
    },
    Get {
        namespace: String,
        name: String,
    },
    Put {
        namespace: String,
        name: String,
        /// Document file, or - for stdin.
        file: PathBuf,
    },
    Delete {
        namespace: String,
        name: String,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Free-text family description.
    #[arg(default_value = "")]
    text: String,

    /// Image or PDF attachment. Repeatable.
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    /// Key sent with the request when the server has none.
    #[arg(long, env = "CARECHART_API_KEY")]
    api_key: Option<String>,

    /// Return the laid-out diagram as well.
    #[arg(long, default_value_t = false)]
    layout: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DrawingKind {
    FloorPlan,
    BodyMap,
}

#[derive(Args, Debug)]
struct RenderArgs {
    kind: DrawingKind,
    /// Drawing file, or - for stdin.
    file: PathBuf,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let base_url = cli.base_url.trim_end_matches('/').to_owned();

    match cli.command {
        Command::Ping => run_ping(&base_url).await,
        Command::Layout(args) => run_layout(&args).await,
        Command::Docs(docs) => run_docs(&base_url, docs).await,
        Command::Generate(args) => run_generate(&base_url, args).await,
        Command::Render(args) => run_render(&args).await,
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let response = reqwest::Client::new().get(format!("{base_url}/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_layout(args: &LayoutArgs) -> Result<(), CliError> {
    let doc = read_json(&args.file).await?;
    let result = genogram::layout_value(&doc, &args.config())?;
    for diagnostic in &result.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    print_json(&serde_json::to_value(&result)?)
}

async fn run_docs(base_url: &str, docs: DocsCommand) -> Result<(), CliError> {
    let json = match docs.command {
        DocsSubcommand::List { namespace } => {
            api_request(base_url, reqwest::Method::GET, &format!("/api/documents/{namespace}"), None).await?
        }
        DocsSubcommand::Get { namespace, name } => {
            api_request(base_url, reqwest::Method::GET, &document_path(&namespace, &name), None).await?
        }
        DocsSubcommand::Put { namespace, name, file } => {
            let body = read_json(&file).await?;
            api_request(base_url, reqwest::Method::PUT, &document_path(&namespace, &name), Some(body)).await?
        }
        DocsSubcommand::Delete { namespace, name } => {
            api_request(base_url, reqwest::Method::DELETE, &document_path(&namespace, &name), None).await?
        }
    };
    print_json(&json)
}

async fn run_generate(base_url: &str, args: GenerateArgs) -> Result<(), CliError> {
    if args.text.trim().is_empty() && args.files.is_empty() {
        return Err(CliError::EmptyInput);
    }

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let mime_type = media_type(path).ok_or_else(|| CliError::UnknownMediaType(path.clone()))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| CliError::Read { path: path.clone(), source })?;
        files.push(serde_json::json!({ "mimeType": mime_type, "data": STANDARD.encode(bytes) }));
    }

    let mut body = serde_json::json!({ "text": args.text, "files": files });
    if let Some(key) = args.api_key.filter(|k| !k.is_empty()) {
        body["apiKey"] = Value::String(key);
    }
    let path = if args.layout { "/api/generate?layout=true" } else { "/api/generate" };
    let json = api_request(base_url, reqwest::Method::POST, path, Some(body)).await?;
    print_json(&json)
}

async fn run_render(args: &RenderArgs) -> Result<(), CliError> {
    let value = read_json(&args.file).await?;
    let default = Canvas::default();
    let canvas = Canvas { width: args.width.unwrap_or(default.width), height: args.height.unwrap_or(default.height) };
    let svg = match args.kind {
        DrawingKind::FloorPlan => serde_json::from_value::<FloorPlan>(value)?.to_svg(canvas),
        DrawingKind::BodyMap => serde_json::from_value::<BodyMap>(value)?.to_svg(canvas),
    };
    print!("{svg}");
    Ok(())
}

async fn api_request(
    base_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::new();
    let request = client.request(method, format!("{base_url}{path}"));
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), str::to_owned);
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }
    Ok(value)
}

fn document_path(namespace: &str, name: &str) -> String {
    format!("/api/documents/{namespace}/{}", encode_path_segment(name))
}

/// Percent-encode everything outside the unreserved set.
fn encode_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

async fn read_json(path: &Path) -> Result<Value, CliError> {
    let read = if path.as_os_str() == "-" {
        match tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin())).await {
            Ok(read) => read,
            Err(e) => Err(std::io::Error::other(e)),
        }
    } else {
        tokio::fs::read_to_string(path).await
    };
    let raw = read.map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
