//! CLI for generating one image from a prompt via Gemini.

use clap::{Parser, ValueEnum};
use imagegen::config::{resolve_api_key, API_KEY_ENV};
use imagegen::{
    generate_to_file, GeminiModel, GeminiProvider, GeminiProviderBuilder, GenerationRequest,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "generate-image")]
#[command(about = "Generate an image via Google Gemini")]
#[command(version)]
struct Cli {
    /// Prompt describing the image to generate
    prompt: String,

    /// Output file path
    #[arg(default_value = "./generated.png")]
    output: PathBuf,

    /// Gemini API key (overrides GEMINI_API_KEY env var)
    #[arg(long)]
    key: Option<String>,

    /// Model to use
    #[arg(short, long, value_enum, default_value = "pro")]
    model: ModelArg,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModelArg {
    /// gemini-3-pro-image-preview
    Pro,
    /// gemini-2.5-flash-image
    Flash,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Pro => GeminiModel::ProImagePreview,
            ModelArg::Flash => GeminiModel::FlashImage,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Quotes the prompt in single quotes, switching to double quotes when the
/// prompt itself contains only single quotes.
fn quote_prompt(prompt: &str) -> String {
    let quote = if prompt.contains('\'') && !prompt.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(prompt.len() + 2);
    out.push(quote);
    for c in prompt.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

async fn run(
    cli: Cli,
    env_key: Option<String>,
    builder: GeminiProviderBuilder,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    // An empty --key still falls back to the environment
    let api_key = match resolve_api_key(cli.key.as_deref(), env_key.as_deref()) {
        Ok(key) => key,
        Err(_) => {
            writeln!(err, "ERROR: {API_KEY_ENV} env var not set and --key not provided.")?;
            return Ok(ExitCode::from(1));
        }
    };

    if !cli.json {
        writeln!(out, "Generating: {}", quote_prompt(&cli.prompt))?;
        writeln!(out, "Output:     {}", cli.output.display())?;
    }

    let provider = builder
        .api_key(api_key)
        .model(cli.model.into())
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;
    let request = GenerationRequest::new(&cli.prompt);

    let saved = generate_to_file(&provider, &request, &cli.output).await?;

    if cli.json {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "output": saved.path.display().to_string(),
            "mime_type": saved.mime_type,
            "size_bytes": saved.size,
            "model": provider.model().as_str(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        writeln!(out, "{}", saved.summary())?;
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    run(
        cli,
        std::env::var(API_KEY_ENV).ok(),
        GeminiProvider::builder(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )
    .await
}
