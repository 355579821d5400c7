//! CopyPastePro: strip the assessment disclaimer from pasted text, then ask Gemini.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use copypastepro::config::{self, Config, DEFAULT_API_BASE, DEFAULT_MODEL};
use copypastepro::gemini::{self, AnswerGenerator, GeminiClient};
use copypastepro::{disclaimer, server};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "copypastepro")]
#[command(about = "Remove the Coursera assistant disclaimer from pasted text and answer what remains")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean text from a file or stdin and print it.
    Clean {
        /// Read from this file instead of stdin.
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Clean text, then print Gemini's answer to it.
    Ask {
        /// Read from this file instead of stdin.
        #[arg(long, short)]
        input: Option<PathBuf>,

        #[command(flatten)]
        gemini: GeminiArgs,
    },

    /// Start the web form and JSON API.
    Serve {
        /// Port to listen on.
        #[arg(long, short, default_value_t = 3000)]
        port: u16,

        #[command(flatten)]
        gemini: GeminiArgs,
    },
}

#[derive(Args)]
struct GeminiArgs {
    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API base URL.
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
}

impl GeminiArgs {
    fn into_config(self) -> Result<Config, config::ConfigError> {
        Config::new(self.api_key, &self.model, &self.api_base)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,copypastepro=debug"));
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<(), BoxError> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Clean { input } => run_clean(input)?,
        Command::Ask { input, gemini } => run_ask(input, gemini.into_config()?)?,
        Command::Serve { port, gemini } => run_serve(port, gemini.into_config()?)?,
    }
    Ok(())
}

fn read_input(path: Option<PathBuf>) -> Result<String, BoxError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run_clean(input: Option<PathBuf>) -> Result<(), BoxError> {
    let text = read_input(input)?;
    println!("{}", disclaimer::clean(&text)?);
    Ok(())
}

fn run_ask(input: Option<PathBuf>, config: Config) -> Result<(), BoxError> {
    let text = read_input(input)?;
    if text.trim().is_empty() {
        return Err(server::EMPTY_INPUT_MESSAGE.into());
    }
    let client = GeminiClient::new(&config)?;
    let cleaned = disclaimer::clean(&text)?;
    println!("Cleaned Text:\n{cleaned}\n");

    let rt = tokio::runtime::Runtime::new()?;
    let answer = rt
        .block_on(client.generate(&gemini::build_prompt(&cleaned)))
        .map_err(|e| format!("Error generating Gemini response: {e}"))?;
    println!("Gemini's Answer:\n{answer}");
    Ok(())
}

fn run_serve(port: u16, config: Config) -> Result<(), BoxError> {
    let generator: Option<Box<dyn AnswerGenerator>> = match GeminiClient::new(&config) {
        Ok(client) => Some(Box::new(client) as Box<dyn AnswerGenerator>),
        Err(e) => {
            tracing::warn!(error = %e, "serving without Gemini; /generate will return 503");
            None
        }
    };
    // Compile the disclaimer pattern before taking requests.
    disclaimer::disclaimer_stripper()?;
    let state: server::AppState = Arc::new(server::App { generator });

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let app = server::router(state);

        let addr = format!("127.0.0.1:{}", port);
        tracing::info!(model = %config.model, "listening on http://{}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;
        Ok::<(), BoxError>(())
    })?;
    Ok(())
}
