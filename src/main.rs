mod aggregate;
mod llm;
mod pipeline;
mod serp;
mod table;
mod template;

pub const USER_AGENT: &str = concat!("prospect/", env!("CARGO_PKG_VERSION"));

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;
use tracing::{info, warn};

use llm::LlmClient;
use pipeline::RunInput;
use serp::SerpClient;

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Global HTTP client timeout covering DNS + connect + response body.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_PROMPT: &str =
    "Extract the email address of {company} from the following web results.";

/// Enrich a CSV column of entities with web search and LLM field extraction.
///
/// Requires `SERP_API_KEY` and `GROQ_API_KEY` in the environment; the chat
/// model can be overridden with `GROQ_MODEL`.
#[derive(Parser)]
#[command(name = "prospect", version)]
struct Cli {
    /// Input CSV file containing the entity column
    #[arg(short, long)]
    input: PathBuf,

    /// Column whose values drive query expansion
    #[arg(short, long)]
    column: String,

    /// Search query template, e.g. "{company} contact email"
    #[arg(short, long)]
    query: String,

    /// Extraction prompt template
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Placeholder name substituted in the extraction prompt
    #[arg(long, default_value = "company")]
    prompt_placeholder: String,

    /// Output CSV file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds to pause between search calls
    #[arg(long, default_value_t = 2)]
    delay: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prospect=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let entities = table::column_values(File::open(&cli.input)?, &cli.column)?;
    info!(
        entities = entities.len(),
        column = %cli.column,
        "loaded entity column"
    );

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .build()?;
    let search = SerpClient::from_env(http.clone())?;
    let llm = LlmClient::from_env(http)?;

    let input = RunInput {
        entities,
        query_template: cli.query,
        column: cli.column,
        prompt_template: cli.prompt,
        prompt_placeholder: cli.prompt_placeholder,
        search_delay: Duration::from_secs(cli.delay),
    };

    let report = pipeline::run(&search, &llm, &input).await?;

    for failure in &report.failures {
        warn!(entity = %failure.entity, phase = %failure.phase, "{}", failure.reason);
    }
    if report.table.is_empty() {
        warn!("no information could be extracted for any entity");
    }

    match &cli.output {
        Some(path) => {
            table::write_csv(File::create(path)?, &report.table)?;
            info!(
                rows = report.table.len(),
                hits = report.search_records.len(),
                path = %path.display(),
                "results written"
            );
        }
        None => {
            table::write_csv(std::io::stdout().lock(), &report.table)?;
            info!(
                rows = report.table.len(),
                hits = report.search_records.len(),
                "results written to stdout"
            );
        }
    }

    Ok(())
}
