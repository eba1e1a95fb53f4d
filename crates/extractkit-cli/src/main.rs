//! Extractkit CLI - one-shot extractions from the command line

use clap::{Parser, Subcommand, ValueEnum};
use extractkit::{
    ExtractRequest, ExtractService, ExtractorConfig, GeminiClient, SidecarCrawler,
};
use tracing_subscriber::EnvFilter;

/// Output format for the extract subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
}

/// Extractkit - structured web data extraction tool
#[derive(Parser, Debug)]
#[command(name = "extractkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract structured data from a URL and print the normalized result
    Extract {
        /// URL to extract from
        url: String,

        /// Natural-language prompt (llm strategy)
        #[arg(long, conflicts_with = "schema_file")]
        prompt: Option<String>,

        /// Path to a CSS-selector schema JSON file (css_schema strategy)
        #[arg(long)]
        schema_file: Option<String>,

        /// Output format
        #[arg(long, short, default_value = "pretty")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            url,
            prompt,
            schema_file,
            output,
        } => {
            run_extract(&url, prompt, schema_file, output).await;
        }
    }
}

fn build_request(
    url: &str,
    prompt: Option<String>,
    schema_file: Option<String>,
) -> ExtractRequest {
    match (prompt, schema_file) {
        (Some(prompt), None) => ExtractRequest::llm(url, prompt),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("Error reading schema file {path}: {e}");
                std::process::exit(1);
            });
            let schema = serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("Error parsing schema file {path}: {e}");
                std::process::exit(1);
            });
            ExtractRequest::css_schema(url, schema)
        }
        _ => {
            eprintln!("Exactly one of --prompt or --schema-file is required");
            std::process::exit(2);
        }
    }
}

async fn run_extract(
    url: &str,
    prompt: Option<String>,
    schema_file: Option<String>,
    output: OutputFormat,
) {
    let request = build_request(url, prompt, schema_file);

    let config = ExtractorConfig::from_env();
    let api_key = config.require_api_key().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let service = build_service(&config, api_key);

    match service.extract(&request).await {
        Ok(result) => {
            let json = match output {
                OutputFormat::Pretty => serde_json::to_string_pretty(&result),
                OutputFormat::Json => serde_json::to_string(&result),
            }
            .unwrap_or_else(|e| {
                eprintln!("Error serializing result: {e}");
                std::process::exit(1);
            });
            println!("{json}");
            if !result.success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn build_service(
    config: &ExtractorConfig,
    api_key: &str,
) -> ExtractService<SidecarCrawler, GeminiClient> {
    let crawler = SidecarCrawler::new(&config.crawler_url).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    let completion = GeminiClient::new(api_key, &config.model).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    ExtractService::new(crawler, completion).with_max_html_bytes(config.max_html_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use extractkit::ExtractionStrategy;

    #[test]
    fn test_build_request_prompt() {
        let req = build_request(
            "https://example.com",
            Some("list all product prices".to_string()),
            None,
        );
        assert_eq!(req.strategy, ExtractionStrategy::Llm);
        assert_eq!(req.prompt.as_deref(), Some("list all product prices"));
    }
}
