use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use openrouter_tool::config::load_config_or_default;
use openrouter_tool::logging::{bootstrap_subscriber, init_tracing};
use openrouter_tool::tool::API_KEY_NAME;
use openrouter_tool::types::openrouter::{
    DataCollection, ProviderSort, Quantization, ResponseFormatKind,
};
use openrouter_tool::{run_with_config, CompletionParams, RunArgs};

/// Send a prompt to OpenRouter and print the answer.
#[derive(Parser, Debug)]
#[command(name = "openrouter-tool")]
#[command(version)]
struct Cli {
    /// Prompt to send to the model
    #[arg(short, long)]
    prompt: Option<String>,

    /// Model identifier (defaults to the configured default model)
    #[arg(short, long)]
    model: Option<String>,

    /// Path to a YAML or JSON config file
    #[arg(long, env = "CONFIG_PATH", default_value = "config/config.yaml")]
    config: PathBuf,

    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long)]
    max_retries: Option<u32>,

    /// Initial retry delay in seconds
    #[arg(long)]
    initial_delay: Option<f64>,

    #[arg(long)]
    retry_multiplier: Option<f64>,

    /// Maximum retry delay in seconds
    #[arg(long)]
    max_delay: Option<f64>,

    #[arg(long)]
    temperature: Option<f64>,

    #[arg(long)]
    frequency_penalty: Option<f64>,

    #[arg(long)]
    presence_penalty: Option<f64>,

    #[arg(long)]
    logprobs: Option<bool>,

    #[arg(long)]
    max_tokens: Option<u32>,

    #[arg(long, value_enum)]
    response_format: Option<ResponseFormatArg>,

    /// Preferred providers, in order
    #[arg(long, value_delimiter = ',')]
    provider_order: Option<Vec<String>>,

    #[arg(long)]
    allow_fallbacks: Option<bool>,

    #[arg(long)]
    require_parameters: Option<bool>,

    #[arg(long, value_enum)]
    data_collection: Option<DataCollectionArg>,

    /// Providers to skip
    #[arg(long, value_delimiter = ',')]
    ignore_providers: Option<Vec<String>>,

    #[arg(long, value_enum, value_delimiter = ',')]
    quantizations: Option<Vec<QuantizationArg>>,

    #[arg(long, value_enum)]
    sort: Option<SortArg>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ResponseFormatArg {
    Text,
    JsonObject,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DataCollectionArg {
    Allow,
    Deny,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum QuantizationArg {
    Int4,
    Int8,
    Fp6,
    Fp8,
    Fp16,
    Bf16,
    Fp32,
    Unknown,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Price,
    Throughput,
}

impl From<ResponseFormatArg> for ResponseFormatKind {
    fn from(arg: ResponseFormatArg) -> Self {
        match arg {
            ResponseFormatArg::Text => ResponseFormatKind::Text,
            ResponseFormatArg::JsonObject => ResponseFormatKind::JsonObject,
        }
    }
}

impl From<DataCollectionArg> for DataCollection {
    fn from(arg: DataCollectionArg) -> Self {
        match arg {
            DataCollectionArg::Allow => DataCollection::Allow,
            DataCollectionArg::Deny => DataCollection::Deny,
        }
    }
}

impl From<QuantizationArg> for Quantization {
    fn from(arg: QuantizationArg) -> Self {
        match arg {
            QuantizationArg::Int4 => Quantization::Int4,
            QuantizationArg::Int8 => Quantization::Int8,
            QuantizationArg::Fp6 => Quantization::Fp6,
            QuantizationArg::Fp8 => Quantization::Fp8,
            QuantizationArg::Fp16 => Quantization::Fp16,
            QuantizationArg::Bf16 => Quantization::Bf16,
            QuantizationArg::Fp32 => Quantization::Fp32,
            QuantizationArg::Unknown => Quantization::Unknown,
        }
    }
}

impl From<SortArg> for ProviderSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Price => ProviderSort::Price,
            SortArg::Throughput => ProviderSort::Throughput,
        }
    }
}

impl Cli {
    fn into_run_args(self) -> RunArgs {
        let mut api_keys = std::collections::HashMap::new();
        if let Some(key) = self.api_key {
            api_keys.insert(API_KEY_NAME.to_string(), key);
        }

        let defaults = CompletionParams::default();
        let params = CompletionParams {
            temperature: self.temperature.or(defaults.temperature),
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            logprobs: self.logprobs,
            max_tokens: self.max_tokens,
            response_format: self.response_format.map(Into::into),
            provider_order: self.provider_order,
            allow_fallbacks: self.allow_fallbacks,
            require_parameters: self.require_parameters,
            data_collection: self.data_collection.map(Into::into),
            ignore_providers: self.ignore_providers,
            quantizations: self
                .quantizations
                .map(|qs| qs.into_iter().map(Into::into).collect()),
            sort: self.sort.map(Into::into),
        };

        RunArgs {
            prompt: self.prompt,
            api_keys,
            model: self.model,
            max_retries: self.max_retries,
            initial_delay: self.initial_delay,
            retry_multiplier: self.retry_multiplier,
            max_delay: self.max_delay,
            params,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the key may come from the environment or flags
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Loading happens before the configured subscriber exists
    let config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        load_config_or_default(&cli.config)
    })
    .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    init_tracing(&config.logging)?;
    tracing::debug!(
        config_path = %cli.config.display(),
        default_model = %config.default_model,
        "Configuration loaded"
    );

    let output = run_with_config(&config, cli.into_run_args()).await;
    println!("{}", output.message);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_maps_flags_to_run_args() {
        let cli = Cli::try_parse_from([
            "openrouter-tool",
            "--prompt",
            "2+2?",
            "--model",
            "meta-llama/llama-3.3-70b-instruct",
            "--api-key",
            "sk-or-test",
            "--max-retries",
            "0",
            "--initial-delay",
            "0.5",
            "--response-format",
            "json-object",
            "--provider-order",
            "Groq,Lambda",
            "--data-collection",
            "deny",
            "--quantizations",
            "fp8,bf16",
            "--sort",
            "throughput",
        ])
        .unwrap();

        let args = cli.into_run_args();
        assert_eq!(args.prompt.as_deref(), Some("2+2?"));
        assert_eq!(args.model.as_deref(), Some("meta-llama/llama-3.3-70b-instruct"));
        assert_eq!(args.api_keys.get(API_KEY_NAME).map(String::as_str), Some("sk-or-test"));
        assert_eq!(args.max_retries, Some(0));
        assert_eq!(args.initial_delay, Some(0.5));
        assert_eq!(args.max_delay, None);

        let params = args.params;
        assert_eq!(params.temperature, CompletionParams::default().temperature);
        assert_eq!(params.response_format, Some(ResponseFormatKind::JsonObject));
        assert_eq!(
            params.provider_order,
            Some(vec!["Groq".to_string(), "Lambda".to_string()])
        );
        assert_eq!(params.data_collection, Some(DataCollection::Deny));
        assert_eq!(
            params.quantizations,
            Some(vec![Quantization::Fp8, Quantization::Bf16])
        );
        assert_eq!(params.sort, Some(ProviderSort::Throughput));
        assert_eq!(params.allow_fallbacks, None);
    }

    #[test]
    fn test_cli_temperature_override() {
        let cli = Cli::try_parse_from([
            "openrouter-tool",
            "--api-key",
            "k",
            "--temperature",
            "0.2",
        ])
        .unwrap();

        let args = cli.into_run_args();
        assert_eq!(args.prompt, None);
        assert_eq!(args.params.temperature, Some(0.2));
    }

    #[test]
    fn test_cli_rejects_unknown_enum_value() {
        let result = Cli::try_parse_from(["openrouter-tool", "--sort", "latency"]);
        assert!(result.is_err());
    }
}
