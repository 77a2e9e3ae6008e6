// claim-judge command line front end

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use claim_judge::config::{CheckStatus, CredentialStore, Credentials, FileCredentialStore, StoredSettings};
use claim_judge::providers::get_supported_providers;
use claim_judge::telemetry::{self, OutputFormat, SubscriberConfig};
use claim_judge::{ClaimJudge, ClassifyParams};
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(name = "claim-judge")]
#[command(about = "Classify a claim as true, uncertain or false using an LLM or a local model")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/claim-judge/settings.json)
    #[arg(long, global = true, env = "CLAIM_JUDGE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Directory holding exported local models as <owner>/<name>/
    #[arg(long, global = true, env = "CLAIM_JUDGE_MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (text, json, json-compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one sentence and print the result as JSON
    Judge {
        /// anthropic, gemini or huggingface (aliases: claude, google, hf, local)
        #[arg(short, long, default_value = "anthropic")]
        provider: String,

        /// Model override for the chosen provider
        #[arg(short, long)]
        model: Option<String>,

        /// Who made the claim
        #[arg(long)]
        speaker: Option<String>,

        /// Where or when the claim was made
        #[arg(long)]
        context: Option<String>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,

        /// The sentence to classify, or `-` to read it from stdin
        sentence: String,
    },

    /// Inspect or change stored credentials
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List supported providers
    Providers,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the settings with secrets masked
    Show,
    /// Update one or more settings; an empty value clears a key
    Set {
        #[arg(long)]
        anthropic_key: Option<String>,
        #[arg(long)]
        gemini_key: Option<String>,
        #[arg(long)]
        huggingface_key: Option<String>,
        #[arg(long)]
        hf_model_id: Option<String>,
    },
    /// Reset every setting to its default
    Clear,
    /// Run format checks on the stored settings
    Check,
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        format!("****({} chars)", chars.len())
    }
}

fn masked(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(mask_key)
        .unwrap_or_else(|| "(not set)".to_string())
}

fn describe_settings(stored: &StoredSettings) -> Vec<(&'static str, String)> {
    vec![
        ("ANTHROPIC_API_KEY", masked(&stored.anthropic_api_key)),
        ("GEMINI_API_KEY", masked(&stored.gemini_api_key)),
        ("HUGGINGFACE_API_KEY", masked(&stored.huggingface_api_key)),
        ("HF_MODEL_ID", stored.hf_model_id.clone()),
    ]
}

fn apply_updates(
    mut credentials: Credentials,
    anthropic_key: Option<String>,
    gemini_key: Option<String>,
    huggingface_key: Option<String>,
    hf_model_id: Option<String>,
) -> Credentials {
    if let Some(key) = anthropic_key {
        credentials = credentials.with_anthropic_key(key);
    }
    if let Some(key) = gemini_key {
        credentials = credentials.with_gemini_key(key);
    }
    if let Some(key) = huggingface_key {
        credentials = credentials.with_huggingface_key(key);
    }
    if let Some(model_id) = hf_model_id {
        credentials = credentials.with_hf_model_id(model_id);
    }
    credentials
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let env_config = telemetry::config_from_env()?;
    let mut builder = SubscriberConfig::builder()
        .log_level(env_config.log_level)
        .output_format(env_config.output_format);
    if let Some(level) = &cli.log_level {
        builder = builder.log_level_str(level)?;
    }
    if let Some(format) = &cli.log_format {
        builder = builder.output_format(format.parse::<OutputFormat>()?);
    }
    telemetry::init_subscriber(builder.build())?;
    Ok(())
}

fn open_store(cli: &Cli) -> Result<FileCredentialStore> {
    match &cli.settings {
        Some(path) => Ok(FileCredentialStore::new(path)),
        None => FileCredentialStore::open_default().context("Failed to locate settings file"),
    }
}

async fn read_sentence(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("Failed to read sentence from stdin")?;
    Ok(buf)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let store = open_store(&cli)?;

    match cli.command {
        Commands::Judge {
            provider,
            model,
            speaker,
            context,
            pretty,
            sentence,
        } => {
            let mut judge = ClaimJudge::new();
            if let Some(dir) = cli.models_dir {
                judge = judge.with_models_dir(dir);
            }
            let params = ClassifyParams {
                provider,
                model,
                sentence: read_sentence(sentence).await?,
                speaker,
                context,
            };
            let outcome = judge.classify_with_store(params, &store).await;
            let json = if pretty {
                serde_json::to_string_pretty(&outcome)?
            } else {
                serde_json::to_string(&outcome)?
            };
            println!("{json}");
            Ok(if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let stored = store.load()?.to_stored();
                println!("Settings file: {}", store.path().display());
                for (key, value) in describe_settings(&stored) {
                    println!("  {key} = {value}");
                }
                Ok(ExitCode::SUCCESS)
            }
            ConfigAction::Set {
                anthropic_key,
                gemini_key,
                huggingface_key,
                hf_model_id,
            } => {
                let updated = apply_updates(
                    store.load()?,
                    anthropic_key,
                    gemini_key,
                    huggingface_key,
                    hf_model_id,
                );
                store
                    .save(&updated)
                    .with_context(|| format!("Failed to write {}", store.path().display()))?;
                println!("Saved {}", store.path().display());
                Ok(ExitCode::SUCCESS)
            }
            ConfigAction::Clear => {
                store.clear()?;
                println!("Cleared {}", store.path().display());
                Ok(ExitCode::SUCCESS)
            }
            ConfigAction::Check => {
                let checks = store.load()?.check_all();
                let mut failed = false;
                for (key, check) in &checks {
                    let marker = match check.status {
                        CheckStatus::Ok => "ok",
                        CheckStatus::Warn => "warn",
                        CheckStatus::Err => {
                            failed = true;
                            "err"
                        }
                    };
                    println!("  [{marker:>4}] {key}: {}", check.message);
                }
                Ok(if failed {
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                })
            }
        },
        Commands::Providers => {
            for info in get_supported_providers() {
                let aliases = info.aliases.join(", ");
                println!("{} ({})", info.provider, info.name);
                println!("    {}", info.description);
                println!("    aliases: {aliases}");
                println!("    default model: {}", info.default_model);
                match info.credential_key {
                    Some(key) => println!("    credential: {key}"),
                    None => println!("    credential: none"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_key_hides_short_keys_entirely() {
        assert_eq!(mask_key("abcd"), "****(4 chars)");
        assert_eq!(mask_key("123456789012"), "****(12 chars)");
    }

    #[test]
    fn mask_key_shows_prefix_suffix_for_long_keys() {
        assert_eq!(mask_key("sk-ant-abcdefghijkl"), "sk-a...ijkl");
    }

    #[test]
    fn show_never_prints_full_secret() {
        let stored = Credentials::default()
            .with_anthropic_key("sk-ant-0123456789abcdef")
            .to_stored();
        let lines = describe_settings(&stored);
        assert!(lines.iter().all(|(_, v)| !v.contains("0123456789abcdef")));
        assert_eq!(lines[1].1, "(not set)");
    }

    #[test]
    fn set_only_touches_given_fields() {
        let base = Credentials::default()
            .with_anthropic_key("sk-ant-keep")
            .with_gemini_key("AIza-old");
        let updated = apply_updates(base, None, Some(String::new()), None, Some("org/m".into()));
        let stored = updated.to_stored();
        assert_eq!(stored.anthropic_api_key.as_deref(), Some("sk-ant-keep"));
        assert_eq!(stored.gemini_api_key, None);
        assert_eq!(stored.hf_model_id, "org/m");
    }

    #[test]
    fn cli_parses_judge_with_alias_and_stdin_marker() {
        let cli = Cli::try_parse_from([
            "claim-judge",
            "judge",
            "--provider",
            "claude",
            "--speaker",
            "Jane",
            "-",
        ])
        .unwrap();
        match cli.command {
            Commands::Judge {
                provider, sentence, ..
            } => {
                assert_eq!(provider, "claude");
                assert_eq!(sentence, "-");
            }
            _ => panic!("expected judge"),
        }
    }
}
