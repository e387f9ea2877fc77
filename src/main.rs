use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use claimcheck_rs::classifier::{Classifier, HttpClassifier};
use claimcheck_rs::llm::openai::LlmClient;
use claimcheck_rs::nli::{HttpNli, LlmNli, NliBackend, SimilarityNli};
use claimcheck_rs::serper::{GoogleCse, Searcher, Serper};
use claimcheck_rs::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name="claimcheck", version, about="Check a claim against trusted news sources")]
struct Cli {
  #[command(subcommand)]
  cmd: Cmd,
  /// TOML file with allow-list and thresholds
  #[arg(long, global=true)] config: Option<PathBuf>,
  #[arg(long, global=true, value_enum, default_value_t=SearchKind::Serper)] search: SearchKind,
  #[arg(long, global=true, env="SERPER_API_KEY", hide_env_values=true)] serper_key: Option<String>,
  #[arg(long, global=true, env="GOOGLE_API_KEY", hide_env_values=true)] google_api_key: Option<String>,
  #[arg(long, global=true, env="GOOGLE_CSE_ID")] google_cse_id: Option<String>,
  #[arg(long, global=true, default_value_t=5)] search_qps: u32,
  #[arg(long, global=true, value_enum, default_value_t=NliKind::Http)] nli: NliKind,
  #[arg(long, global=true, env="NLI_URL", default_value="https://api-inference.huggingface.co/models/facebook/bart-large-mnli")] nli_url: String,
  #[arg(long, global=true, env="NLI_TOKEN", hide_env_values=true)] nli_token: Option<String>,
  #[arg(long, global=true, default_value="gpt-4o-mini")] llm_model: String,
  #[arg(long, global=true, env="OPENAI_BASE_URL")] llm_base_url: Option<String>,
  #[arg(long, global=true, env="OPENAI_API_KEY", hide_env_values=true)] llm_api_key: Option<String>,
  /// Fake/real classifier endpoint; the model score is skipped when unset
  #[arg(long, global=true, env="CLASSIFIER_URL")] classifier_url: Option<String>,
  #[arg(long, global=true)] log_json: bool,
}

#[derive(Subcommand)]
enum Cmd {
  /// Check one claim and print the verdict
  Check { claim: String, #[arg(long)] json: bool },
  /// Serve POST /check over HTTP
  Serve { #[arg(long, default_value="127.0.0.1:8080")] addr: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchKind { Serper, Google }

#[derive(Clone, Copy, ValueEnum)]
enum NliKind { Http, Llm, Similarity, None }

fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
  if json { builder.json().init() } else { builder.init() }
}

fn build_checker(cli: &Cli) -> Result<Checker> {
  let cfg = match &cli.config {
    Some(path) => CheckConfig::load(path)?,
    None => CheckConfig::default(),
  };
  let timeout_ms = cfg.collaborator_timeout_ms;

  let searcher: Arc<dyn Searcher> = match cli.search {
    SearchKind::Serper => {
      let Some(key) = cli.serper_key.clone() else { bail!("--serper-key (SERPER_API_KEY) is required for serper search") };
      Arc::new(Serper::new(key, cli.search_qps, timeout_ms)?)
    }
    SearchKind::Google => {
      let (Some(key), Some(cx)) = (cli.google_api_key.clone(), cli.google_cse_id.clone()) else {
        bail!("--google-api-key and --google-cse-id (GOOGLE_API_KEY, GOOGLE_CSE_ID) are required for google search")
      };
      Arc::new(GoogleCse::new(key, cx, cli.search_qps, timeout_ms)?)
    }
  };

  let nli: Option<Arc<dyn NliBackend>> = match cli.nli {
    NliKind::Http => Some(Arc::new(HttpNli::new(cli.nli_url.clone(), cli.nli_token.clone(), timeout_ms)?)),
    NliKind::Llm => {
      let llm = LlmClient::new(cli.llm_model.clone(), cli.llm_base_url.clone(), cli.llm_api_key.clone());
      Some(Arc::new(LlmNli::new(Arc::new(llm))))
    }
    NliKind::Similarity => Some(Arc::new(SimilarityNli::new(cfg.similarity_cutoff))),
    NliKind::None => None,
  };

  let classifier: Option<Arc<dyn Classifier>> = match &cli.classifier_url {
    Some(url) => Some(Arc::new(HttpClassifier::new(url.clone(), timeout_ms)?)),
    None => None,
  };

  Ok(Checker::new(cfg, searcher, nli, classifier)?)
}

fn print_report(report: &CheckReport) {
  println!("{}: {}", report.verdict.kind.headline(), report.verdict.justification);
  match report.model_score {
    Some(p) => println!("Model confidence: {:.1}% real, {:.1}% fake", p * 100.0, (1.0 - p) * 100.0),
    None => println!("Model confidence: unavailable"),
  }
  let ev = &report.evidence;
  if !ev.agrees.is_empty() {
    println!("\nTrusted sources confirming ({}):", ev.agrees.len());
    for it in &ev.agrees { println!("  {} <{}>\n    {}", it.hit.title, it.hit.link, it.hit.snippet); }
  }
  if !ev.disagrees.is_empty() {
    println!("\nTrusted sources contradicting ({}):", ev.disagrees.len());
    for it in &ev.disagrees { println!("  {} <{}>\n    {}", it.hit.title, it.hit.link, it.hit.snippet); }
  }
  if !ev.others.is_empty() {
    println!("\nOther results ({}):", ev.others.len());
    for h in &ev.others { println!("  {} <{}>", h.title, h.link); }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.log_json);
  let checker = build_checker(&cli)?;

  match &cli.cmd {
    Cmd::Check { claim, json } => {
      let report = checker.check(claim).await?;
      if *json { println!("{}", serde_json::to_string_pretty(&report)?) } else { print_report(&report) }
    }
    Cmd::Serve { addr } => server::run_server(checker, addr).await?,
  }
  Ok(())
}
