use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ai_client::{Claude, Gemini, OpenAi, TextModel};
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use threadscope_analyst::render::{render_json, render_text};
use threadscope_analyst::{AnalysisMode, AnalysisPipeline, ExtractionSchema, Extractor};
use threadscope_archive::{
    build_fetcher, build_searcher, CorpusAssembler, NoopSearcher, SourceLocator, WebSearcher,
};
use threadscope_common::{
    load_policy, AnalysisPolicy, Config, InputTarget, ModelPolicy, ModelProvider,
    ThreadscopeError,
};

#[derive(Parser)]
#[command(name = "threadscope")]
#[command(about = "Extract structured pricing and opinion data from forum threads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for threads on a topic (or take thread URLs) and analyze them
    Analyze {
        /// Topic text, or one or more thread URLs separated by commas or spaces
        input: String,

        /// What to extract
        #[arg(long, value_enum, default_value_t = AnalysisMode::Pricing)]
        mode: AnalysisMode,

        /// Maximum number of threads to analyze
        #[arg(long)]
        max_docs: Option<usize>,

        /// Maximum comments rendered per thread
        #[arg(long)]
        max_comments: Option<usize>,

        /// TOML policy file (search, fetch, corpus and model tuning)
        #[arg(long, value_name = "FILE")]
        policy: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print the assembled corpus before the results
        #[arg(long)]
        show_corpus: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "threadscope=info"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if is_retryable(&e) {
                eprintln!("The model call can be retried as-is.");
            }
            ExitCode::from(1)
        }
    }
}

fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ThreadscopeError>()
        .is_some_and(ThreadscopeError::is_retryable)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            input,
            mode,
            max_docs,
            max_comments,
            policy,
            format,
            show_corpus,
        } => {
            let mut policy = match policy {
                Some(path) => load_policy(&path)?,
                None => AnalysisPolicy::default(),
            };
            if let Some(n) = max_docs {
                policy.search.max_documents = n;
            }
            if let Some(n) = max_comments {
                policy.fetch.max_comments = n;
            }

            let config = Config::from_env();
            let target = InputTarget::parse(&input, &policy.search.site);
            let pipeline = build_pipeline(&policy, &config, &target, mode)?;

            let report = pipeline.run_target(&target).await?;
            info!(run_id = %report.run_id, "Rendering report");

            if show_corpus {
                println!("=== Corpus ({} bytes) ===\n{}", report.corpus.text.len(), report.corpus.text);
            }
            match format {
                OutputFormat::Text => {
                    print!("{}", render_text(&report));
                    eprint!("{}", report.stats);
                }
                OutputFormat::Json => println!("{}", render_json(&report)?),
            }
            Ok(())
        }
    }
}

fn build_pipeline(
    policy: &AnalysisPolicy,
    config: &Config,
    target: &InputTarget,
    mode: AnalysisMode,
) -> Result<AnalysisPipeline> {
    // Explicit URLs never search, so a missing search key only matters for topics.
    let searcher: Arc<dyn WebSearcher> =
        match build_searcher(&policy.search, config, policy.fetch.max_comments) {
            Ok(searcher) => searcher,
            Err(e) if matches!(target, InputTarget::Urls(_)) => {
                warn!(error = %e, "No search backend; explicit URLs only");
                Arc::new(NoopSearcher)
            }
            Err(e) => return Err(e.into()),
        };

    Ok(AnalysisPipeline::builder()
        .locator(SourceLocator::new(searcher, &policy.search))
        .fetcher(build_fetcher(&policy.fetch, config)?)
        .extractor(Extractor::new(build_model(&policy.model, config)?))
        .assembler(CorpusAssembler::from_policy(&policy.corpus))
        .schema(ExtractionSchema::for_mode(mode))
        .build())
}

fn build_model(policy: &ModelPolicy, config: &Config) -> Result<Arc<dyn TextModel>> {
    let missing = |name: &str| anyhow!("{name} is required for model provider {:?}", policy.provider);
    let model: Arc<dyn TextModel> = match policy.provider {
        ModelProvider::Gemini => {
            let key = config.gemini_api_key.as_deref().ok_or_else(|| missing("GEMINI_API_KEY"))?;
            Arc::new(Gemini::new(key, &policy.name))
        }
        ModelProvider::Claude => {
            let key = config
                .anthropic_api_key
                .as_deref()
                .ok_or_else(|| missing("ANTHROPIC_API_KEY"))?;
            Arc::new(Claude::new(key, &policy.name))
        }
        ModelProvider::Openai => {
            let key = config.openai_api_key.as_deref().ok_or_else(|| missing("OPENAI_API_KEY"))?;
            Arc::new(OpenAi::new(key, &policy.name))
        }
    };
    info!(provider = ?policy.provider, model = model.model(), "Model ready");
    Ok(model)
}
