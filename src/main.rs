use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topiceval::coherence::traits::CoherenceMeasure;
use topiceval::coherence::windowed::WindowedCoherence;
use topiceval::embeddings::download;
use topiceval::embeddings::traits::EmbeddingSource;
use topiceval::input::{load_corpus, load_topics};
use topiceval::measures::traits::{mean, serves_topk};
use topiceval::measures::{
    corpus_coherence, diversity, embedding_coherence, ranked_overlap, CorpusCoherence,
    EmbeddingCoherence, Measure, RankedOverlap, TopicDiversity, TopicList,
};
use topiceval::output::{terminal, ScoreReport};

mod config;

/// topiceval: score topic-model output.
///
/// Computes topic diversity, NPMI coherence against a corpus, word-embedding
/// coherence and rank-biased overlap for lists of topic words.
#[derive(Parser)]
#[command(name = "topiceval", version, about)]
struct Cli {
    /// Print JSON reports instead of the colored table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Share of unique words across the topics' top-k words
    Diversity {
        /// Topics file (JSON array of arrays, or one topic per line)
        #[arg(long)]
        topics: PathBuf,

        #[arg(long, default_value_t = diversity::DEFAULT_TOPK)]
        topk: usize,
    },

    /// Sliding-window NPMI coherence against a reference corpus
    Npmi {
        #[arg(long)]
        topics: PathBuf,

        /// Corpus file, one tokenized document per line
        #[arg(long)]
        corpus: PathBuf,

        #[arg(long, default_value_t = corpus_coherence::DEFAULT_TOPK)]
        topk: usize,

        /// Sliding window width (default: TOPICEVAL_WINDOW_SIZE or 10)
        #[arg(long)]
        window_size: Option<usize>,

        /// Confirmation measure: c_npmi or c_uci
        #[arg(long, default_value = "c_npmi")]
        measure: String,
    },

    /// Mean pairwise word-embedding similarity within topics
    Embedding {
        #[arg(long)]
        topics: PathBuf,

        #[arg(long, default_value_t = embedding_coherence::DEFAULT_TOPK)]
        topk: usize,

        /// word2vec vector file (default: the pretrained word2vec-google-news-300)
        #[arg(long)]
        vectors: Option<PathBuf>,

        /// The vector file is in binary word2vec format
        #[arg(long)]
        binary: bool,
    },

    /// Mean rank-biased overlap between every pair of topics
    Rbo {
        #[arg(long)]
        topics: PathBuf,

        #[arg(long, default_value_t = ranked_overlap::DEFAULT_TOPK)]
        topk: usize,

        /// Persistence p in (0, 1]; agreement at depth d weighs p^(d-1)
        #[arg(long, default_value_t = ranked_overlap::DEFAULT_WEIGHT)]
        weight: f64,
    },

    /// Run every measure whose inputs are available
    All {
        #[arg(long)]
        topics: PathBuf,

        /// Use this topk for every measure instead of each one's default
        #[arg(long)]
        topk: Option<usize>,

        /// Corpus for NPMI (skipped when absent)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Vector file for embedding coherence (skipped when absent and the
        /// default vectors are not downloaded)
        #[arg(long)]
        vectors: Option<PathBuf>,

        #[arg(long)]
        binary: bool,
    },

    /// Download the default pretrained word vectors (~1.6 GB)
    DownloadEmbeddings,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topiceval=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::Config::load()?;

    match cli.command {
        Commands::Diversity { topics, topk } => {
            let topics = load_topics(&topics)?;
            let report = run_measure(&TopicDiversity::new(topics.clone()), Some(topk))?;
            emit(&[report], &topics, cli.json)?;
        }

        Commands::Npmi {
            topics,
            corpus,
            topk,
            window_size,
            measure,
        } => {
            let topics = load_topics(&topics)?;
            let corpus = load_corpus(&corpus)?;
            let measure: CoherenceMeasure = measure.parse()?;
            let window_size = window_size.unwrap_or(config.window_size);

            let scorer = CorpusCoherence::new(topics.clone(), corpus)
                .with_oracle(Box::new(WindowedCoherence::new(window_size)))
                .with_measure(measure);
            let report = coherence_report(&scorer, topk)?;
            emit(&[report], &topics, cli.json)?;
        }

        Commands::Embedding {
            topics,
            topk,
            vectors,
            binary,
        } => {
            let topics = load_topics(&topics)?;
            let binary = binary || config.embeddings_binary;
            let scorer = EmbeddingCoherence::new(topics.clone())
                .with_source(config.embedding_source(vectors))
                .with_binary(binary)
                .with_provider(Box::new(config.embedding_provider()));

            let per_topic = score_embeddings(scorer, topk).await?;
            let report = ScoreReport::new("embedding", topk, mean(&per_topic))
                .with_per_topic(per_topic);
            emit(&[report], &topics, cli.json)?;
        }

        Commands::Rbo {
            topics,
            topk,
            weight,
        } => {
            let topics = load_topics(&topics)?;
            let scorer = RankedOverlap::new(topics.clone()).with_weight(weight);
            let report = run_measure(&scorer, Some(topk))?.with_weight(weight);
            emit(&[report], &topics, cli.json)?;
        }

        Commands::All {
            topics,
            topk,
            corpus,
            vectors,
            binary,
        } => {
            let topics = load_topics(&topics)?;
            let mut reports = Vec::new();

            if let Some(report) = run_if_served(&TopicDiversity::new(topics.clone()), topk, &topics)? {
                reports.push(report);
            }
            if let Some(report) = run_if_served(&RankedOverlap::new(topics.clone()), topk, &topics)? {
                reports.push(report.with_weight(ranked_overlap::DEFAULT_WEIGHT));
            }

            if let Some(corpus) = corpus {
                let corpus = load_corpus(&corpus)?;
                let scorer = CorpusCoherence::new(topics.clone(), corpus)
                    .with_oracle(Box::new(WindowedCoherence::new(config.window_size)));
                if let Some(report) = run_if_served(&scorer, topk, &topics)? {
                    reports.push(report.with_coherence(scorer.measure().as_str()));
                }
            } else {
                info!("No corpus given, skipping NPMI coherence");
            }

            let source = config.embedding_source(vectors);
            let embedding_topk = topk.unwrap_or(embedding_coherence::DEFAULT_TOPK);
            if source == EmbeddingSource::Default
                && !download::default_embedding_present(&config.data_dir)
            {
                info!("No word vectors available, skipping embedding coherence");
            } else if topk.is_none() && !serves_topk(&topics, embedding_topk) {
                info!(
                    topk = embedding_topk,
                    "Topics are shorter than the default topk, skipping embedding"
                );
            } else {
                let scorer = EmbeddingCoherence::new(topics.clone())
                    .with_source(source)
                    .with_binary(binary || config.embeddings_binary)
                    .with_provider(Box::new(config.embedding_provider()));
                let per_topic = score_embeddings(scorer, embedding_topk).await?;
                reports.push(
                    ScoreReport::new("embedding", embedding_topk, mean(&per_topic))
                        .with_per_topic(per_topic),
                );
            }

            emit(&reports, &topics, cli.json)?;
        }

        Commands::DownloadEmbeddings => {
            println!("Downloading default word vectors...");
            println!("  Destination: {}", download::embeddings_dir(&config.data_dir).display());

            let path = download::download_default_embedding(&config.data_dir).await?;

            println!("\n{}", "Word vectors downloaded successfully.".bold());
            println!("Saved to {}", path.display());
            println!("You can now run `topiceval embedding --topics <file>`.");
        }
    }

    Ok(())
}

/// Run a measure through the shared trait, at `topk` or its default.
fn run_measure(measure: &dyn Measure, topk: Option<usize>) -> Result<ScoreReport> {
    let topk = topk.unwrap_or_else(|| measure.default_topk());
    let score = measure
        .evaluate(topk)
        .with_context(|| format!("Failed to compute {}", measure.name()))?;
    Ok(ScoreReport::new(measure.name(), topk, score))
}

/// Run a measure at the caller's `topk`, or at its default when the topics
/// are long enough for it. A default the topics cannot serve skips the
/// measure; an explicit `topk` that is too large is still an error.
fn run_if_served(
    measure: &dyn Measure,
    topk: Option<usize>,
    topics: &TopicList,
) -> Result<Option<ScoreReport>> {
    if topk.is_none() && !serves_topk(topics, measure.default_topk()) {
        info!(
            topk = measure.default_topk(),
            "Topics are shorter than the default topk, skipping {}",
            measure.name()
        );
        return Ok(None);
    }
    run_measure(measure, topk).map(Some)
}

/// Aggregate from the oracle, per-topic values for display.
fn coherence_report(scorer: &CorpusCoherence, topk: usize) -> Result<ScoreReport> {
    let score = scorer
        .score(topk)
        .context("Failed to compute corpus coherence")?;
    let per_topic = scorer.score_per_topic(topk)?;
    Ok(ScoreReport::new(scorer.name(), topk, score)
        .with_coherence(scorer.measure().as_str())
        .with_per_topic(per_topic))
}

/// Embedding scoring reads a large file; keep it off the async runtime.
async fn score_embeddings(scorer: EmbeddingCoherence, topk: usize) -> Result<Vec<f64>> {
    let per_topic = tokio::task::spawn_blocking(move || scorer.score_per_topic(topk))
        .await
        .context("spawn_blocking panicked")?
        .context("Failed to compute embedding coherence")?;
    Ok(per_topic)
}

fn emit(reports: &[ScoreReport], topics: &TopicList, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        terminal::display_reports(reports, topics);
    }
    Ok(())
}
