// Composition tests: verifying that loaders, backends and measures chain
// together correctly.
//
// These tests exercise the data flow between modules:
//   files -> input -> measures (+ coherence / embeddings / overlap) -> report
// without any network calls. Fixture files are written to the temp dir and
// removed afterwards.

use std::path::PathBuf;

use topiceval::coherence::dictionary::Dictionary;
use topiceval::coherence::traits::{CoherenceMeasure, CoherenceOracle, CoherenceRequest};
use topiceval::coherence::windowed::WindowedCoherence;
use topiceval::embeddings::provider::FileEmbeddingProvider;
use topiceval::embeddings::traits::EmbeddingSource;
use topiceval::input::{load_corpus, load_topics, tokenize_lines};
use topiceval::measures::{CorpusCoherence, EmbeddingCoherence, Measure, RankedOverlap, TopicDiversity};
use topiceval::output::ScoreReport;
use topiceval::overlap::rbo::RankBiasedOverlap;
use topiceval::overlap::traits::RankOverlap;

fn fixture(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("topiceval-composition-{name}"));
    std::fs::write(&path, contents).unwrap();
    path
}

fn binary_vectors(entries: &[(&str, [f32; 3])]) -> Vec<u8> {
    let mut out = format!("{} 3\n", entries.len()).into_bytes();
    for (word, vector) in entries {
        out.extend_from_slice(word.as_bytes());
        out.push(b' ');
        for v in vector {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out.push(b'\n');
    }
    out
}

// ============================================================
// Chain: topic file -> diversity / RBO -> report
// ============================================================

#[test]
fn topic_file_feeds_diversity_and_rbo() {
    let path = fixture(
        "topics.json",
        br#"[["stock", "market", "price"], ["stock", "market", "trade"], ["goal", "match", "team"]]"#,
    );
    let topics = load_topics(&path).unwrap();

    let diversity = TopicDiversity::new(topics.clone()).score(3).unwrap();
    // {stock, market, price, trade, goal, match, team} / 9
    assert!((diversity - 7.0 / 9.0).abs() < 1e-12, "got {diversity}");

    let rbo = RankedOverlap::new(topics).score(3, 0.9).unwrap();
    assert!(rbo > 0.0 && rbo < 1.0, "partly overlapping topics, got {rbo}");

    let report = ScoreReport::new("diversity", 3, diversity);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"measure\":\"diversity\""));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn rbo_measure_matches_primitive_for_one_pair() {
    let topics = tokenize_lines("a b c d\nb a d c\n");
    let measure = RankedOverlap::new(topics.clone()).score(4, 0.8).unwrap();
    let direct = RankBiasedOverlap.rbo(&topics[0], &topics[1], 0.8).unwrap();
    assert!((measure - direct.extrapolated).abs() < 1e-12);
}

// ============================================================
// Chain: corpus file -> dictionary -> windowed NPMI
// ============================================================

#[test]
fn corpus_file_feeds_npmi() {
    let topics_path = fixture("npmi-topics.txt", b"bank money\nriver water\n");
    let corpus_path = fixture(
        "npmi-corpus.txt",
        b"the bank holds money\nthe river has water\nmoney in the bank\nwater in the river\n",
    );
    let topics = load_topics(&topics_path).unwrap();
    let corpus = load_corpus(&corpus_path).unwrap();

    let measure = CorpusCoherence::new(topics, corpus);
    let per_topic = measure.score_per_topic(2).unwrap();
    // Each pair always appears together and in half the windows
    for s in &per_topic {
        assert!((s - 1.0).abs() < 1e-9, "got {s}");
    }
    assert!((measure.evaluate(2).unwrap() - 1.0).abs() < 1e-9);

    std::fs::remove_file(&topics_path).unwrap();
    std::fs::remove_file(&corpus_path).unwrap();
}

#[test]
fn npmi_single_word_topics_regression() {
    // topk = 1 leaves no word pairs to confirm: every topic, and so the
    // aggregate, is NaN. Pinned so a change in this behavior is noticed.
    let corpus = tokenize_lines("apple banana\nbanana cherry\n");
    let topics = tokenize_lines("banana\nbanana\n");
    let score = CorpusCoherence::new(topics, corpus).score(1).unwrap();
    assert!(score.is_nan(), "got {score}");
}

#[test]
fn oracle_used_directly_matches_measure() {
    let corpus = tokenize_lines("a b x\na y\nb z\n");
    let topics = tokenize_lines("a b\n");
    let dictionary = Dictionary::from_documents(&corpus);
    let oracle = WindowedCoherence::new(10);
    let direct = oracle
        .coherence(&CoherenceRequest {
            topics: &topics,
            texts: &corpus,
            dictionary: &dictionary,
            topn: 2,
            measure: CoherenceMeasure::CNpmi,
        })
        .unwrap();

    let via_measure = CorpusCoherence::new(topics, corpus).score(2).unwrap();
    assert!((direct - via_measure).abs() < 1e-12);
    // P(a) = P(b) = 2/3, P(a, b) = 1/3: npmi = ln(0.75) / -ln(1/3)
    let expected = 0.75f64.ln() / -(1.0f64 / 3.0).ln();
    assert!((direct - expected).abs() < 1e-9, "got {direct}");
}

// ============================================================
// Chain: vector file -> provider -> embedding coherence
// ============================================================

#[test]
fn text_and_binary_vector_files_agree() {
    let text_path = fixture(
        "vectors.txt",
        b"3 3\ncat 1.0 0.0 0.0\ndog 0.8 0.6 0.0\ncar 0.0 0.0 1.0\n",
    );
    let binary_path = fixture(
        "vectors.bin",
        &binary_vectors(&[
            ("cat", [1.0, 0.0, 0.0]),
            ("dog", [0.8, 0.6, 0.0]),
            ("car", [0.0, 0.0, 1.0]),
        ]),
    );
    let topics = tokenize_lines("cat dog car\n");

    let from_text = EmbeddingCoherence::new(topics.clone())
        .with_source(EmbeddingSource::File(text_path.clone()))
        .with_provider(Box::new(FileEmbeddingProvider::default()))
        .score(3)
        .unwrap();
    let from_binary = EmbeddingCoherence::new(topics)
        .with_source(EmbeddingSource::File(binary_path.clone()))
        .with_binary(true)
        .score(3)
        .unwrap();

    // cat-dog = 0.8, cat-car = 0, dog-car = 0
    assert!((from_text - 0.8 / 3.0).abs() < 1e-6, "got {from_text}");
    assert!((from_text - from_binary).abs() < 1e-6);

    std::fs::remove_file(&text_path).unwrap();
    std::fs::remove_file(&binary_path).unwrap();
}

#[test]
fn missing_default_vectors_surface_as_external_error() {
    let provider = FileEmbeddingProvider::new(
        std::env::temp_dir().join("topiceval-composition-absent.bin.gz"),
        None,
    );
    let measure = EmbeddingCoherence::new(tokenize_lines("a b\n")).with_provider(Box::new(provider));
    let err = measure.score(2).unwrap_err();
    assert!(matches!(
        err,
        topiceval::measures::MeasureError::ExternalService(_)
    ));
    assert!(err.to_string().contains("download-embeddings"));
}
