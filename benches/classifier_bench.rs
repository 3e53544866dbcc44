//! Criterion benchmarks for spamsift.
//!
//! Covers the hot paths of the classifier:
//! - Text analysis
//! - Training
//! - Single and batch prediction

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use spamsift::analysis::analyzer::{Analyzer, StandardAnalyzer};
use spamsift::classifier::SpamClassifier;
use spamsift::corpus::Corpus;
use spamsift::model::{Label, ModelTrainer};
use std::hint::black_box;
use std::sync::Arc;

const SPAM_WORDS: [&str; 12] = [
    "free", "win", "cash", "prize", "click", "offer", "money", "now", "winner", "urgent",
    "claim", "bonus",
];

const HAM_WORDS: [&str; 12] = [
    "meeting", "lunch", "project", "report", "tomorrow", "please", "thanks", "schedule",
    "review", "call", "notes", "team",
];

/// Generate a labeled corpus for benchmarking.
fn generate_corpus(count: usize) -> Corpus {
    (0..count)
        .map(|i| {
            let (words, label) = if i % 3 == 0 {
                (&SPAM_WORDS, Label::Spam)
            } else {
                (&HAM_WORDS, Label::Ham)
            };
            let length = 8 + (i % 24);
            let text = (0..length)
                .map(|j| words[(i * 7 + j * 13) % words.len()])
                .collect::<Vec<_>>()
                .join(" ");
            (text, label)
        })
        .collect()
}

/// Benchmark text analysis.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let analyzer = StandardAnalyzer::new().unwrap();
    let corpus = generate_corpus(100);
    let texts: Vec<&str> = corpus.texts().collect();

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("terms_batch", |b| {
        b.iter(|| {
            for text in &texts {
                let _ = black_box(analyzer.terms(black_box(text)));
            }
        })
    });

    group.finish();
}

/// Benchmark training.
fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(20);
    let trainer = ModelTrainer::default();

    for size in [100, 1000] {
        let corpus = generate_corpus(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("train_{size}"), |b| {
            b.iter(|| black_box(trainer.train(black_box(&corpus)).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark prediction.
fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");
    let corpus = generate_corpus(1000);
    let artifact = ModelTrainer::default().train(&corpus).unwrap();
    let classifier = SpamClassifier::new(Arc::new(artifact)).unwrap();
    let texts: Vec<&str> = corpus.texts().take(500).collect();

    group.bench_function("predict_single", |b| {
        b.iter(|| black_box(classifier.predict(black_box("claim your free cash prize now"))))
    });

    group.throughput(Throughput::Elements(texts.len() as u64));
    group.bench_function("predict_batch_500", |b| {
        b.iter(|| black_box(classifier.predict_batch(black_box(&texts))))
    });

    group.bench_function("explain_top_20", |b| {
        b.iter(|| black_box(classifier.explain(black_box(20))))
    });

    group.finish();
}

criterion_group!(benches, bench_analysis, bench_training, bench_prediction);
criterion_main!(benches);
