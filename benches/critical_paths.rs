//! Criterion benchmarks for tweetsent critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Ranking: top-k selection over frequency tables
//! - Agreement: Krippendorff's alpha over annotation matrices
//! - Tokenizer: tweet tokenization
//! - Pooling: word vector pooling
//! - Charts: bar chart rendering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tweetsent::agreement::{krippendorff_alpha, AnnotationMatrix, Metric};
use tweetsent::chart::{bar_chart, ChartStyle, PALETTE};
use tweetsent::frequency::{select_top_k, FrequencyTable};
use tweetsent::preprocess::pool;
use tweetsent::tokenizer::tokenize;
use tweetsent::tweet::Representation;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Frequency table with `n` keys and a skewed count distribution
fn make_table(n: usize) -> FrequencyTable<String> {
    let mut table = FrequencyTable::new();
    for i in 0..n {
        table.add_count(format!("word{}", i), ((i * 7919) % 1000) as u64 + 1);
    }
    table
}

/// Annotation matrix with `annotators` rows over `units` units, every fifth cell missing
fn make_matrix(annotators: usize, units: usize) -> AnnotationMatrix {
    let rows = (0..annotators)
        .map(|a| {
            (0..units)
                .map(|u| if (a + u) % 5 == 0 { None } else { Some(((u * 3 + a) % 5) as f64 + 1.0) })
                .collect()
        })
        .collect();
    AnnotationMatrix::from_rows(rows).expect("benchmark matrix is rectangular")
}

fn make_tweet(words: usize) -> String {
    let vocabulary = ["Heute", "ist", "das", "Wetter", "super", "#sonne", "@anna", "nicht", "gut", "Berlin!"];
    (0..words).map(|i| vocabulary[i % vocabulary.len()]).collect::<Vec<_>>().join(" ")
}

// =============================================================================
// Ranking Benchmarks
// =============================================================================

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let table = make_table(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("top_10", size), &table, |b, table| {
            b.iter(|| select_top_k(black_box(table), 10))
        });
    }

    let table = make_table(10_000);
    for k in [1, 50, 500].iter() {
        group.bench_with_input(BenchmarkId::new("10k_keys", k), k, |b, &k| {
            b.iter(|| select_top_k(black_box(&table), k))
        });
    }

    group.finish();
}

// =============================================================================
// Agreement Benchmarks
// =============================================================================

fn bench_agreement(c: &mut Criterion) {
    let mut group = c.benchmark_group("agreement");

    for units in [100, 1_000, 10_000].iter() {
        let matrix = make_matrix(5, *units);
        group.throughput(Throughput::Elements(matrix.judgments() as u64));
        group.bench_with_input(BenchmarkId::new("interval", units), &matrix, |b, matrix| {
            b.iter(|| krippendorff_alpha(black_box(matrix), &Metric::Interval))
        });
        group.bench_with_input(BenchmarkId::new("nominal", units), &matrix, |b, matrix| {
            b.iter(|| krippendorff_alpha(black_box(matrix), &Metric::Nominal))
        });
    }

    group.finish();
}

// =============================================================================
// Tokenizer Benchmarks
// =============================================================================

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    for words in [5, 20, 50].iter() {
        let text = make_tweet(*words);
        group.throughput(Throughput::Elements(*words as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", words), &text, |b, text| {
            b.iter(|| tokenize(black_box(text)))
        });
    }

    group.finish();
}

// =============================================================================
// Pooling Benchmarks
// =============================================================================

fn bench_pooling(c: &mut Criterion) {
    let mut group = c.benchmark_group("pooling");

    let vectors: Vec<Vec<f32>> = (0..30).map(|i| (0..100).map(|d| ((i * d) % 17) as f32 / 17.0).collect()).collect();
    let slices: Vec<&[f32]> = vectors.iter().map(Vec::as_slice).collect();

    for representation in [Representation::Avg, Representation::Max, Representation::Min] {
        group.bench_function(format!("{:?}_30x100", representation), |b| {
            b.iter(|| pool(black_box(&slices), representation))
        });
    }

    group.finish();
}

// =============================================================================
// Chart Benchmarks
// =============================================================================

fn bench_charts(c: &mut Criterion) {
    let mut group = c.benchmark_group("charts");

    let style = ChartStyle::default();
    for bars in [3, 24].iter() {
        let labels: Vec<String> = (0..*bars).map(|i| i.to_string()).collect();
        let values: Vec<f64> = (0..*bars).map(|i| (i * 13 % 40) as f64).collect();
        group.bench_with_input(BenchmarkId::new("bar_chart", bars), &(labels, values), |b, (labels, values)| {
            b.iter(|| bar_chart("Bench", black_box(labels), black_box(values), PALETTE[0], &style))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ranking, bench_agreement, bench_tokenizer, bench_pooling, bench_charts);

criterion_main!(benches);
