use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rag_retrieval::{HybridRetrieval, RetrievalConfig, SearchRequest};
use rag_vector_store::{Document, DocumentSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use tempfile::TempDir;
use tokio::runtime::Runtime;

const DIMENSION: usize = 256;

const WORDS: &[&str] = &[
    "refund", "policy", "invoice", "shipping", "warranty", "account", "password", "delivery",
    "payment", "subscription", "cancel", "order", "tracking", "return", "exchange", "discount",
    "voucher", "support", "billing", "address",
];

fn random_vector(rng: &mut StdRng) -> Vec<f32> {
    (0..DIMENSION).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn create_documents(count: usize, rng: &mut StdRng) -> DocumentSet {
    let documents = (0..count)
        .map(|i| {
            let content = (0..12)
                .map(|_| WORDS[rng.random_range(0..WORDS.len())])
                .collect::<Vec<_>>()
                .join(" ");
            Document::new(format!("doc-{i}"), content, random_vector(rng))
        })
        .collect();
    DocumentSet::new(documents).unwrap()
}

fn setup_retrieval(doc_count: usize, config: RetrievalConfig) -> (HybridRetrieval, StdRng) {
    let mut rng = StdRng::seed_from_u64(42);
    let documents = create_documents(doc_count, &mut rng);
    (HybridRetrieval::new(config, documents).unwrap(), rng)
}

fn bench_search_latency(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("search_latency");

    for doc_count in [100, 1000, 5000] {
        group.throughput(Throughput::Elements(doc_count as u64));

        let (retrieval, mut rng) = setup_retrieval(doc_count, RetrievalConfig::no_cache());
        let request = SearchRequest::new("refund policy shipping", random_vector(&mut rng));

        group.bench_with_input(
            BenchmarkId::from_parameter(doc_count),
            &doc_count,
            |b, _| {
                b.to_async(&rt).iter(|| async {
                    let results = retrieval.search(black_box(&request)).await.unwrap();
                    black_box(results);
                });
            },
        );
    }

    group.finish();
}

fn bench_scoring_modes(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let (retrieval, mut rng) = setup_retrieval(1000, RetrievalConfig::no_cache());
    let query_vector = random_vector(&mut rng);

    let mut group = c.benchmark_group("scoring_modes");

    group.bench_function("hybrid", |b| {
        let request = SearchRequest::new("warranty exchange", query_vector.clone());
        b.to_async(&rt).iter(|| async {
            black_box(retrieval.search(&request).await.unwrap());
        });
    });

    group.bench_function("vector_only", |b| {
        let request = SearchRequest::new("warranty exchange", query_vector.clone())
            .with_weights(0.0, 1.0);
        b.to_async(&rt).iter(|| async {
            black_box(retrieval.search(&request).await.unwrap());
        });
    });

    group.bench_function("fuzzy_terms", |b| {
        let request = SearchRequest::new("warrenty exchanges", query_vector.clone());
        b.to_async(&rt).iter(|| async {
            black_box(retrieval.search(&request).await.unwrap());
        });
    });

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let config = RetrievalConfig {
        cache_path: temp_dir.path().join("query_cache.json"),
        ..Default::default()
    };
    let (retrieval, mut rng) = setup_retrieval(1000, config);
    let request = SearchRequest::new("refund policy", random_vector(&mut rng));

    // Warm up cache
    rt.block_on(retrieval.search(&request)).unwrap();

    c.bench_function("cache_hit", |b| {
        b.to_async(&rt).iter(|| async {
            let results = retrieval.search(black_box(&request)).await.unwrap();
            black_box(results);
        });
    });
}

criterion_group!(
    benches,
    bench_search_latency,
    bench_scoring_modes,
    bench_cache_hit
);
criterion_main!(benches);
