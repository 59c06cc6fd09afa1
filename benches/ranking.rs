//! Scoring and Ranking Benchmarks
//!
//! Run with: cargo bench --bench ranking

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;

use carematch::candidates::{Expert, GeoPoint, Trial};
use carematch::matching::{EntityScorer, QueryContext};
use carematch::providers::StaticProvider;
use carematch::SearchEngine;

const CITIES: &[(&str, f64, f64)] = &[
    ("Boston", 42.3601, -71.0589),
    ("Denver", 39.7392, -104.9903),
    ("Lyon", 45.7640, 4.8357),
    ("Toronto", 43.6532, -79.3832),
];

fn synthetic_trials(n: usize) -> Vec<Trial> {
    (0..n)
        .map(|i| {
            let (city, lat, lon) = CITIES[i % CITIES.len()];
            Trial {
                id: format!("trial-{}", i),
                title: format!("Phase {} immunotherapy study {}", i % 4, i),
                condition: if i % 3 == 0 { "Glioblastoma" } else { "Asthma" }.to_string(),
                summary: "Evaluates checkpoint inhibitors in adults".to_string(),
                city: city.to_string(),
                is_remote: i % 5 == 0,
                latitude: Some(lat),
                longitude: Some(lon),
                ..Default::default()
            }
        })
        .collect()
}

fn synthetic_experts(n: usize) -> Vec<Expert> {
    (0..n)
        .map(|i| Expert {
            id: format!("expert-{}", i),
            name: format!("Dr. Researcher {}", i),
            institution: "General Hospital".to_string(),
            specialties: vec!["Neuro-oncology".to_string(), "Immunotherapy".to_string()],
            research_interests: "glioblastoma immunotherapy trials".to_string(),
            accepts_meetings: i % 2 == 0,
            ..Default::default()
        })
        .collect()
}

fn benchmark_score_trials(c: &mut Criterion) {
    let scorer = EntityScorer::default();
    let ctx = QueryContext::new("immunotherapy")
        .with_condition("Glioblastoma")
        .with_location("Boston, USA");
    let keywords = ctx.keywords().unwrap();

    let mut group = c.benchmark_group("score_trials");
    for n in [40, 400, 4000] {
        let trials = synthetic_trials(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &trials, |b, trials| {
            b.iter(|| {
                trials
                    .iter()
                    .map(|t| scorer.score_trial(black_box(t), &keywords, &ctx) as u32)
                    .sum::<u32>()
            });
        });
    }
    group.finish();
}

fn benchmark_full_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let engine = SearchEngine::new(
        Box::new(StaticProvider::new("experts", synthetic_experts(40))),
        Box::new(StaticProvider::new("trials", synthetic_trials(40))),
    );
    let ctx = QueryContext::new("immunotherapy")
        .with_condition("Glioblastoma")
        .with_location("Boston, USA")
        .with_coordinates(GeoPoint::new(42.3601, -71.0589));

    c.bench_function("search_40_experts_40_trials", |b| {
        b.to_async(&rt).iter(|| async {
            engine.search(black_box(&ctx), &[]).await.unwrap();
        });
    });
}

criterion_group!(benches, benchmark_score_trials, benchmark_full_search);
criterion_main!(benches);
