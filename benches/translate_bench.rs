use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use hepquery::{QueryConfig, QueryTranslator, SearchFilter};

const QUERIES: &[(&str, &str)] = &[
    ("plain", "muon"),
    ("shorthand", "observables:ASYM AND cmenergies:13000"),
    ("reaction", "reactions:P P --> Z0 Z0 AND cmenergies:13000 OR phrases:Jets"),
    ("range", "publication_recid:[1 TO 100000]"),
];

fn build_translator() -> QueryTranslator {
    QueryTranslator::new(QueryConfig::default().freeze().unwrap()).unwrap()
}

fn bench_translate(c: &mut Criterion) {
    let translator = build_translator();
    let mut group = c.benchmark_group("translate");

    for (name, query) in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(name), query, |b, query| {
            b.iter(|| translator.translate(black_box(query)))
        });
    }

    group.finish();
}

fn bench_build_search(c: &mut Criterion) {
    let translator = build_translator();
    let filters = vec![
        SearchFilter::new("collaboration", "ATLAS"),
        SearchFilter::new("date", serde_json::json!([2010, 2020])),
        SearchFilter::new("author", "Smith, A."),
    ];

    c.bench_function("build_search_with_filters", |b| {
        b.iter(|| {
            translator
                .build_search(black_box("reactions:P P --> X AND cmenergies:7000"), &filters)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_translate, bench_build_search);
criterion_main!(benches);
