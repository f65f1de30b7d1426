// Prediction throughput benchmarks for DogMatch
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dogmatch_core::{CategoricalEncoder, ColumnAligner, FeatureSchema, RobustScaler};
use dogmatch_inference::{
    BreedCatalog, BruteForceIndex, DogMatchPredictor, KnnClassifier, PredictorParts, Weighting,
};
use rand::prelude::*;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const GROUPS: [&str; 5] = ["Herding", "Hound", "Sporting", "Toy", "Working"];

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn generate_random_rows(n: usize, width: usize) -> Vec<Vec<f64>> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| (0..width).map(|_| rng.random_range(-3.0..3.0)).collect())
        .collect()
}

fn build_predictor(n_breeds: usize) -> DogMatchPredictor {
    let schema = FeatureSchema::new(
        strings(&[
            "Size",
            "Exercise Requirements (hrs/day)",
            "Good with Children",
            "Intelligence Rating (1-10)",
            "Training Difficulty (1-10)",
            "Friendly Rating (1-10)",
        ]),
        strings(&["Size", "Good with Children"]),
        strings(&[
            "Exercise Requirements (hrs/day)",
            "Intelligence Rating (1-10)",
            "Training Difficulty (1-10)",
            "Friendly Rating (1-10)",
        ]),
    );
    let width = ColumnAligner::new(&schema.feature_columns).width();
    let rows = generate_random_rows(n_breeds, width);
    let names: Vec<String> = (0..n_breeds).map(|i| format!("Breed {}", i)).collect();
    let labels: Vec<usize> = (0..n_breeds).map(|i| i % GROUPS.len()).collect();

    DogMatchPredictor::new(PredictorParts {
        schema,
        encoder: CategoricalEncoder::new([
            ("Size".to_string(), strings(&["Large", "Medium", "Small"])),
            ("Good with Children".to_string(), strings(&["No", "With Training", "Yes"])),
        ]),
        scaler: Box::new(RobustScaler::new(vec![1.5, 6.0, 5.0, 7.0], vec![1.0, 2.0, 2.0, 2.0])),
        classifier: Box::new(KnnClassifier {
            model_type: "KNeighborsClassifier".to_string(),
            n_neighbors: 5,
            weights: Weighting::Distance,
            classes: strings(&GROUPS),
            fit_rows: rows.clone(),
            fit_labels: labels.clone(),
        }),
        index: Box::new(BruteForceIndex::new(rows)),
        catalog: BreedCatalog::new(
            names.clone(),
            labels.iter().map(|&l| GROUPS[l].to_string()).collect(),
        )
        .unwrap(),
        breed_names: names,
        label_group_name: "Label_Grouped".to_string(),
    })
    .unwrap()
}

fn user_input() -> Map<String, Value> {
    json!({
        "Size": "Medium",
        "Exercise Requirements (hrs/day)": 2.0,
        "Good with Children": "Yes",
        "Intelligence Rating (1-10)": 7,
        "Training Difficulty (1-10)": 3,
        "Friendly Rating (1-10)": 8
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn benchmark_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    let input = user_input();

    for size in [100, 1000, 10000].iter() {
        let predictor = build_predictor(*size);
        group.bench_with_input(BenchmarkId::new("top_5", size), size, |b, _| {
            b.iter(|| predictor.predict(black_box(&input), 5).unwrap());
        });
    }

    group.finish();
}

fn benchmark_prepare(c: &mut Criterion) {
    let predictor = build_predictor(100);
    let input = user_input();

    c.bench_function("prepare", |b| {
        b.iter(|| predictor.prepare(black_box(&input)).unwrap());
    });
}

fn benchmark_concurrent_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_predict");
    let predictor = Arc::new(build_predictor(1000));

    for threads in [1, 4, 8].iter() {
        group.bench_with_input(BenchmarkId::new("threads", threads), threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let predictor = Arc::clone(&predictor);
                        std::thread::spawn(move || {
                            let input = user_input();
                            for _ in 0..10 {
                                black_box(predictor.predict(&input, 5).unwrap());
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_predict, benchmark_prepare, benchmark_concurrent_predict);
criterion_main!(benches);
