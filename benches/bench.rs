// Criterion benchmarks for the courtfinder search core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use courtfinder::core::{classify, strategy};
use courtfinder::models::{
    CatchmentMethod, CatchmentType, CourtCatchmentConfig, SearchAction, ServiceAreaConfig,
    ServiceAreaType,
};

fn family_area() -> ServiceAreaConfig {
    ServiceAreaConfig {
        id: 1,
        name: "Divorce".to_string(),
        slug: "divorce".to_string(),
        area_type: ServiceAreaType::Family,
        catchment_method: CatchmentMethod::LocalAuthority,
        area_of_law: "Divorce".to_string(),
    }
}

fn catchments(count: usize) -> Vec<CourtCatchmentConfig> {
    (0..count)
        .map(|i| CourtCatchmentConfig {
            court_id: i as i64,
            catchment_type: if i == count - 1 {
                CatchmentType::Regional
            } else {
                CatchmentType::Local
            },
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_full_postcode", |b| {
        b.iter(|| classify(black_box("sw1a 1aa")));
    });

    c.bench_function("classify_excluded_region", |b| {
        b.iter(|| classify(black_box("EH1 1YZ")));
    });
}

fn bench_strategy_selection(c: &mut Criterion) {
    let area = family_area();

    let mut group = c.benchmark_group("strategy_selection");

    for catchment_count in [1usize, 10, 100].iter() {
        let configs = catchments(*catchment_count);
        group.bench_with_input(
            BenchmarkId::new("select", catchment_count),
            catchment_count,
            |b, _| {
                b.iter(|| {
                    strategy::select(
                        black_box(SearchAction::Documents),
                        black_box(Some("Authority Name")),
                        black_box(&area),
                        black_box(&configs),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_strategy_selection);
criterion_main!(benches);
