//! Normalization and aggregation benchmarks.
//!
//! Measures snapshot build and query cost across sheet sizes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use utthan::{
    Dashboard, DataTable, Dataset, Dimension, RecordFilter, SourceMetadata, UtthanConfig,
    normalize::Normalizer,
};

const HEADERS: &[&str] = &[
    "Ward", "School Name", "Class", "Medium", "Attendance", "Reading", "Writing", "Numeracy",
];

/// Generate a raw sheet with the usual spelling noise.
fn generate_sheet(rows: usize) -> DataTable {
    let classes = ["I", "ii", " III", "IV "];
    let media = ["marathi", "HINDI", " Urdu", "english"];
    let attendance = ["Present", "absent", "Longabsent", "long absent", "", "NA"];
    let levels = ["L0", "l1", "Level 2", "LEVEL3", "L4", "l 5", "NA", "Long Absent"];

    let data = (0..rows)
        .map(|row| {
            vec![
                format!("{}", row % 24 + 1),
                format!(" mps school no. {} ", row % 150),
                classes[row % classes.len()].to_string(),
                media[row % media.len()].to_string(),
                attendance[row % attendance.len()].to_string(),
                levels[row % levels.len()].to_string(),
                levels[(row / 3) % levels.len()].to_string(),
                levels[(row / 7) % levels.len()].to_string(),
            ]
        })
        .collect();

    DataTable::new(HEADERS.iter().map(|h| h.to_string()).collect(), data)
}

fn source() -> SourceMetadata {
    SourceMetadata::new("bench.xlsx".into(), String::new(), 0, "xlsx".into(), 0, 0)
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for rows in [1_000, 10_000, 50_000].iter() {
        let table = generate_sheet(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            let normalizer = Normalizer::new();
            b.iter(|| black_box(normalizer.normalize(table)))
        });
    }

    group.finish();
}

fn bench_snapshot_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build");
    let config = UtthanConfig::default();

    for rows in [1_000, 10_000, 50_000].iter() {
        let table = generate_sheet(*rows);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(Dataset::from_table(table.clone(), source(), &config).unwrap()))
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let dataset = Dataset::from_table(generate_sheet(50_000), source(), &UtthanConfig::default())
        .unwrap();
    let all = RecordFilter::new();
    let one_ward = RecordFilter::new().with_wards(["3"]);

    group.bench_function("attendance_by_ward", |b| {
        b.iter(|| black_box(dataset.attendance_by(&all, Dimension::Ward).unwrap()))
    });
    group.bench_function("class_crosstab", |b| {
        b.iter(|| {
            black_box(
                dataset
                    .cross_tab(&all, Dimension::Class, Dimension::Attendance)
                    .unwrap(),
            )
        })
    });
    group.bench_function("ward_scores", |b| {
        b.iter(|| black_box(dataset.scores_by(&all, Dimension::Ward).unwrap()))
    });
    group.bench_function("dashboard_all", |b| {
        b.iter(|| black_box(Dashboard::new(&dataset, &all).build()))
    });
    group.bench_function("dashboard_one_ward", |b| {
        b.iter(|| black_box(Dashboard::new(&dataset, &one_ward).build()))
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_snapshot_build, bench_queries);
criterion_main!(benches);
