use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nodever_core::{resolve, RuntimeCatalog, VersionRange};

fn bench_resolve(c: &mut Criterion) {
    let catalog = RuntimeCatalog::builtin();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();

    c.bench_function("resolve_newest_match", |b| {
        b.iter(|| resolve(&catalog, black_box(Some(">=10.13 <13 || ^14")), false, now))
    });

    c.bench_function("resolve_invalid_range", |b| {
        b.iter(|| resolve(&catalog, black_box(Some("6.x")), false, now))
    });

    c.bench_function("parse_range", |b| {
        b.iter(|| VersionRange::parse(black_box("^12.16.1 || 10.13.0 - 10.x || >=8.10 <9")))
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
