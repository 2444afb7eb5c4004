use city_runtime::{BuildingKind, CityBuilder};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_ticks(c: &mut Criterion) {
    let mut city = CityBuilder::new()
        .families(150)
        .budget(1_000_000)
        .seed(42)
        .build();
    for _ in 0..8 {
        city.construct(BuildingKind::Residential, 0);
    }
    for kind in [
        BuildingKind::Commercial,
        BuildingKind::Commercial,
        BuildingKind::Industrial,
        BuildingKind::School,
        BuildingKind::Hospital,
        BuildingKind::WaterPlant,
        BuildingKind::PowerPlant,
    ] {
        city.construct(kind, 0);
    }
    c.bench_function("advance_day", |b| {
        b.iter(|| {
            city.advance_day();
        })
    });
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
