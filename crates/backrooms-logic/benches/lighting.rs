use backrooms_logic::config::{LightingConfig, PanelConfig};
use backrooms_logic::generation::generate_room;
use backrooms_logic::geometry::RoomCoordinate;
use backrooms_logic::lighting::cast_cone;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_cone(c: &mut Criterion) {
    let panel = PanelConfig::default();
    let lighting = LightingConfig::default();
    let room = generate_room(RoomCoordinate::new(3, -2), false, &panel);
    let origin = panel.center();

    c.bench_function("cast_cone", |b| {
        b.iter(|| {
            cast_cone(
                black_box(origin),
                black_box((origin.0 + 150.0, origin.1 - 40.0)),
                &room.walls,
                0.35,
                &lighting,
                &panel,
            )
        })
    });
}

fn bench_generation(c: &mut Criterion) {
    let panel = PanelConfig::default();
    c.bench_function("generate_room", |b| {
        b.iter(|| generate_room(black_box(RoomCoordinate::new(17, 4)), false, &panel))
    });
}

criterion_group!(benches, bench_cone, bench_generation);
criterion_main!(benches);
