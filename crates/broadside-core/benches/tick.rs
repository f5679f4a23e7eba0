//! Tick throughput on populated scenes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use broadside_core::model::Faction;
use broadside_core::prelude::SpaceEngine;
use broadside_logic::xy::XY;

fn asteroid_field_engine() -> SpaceEngine {
    let mut engine = SpaceEngine::new(1);
    engine.add_asteroid_field(100, 20_000.0);
    engine
}

fn battle_engine() -> SpaceEngine {
    let mut engine = asteroid_field_engine();
    engine.add_ship("alpha", XY::ZERO, Faction::Gravitas);
    engine.add_ship("beta", XY::new(1500.0, 0.0), Faction::Raiders);
    for (id, mark) in [("alpha", "beta"), ("beta", "alpha")] {
        if let Some(ship) = engine.ship_mut(id) {
            ship.set_weapons_target(Some(mark.to_string()));
            ship.set_firing(true);
        }
    }
    engine
}

fn bench_ticks(c: &mut Criterion) {
    c.bench_function("tick_asteroid_field_100", |b| {
        let mut engine = asteroid_field_engine();
        b.iter(|| engine.update(black_box(1.0 / 20.0)));
    });

    c.bench_function("tick_two_ship_battle", |b| {
        let mut engine = battle_engine();
        b.iter(|| engine.update(black_box(1.0 / 20.0)));
    });
}

criterion_group!(benches, bench_ticks);
criterion_main!(benches);
