use criterion::{black_box, criterion_group, criterion_main, Criterion};
use factory_core::{Decimal, GameProfile, Item, Machine, RecipeIngredient, SeededIds};

fn build_profile(n_items: usize) -> GameProfile {
    let mut ids = SeededIds::new(42);
    let mut profile = GameProfile::new("Bench");
    for i in 0..n_items {
        let item = Item::new(&mut ids, format!("Item {i}")).with_cost(Decimal::new(i as i64, 2));
        let machine = Machine::new(&mut ids, format!("Machine {i}"))
            .with_input(RecipeIngredient::new(&item.id, Decimal::new(75, 1)))
            .with_function_requirement("90 kW");
        profile = profile.with_item(item).with_machine(machine);
    }
    profile
}

fn bench_codec(c: &mut Criterion) {
    let profile = build_profile(1_000);
    let text = persistence::serialize(&profile).expect("serialize");
    c.bench_function("serialize 1k items", |b| {
        b.iter(|| persistence::serialize(black_box(&profile)))
    });
    c.bench_function("deserialize 1k items", |b| {
        b.iter(|| persistence::deserialize(black_box(&text)))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
