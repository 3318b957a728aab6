use criterion::{criterion_group, criterion_main, Criterion};
use claims_core::test_utils::{ability, sibling_claims};
use claims_core::Rules;

fn access_benchmarks(c: &mut Criterion) {
    let rules = Rules::default();
    let permitted = sibling_claims("read", "clients", 200);
    let prohibited = sibling_claims("read", "clients.r3", 20);
    let wide = rules.build_ability(&permitted, &prohibited).unwrap();
    let nested = ability(&["read:clients.*"], &["read:clients.first", "read:clients.second"]);

    c.bench_function("access_to_resources_200_siblings", |b| {
        b.iter(|| wide.access_to_resources("read:clients").unwrap())
    });

    c.bench_function("access_to_resources_all_except_some", |b| {
        b.iter(|| nested.access_to_resources("read:clients").unwrap())
    });

    c.bench_function("can_200_siblings", |b| {
        b.iter(|| wide.can("read:clients.r150.deep").unwrap())
    });

    c.bench_function("cache_id", |b| b.iter(|| wide.cache_id()));
}

criterion_group!(benches, access_benchmarks);
criterion_main!(benches);
