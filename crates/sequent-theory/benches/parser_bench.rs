use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sequent_theory::Dialect;

const CONSENT_P9: &str = include_str!("../../../theories/naive_consent_theory.in");
const CONSENT_TPTP: &str = include_str!("../../../theories/naive_consent_theory.tptp");

fn bench_parse_prover9(c: &mut Criterion) {
    c.bench_function("parse_consent_prover9", |b| {
        b.iter(|| {
            sequent_theory::parse(
                black_box(CONSENT_P9),
                "naive_consent_theory.in",
                Dialect::Prover9,
            )
            .unwrap()
        })
    });
}

fn bench_parse_tptp(c: &mut Criterion) {
    c.bench_function("parse_consent_tptp", |b| {
        b.iter(|| {
            sequent_theory::parse(
                black_box(CONSENT_TPTP),
                "naive_consent_theory.tptp",
                Dialect::Tptp,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_parse_prover9, bench_parse_tptp);
criterion_main!(benches);
