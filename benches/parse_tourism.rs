use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use gramarc::policy::RulePolicy;
use gramarc::shift_reduce::parse;
use gramarc::Grammar;

const GRAMMAR_SRC: &str = include_str!("./tourism.cfg");

fn criterion_benchmark(c: &mut Criterion) {
  let grammar = GRAMMAR_SRC.parse::<Grammar>().unwrap();

  c.bench_function("generate 100 samples", |b| {
    b.iter(|| {
      let mut rng = StdRng::seed_from_u64(7);
      black_box(&grammar)
        .generate_with_rng(10, 100, &mut rng)
        .unwrap()
        .len()
    })
  });

  let sentence = "anh muốn đặt hai phòng";
  c.bench_function("recognize", |b| {
    b.iter(|| {
      black_box(&grammar)
        .recognize(black_box(sentence))
        .unwrap()
        .is_some()
    })
  });

  let policy = RulePolicy::vietnamese();
  let words = ["anh", "muốn", "đặt", "hai", "phòng"];
  let tags = ["PRO", "ADV_VHEAD", "V", "NUM", "N"];
  c.bench_function("dependency parse", |b| {
    b.iter(|| {
      parse(black_box(&words), black_box(&tags), &policy)
        .unwrap()
        .arcs
        .len()
    })
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
