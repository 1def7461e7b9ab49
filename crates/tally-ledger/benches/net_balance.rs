use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tally_ledger::{InMemoryLedger, LedgerReader, LedgerWriter, NewExpense};
use tally_types::identity::IDENTITY_LEN;
use tally_types::Identity;

fn id(seed: u8) -> Identity {
    Identity::from_raw([seed; IDENTITY_LEN])
}

fn filled(count: usize, cached: bool) -> InMemoryLedger {
    let ledger = InMemoryLedger::default().with_cached_balances(cached);
    for i in 0..count {
        let payer = id((i % 7) as u8 + 1);
        let input = NewExpense::labelled("bench")
            .share(payer, 300, 100)
            .share(id(8), 0, 100)
            .share(id(9), 0, 100);
        ledger.add_expense(&input).expect("valid expense");
    }
    ledger
}

fn bench_net_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("net_balance");
    for count in [100usize, 1_000, 10_000] {
        let scanning = filled(count, false);
        let cached = filled(count, true);
        let who = id(8);

        group.bench_with_input(BenchmarkId::new("scan", count), &count, |b, _| {
            b.iter(|| scanning.net_balance(black_box(&who)))
        });
        group.bench_with_input(BenchmarkId::new("cached", count), &count, |b, _| {
            b.iter(|| cached.net_balance(black_box(&who)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_net_balance);
criterion_main!(benches);
