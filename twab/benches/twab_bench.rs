use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gauge_twab::Account;
use gauge_types::Timestamp;

fn make_account(checkpoints: u32) -> Account {
    let mut account = Account::new(checkpoints);
    for i in 0..checkpoints {
        account
            .increase_balance(1_000 + i as u128, Timestamp::new(i * 60))
            .unwrap();
    }
    account
}

fn bench_balance_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("twab_balance_at");

    for count in [16, 256, 4096, 65536] {
        let account = make_account(count);
        let now = Timestamp::new(count * 60);
        let target = Timestamp::new(count * 30 + 7);

        group.bench_with_input(BenchmarkId::new("balance_at", count), &count, |b, _| {
            b.iter(|| black_box(account.balance_at(black_box(target), black_box(now))));
        });
    }

    group.finish();
}

fn bench_average_between(c: &mut Criterion) {
    let mut group = c.benchmark_group("twab_average");

    for count in [16, 256, 4096, 65536] {
        let account = make_account(count);
        let now = Timestamp::new(count * 60);
        let start = Timestamp::new(count * 15);
        let end = Timestamp::new(count * 45);

        group.bench_with_input(
            BenchmarkId::new("average_balance_between", count),
            &count,
            |b, _| {
                b.iter(|| {
                    black_box(
                        account
                            .average_balance_between(black_box(start), black_box(end), now)
                            .unwrap(),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_insert_wrapped(c: &mut Criterion) {
    c.bench_function("twab_insert_wrapped_ring", |b| {
        let mut account = make_account(1024);
        let mut t = 1024 * 60;
        b.iter(|| {
            t += 1;
            black_box(account.increase_balance(1, Timestamp::new(t)).unwrap());
        });
    });
}

criterion_group!(benches, bench_balance_at, bench_average_between, bench_insert_wrapped);
criterion_main!(benches);
