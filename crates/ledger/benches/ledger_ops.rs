use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lagerscan_core::{Price, TagId};
use lagerscan_ledger::{Intake, Ledger};

fn populated_ledger(n: usize) -> Ledger {
    let mut ledger = Ledger::new();
    for i in 0..n {
        ledger
            .intake(Intake {
                tag: TagId::parse(&format!("TAG-{i}")).unwrap(),
                material: format!("Material {i}"),
                supplier: Some("Acme".to_string()),
                price: Price::ZERO,
                occurred_at: Utc::now(),
            })
            .unwrap();
    }
    ledger
}

fn bench_ledger_ops(c: &mut Criterion) {
    c.bench_function("intake_1000", |b| {
        b.iter(|| black_box(populated_ledger(1000)))
    });

    let ledger = populated_ledger(1000);
    let last = TagId::parse("TAG-999").unwrap();
    c.bench_function("find_active_worst_case_1000", |b| {
        b.iter(|| black_box(ledger.find_active(&last)))
    });

    c.bench_function("current_stock_1000", |b| {
        b.iter(|| black_box(ledger.current_stock().len()))
    });

    c.bench_function("consume_then_reintake", |b| {
        b.iter_batched(
            || populated_ledger(100),
            |mut ledger| {
                let tag = TagId::parse("TAG-50").unwrap();
                ledger.consume(&tag, Utc::now()).unwrap();
                ledger
                    .intake(Intake {
                        tag,
                        material: "Restock".to_string(),
                        supplier: None,
                        price: Price::ZERO,
                        occurred_at: Utc::now(),
                    })
                    .unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_ledger_ops);
criterion_main!(benches);
