use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use agendalive::{core::Agenda, item::AgendaItem, remote::records::ItemRecord};

fn sparse_agenda(len: i64) -> Agenda {
    let mut agenda = Agenda::new(1, "bench");
    for i in 0..len {
        agenda
            .add_item(AgendaItem::from_record(ItemRecord {
                id: i + 1,
                sortkey: i * 7 + 3,
                is_header: i % 10 == 0,
                label: format!("item {i}"),
                arrangement_id: None,
            }))
            .expect("insert");
    }
    agenda
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("agenda_build_1k", |b| {
        b.iter(|| sparse_agenda(1_000));
    });
}

fn bench_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("position_roundtrip");

    for len in [10i64, 100, 1_000] {
        let agenda = sparse_agenda(len);
        let last = agenda.last_position_id();
        group.bench_with_input(BenchmarkId::from_parameter(len), &agenda, |b, agenda| {
            b.iter(|| {
                for p in 0..=last + 1 {
                    let sortkey = agenda.sortkey_from_position_id(black_box(p));
                    black_box(agenda.position_id_from_sortkey(sortkey));
                }
            });
        });
    }

    group.finish();
}

fn bench_neighbours(c: &mut Criterion) {
    let agenda = sparse_agenda(1_000);
    let middle = agenda.last_position_id() / 2;
    c.bench_function("item_at_position_middle", |b| {
        b.iter(|| black_box(agenda.item_at_position(black_box(middle))));
    });
}

criterion_group!(benches, bench_build, bench_translation, bench_neighbours);
criterion_main!(benches);
