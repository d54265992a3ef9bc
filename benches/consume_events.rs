use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use multest::event::{EventHeader, McEvent, Track};
use multest::task::{MultEstTask, TaskConfig};

/// A plausible minimum-bias event: mostly pions over a wide eta range.
fn make_event(rng: &mut StdRng, n_tracks: usize) -> McEvent {
    let mut event = McEvent::new(Some(EventHeader::pythia(1.0, 3)), n_tracks);
    for _ in 0..n_tracks {
        let pdg = if rng.random::<f64>() < 0.8 { 211 } else { 310 };
        event.push_track(
            Track {
                eta: rng.random_range(-8.0..8.0),
                pt: rng.random_range(0.05..5.0),
                charge: if pdg == 310 { 0 } else { 1 },
                pdg,
            },
            None,
            true,
        );
    }
    event
}

fn bench_consume(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let events: Vec<McEvent> = (0..256).map(|_| make_event(&mut rng, 60)).collect();
    let config = TaskConfig {
        estimators: "EtaLt05,EtaLt08,EtaLt15,Eta08_15,V0A,V0C,V0M,Total".into(),
        require_inel_gt0: true,
    };

    c.bench_function("consume_256_events_8_estimators", |b| {
        b.iter_batched(
            || MultEstTask::new(&config).unwrap(),
            |mut task| {
                for event in &events {
                    task.consume(black_box(event));
                }
                task.into_output()
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_consume);
criterion_main!(benches);
