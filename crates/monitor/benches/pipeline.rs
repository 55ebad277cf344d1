use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dms::{EyeMeasurement, HeadMeasurement, MouthMeasurement, PhoneEvidence};
use monitor::{DriverMonitor, FrameInput, MonitorConfig};

fn frame(i: u64) -> FrameInput {
    FrameInput {
        timestamp_secs: i as f64 / 30.0,
        eye: EyeMeasurement::visible(if i % 90 < 50 { 0.1 } else { 0.3 }),
        head: HeadMeasurement::visible((i % 60) as f64 - 30.0, 0.0),
        mouth: MouthMeasurement::visible(0.2),
        phone: PhoneEvidence {
            object_detected: i % 7 == 0,
            hand_detected: true,
            hand_raised: i % 3 == 0,
            ..Default::default()
        },
        detections: None,
    }
}

fn benchmark_process_frame(c: &mut Criterion) {
    let mut monitor = DriverMonitor::new(&MonitorConfig::default()).unwrap();
    let frames: Vec<FrameInput> = (0..900).map(frame).collect();
    let mut index = 0;

    c.bench_function("driver_monitor_process", |b| {
        b.iter(|| {
            let outcome = monitor.process(black_box(&frames[index % frames.len()]));
            index += 1;
            black_box(outcome)
        })
    });
}

criterion_group!(benches, benchmark_process_frame);
criterion_main!(benches);
