//! Benchmark the obstacle pipeline and twist arbitration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use raksha::avoidance::{ArbiterConfig, VelocityArbiter};
use raksha::perception::{
    ClusterConfig, LidarExtrinsics, LidarFrameAggregator, LidarSource, build_obstacles, cluster,
};
use raksha::{LidarFrame, ObstacleBoard, ObstacleDetector, ObstacleSet, Point2D, Twist};

/// A room-like scan: walls at varying range with a few gaps.
fn create_frame(beams: usize) -> LidarFrame {
    let angles: Vec<f32> = (0..beams)
        .map(|i| -std::f32::consts::PI + i as f32 * std::f32::consts::TAU / beams as f32)
        .collect();
    let distances = angles
        .iter()
        .map(|a| 1.5 + 0.8 * (a * 3.0).sin().abs())
        .collect();
    LidarFrame::new("laser", angles, distances)
}

fn create_points(frame: &LidarFrame) -> Vec<Point2D> {
    let ext = LidarExtrinsics::default();
    frame
        .angles
        .iter()
        .zip(&frame.distances)
        .map(|(&a, &d)| ext.transform(a, d))
        .collect()
}

fn bench_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");
    let config = ClusterConfig::default();

    for beams in [90, 180, 360].iter() {
        let points = create_points(&create_frame(*beams));
        group.bench_with_input(BenchmarkId::from_parameter(beams), beams, |b, _| {
            b.iter(|| {
                let clusters = cluster(black_box(&points), &config);
                black_box(build_obstacles(&clusters))
            })
        });
    }

    group.finish();
}

fn bench_detector_cycle(c: &mut Criterion) {
    let extrinsics = HashMap::from([("laser".to_string(), LidarExtrinsics::default())]);
    let aggregator = LidarFrameAggregator::new(
        vec![LidarSource::new("scan", "laser")],
        extrinsics,
        Duration::from_millis(50),
    );
    let mut detector = ObstacleDetector::new(aggregator, ClusterConfig::default(), ObstacleBoard::new());
    let frame = create_frame(360);

    c.bench_function("detector_cycle_360", |b| {
        b.iter(|| black_box(detector.on_frame("scan", frame.clone(), Instant::now())))
    });
}

fn bench_arbitration(c: &mut Criterion) {
    let mut group = c.benchmark_group("arbitration");
    let obstacles: ObstacleSet = {
        let points = create_points(&create_frame(360));
        build_obstacles(&cluster(&points, &ClusterConfig::default()))
    };
    let arbiter = VelocityArbiter::new(ArbiterConfig::default());
    let command = Twist::new(0.3, 0.0);

    group.bench_function("plain", |b| {
        b.iter(|| black_box(arbiter.arbitrate(black_box(command), &obstacles)))
    });
    group.bench_function("smart", |b| {
        b.iter(|| black_box(arbiter.smart_arbitrate(black_box(command), &obstacles)))
    });

    group.finish();
}

criterion_group!(benches, bench_clustering, bench_detector_cycle, bench_arbitration);
criterion_main!(benches);
