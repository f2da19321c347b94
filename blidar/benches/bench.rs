use blidar::scene::Scene;
use blidar::sensors::{SensorKind, SensorPose, beam_angles, sweep};
use blidar::{Point3, SensorConfig, Transform, Vector3};
use divan::{Bencher, black_box};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() {
    // Run registered benchmarks.
    divan::main();
}

/// A closed 20 x 20 x 4 room of box walls around the origin
fn room() -> Scene {
    let mut scene = Scene::new();
    let walls = [
        (0.0, 10.0, 10.0, 0.1),
        (0.0, -10.0, 10.0, 0.1),
        (10.0, 0.0, 0.1, 10.0),
        (-10.0, 0.0, 0.1, 10.0),
    ];
    for (i, (x, y, hx, hy)) in walls.into_iter().enumerate() {
        scene
            .add_box(
                &format!("wall{}", i),
                None,
                Transform::from_translation(x, y, 0.0),
                hx,
                hy,
                2.0,
            )
            .unwrap();
    }
    scene
}

#[divan::bench(args = [360, 1440, 5760])]
fn generate_beams(n: usize) -> Vec<f64> {
    beam_angles(black_box(360.0), black_box(n))
}

/// A full noisy sweep of a mesh sensor in the middle of the room
#[divan::bench(args = [360, 1440, 5760])]
fn sweep_room(bencher: Bencher, n: usize) {
    let scene = room();
    let pose = SensorPose::new(Point3::origin(), -Vector3::y_axis(), Vector3::z_axis());
    let config = SensorConfig {
        resolution: n,
        range: 30.0,
        ..SensorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(0);

    bencher.bench_local(move || {
        sweep(
            black_box(&config),
            &pose,
            SensorKind::Mesh,
            &scene,
            &mut rng,
        )
    });
}
