use blidar::scan::{ArtifactSlot, DEFAULT_EXPORT_NAME, ManualScheduler, PointCloudSink};
use blidar::scene::SceneDescription;
use blidar::{Lidar, PointCloudFeatures, SensorConfig, TickOutcome};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blidar", version, about = "Simulated 2D LIDAR scans of 3D scenes")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run a scan session over a scene and export the last sweep as CSV
    Scan {
        /// Scene description (JSON)
        #[arg(long)]
        scene: PathBuf,

        /// Sensor configuration (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Name of the scene object to use as the sensor
        #[arg(long)]
        sensor: String,

        /// Number of ticks to run before exporting
        #[arg(long, default_value_t = 1)]
        ticks: usize,

        /// Seed for reproducible noise
        #[arg(long)]
        seed: Option<u64>,

        /// Output CSV path
        #[arg(long, default_value = DEFAULT_EXPORT_NAME)]
        output: PathBuf,

        /// Wait one scan period between ticks
        #[arg(long)]
        realtime: bool,
    },

    /// Print the default sensor configuration as JSON
    DefaultConfig,
}

fn main() -> blidar::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Scan {
            scene,
            config,
            sensor,
            ticks,
            seed,
            output,
            realtime,
        } => {
            let scene = SceneDescription::from_json_file(&scene)?.build()?;
            let entity = scene
                .find(&sensor)
                .ok_or_else(|| format!("no object named '{}' in the scene", sensor))?;

            let mut lidar = match seed {
                Some(s) => Lidar::with_seed(s),
                None => Lidar::new(),
            };
            if let Some(path) = config {
                lidar.load_config(&path)?;
            }
            lidar.assign(&scene, Some(entity))?;

            let mut sink = ArtifactSlot::new();
            let mut scheduler = ManualScheduler::new();
            lidar.start(&sink, &mut scheduler)?;
            let period = lidar.config().period()?;

            for i in 0..ticks {
                if realtime && i > 0 {
                    std::thread::sleep(period);
                }
                match lidar.tick(&scene, &mut sink, &mut scheduler) {
                    TickOutcome::Published { points } => info!(tick = i, points, "sweep"),
                    TickOutcome::Skipped(e) => warn!(tick = i, error = %e, "sweep skipped"),
                    TickOutcome::Cancelled | TickOutcome::Idle => break,
                }
            }

            let written = lidar.export(&sink, &output)?;
            if let Some(cloud) = sink.current() {
                let aabb = cloud.aabb();
                println!(
                    "wrote {} points to {} (bounds {:?} to {:?})",
                    written,
                    output.display(),
                    aabb.mins.coords.as_slice(),
                    aabb.maxs.coords.as_slice()
                );
            }

            lidar.stop(&mut sink);
            lidar.tick(&scene, &mut sink, &mut scheduler);
        }
        Cmd::DefaultConfig => {
            println!(
                "{}",
                serde_json::to_string_pretty(&SensorConfig::default())?
            );
        }
    }

    Ok(())
}
