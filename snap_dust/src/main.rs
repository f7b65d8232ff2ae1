//! snap_dust — interactive entry point.

use clap::Parser;
use snap_dust::app::{run, AppConfig};
use snap_core::PipelineConfig;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Snap your fingers to turn your hand into dust
#[derive(Parser, Debug)]
#[command(name = "snap_dust")]
#[command(about = "Hand tracking demo with snap detection and a dust effect", long_about = None)]
struct Args {
    /// Canvas width in pixels
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Sampling block side in pixels (smaller = more particles)
    #[arg(short, long, default_value_t = 4)]
    density: usize,

    /// Downward acceleration of the dust, px/s²
    #[arg(short, long, default_value_t = 240.0)]
    gravity: f32,

    /// Thumb-index gap that counts as open, px
    #[arg(long, default_value_t = 50.0)]
    high: f32,

    /// Thumb-index gap that counts as closed, px
    #[arg(long, default_value_t = 20.0)]
    low: f32,

    /// Minimum time between snaps, milliseconds
    #[arg(long, default_value_t = 1000)]
    cooldown_ms: u64,

    /// Shade the captured silhouette under the skeleton while tracking
    #[arg(short, long)]
    show_silhouette: bool,

    /// Upper bound on seeded particles
    #[arg(short, long, default_value_t = 20_000)]
    max_particles: usize,
}

impl Args {
    fn into_config(self) -> AppConfig {
        let mut pipeline = PipelineConfig::with_canvas(self.width, self.height);
        pipeline.thresholds.high     = self.high;
        pipeline.thresholds.low      = self.low;
        pipeline.thresholds.cooldown = Duration::from_millis(self.cooldown_ms);
        pipeline.dust.density        = self.density;
        pipeline.dust.gravity        = self.gravity;
        pipeline.dust.max_particles  = self.max_particles;
        pipeline.render.show_silhouette = self.show_silhouette;
        AppConfig { pipeline }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args = Args::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Snap Dust — snap your fingers, turn to dust           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(args.into_config()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
