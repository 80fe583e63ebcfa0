mod all;
mod gizmo;
mod image;
mod matcher;
mod parameters;
mod synthetic;
mod template;
mod timeline;
mod tracker;
mod types;
mod update;
mod util;

use all::*;

#[macro_use] extern crate lazy_static;
use clap::Parser;

// Demo driver: tracks a synthetic moving marker through a generated sequence
// and optionally writes the accepted points as JSONL.
#[derive(Parser)]
struct Args {
  #[clap(long, default_value = "60")]
  frames: usize,
  #[clap(long, default_value = "640")]
  width: usize,
  #[clap(long, default_value = "480")]
  height: usize,
  #[clap(long, default_value = "6.0")]
  radius: f64,
  #[clap(long, default_value = "4")]
  noise: u8,
  #[clap(long, default_value = "7")]
  seed: u64,
  // Output path for the accepted track points, one JSON object per line.
  #[clap(short, long)]
  output: Option<String>,
  #[clap(long)]
  verbose: bool,
  #[clap(flatten)]
  parameters: TrackingParameters,
}

fn handle_error(err: &anyhow::Error) {
  for (i, e) in err.chain().enumerate() {
    println!("  {}: {}", i + 1, e);
  }
}

fn main() {
  if let Err(err) = run() {
    handle_error(&err);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  env_logger::Builder::new()
    .filter_level(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info })
    .format(util::format_log)
    .init();
  *PARAMETER_SET.lock().unwrap() = args.parameters.clone();

  let start = Vector2d::new(args.width as f64 / 4., args.height as f64 / 4.);
  let velocity = Vector2d::new(2.4, 1.1);
  let sequence = moving_blob_sequence(
    args.frames, args.width, args.height, start, velocity, args.radius, args.noise, args.seed);
  let (first_time, first_image) = sequence.first()
    .ok_or(anyhow!("Empty sequence, nothing to track."))?;

  let mut tracker = Tracker::new(args.parameters.clone())?;
  let mut accepted = vec![TimedPoint { time: *first_time, point: start }];
  tracker.create_reference(accepted[0], first_image);
  info!("Reference placed at {:.1},{:.1}.", start[0], start[1]);

  let mut failures = 0;
  for (time, image) in &sequence[1..] {
    if !tracker.is_ready() {
      warn!("Tracker not ready, stopping.");
      break;
    }
    let (point, ok) = tracker.track_step(&accepted, *time, Some(image));
    if !ok { failures += 1 }
    let show_label = PARAMETER_SET.lock().unwrap().show_debug_label;
    if show_label {
      if let Some(template) = tracker.closest_from(*time) {
        info!("t={} {}", time, debug_label(template));
      }
    }
    // The host accepts failed steps too; the point just did not move.
    accepted.push(point);
  }
  info!("Tracked {} frames, {} low-confidence.", accepted.len() - 1, failures);

  // Overlay for the final frame, the way a host UI would draw it each frame.
  if let (Some(last), Some((_, image))) = (accepted.last(), sequence.last()) {
    let mut overlay: Vec<u32> = image.data.iter().map(|g| {
      let g = *g as u32;
      g | (g << 8) | (g << 16)
    }).collect();
    let mut gizmo_args = GizmoArgs {
      buffer: &mut overlay,
      buffer_w: image.width,
      buffer_h: image.height,
      scale: 1.,
      offset: Vector2d::new(0., 0.),
    };
    let p = PARAMETER_SET.lock().unwrap().clone();
    draw_gizmo(&mut gizmo_args, last.point, &p, p.show_handles);
    debug!("Drew overlay around {:.1},{:.1}.", last.point[0], last.point[1]);
  }

  if let Some(path) = &args.output {
    let mut file = File::create(path)
      .context(format!("Failed to create output file {}", path))?;
    for point in &accepted {
      writeln!(file, "{}", serde_json::to_string(point)?)?;
    }
    info!("Wrote {} points to {}.", accepted.len(), path);
  }
  Ok(())
}
