use crate::all::*;

lazy_static! {
  pub static ref PARAMETER_SET: Mutex<TrackingParameters> = Mutex::new(TrackingParameters::default());
}

#[derive(Clone, Debug)]
#[derive(clap::Parser)]
pub struct TrackingParameters {
  // Neighborhood searched around the previous point, pixels.
  #[clap(long, default_value = "100")]
  pub search_win_width: usize,
  #[clap(long, default_value = "100")]
  pub search_win_height: usize,

  // Template patch size, pixels.
  #[clap(long, default_value = "20")]
  pub block_win_width: usize,
  #[clap(long, default_value = "20")]
  pub block_win_height: usize,

  // Minimum normalized score to accept a match.
  #[clap(long, default_value = "0.5")]
  pub similarity_threshold: f64,
  // Score above which the reference template is kept as-is instead of being
  // re-captured from the current frame.
  #[clap(long, default_value = "0.8")]
  pub template_update_threshold: f64,

  // Overlay.
  #[clap(long)]
  pub show_handles: bool,
  #[clap(long)]
  pub show_debug_label: bool,
}

impl Default for TrackingParameters {
  fn default() -> TrackingParameters {
    TrackingParameters {
      search_win_width: 100,
      search_win_height: 100,
      block_win_width: 20,
      block_win_height: 20,
      similarity_threshold: 0.5,
      template_update_threshold: 0.8,
      show_handles: false,
      show_debug_label: false,
    }
  }
}
