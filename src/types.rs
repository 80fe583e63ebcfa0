use serde::{Deserialize, Serialize};

// Eigen-like aliases.
pub type Vector2d = nalgebra::Vector2::<f64>;
pub type Vector2i = nalgebra::Vector2::<i32>;
pub type Matrixd = nalgebra::DMatrix::<f64>;

// Frame timestamp in microseconds. The tracker only relies on ordering.
pub type Timestamp = i64;

// One accepted position of the tracked point. The host owns the sequence of
// these and persists it; the template timeline is derived data.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TimedPoint {
  pub time: Timestamp,
  pub point: Vector2d,
}

pub fn round_to_pixel(p: &Vector2d) -> Vector2i {
  Vector2i::new(p[0].round() as i32, p[1].round() as i32)
}
