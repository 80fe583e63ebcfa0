use crate::all::*;

use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const BACKGROUND: f64 = 40.;
const BLOB_PEAK: f64 = 190.;

// Frame interval for the generated sequences, microseconds (30 fps).
pub const FRAME_INTERVAL: Timestamp = 33_333;

// Gaussian blob marker on a flat background. The center may be sub-pixel.
pub fn blob_frame(width: usize, height: usize, center: Vector2d, radius: f64) -> Image {
  let mut image = Image::filled(width, height, BACKGROUND as u8);
  for y in 0..height {
    for x in 0..width {
      let d = Vector2d::new(x as f64, y as f64) - center;
      let d2 = d.norm_squared();
      if d2 > (4. * radius) * (4. * radius) { continue }
      let v = BACKGROUND + BLOB_PEAK * (-d2 / (2. * radius * radius)).exp();
      image.set_value(x, y, v.round() as u8);
    }
  }
  image
}

// Adds symmetric uniform noise, deterministic for a given seed.
pub fn add_noise(image: &mut Image, amplitude: u8, seed: u64) {
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
  let a = amplitude as i16;
  for v in &mut image.data {
    let n = rng.gen_range(-a..=a);
    *v = (*v as i16 + n).clamp(0, 255) as u8;
  }
}

// Marker moving at constant velocity, timestamped at the frame interval.
pub fn moving_blob_sequence(
  frames: usize,
  width: usize,
  height: usize,
  start: Vector2d,
  velocity: Vector2d,
  radius: f64,
  noise: u8,
  seed: u64,
) -> Vec<(Timestamp, Image)> {
  (0..frames).map(|i| {
    let center = start + velocity * i as f64;
    let mut image = blob_frame(width, height, center, radius);
    if noise > 0 {
      add_noise(&mut image, noise, seed.wrapping_add(i as u64));
    }
    (i as Timestamp * FRAME_INTERVAL, image)
  }).collect()
}
