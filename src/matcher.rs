use crate::all::*;

// Sub-pixel refinement is skipped when the best cell is closer than this to
// the similarity map edge, since the parabola needs both neighbors.
const REFINE_EDGE_MARGIN: usize = 1;
// Scores at or above this are treated as exact hits without usable curvature.
const REFINE_SKIP_SCORE: f64 = 1.0;
// Tolerance above the theoretical maximum before a masked result is
// considered numerically broken.
const SCORE_OVERSHOOT_EPS: f64 = 1e-6;

// Outcome of one correlation pass. A zero-score engine failure is distinct
// from a low but genuinely computed score.
#[derive(Clone, Copy, Debug)]
pub enum MatchOutcome {
  // The correlation produced no usable value.
  EngineFailure,
  // Valid computation, best score under the similarity threshold.
  LowScore { score: f64 },
  Success { score: f64, point: Vector2d },
}

impl MatchOutcome {
  pub fn score(&self) -> f64 {
    match self {
      MatchOutcome::EngineFailure => 0.,
      MatchOutcome::LowScore { score } => *score,
      MatchOutcome::Success { score, .. } => *score,
    }
  }

  // Failed matches freeze the point at the caller-supplied location.
  pub fn point_or(&self, fallback: Vector2d) -> Vector2d {
    match self {
      MatchOutcome::Success { point, .. } => *point,
      _ => fallback,
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, MatchOutcome::Success { .. })
  }
}

// Masked normalized cross-correlation matcher. The elliptical mask is cached
// across calls and rebuilt only when the template size changes.
pub struct Matcher {
  mask: Matrixd,
  mask_size: [usize; 2],
  mask_rebuilds: usize,
}

impl Matcher {
  pub fn new() -> Matcher {
    Matcher {
      mask: Matrixd::zeros(0, 0),
      mask_size: [0, 0],
      mask_rebuilds: 0,
    }
  }

  pub fn mask_rebuilds(&self) -> usize {
    self.mask_rebuilds
  }

  pub fn match_template(
    &mut self,
    image: &Image,
    template: &Image,
    last_point: Vector2d,
    p: &TrackingParameters,
  ) -> MatchOutcome {
    // All box geometry derives from the integer-aligned point. Sub-pixel
    // offsets of earlier results never feed back into the search geometry;
    // only the final refined location is sub-pixel.
    let aligned = round_to_pixel(&last_point);
    let search = Rect::centered(aligned, p.search_win_width, p.search_win_height)
      .intersect(image.width, image.height);
    if search.w < template.width || search.h < template.height {
      warn!("Search window at {:?} too small for the template, cannot match.", aligned);
      return MatchOutcome::EngineFailure;
    }
    self.update_mask(template.width, template.height);

    let map_w = search.w - template.width + 1;
    let map_h = search.h - template.height + 1;
    let mut map = Matrixd::zeros(map_h, map_w);
    fill_similarity_map(&mut map, image, template, &search, Some(&self.mask));
    let (mut best, mut bx, mut by) = map_maximum(&map);

    // Near image borders the masked denominators can collapse. A plain
    // unmasked pass matches the reference backend behavior for that case.
    if !best.is_finite() || best > REFINE_SKIP_SCORE + SCORE_OVERSHOOT_EPS {
      fill_similarity_map(&mut map, image, template, &search, None);
      (best, bx, by) = map_maximum(&map);
    }

    if !best.is_finite() {
      warn!("Correlation produced no finite score around {:?}.", aligned);
      return MatchOutcome::EngineFailure;
    }
    if best < p.similarity_threshold {
      return MatchOutcome::LowScore { score: best };
    }

    let mut mx = bx as f64;
    let mut my = by as f64;
    if refinable(bx, by, map_w, map_h, best) {
      mx += parabola_vertex(map[(by, bx - 1)], best, map[(by, bx + 1)]);
      my += parabola_vertex(map[(by - 1, bx)], best, map[(by + 1, bx)]);
    }
    // Back to absolute image coordinates: map cell (0, 0) places the
    // template at the search rectangle origin.
    let point = Vector2d::new(
      (search.x + (template.width / 2) as i32) as f64 + mx,
      (search.y + (template.height / 2) as i32) as f64 + my,
    );
    MatchOutcome::Success { score: best, point }
  }

  fn update_mask(&mut self, w: usize, h: usize) {
    if self.mask_size == [w, h] { return }
    self.mask = elliptical_mask(w, h);
    self.mask_size = [w, h];
    self.mask_rebuilds += 1;
  }
}

// Binary ellipse inscribed in the template rectangle. Suppresses matching on
// background pixels outside the expected footprint of the marker.
fn elliptical_mask(w: usize, h: usize) -> Matrixd {
  let rx = w as f64 / 2.;
  let ry = h as f64 / 2.;
  let cx = (w as f64 - 1.) / 2.;
  let cy = (h as f64 - 1.) / 2.;
  Matrixd::from_fn(h, w, |y, x| {
    let dx = (x as f64 - cx) / rx;
    let dy = (y as f64 - cy) / ry;
    if dx * dx + dy * dy <= 1. { 1. } else { 0. }
  })
}

// Zero-mean normalized cross-correlation of the template against every
// placement inside the search rectangle. With a mask, only pixels under the
// ellipse contribute. Flat patches produce NaN cells (0/0), which the caller
// classifies instead of papering over.
fn fill_similarity_map(
  map: &mut Matrixd,
  image: &Image,
  template: &Image,
  search: &Rect,
  mask: Option<&Matrixd>,
) {
  let tw = template.width;
  let th = template.height;
  let weight = |x: usize, y: usize| -> f64 {
    match mask {
      Some(m) => m[(y, x)],
      None => 1.,
    }
  };

  // Template statistics do not depend on the placement.
  let mut count = 0.;
  let mut t_sum = 0.;
  for y in 0..th {
    for x in 0..tw {
      let w = weight(x, y);
      count += w;
      t_sum += w * template.value(x, y) as f64;
    }
  }
  if count == 0. {
    map.fill(f64::NAN);
    return;
  }
  let t_mean = t_sum / count;
  let mut t_var = 0.;
  for y in 0..th {
    for x in 0..tw {
      let d = template.value(x, y) as f64 - t_mean;
      t_var += weight(x, y) * d * d;
    }
  }

  for v in 0..map.nrows() {
    for u in 0..map.ncols() {
      let ax = search.x as usize + u;
      let ay = search.y as usize + v;
      let mut i_sum = 0.;
      for y in 0..th {
        for x in 0..tw {
          i_sum += weight(x, y) * image.value(ax + x, ay + y) as f64;
        }
      }
      let i_mean = i_sum / count;
      let mut num = 0.;
      let mut i_var = 0.;
      for y in 0..th {
        for x in 0..tw {
          let w = weight(x, y);
          let di = image.value(ax + x, ay + y) as f64 - i_mean;
          let dt = template.value(x, y) as f64 - t_mean;
          num += w * di * dt;
          i_var += w * di * di;
        }
      }
      map[(v, u)] = num / (t_var * i_var).sqrt();
    }
  }
}

// Global maximum and its cell. NaN cells never win the comparison; if every
// cell is NaN the returned value stays non-finite.
fn map_maximum(map: &Matrixd) -> (f64, usize, usize) {
  let mut best = f64::NEG_INFINITY;
  let mut bx = 0;
  let mut by = 0;
  for v in 0..map.nrows() {
    for u in 0..map.ncols() {
      if map[(v, u)] > best {
        best = map[(v, u)];
        bx = u;
        by = v;
      }
    }
  }
  (best, bx, by)
}

fn refinable(bx: usize, by: usize, map_w: usize, map_h: usize, best: f64) -> bool {
  bx >= REFINE_EDGE_MARGIN
    && bx + REFINE_EDGE_MARGIN < map_w
    && by >= REFINE_EDGE_MARGIN
    && by + REFINE_EDGE_MARGIN < map_h
    && best < REFINE_SKIP_SCORE
}

// Vertex of the parabola through (-1, l), (0, c), (1, r), in -b/(2a) form.
// Flat neighborhoods give no offset.
fn parabola_vertex(l: f64, c: f64, r: f64) -> f64 {
  let denom = 2. * (l + r - 2. * c);
  if denom.abs() < 1e-12 { return 0. }
  (l - r) / denom
}
