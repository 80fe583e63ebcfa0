use crate::all::*;

const COLOR_SEARCH: u32 = 0x00_80ff80;
const COLOR_BLOCK: u32 = 0x00_ffff40;
const COLOR_MASK: u32 = 0x00_40c0ff;
const COLOR_HANDLE: u32 = 0x00_ffffff;

const HANDLE_RADIUS: i32 = 2;

// Overlay target plus the image-to-viewport mapping. Purely presentational:
// every draw degrades silently on bad input instead of failing.
pub struct GizmoArgs<'a> {
  pub buffer: &'a mut Vec<u32>,
  pub buffer_w: usize,
  pub buffer_h: usize,
  pub scale: f64,
  pub offset: Vector2d,
}

impl<'a> GizmoArgs<'a> {
  fn valid(&self) -> bool {
    self.scale.is_finite() && self.scale > 0.
      && self.offset[0].is_finite() && self.offset[1].is_finite()
      && self.buffer.len() >= self.buffer_w * self.buffer_h
  }

  fn to_viewport(&self, p: Vector2d) -> Vector2i {
    round_to_pixel(&(p * self.scale + self.offset))
  }
}

// Draws the search window, the template window and the correlation mask
// ellipse around the tracked point. Corner handles are added in interactive
// configuration mode.
pub fn draw_gizmo(args: &mut GizmoArgs, point: Vector2d, p: &TrackingParameters, interactive: bool) {
  if !args.valid() { return }
  let c = round_to_pixel(&point);
  let search = Rect::centered(c, p.search_win_width, p.search_win_height);
  let block = Rect::centered(c, p.block_win_width, p.block_win_height);
  draw_rect(args, search, COLOR_SEARCH);
  draw_rect(args, block, COLOR_BLOCK);
  draw_ellipse(args, block, COLOR_MASK);
  if interactive {
    for corner in rect_corners(search) {
      let q = args.to_viewport(corner);
      draw_filled_square(args, q, COLOR_HANDLE, HANDLE_RADIUS);
    }
  }
}

// Score and provenance readout for the host to render next to the gizmo.
pub fn debug_label(template: &TrackingTemplate) -> String {
  let source = match template.source {
    TemplateSource::Manual => "manual",
    TemplateSource::Auto => "auto",
  };
  format!("{:.3} {}", template.score, source)
}

fn rect_corners(r: Rect) -> [Vector2d; 4] {
  let x0 = r.x as f64;
  let y0 = r.y as f64;
  let x1 = (r.x + r.w as i32) as f64;
  let y1 = (r.y + r.h as i32) as f64;
  [
    Vector2d::new(x0, y0),
    Vector2d::new(x1, y0),
    Vector2d::new(x0, y1),
    Vector2d::new(x1, y1),
  ]
}

#[inline(always)]
fn draw_pixel(args: &mut GizmoArgs, p: Vector2i, v: u32) {
  if p[0] < 0 || p[0] >= args.buffer_w as i32 { return }
  if p[1] < 0 || p[1] >= args.buffer_h as i32 { return }
  args.buffer[p[1] as usize * args.buffer_w + p[0] as usize] = v;
}

fn draw_filled_square(args: &mut GizmoArgs, p: Vector2i, v: u32, r: i32) {
  for y in (-r)..(r + 1) {
    for x in (-r)..(r + 1) {
      draw_pixel(args, p + Vector2i::new(x, y), v);
    }
  }
}

fn draw_rect(args: &mut GizmoArgs, r: Rect, v: u32) {
  let p0 = args.to_viewport(Vector2d::new(r.x as f64, r.y as f64));
  let p1 = args.to_viewport(Vector2d::new((r.x + r.w as i32) as f64, (r.y + r.h as i32) as f64));
  for x in p0[0]..=p1[0] {
    draw_pixel(args, Vector2i::new(x, p0[1]), v);
    draw_pixel(args, Vector2i::new(x, p1[1]), v);
  }
  for y in p0[1]..=p1[1] {
    draw_pixel(args, Vector2i::new(p0[0], y), v);
    draw_pixel(args, Vector2i::new(p1[0], y), v);
  }
}

// Ellipse inscribed in the rectangle, sampled densely enough that adjacent
// samples land on neighboring pixels.
fn draw_ellipse(args: &mut GizmoArgs, r: Rect, v: u32) {
  let cx = r.x as f64 + r.w as f64 / 2.;
  let cy = r.y as f64 + r.h as f64 / 2.;
  let rx = r.w as f64 / 2.;
  let ry = r.h as f64 / 2.;
  let steps = ((rx.max(ry) * args.scale * 8.) as usize).max(16);
  for i in 0..steps {
    let a = 2. * std::f64::consts::PI * i as f64 / steps as f64;
    let p = Vector2d::new(cx + rx * a.cos(), cy + ry * a.sin());
    let q = args.to_viewport(p);
    draw_pixel(args, q, v);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn small_params() -> TrackingParameters {
    TrackingParameters {
      search_win_width: 20,
      search_win_height: 20,
      block_win_width: 8,
      block_win_height: 8,
      ..TrackingParameters::default()
    }
  }

  #[test]
  fn test_draw_writes_search_rect() {
    let mut buffer = vec![0u32; 64 * 64];
    let mut args = GizmoArgs {
      buffer: &mut buffer,
      buffer_w: 64,
      buffer_h: 64,
      scale: 1.,
      offset: Vector2d::new(0., 0.),
    };
    draw_gizmo(&mut args, Vector2d::new(32., 32.), &small_params(), false);
    // Top-left corner of the search window at (22, 22).
    assert_eq!(buffer[22 * 64 + 22], COLOR_SEARCH);
    assert!(buffer.iter().any(|v| *v == COLOR_BLOCK));
    assert!(buffer.iter().any(|v| *v == COLOR_MASK));
    assert!(!buffer.iter().any(|v| *v == COLOR_HANDLE));
  }

  #[test]
  fn test_interactive_draws_handles() {
    let mut buffer = vec![0u32; 64 * 64];
    let mut args = GizmoArgs {
      buffer: &mut buffer,
      buffer_w: 64,
      buffer_h: 64,
      scale: 1.,
      offset: Vector2d::new(0., 0.),
    };
    draw_gizmo(&mut args, Vector2d::new(32., 32.), &small_params(), true);
    assert!(buffer.iter().any(|v| *v == COLOR_HANDLE));
  }

  #[test]
  fn test_degrades_silently() {
    // Invalid transform.
    let mut buffer = vec![0u32; 16];
    let mut args = GizmoArgs {
      buffer: &mut buffer,
      buffer_w: 4,
      buffer_h: 4,
      scale: 0.,
      offset: Vector2d::new(0., 0.),
    };
    draw_gizmo(&mut args, Vector2d::new(2., 2.), &small_params(), true);
    assert!(buffer.iter().all(|v| *v == 0));

    // Point far outside the viewport.
    let mut buffer = vec![0u32; 16];
    let mut args = GizmoArgs {
      buffer: &mut buffer,
      buffer_w: 4,
      buffer_h: 4,
      scale: 1.,
      offset: Vector2d::new(0., 0.),
    };
    draw_gizmo(&mut args, Vector2d::new(1000., 1000.), &small_params(), true);
    assert!(buffer.iter().all(|v| *v == 0));
  }

  #[test]
  fn test_debug_label() {
    let t = TrackingTemplate {
      time: 0,
      location: Vector2d::new(1., 2.),
      score: 0.875,
      template: Image::filled(4, 4, 0),
      source: TemplateSource::Auto,
    };
    assert_eq!(debug_label(&t), "0.875 auto");
  }
}
