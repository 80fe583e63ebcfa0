use crate::all::*;

// Decides whether the reference pixels are refreshed after a tracking step.
// Very good matches keep the old reference since it clearly still fits, which
// avoids slow drift from repeated re-capture. Very bad matches keep it too,
// because the new frame content is untrustworthy. Only the band strictly
// between the thresholds re-captures, adapting to gradual appearance change.
// Note a sustained run of low scores freezes the reference indefinitely.
pub fn next_template(
  prev: Option<&TrackingTemplate>,
  score: f64,
  location: Vector2d,
  time: Timestamp,
  image: &Image,
  p: &TrackingParameters,
) -> TrackingTemplate {
  let template = match prev {
    Some(prev) if score > p.template_update_threshold || score < p.similarity_threshold => {
      // Copy, never share: each timeline entry owns its buffer.
      prev.template.clone()
    },
    _ => capture_patch(image, location, p),
  };
  TrackingTemplate {
    time,
    location,
    score,
    template,
    source: TemplateSource::Auto,
  }
}

// Manual placement or drag. Always captures fresh pixels.
pub fn reference_template(
  point: TimedPoint,
  image: &Image,
  p: &TrackingParameters,
) -> TrackingTemplate {
  TrackingTemplate {
    time: point.time,
    location: point.point,
    score: 1.0,
    template: capture_patch(image, point.point, p),
    source: TemplateSource::Manual,
  }
}

fn capture_patch(image: &Image, location: Vector2d, p: &TrackingParameters) -> Image {
  let rect = Rect::centered(round_to_pixel(&location), p.block_win_width, p.block_win_height);
  image.get_sub_image_clamped(rect)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params() -> TrackingParameters {
    TrackingParameters {
      block_win_width: 4,
      block_win_height: 4,
      ..TrackingParameters::default()
    }
  }

  fn previous(p: &TrackingParameters) -> TrackingTemplate {
    TrackingTemplate {
      time: 0,
      location: Vector2d::new(10., 10.),
      score: 1.0,
      template: Image::filled(p.block_win_width, p.block_win_height, 7),
      source: TemplateSource::Manual,
    }
  }

  #[test]
  fn test_good_score_keeps_old_pixels() {
    let p = params();
    let prev = previous(&p);
    let image = Image::filled(30, 30, 200);
    let t = next_template(Some(&prev), 0.9, Vector2d::new(11., 10.), 1, &image, &p);
    assert_eq!(t.template.data, prev.template.data);
    assert_eq!(t.time, 1);
    assert_eq!(t.source, TemplateSource::Auto);
  }

  #[test]
  fn test_bad_score_keeps_old_pixels() {
    let p = params();
    let prev = previous(&p);
    let image = Image::filled(30, 30, 200);
    let t = next_template(Some(&prev), 0.1, Vector2d::new(10., 10.), 1, &image, &p);
    assert_eq!(t.template.data, prev.template.data);
  }

  #[test]
  fn test_fair_score_captures_fresh_pixels() {
    let p = params();
    let prev = previous(&p);
    let image = Image::filled(30, 30, 200);
    let t = next_template(Some(&prev), 0.65, Vector2d::new(10., 10.), 1, &image, &p);
    assert_eq!(t.template.data, vec![200; 16]);
    assert_eq!(t.location, Vector2d::new(10., 10.));
  }

  #[test]
  fn test_no_previous_always_captures() {
    let p = params();
    let image = Image::filled(30, 30, 200);
    let t = next_template(None, 0.9, Vector2d::new(10., 10.), 1, &image, &p);
    assert_eq!(t.template.data, vec![200; 16]);
  }

  #[test]
  fn test_reference_template() {
    let p = params();
    let image = Image::filled(30, 30, 123);
    let point = TimedPoint { time: 5, point: Vector2d::new(1., 1.) };
    let t = reference_template(point, &image, &p);
    assert_eq!(t.score, 1.0);
    assert_eq!(t.source, TemplateSource::Manual);
    // Near the origin the capture clamps instead of reading out of bounds.
    assert_eq!(t.template.width, p.block_win_width);
    assert_eq!(t.template.height, p.block_win_height);
  }
}
