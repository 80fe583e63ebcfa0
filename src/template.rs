use crate::all::*;

// Whether the point was placed by the user or produced by tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateSource {
  Manual,
  Auto,
}

// One entry of the template timeline: the expected appearance of the tracked
// point at one frame. The pixel buffer is exclusively owned by this record;
// entries never share buffers even when the update policy copies pixels
// verbatim, so each entry can be dropped independently.
pub struct TrackingTemplate {
  pub time: Timestamp,
  // Center of the template in image coordinates, possibly sub-pixel.
  pub location: Vector2d,
  // Similarity against the predecessor at creation time. 1.0 for manual
  // placements, 0 for an engine failure.
  pub score: f64,
  pub template: Image,
  pub source: TemplateSource,
}

impl TrackingTemplate {
  // A template captured under different parameters must not be matched
  // against; the tracker refuses to step until a fresh reference exists.
  pub fn size_matches(&self, p: &TrackingParameters) -> bool {
    self.template.width == p.block_win_width && self.template.height == p.block_win_height
  }
}
