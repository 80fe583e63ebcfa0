use crate::all::*;

// Step controller for one tracked point. Owns the template timeline and the
// correlation matcher; the host owns the timeline of accepted positions and
// calls `track_step` once per frame advance, in non-decreasing time order.
//
// The template timeline is never persisted. After the host reloads a saved
// track it must call `create_reference` again before stepping, which is what
// `is_ready` reports.
pub struct Tracker {
  params: TrackingParameters,
  matcher: Matcher,
  timeline: Timeline<TrackingTemplate>,
}

impl Tracker {
  pub fn new(params: TrackingParameters) -> Result<Tracker> {
    if params.block_win_width == 0 || params.block_win_height == 0 {
      bail!("Template window must not be empty.");
    }
    if params.block_win_width >= params.search_win_width
      || params.block_win_height >= params.search_win_height {
      bail!("Search window must be larger than the template window.");
    }
    Ok(Tracker {
      params,
      matcher: Matcher::new(),
      timeline: Timeline::new(),
    })
  }

  pub fn parameters(&self) -> &TrackingParameters {
    &self.params
  }

  // A block size change makes the current reference stale: `is_ready` turns
  // false until a new reference is captured.
  pub fn set_parameters(&mut self, params: TrackingParameters) {
    self.params = params;
  }

  pub fn is_ready(&self) -> bool {
    match self.timeline.last() {
      Some((_, template)) => template.size_matches(&self.params),
      None => false,
    }
  }

  // Manual placement or drag of the point. Placing at an already tracked
  // time overwrites that entry.
  pub fn create_reference(&mut self, point: TimedPoint, image: &Image) {
    let template = reference_template(point, image, &self.params);
    self.timeline.insert(point.time, template);
  }

  // Advances the track by one frame. Always returns a usable point: on any
  // failure it is the last accepted position, with the flag false.
  // Calling this while not ready is a host bug, not a tracking failure.
  pub fn track_step(
    &mut self,
    accepted: &[TimedPoint],
    time: Timestamp,
    image: Option<&Image>,
  ) -> (TimedPoint, bool) {
    assert!(self.is_ready(), "track_step() requires a usable reference template, check is_ready()");
    let last = match accepted.last() {
      Some(last) => *last,
      None => panic!("track_step() requires at least one accepted point"),
    };

    let image = match image {
      Some(image) => image,
      None => {
        warn!("No image for time {}, the point stays at its last position.", time);
        return (TimedPoint { time, point: last.point }, false);
      },
    };

    let outcome = match self.timeline.last() {
      Some((_, template)) =>
        self.matcher.match_template(image, &template.template, last.point, &self.params),
      // Unreachable past the assert above.
      None => MatchOutcome::EngineFailure,
    };
    let score = outcome.score();
    let point = outcome.point_or(last.point);
    let success = outcome.is_success();
    if success {
      debug!("Tracked to {:.2},{:.2} at time {} with score {:.3}.", point[0], point[1], time, score);
    }
    else {
      debug!("Tracking failed at time {} with score {:.3}.", time, score);
    }

    // A failed step still appends an entry so the timeline stays one entry
    // per stepped frame; the low score lands in the no-update band.
    let prev = self.timeline.last().map(|(_, t)| t);
    let entry = next_template(prev, score, point, time, image, &self.params);
    self.timeline.insert(time, entry);
    (TimedPoint { time, point }, success)
  }

  // Discards template entries at or after the given time, for when the user
  // deletes trailing tracked positions.
  pub fn trim(&mut self, time: Timestamp) {
    self.timeline.trim_from(time);
  }

  // Ends the tracking session, dropping every owned template.
  pub fn clear(&mut self) {
    self.timeline.clear();
  }

  pub fn closest_from(&self, time: Timestamp) -> Option<&TrackingTemplate> {
    self.timeline.closest_at_or_before(time)
  }

  pub fn last_template(&self) -> Option<&TrackingTemplate> {
    self.timeline.last().map(|(_, t)| t)
  }

  pub fn len(&self) -> usize {
    self.timeline.len()
  }
}
