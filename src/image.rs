use crate::all::*;

// Row-major grayscale image storage.
// Could also have used nalgebra::DMatrix, but plain byte rows are enough for
// patch extraction and correlation.
#[derive(Clone)]
pub struct Image {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

impl Image {
  pub fn filled(width: usize, height: usize, value: u8) -> Image {
    Image {
      data: vec![value; width * height],
      width,
      height,
    }
  }

  #[inline(always)]
  pub fn value(&self, x: usize, y: usize) -> u8 {
    self.data[y * self.width + x]
  }

  #[inline(always)]
  pub fn set_value(&mut self, x: usize, y: usize, value: u8) {
    self.data[y * self.width + x] = value;
  }

  pub fn get_sub_image(
    &self,
    ax: usize,
    ay: usize,
    width: usize,
    height: usize,
  ) -> Image {
    let mut image = Image {
      width,
      height,
      data: vec![0; width * height],
    };
    for y in 0..height {
      for x in 0..width {
        image.set_value(x, y, self.value(ax + x, ay + y));
      }
    }
    image
  }

  // Extraction that never reads outside the image. The origin is clamped so
  // the whole patch fits, shifting the patch rather than shrinking it.
  pub fn get_sub_image_clamped(&self, rect: Rect) -> Image {
    let w = rect.w.min(self.width);
    let h = rect.h.min(self.height);
    let ax = rect.x.clamp(0, (self.width - w) as i32) as usize;
    let ay = rect.y.clamp(0, (self.height - h) as i32) as usize;
    self.get_sub_image(ax, ay, w, h)
  }
}

// Element access in the manner of `image[y][x]`.
impl Index<usize> for Image {
  type Output = [u8];
  fn index(&self, y: usize) -> &Self::Output {
    &self.data[y * self.width .. (y + 1) * self.width]
  }
}

impl fmt::Display for Image {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = String::new();
    for y in 0..self.height {
      for x in 0..self.width {
        s += &format!("{:>3},", self.value(x, y));
      }
      s += "\n";
    }
    write!(f, "{}", s)
  }
}

// Axis-aligned pixel rectangle. May extend outside an image until clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
  pub x: i32,
  pub y: i32,
  pub w: usize,
  pub h: usize,
}

impl Rect {
  // Truncating half-extents. For even sizes the box reaches one pixel
  // further right and down than left and up, which the matcher relies on.
  pub fn centered(c: Vector2i, w: usize, h: usize) -> Rect {
    Rect {
      x: c[0] - (w / 2) as i32,
      y: c[1] - (h / 2) as i32,
      w,
      h,
    }
  }

  pub fn intersect(&self, width: usize, height: usize) -> Rect {
    let x0 = self.x.max(0);
    let y0 = self.y.max(0);
    let x1 = (self.x + self.w as i32).min(width as i32);
    let y1 = (self.y + self.h as i32).min(height as i32);
    Rect {
      x: x0,
      y: y0,
      w: (x1 - x0).max(0) as usize,
      h: (y1 - y0).max(0) as usize,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_centered_rect_truncating_halves() {
    let r = Rect::centered(Vector2i::new(50, 40), 20, 10);
    assert_eq!(r, Rect { x: 40, y: 35, w: 20, h: 10 });
    // Odd sizes are symmetric.
    let r = Rect::centered(Vector2i::new(50, 40), 21, 11);
    assert_eq!(r, Rect { x: 40, y: 35, w: 21, h: 11 });
  }

  #[test]
  fn test_intersect() {
    let r = Rect { x: -10, y: 5, w: 30, h: 30 }.intersect(100, 20);
    assert_eq!(r, Rect { x: 0, y: 5, w: 20, h: 15 });
    let r = Rect { x: 90, y: 0, w: 30, h: 10 }.intersect(100, 100);
    assert_eq!(r, Rect { x: 90, y: 0, w: 10, h: 10 });
    // Fully outside.
    let r = Rect { x: 200, y: 0, w: 10, h: 10 }.intersect(100, 100);
    assert_eq!(r.w, 0);
  }

  #[test]
  fn test_sub_image_clamped() {
    let mut image = Image::filled(10, 10, 0);
    for y in 0..10 {
      for x in 0..10 {
        image.set_value(x, y, (y * 10 + x) as u8);
      }
    }
    // Would start at (-2, -1), clamps to origin.
    let patch = image.get_sub_image_clamped(Rect { x: -2, y: -1, w: 4, h: 4 });
    assert_eq!(patch.width, 4);
    assert_eq!(patch.height, 4);
    assert_eq!(patch.value(0, 0), 0);
    // Would overrun the far corner, clamps to (6, 6).
    let patch = image.get_sub_image_clamped(Rect { x: 8, y: 9, w: 4, h: 4 });
    assert_eq!(patch.value(0, 0), 66);
    assert_eq!(patch.value(3, 3), 99);
  }
}
