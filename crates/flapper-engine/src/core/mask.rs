//! Pixel masks for sprite collision.
//!
//! A [`Mask`] is a 1-bit image stored as one `u128` per row, so masks are at
//! most 128 pixels wide. Collision between two sprites is a row-by-row `AND`
//! of one mask against the other shifted by their relative offset.
//!
//! # Bit Layout
//!
//! Bit `x` of a row (LSB first) is the pixel at column `x`. Bits at or beyond
//! the mask width are always zero.

/// A 1-bit sprite mask.
///
/// # Example
///
/// ```
/// use flapper_engine::mask::Mask;
///
/// let a = Mask::filled(4, 4).unwrap();
/// let b = Mask::filled(2, 2).unwrap();
///
/// // `b` placed with its top-left at (3, 3) relative to `a` touches one pixel
/// assert_eq!(a.overlap(&b, (3, 3)), Some((3, 3)));
/// assert_eq!(a.overlap(&b, (4, 0)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    rows: Vec<u128>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("mask width {width} exceeds the maximum of {}", Mask::MAX_WIDTH)]
pub struct MaskWidthError {
    width: u32,
}

const fn row_bits(width: u32) -> u128 {
    if width >= u128::BITS {
        u128::MAX
    } else {
        (1 << width) - 1
    }
}

impl Mask {
    pub const MAX_WIDTH: u32 = u128::BITS;

    /// Creates a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, MaskWidthError>
    where
        F: FnMut(u32, u32) -> bool,
    {
        if width > Self::MAX_WIDTH {
            return Err(MaskWidthError { width });
        }
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .filter(|&x| f(x, y))
                    .fold(0u128, |row, x| row | (1 << x))
            })
            .collect();
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    /// Creates a fully opaque rectangular mask.
    pub fn filled(width: u32, height: u32) -> Result<Self, MaskWidthError> {
        if width > Self::MAX_WIDTH {
            return Err(MaskWidthError { width });
        }
        Ok(Self {
            width,
            height,
            rows: vec![row_bits(width); height as usize],
        })
    }

    /// Bird sprite: an elliptical body with a beak on the right edge.
    #[expect(clippy::cast_precision_loss)]
    pub fn bird(width: u32, height: u32) -> Result<Self, MaskWidthError> {
        let body_width = width * 5 / 6;
        let cx = body_width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let beak_x = body_width * 3 / 4;
        let beak_rows = height / 2..height / 2 + (height / 6).max(1);
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - cx) / cx;
            let dy = (y as f32 + 0.5 - cy) / cy;
            let in_body = dx * dx + dy * dy <= 1.0;
            let in_beak = x >= beak_x && beak_rows.contains(&y);
            in_body || in_beak
        })
    }

    /// Bottom pipe sprite: a full-width cap at the top of a slightly narrower body.
    ///
    /// The top pipe uses [`flipped_vertical`](Self::flipped_vertical) of this mask.
    pub fn pipe(width: u32, height: u32) -> Result<Self, MaskWidthError> {
        let cap_height = (height / 12).max(1);
        let inset = width / 17;
        Self::from_fn(width, height, |x, y| {
            y < cap_height || (inset..width - inset).contains(&x)
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether the pixel at `(x, y)` is set. Out-of-range pixels are unset.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width
            && self
                .rows
                .get(y as usize)
                .is_some_and(|row| row & (1 << x) != 0)
    }

    /// Number of set pixels.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    #[must_use]
    pub fn flipped_vertical(&self) -> Self {
        let mut rows = self.rows.clone();
        rows.reverse();
        Self { rows, ..*self }
    }

    /// Finds the first pixel where `self` and `other` are both set.
    ///
    /// `offset` is the position of `other`'s top-left corner relative to
    /// `self`'s top-left corner. The returned point is in `self`'s
    /// coordinates; rows are scanned top to bottom and columns left to right.
    #[must_use]
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (dx, dy) = offset;
        let y_start = dy.max(0);
        let y_end = dy
            .saturating_add_unsigned(other.height)
            .min(self.height.try_into().unwrap_or(i32::MAX));
        for y in y_start..y_end {
            let own = self.rows[y.cast_unsigned() as usize];
            let shifted = shift_row(other.rows[(y - dy).cast_unsigned() as usize], dx);
            let hit = own & shifted;
            if hit != 0 {
                return Some((hit.trailing_zeros(), y.cast_unsigned()));
            }
        }
        None
    }

    /// Returns whether any pixel of `self` and `other` overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}

/// Moves the columns of `row` right by `dx` (left when negative).
fn shift_row(row: u128, dx: i32) -> u128 {
    let amount = dx.unsigned_abs();
    if amount >= u128::BITS {
        0
    } else if dx >= 0 {
        row << amount
    } else {
        row >> amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asymmetric_mask() -> Mask {
        // L-shaped: a vertical bar with a foot to the right
        Mask::from_fn(5, 6, |x, y| x == 0 || y == 5).unwrap()
    }

    #[test]
    fn test_from_fn_rejects_wide_masks() {
        let err = Mask::from_fn(Mask::MAX_WIDTH + 1, 1, |_, _| true).unwrap_err();
        assert_eq!(err, MaskWidthError { width: 129 });
    }

    #[test]
    fn test_filled_full_width_row() {
        let mask = Mask::filled(128, 2).unwrap();
        assert_eq!(mask.count(), 256);
        assert!(mask.get(127, 1));
        assert!(!mask.get(128, 1));
    }

    #[test]
    fn test_overlap_reports_first_pixel_in_self_coordinates() {
        let a = Mask::filled(10, 10).unwrap();
        let b = Mask::filled(3, 3).unwrap();
        assert_eq!(a.overlap(&b, (4, 2)), Some((4, 2)));
        assert_eq!(a.overlap(&b, (-2, -2)), Some((0, 0)));
    }

    #[test]
    fn test_overlap_misses_outside_bounds() {
        let a = Mask::filled(10, 10).unwrap();
        let b = Mask::filled(3, 3).unwrap();
        assert_eq!(a.overlap(&b, (10, 0)), None);
        assert_eq!(a.overlap(&b, (0, 10)), None);
        assert_eq!(a.overlap(&b, (-3, 0)), None);
        assert_eq!(a.overlap(&b, (0, -3)), None);
        assert_eq!(a.overlap(&b, (i32::MAX, 0)), None);
        assert_eq!(a.overlap(&b, (i32::MIN, 0)), None);
    }

    #[test]
    fn test_overlap_respects_holes() {
        let l = asymmetric_mask();
        let dot = Mask::filled(1, 1).unwrap();
        assert!(!l.overlaps(&dot, (2, 2)));
        assert!(l.overlaps(&dot, (0, 2)));
        assert!(l.overlaps(&dot, (4, 5)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = asymmetric_mask();
        let b = Mask::bird(12, 8).unwrap();
        for dy in -10..10 {
            for dx in -14..14 {
                assert_eq!(
                    a.overlaps(&b, (dx, dy)),
                    b.overlaps(&a, (-dx, -dy)),
                    "asymmetric result at offset ({dx}, {dy})"
                );
            }
        }
    }

    #[test]
    fn test_overlap_is_deterministic() {
        let bird = Mask::bird(68, 48).unwrap();
        let pipe = Mask::pipe(104, 640).unwrap();
        let first = bird.overlap(&pipe, (-30, 20));
        for _ in 0..5 {
            assert_eq!(bird.overlap(&pipe, (-30, 20)), first);
        }
        assert!(first.is_some());
    }

    #[test]
    fn test_bird_mask_shape() {
        let bird = Mask::bird(68, 48).unwrap();
        // centre of the body is solid, corners are transparent
        assert!(bird.get(28, 24));
        assert!(!bird.get(0, 0));
        assert!(!bird.get(67, 0));
        // beak reaches the right edge
        assert!(bird.get(67, 25));
    }

    #[test]
    fn test_pipe_mask_cap_is_wider_than_body() {
        let pipe = Mask::pipe(104, 640).unwrap();
        assert!(pipe.get(0, 0));
        assert!(pipe.get(103, 10));
        assert!(!pipe.get(0, 300));
        assert!(pipe.get(52, 300));
    }

    #[test]
    fn test_flipped_vertical_moves_cap_to_bottom() {
        let pipe = Mask::pipe(104, 640).unwrap();
        let top = pipe.flipped_vertical();
        assert!(top.get(0, 639));
        assert!(!top.get(0, 0));
        assert_eq!(top.count(), pipe.count());
    }
}
