//! Pure window arithmetic for crop views.
//!
//! All functions here are pure and testable without any pixel storage.

use super::source::LuminanceError;

/// A rectangular window: offset plus size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The window covering a whole `width × height` area.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Build a window from signed coordinates.
    ///
    /// Negative values can never describe a window inside a buffer, so they
    /// are reported as [`LuminanceError::OutOfBounds`] against `bounds`.
    ///
    /// ```
    /// # use luma_source::luminance::Rect;
    /// assert!(Rect::try_from_signed(-1, 0, 4, 4, Rect::full(8, 8)).is_err());
    /// assert_eq!(
    ///     Rect::try_from_signed(1, 2, 3, 4, Rect::full(8, 8)).unwrap(),
    ///     Rect::new(1, 2, 3, 4)
    /// );
    /// ```
    pub fn try_from_signed(
        left: i64,
        top: i64,
        width: i64,
        height: i64,
        bounds: Rect,
    ) -> Result<Self, LuminanceError> {
        let out_of_bounds = || LuminanceError::OutOfBounds {
            left,
            top,
            width,
            height,
            bound_width: bounds.width,
            bound_height: bounds.height,
        };
        let convert = |v: i64| usize::try_from(v).map_err(|_| out_of_bounds());
        Ok(Self::new(
            convert(left)?,
            convert(top)?,
            convert(width)?,
            convert(height)?,
        ))
    }

    /// Exclusive right edge, `None` on overflow.
    pub fn right(&self) -> Option<usize> {
        self.left.checked_add(self.width)
    }

    /// Exclusive bottom edge, `None` on overflow.
    pub fn bottom(&self) -> Option<usize> {
        self.top.checked_add(self.height)
    }

    /// Pixel count, `None` on overflow.
    pub fn area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Whether `inner` (relative to this window's origin) lies entirely inside
    /// a window of this size.
    pub fn contains_relative(&self, inner: &Rect) -> bool {
        matches!(inner.right(), Some(r) if r <= self.width)
            && matches!(inner.bottom(), Some(b) if b <= self.height)
    }
}

/// Compose a crop request with an existing window.
///
/// `window` is the current logical window inside storage, `request` is
/// relative to that window. Returns the requested window in storage
/// coordinates.
///
/// # Errors
/// [`LuminanceError::OutOfBounds`] when `request` does not fit inside `window`.
pub fn compose_window(window: Rect, request: Rect) -> Result<Rect, LuminanceError> {
    if !window.contains_relative(&request) {
        return Err(LuminanceError::out_of_bounds(request, window));
    }
    Ok(Rect::new(
        window.left + request.left,
        window.top + request.top,
        request.width,
        request.height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_rect_starts_at_origin() {
        assert_eq!(Rect::full(3, 7), Rect::new(0, 0, 3, 7));
        assert_eq!(Rect::full(3, 7).area(), Some(21));
    }

    #[test]
    fn area_reports_overflow() {
        assert_eq!(Rect::full(usize::MAX / 2 + 1, 2).area(), None);
        assert_eq!(Rect::full(usize::MAX, 1).area(), Some(usize::MAX));
        assert_eq!(Rect::full(usize::MAX, 0).area(), Some(0));
    }

    #[test]
    fn contains_relative_accepts_exact_fit() {
        let outer = Rect::new(5, 5, 10, 4);
        assert!(outer.contains_relative(&Rect::new(0, 0, 10, 4)));
        assert!(outer.contains_relative(&Rect::new(9, 3, 1, 1)));
        assert!(outer.contains_relative(&Rect::new(10, 4, 0, 0)));
    }

    #[test]
    fn contains_relative_rejects_overhang() {
        let outer = Rect::full(10, 4);
        assert!(!outer.contains_relative(&Rect::new(0, 0, 11, 4)));
        assert!(!outer.contains_relative(&Rect::new(0, 1, 10, 4)));
        assert!(!outer.contains_relative(&Rect::new(usize::MAX, 0, 2, 1)));
    }

    #[test]
    fn compose_window_adds_offsets() {
        let window = Rect::new(2, 3, 10, 10);
        let composed = compose_window(window, Rect::new(1, 4, 5, 6)).unwrap();
        assert_eq!(composed, Rect::new(3, 7, 5, 6));
    }

    #[test]
    fn compose_window_out_of_bounds() {
        let window = Rect::new(2, 3, 10, 10);
        let err = compose_window(window, Rect::new(6, 0, 5, 1)).unwrap_err();
        assert!(matches!(
            err,
            LuminanceError::OutOfBounds {
                left: 6,
                width: 5,
                bound_width: 10,
                ..
            }
        ));
    }

    #[test]
    fn signed_negative_values_fail() {
        let bounds = Rect::full(4, 4);
        for (l, t, w, h) in [(-1, 0, 1, 1), (0, -1, 1, 1), (0, 0, -1, 1), (0, 0, 1, -2)] {
            let err = Rect::try_from_signed(l, t, w, h, bounds).unwrap_err();
            assert!(matches!(err, LuminanceError::OutOfBounds { .. }));
        }
    }
}
