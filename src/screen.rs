//! Logical resolution, visibility test, and the off-screen remap policy:
//! coerce an ideal point outside the visible rectangle onto the boundary,
//! by intersecting the line through it with the four screen edges.
//! Ported from `original_source/algo/algo_base.py::ScreenUtil`.

use crate::geometry::{intersect, Vec2};

#[derive(Debug, Clone, Copy)]
pub struct ScreenUtil {
    pub width: u32,
    pub height: u32,
    pub flick_radius: f64,
}

impl ScreenUtil {
    pub fn new(width: u32, height: u32) -> Self {
        ScreenUtil {
            width,
            height,
            flick_radius: height as f64 * 0.1,
        }
    }

    pub fn visible(&self, pos: Vec2) -> bool {
        (0.0..=self.width as f64).contains(&pos.x) && (0.0..=self.height as f64).contains(&pos.y)
    }

    /// If `p` is on screen, return it unchanged. Otherwise take the line
    /// through `p` with direction `dir` rotated a quarter turn, intersect it
    /// with all four screen edges, and average the intersections that fall
    /// within their edge's extent. If none do, fall back to the screen
    /// center.
    pub fn remap(&self, p: Vec2, dir: Vec2) -> Vec2 {
        if self.visible(p) {
            return p;
        }

        let q = p + dir.rotate(std::f64::consts::FRAC_PI_2);
        let (w, h) = (self.width as f64, self.height as f64);

        let top = intersect((p, q), (Vec2::ZERO, Vec2::new(w, 0.0)));
        let left = intersect((p, q), (Vec2::ZERO, Vec2::new(0.0, h)));
        let right = intersect((p, q), (Vec2::new(w, 0.0), Vec2::new(w, h)));
        let bottom = intersect((p, q), (Vec2::new(0.0, h), Vec2::new(w, h)));

        let mut sum = Vec2::ZERO;
        let mut count = 0u32;
        if let Some(j) = top
            && (0.0..=w).contains(&j.x)
        {
            sum = sum + j;
            count += 1;
        }
        if let Some(j) = left
            && (0.0..=h).contains(&j.y)
        {
            sum = sum + j;
            count += 1;
        }
        if let Some(j) = right
            && (0.0..=h).contains(&j.y)
        {
            sum = sum + j;
            count += 1;
        }
        if let Some(j) = bottom
            && (0.0..=w).contains(&j.x)
        {
            sum = sum + j;
            count += 1;
        }

        if count == 0 {
            Vec2::new(w, h) * 0.5
        } else {
            sum * (1.0 / count as f64)
        }
    }
}
