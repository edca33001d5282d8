// ── heightfield.rs ─────────────────────────────────────────────────────────
// Row-major scalar grid with bilinear sampling and kernel-weighted erosion.

use rayon::prelude::*;

use crate::error::ErosionError;
use crate::noise::NoiseField;

/// A 2D grid of finite floating-point elevations, row-major, indexed
/// `x + y * width`.
#[derive(Debug, Clone)]
pub struct Heightfield {
    width: u32,
    height: u32,
    data: Vec<f32>,
    seed: i32,
    horizontal_scale: f32,
    vertical_scale: f32,
}

impl Heightfield {
    /// (Re)allocates the buffer and fills every cell from `noise`.
    /// Fails with `InvalidSize` if either dimension is below 2.
    ///
    /// Cells are independent pure functions of `(seed, x, y)`, so the fill
    /// runs data-parallel over `rayon` — iteration order has no observable
    /// effect on the result.
    pub fn reset(
        seed: i32,
        size: (u32, u32),
        horizontal_scale: f32,
        vertical_scale: f32,
        noise: &dyn NoiseField,
    ) -> Result<Self, ErosionError> {
        let (width, height) = size;
        if width < 2 || height < 2 {
            return Err(ErosionError::InvalidSize { width, height });
        }

        log::info!("resetting heightfield {width}x{height} seed={seed}");

        let w = width as usize;
        let n = w * height as usize;
        let mut data = vec![0.0f32; n];
        data.par_iter_mut().enumerate().for_each(|(i, cell)| {
            let x = (i % w) as f32;
            let y = (i / w) as f32;
            *cell = noise.sample(seed, x * horizontal_scale, y * horizontal_scale);
        });

        Ok(Self {
            width,
            height,
            data,
            seed,
            horizontal_scale,
            vertical_scale,
        })
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width as usize
    }

    /// Raw corner read, used internally for gradient computation. Callers
    /// outside the simulator should use `sample` instead.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    fn corner_fractions(&self, px: f32, py: f32) -> (usize, usize, f32, f32) {
        debug_assert!(px >= 0.0 && px <= (self.width - 1) as f32);
        debug_assert!(py >= 0.0 && py <= (self.height - 1) as f32);
        let ix = px.floor() as usize;
        let iy = py.floor() as usize;
        (ix, iy, px - ix as f32, py - iy as f32)
    }

    /// Bilinear interpolation over the four integer corners of `(px, py)`.
    /// Caller must ensure `0 <= px <= width-1` and `0 <= py <= height-1`.
    pub fn sample(&self, px: f32, py: f32) -> f32 {
        let (ix, iy, u, v) = self.corner_fractions(px, py);
        let h00 = self.at(ix, iy);
        let h10 = self.at(ix + 1, iy);
        let h01 = self.at(ix, iy + 1);
        let h11 = self.at(ix + 1, iy + 1);
        h00 * (1.0 - u) * (1.0 - v)
            + h10 * u * (1.0 - v)
            + h01 * (1.0 - u) * v
            + h11 * u * v
    }

    /// Adds `amount * weight` to each of the four bilinear corners of
    /// `(px, py)`, using the same weights as `sample`. Unbounded — the
    /// caller is responsible for conservation with the droplet's sediment.
    pub fn deposit(&mut self, px: f32, py: f32, amount: f32) {
        let (ix, iy, u, v) = self.corner_fractions(px, py);
        let i00 = self.index(ix, iy);
        let i10 = self.index(ix + 1, iy);
        let i01 = self.index(ix, iy + 1);
        let i11 = self.index(ix + 1, iy + 1);

        self.data[i00] += amount * (1.0 - u) * (1.0 - v);
        self.data[i10] += amount * u * (1.0 - v);
        self.data[i01] += amount * (1.0 - u) * v;
        self.data[i11] += amount * u * v;
    }

    /// Removes up to `amount` of material around `(px, py)` using a
    /// triangular falloff kernel of integer `radius`, distributed over the
    /// exactly `(2*radius+1)^2` candidate cells and normalized so the
    /// weights that land inside the grid sum to 1. Returns the amount
    /// actually removed (erosion never drives a cell below 0).
    pub fn erode(&mut self, px: f32, py: f32, radius: u32, amount: f32) -> f32 {
        debug_assert!(radius >= 1);
        let radius_f = radius as f32;
        let center_x = px.floor() as i32;
        let center_y = py.floor() as i32;
        let r = radius as i32;

        let mut cells: Vec<(usize, f32)> = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        let mut weight_sum = 0.0f32;

        for dy in -r..=r {
            for dx in -r..=r {
                let cx = center_x + dx;
                let cz = center_y + dy;
                if cx < 0 || cz < 0 || cx as u32 >= self.width || cz as u32 >= self.height {
                    continue;
                }
                let fx = cx as f32 - px;
                let fz = cz as f32 - py;
                if fx.abs().max(fz.abs()) > radius_f {
                    continue;
                }

                let dist = ((cx as f32 + 0.5 - px).powi(2) + (cz as f32 + 0.5 - py).powi(2)).sqrt();
                let w = (radius_f - dist).max(0.0);
                if w <= 0.0 {
                    continue;
                }

                weight_sum += w;
                cells.push((self.index(cx as usize, cz as usize), w));
            }
        }

        if weight_sum <= 0.0 {
            return 0.0;
        }

        let mut removed = 0.0f32;
        for (idx, w) in cells {
            let requested = amount * (w / weight_sum);
            let actual = requested.min(self.data[idx]);
            self.data[idx] -= actual;
            removed += actual;
        }

        removed
    }

    /// True iff `(px, py)` leaves a full bilinear cell inside the grid —
    /// the droplet's termination predicate, so `sample`/`deposit` always
    /// have four valid corners.
    #[inline]
    pub fn in_bounds_for_step(&self, px: f32, py: f32) -> bool {
        px >= 0.0 && px < (self.width - 1) as f32 && py >= 0.0 && py < (self.height - 1) as f32
    }

    /// Read-only view of the row-major buffer, for downstream mesh generation.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn horizontal_scale(&self) -> f32 {
        self.horizontal_scale
    }

    #[inline]
    pub fn vertical_scale(&self) -> f32 {
        self.vertical_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstNoise(f32);
    impl NoiseField for ConstNoise {
        fn sample(&self, _seed: i32, _x: f32, _y: f32) -> f32 {
            self.0
        }
    }

    struct IndexNoise;
    impl NoiseField for IndexNoise {
        fn sample(&self, _seed: i32, x: f32, _y: f32) -> f32 {
            x
        }
    }

    #[test]
    fn reset_rejects_undersized_grids() {
        let err = Heightfield::reset(0, (1, 5), 1.0, 1.0, &ConstNoise(0.5)).unwrap_err();
        assert_eq!(err, ErosionError::InvalidSize { width: 1, height: 5 });
    }

    #[test]
    fn bilinear_identity_on_integer_corners() {
        let field = Heightfield::reset(1, (8, 8), 1.0, 1.0, &IndexNoise).unwrap();
        for y in 0..8usize {
            for x in 0..8usize {
                assert_eq!(field.sample(x as f32, y as f32), field.at(x, y));
            }
        }
    }

    #[test]
    fn deposit_adds_exact_total_mass() {
        let mut field = Heightfield::reset(1, (4, 4), 1.0, 1.0, &ConstNoise(0.0)).unwrap();
        let before: f32 = field.data().iter().sum();
        field.deposit(1.5, 1.5, 2.0);
        let after: f32 = field.data().iter().sum();
        assert!((after - before - 2.0).abs() < 1e-5);
    }

    #[test]
    fn erode_on_uniform_field_removes_exact_amount_symmetrically() {
        let mut field = Heightfield::reset(1, (101, 101), 1.0, 1.0, &ConstNoise(10.0)).unwrap();
        let removed = field.erode(50.5, 50.5, 3, 1.0);
        assert!((removed - 1.0).abs() < 1e-4);

        // The +0.5 cell-center offset in the weight formula cancels against
        // the .5 fraction of the center position, so weight actually falls
        // off symmetrically around vertex 50 (cells 49/51 match, 48/52
        // match); cells exactly `radius` away (47, 53) get weight 0.
        for dx in 1..3usize {
            let left = field.at(50 - dx, 50);
            let right = field.at(50 + dx, 50);
            assert!((left - right).abs() < 1e-5);
            let top = field.at(50, 50 - dx);
            let bottom = field.at(50, 50 + dx);
            assert!((top - bottom).abs() < 1e-5);
        }
    }

    #[test]
    fn erode_never_drives_a_cell_negative() {
        let mut field = Heightfield::reset(1, (16, 16), 1.0, 1.0, &ConstNoise(0.05)).unwrap();
        field.erode(8.0, 8.0, 3, 1000.0);
        assert!(field.data().iter().all(|&h| h >= 0.0));
    }

    #[test]
    fn in_bounds_for_step_excludes_the_last_row_and_column() {
        let field = Heightfield::reset(1, (4, 4), 1.0, 1.0, &ConstNoise(0.0)).unwrap();
        assert!(field.in_bounds_for_step(0.0, 0.0));
        assert!(field.in_bounds_for_step(2.999, 2.999));
        assert!(!field.in_bounds_for_step(3.0, 1.0));
        assert!(!field.in_bounds_for_step(1.0, 3.0));
        assert!(!field.in_bounds_for_step(-0.1, 1.0));
    }

    #[test]
    fn reset_is_deterministic_and_parallel_order_independent() {
        let a = Heightfield::reset(7, (64, 64), 0.5, 1.0, &crate::noise::ValueNoise).unwrap();
        let b = Heightfield::reset(7, (64, 64), 0.5, 1.0, &crate::noise::ValueNoise).unwrap();
        assert_eq!(a.data(), b.data());
    }
}
