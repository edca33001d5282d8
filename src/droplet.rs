// ── droplet.rs ─────────────────────────────────────────────────────────────
// Single-droplet lifecycle: spawn, step, transport, terminate.

use rand::Rng;

use crate::heightfield::Heightfield;
use crate::params::ErosionParameters;

/// What happened to a droplet over its whole lifetime. The batch driver
/// uses `degenerate` to tally `BatchReport::degenerate_droplets`; the
/// simulator otherwise reports nothing back — all observable effect is the
/// mutation of the heightfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DropletOutcome {
    pub degenerate: bool,
}

enum StepOutcome {
    Continue,
    Terminate,
    Degenerate,
}

/// Transient state of one simulated water particle. Exists only on the
/// simulator's stack frame — never stored, never returned.
struct Droplet {
    px: f32,
    py: f32,
    dx: f32,
    dy: f32,
    velocity: f32,
    water: f32,
    sediment: f32,
}

impl Droplet {
    fn spawn(rng: &mut impl Rng, width: u32, height: u32) -> Self {
        let px = rng.gen::<f32>() * (width as f32 - 1.1);
        let py = rng.gen::<f32>() * (height as f32 - 1.1);
        Self {
            px,
            py,
            dx: 0.0,
            dy: 0.0,
            velocity: 1.0,
            water: 1.0,
            sediment: 0.0,
        }
    }

    /// Gradient of the bilinear surface under the droplet's current position.
    fn gradient(&self, field: &Heightfield) -> (f32, f32) {
        let ix = self.px.floor() as usize;
        let iy = self.py.floor() as usize;
        let u = self.px - ix as f32;
        let v = self.py - iy as f32;

        let h00 = field.at(ix, iy);
        let h10 = field.at(ix + 1, iy);
        let h01 = field.at(ix, iy + 1);
        let h11 = field.at(ix + 1, iy + 1);

        let gx = (h10 - h00) * (1.0 - v) + (h11 - h01) * v;
        let gy = (h01 - h00) * (1.0 - u) + (h11 - h10) * u;
        (gx, gy)
    }

    fn step(&mut self, field: &mut Heightfield, params: &ErosionParameters) -> StepOutcome {
        let (gx, gy) = self.gradient(field);

        let inertia = params.inertia;
        let mut new_dx = self.dx * inertia - gx * (1.0 - inertia);
        let mut new_dy = self.dy * inertia - gy * (1.0 - inertia);
        let len = (new_dx * new_dx + new_dy * new_dy).sqrt();
        if len == 0.0 {
            return StepOutcome::Terminate;
        }
        new_dx /= len;
        new_dy /= len;

        let new_px = self.px + new_dx;
        let new_py = self.py + new_dy;
        if !field.in_bounds_for_step(new_px, new_py) {
            return StepOutcome::Terminate;
        }

        let old_px = self.px;
        let old_py = self.py;
        let h_old = field.sample(old_px, old_py);
        let h_new = field.sample(new_px, new_py);
        let delta_h = h_new - h_old;

        let capacity =
            (-delta_h * self.velocity * self.water * params.capacity).max(params.min_capacity);
        if !capacity.is_finite() {
            return StepOutcome::Degenerate;
        }

        if delta_h > 0.0 {
            let deposit_amount = self.sediment.min(delta_h);
            field.deposit(old_px, old_py, deposit_amount);
            self.sediment -= deposit_amount;
        } else if self.sediment > capacity {
            let deposit_amount = (self.sediment - capacity) * params.deposition;
            field.deposit(old_px, old_py, deposit_amount);
            self.sediment -= deposit_amount;
        } else {
            let requested = ((capacity - self.sediment) * params.erosion).min(-delta_h);
            let removed = field.erode(old_px, old_py, params.radius, requested.max(0.0));
            self.sediment += removed;
        }

        let velocity_sq_next = self.velocity * self.velocity + delta_h * params.gravity;
        if velocity_sq_next < 0.0 {
            return StepOutcome::Degenerate;
        }
        let new_velocity = velocity_sq_next.sqrt();
        let new_water = self.water * (1.0 - params.evaporation);

        self.px = new_px;
        self.py = new_py;
        self.dx = new_dx;
        self.dy = new_dy;
        self.velocity = new_velocity;
        self.water = new_water;

        StepOutcome::Continue
    }
}

/// Runs the full lifecycle of one droplet against `field`: spawn, up to
/// `params.drop_lifetime` steps, terminate. Consumes entropy from `rng`
/// only at spawn time; reads `params` only; mutates `field` only through
/// its public `sample`/`deposit`/`erode` operations.
pub(crate) fn simulate_one(
    field: &mut Heightfield,
    params: &ErosionParameters,
    rng: &mut impl Rng,
) -> DropletOutcome {
    let (width, height) = field.dims();
    let mut droplet = Droplet::spawn(rng, width, height);

    for _ in 0..params.drop_lifetime {
        match droplet.step(field, params) {
            StepOutcome::Continue => continue,
            StepOutcome::Terminate => return DropletOutcome { degenerate: false },
            StepOutcome::Degenerate => return DropletOutcome { degenerate: true },
        }
    }

    DropletOutcome { degenerate: false }
}
