/// Smooth 1D/2D gradient noise over a seeded permutation table.
///
/// Output is deterministic for a given seed and always lies in `[-1, 1]`.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().take(256).enumerate() {
            *p = i as u8;
        }
        // Park-Miller LCG drives a Fisher-Yates shuffle
        let mut s = (seed as u64 % 2_147_483_647).max(1);
        for i in (1..256usize).rev() {
            s = (s * 16807) % 2_147_483_647;
            let j = (s % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }
        for i in 0..256 {
            perm[i + 256] = perm[i];
        }
        Self { perm }
    }

    #[inline]
    fn fade(t: f32) -> f32 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn grad(hash: u8, x: f32) -> f32 {
        if hash & 1 == 0 {
            x
        } else {
            -x
        }
    }

    pub fn sample_1d(&self, x: f32) -> f32 {
        if !x.is_finite() {
            return 0.0;
        }
        let floor = x.floor();
        let xi = (floor as i64 & 255) as usize;
        let xf = x - floor;
        let u = Self::fade(xf);
        let a = Self::grad(self.perm[xi], xf);
        let b = Self::grad(self.perm[xi + 1], xf - 1.0);
        a + (b - a) * u
    }

    pub fn sample_2d(&self, x: f32, y: f32) -> f32 {
        (self.sample_1d(x + y * 0.7) + self.sample_1d(y + x * 0.3)) * 0.5
    }
}
