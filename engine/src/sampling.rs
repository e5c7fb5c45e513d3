use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::api::{EngineError, NoiseSource, Seed};

/// 晶格下标掩码，必须是 2^n - 1
pub const LATTICE_MASK: usize = 4095;
pub const LATTICE_LEN: usize = LATTICE_MASK + 1;

const Y_WRAP_BITS: u32 = 4;
const Y_WRAP: usize = 1 << Y_WRAP_BITS;
const Z_WRAP_BITS: u32 = 8;
const Z_WRAP: usize = 1 << Z_WRAP_BITS;

const FIRST_OCTAVE_AMPLITUDE: f64 = 0.5;

const _: () = assert!(LATTICE_LEN.is_power_of_two());

/// 噪声配置
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseConfig {
    pub seed: Seed,
    pub octaves: u32,
    pub falloff: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: Seed(12345),
            octaves: 4,    // 中等平滑度
            falloff: 0.5,  // 每个八度振幅减半
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.octaves == 0 {
            return Err(EngineError::InvalidConfig("noise needs at least one octave".into()));
        }
        if !self.falloff.is_finite() || self.falloff <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "octave falloff must be a positive finite number, got {}",
                self.falloff
            )));
        }
        Ok(())
    }
}

/// 基于固定晶格的多八度连续噪声场。
///
/// 晶格在构造时一次性生成，之后只读；相同的种子总是得到相同的噪声场。
/// 负坐标会被镜像到正半轴，所以 `sample(x, y, z) == sample(-x, -y, -z)`。
#[derive(Debug, Clone)]
pub struct NoiseField {
    lattice: Box<[f64]>,
    seed: Seed,
    octaves: u32,
    falloff: f64,
}

impl NoiseField {
    pub fn new(config: &NoiseConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed.0);
        let lattice: Vec<f64> = (0..LATTICE_LEN).map(|_| rng.gen::<f64>()).collect();
        debug!(seed = config.seed.0, octaves = config.octaves, "noise lattice baked");
        Ok(Self {
            lattice: lattice.into_boxed_slice(),
            seed: config.seed,
            octaves: config.octaves,
            falloff: config.falloff,
        })
    }

    /// 使用给定的晶格值构造（测试和离线预览用）
    pub fn from_lattice(values: Vec<f64>, config: &NoiseConfig) -> Result<Self, EngineError> {
        config.validate()?;
        if values.len() != LATTICE_LEN {
            return Err(EngineError::LatticeSize { expected: LATTICE_LEN, actual: values.len() });
        }
        Ok(Self {
            lattice: values.into_boxed_slice(),
            seed: config.seed,
            octaves: config.octaves,
            falloff: config.falloff,
        })
    }

    pub fn lattice(&self) -> &[f64] {
        &self.lattice
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn falloff(&self) -> f64 {
        self.falloff
    }

    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (mut xi, mut xf) = split(x.abs());
        let (mut yi, mut yf) = split(y.abs());
        let (mut zi, mut zf) = split(z.abs());

        let mut sum = 0.0;
        let mut amplitude = FIRST_OCTAVE_AMPLITUDE;

        for _ in 0..self.octaves {
            let of = xi
                .wrapping_add(yi << Y_WRAP_BITS)
                .wrapping_add(zi << Z_WRAP_BITS);

            let rxf = ease(xf);
            let ryf = ease(yf);
            let near = self.face(of, rxf, ryf);
            let far = self.face(of.wrapping_add(Z_WRAP), rxf, ryf);

            sum += lerp(near, far, ease(zf)) * amplitude;
            amplitude *= self.falloff;

            // 下一个八度：同一晶格，两倍空间频率
            (xi, xf) = refine(xi, xf);
            (yi, yf) = refine(yi, yf);
            (zi, zf) = refine(zi, zf);
        }
        sum
    }

    #[inline]
    fn at(&self, index: usize) -> f64 {
        self.lattice[index & LATTICE_MASK]
    }

    /// 在 z 固定的一层上做 x、y 双线性插值
    fn face(&self, of: usize, rxf: f64, ryf: f64) -> f64 {
        let n1 = lerp(self.at(of), self.at(of.wrapping_add(1)), rxf);
        let row = of.wrapping_add(Y_WRAP);
        let n2 = lerp(self.at(row), self.at(row.wrapping_add(1)), rxf);
        lerp(n1, n2, ryf)
    }
}

impl NoiseSource for NoiseField {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        NoiseField::sample(self, x, y, z)
    }
}

/// 缓动权重，两端导数为零
#[inline]
pub fn ease(t: f64) -> f64 {
    0.5 * (1.0 - (t * PI).cos())
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn split(v: f64) -> (usize, f64) {
    let cell = v.floor();
    // NaN 和超大值通过饱和转换落在合法下标上，随后按掩码回绕
    (cell as usize, v - cell)
}

#[inline]
fn refine(cell: usize, frac: f64) -> (usize, f64) {
    let cell = cell << 1;
    let frac = frac * 2.0;
    if frac >= 1.0 {
        (cell.wrapping_add(1), frac - 1.0)
    } else {
        (cell, frac)
    }
}
