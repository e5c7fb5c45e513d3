use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Noise lattice must hold {expected} values, got {actual}")]
    LatticeSize { expected: usize, actual: usize },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(pub u64);

/// 8 位 RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 由浮点通道构造，先四舍五入再截断到 [0, 255]
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

fn channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// 连续噪声来源。地形生成器只依赖这个接口。
pub trait NoiseSource {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_rounded_and_clamped() {
        assert_eq!(Color::from_channels(-12.0, 127.6, 300.0), Color::new(0, 128, 255));
        assert_eq!(Color::from_channels(f64::NAN, 0.4, 254.5), Color::new(0, 0, 255));
    }

    #[test]
    fn closures_act_as_noise_sources() {
        let source = |x: f64, y: f64, z: f64| x + 10.0 * y + 100.0 * z;
        assert_eq!(source.sample(1.0, 2.0, 3.0), 321.0);
    }
}
