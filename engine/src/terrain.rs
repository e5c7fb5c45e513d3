use tracing::debug;

use crate::api::{Color, EngineError, NoiseSource};
use crate::generators::generate_terrain;
use crate::math::Vector3;
use crate::mesh::{Mesh, Vertex};

/// 跟随摄像机的地形块配置
#[derive(Debug, Clone, PartialEq)]
pub struct PatchConfig {
    pub dim: usize,            // 每边顶点数
    pub sample_scale: f64,     // 世界坐标到噪声坐标的缩放
    pub height_scale: f64,     // 噪声值到高度的缩放
    pub water_level: f64,      // 超过该值（Y 向下，即更低）的地面被压平为水面
    pub water_color: Color,
    pub ramp_base: f64,
    pub ramp_step: f64,
    pub ground_blue: u8,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            dim: 64,
            sample_scale: 0.1,
            height_scale: 6.5,
            water_level: 3.0,
            water_color: Color::new(64, 128, 255),
            ramp_base: 5.0,
            ramp_step: 24.0,
            ground_blue: 255,
        }
    }
}

impl PatchConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.dim < 2 {
            return Err(EngineError::InvalidConfig(format!(
                "terrain patch needs at least 2x2 vertices, got {}",
                self.dim
            )));
        }
        let scalars = [
            ("sample_scale", self.sample_scale),
            ("height_scale", self.height_scale),
            ("water_level", self.water_level),
            ("ramp_base", self.ramp_base),
            ("ramp_step", self.ramp_step),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(EngineError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

/// 固定大小的 `dim × dim` 地形网格，每帧围绕摄像机重新采样。
///
/// 重新生成只覆盖顶点的位置和颜色，从不改变顶点数量、顺序或边的拓扑，
/// 因此 `(row, col)` 始终指向同一个顶点。
#[derive(Debug, Clone)]
pub struct TerrainPatch {
    mesh: Mesh,
    config: PatchConfig,
}

impl TerrainPatch {
    pub fn new(config: PatchConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let flat = |_: f64, _: f64, _: f64| 0.0;
        let size = config.dim as f64;
        let mut mesh = generate_terrain(Vector3::ZERO, Vector3::ZERO, size, config.dim, 0.0, 0.0, &flat);
        for vertex in &mut mesh.vertices {
            vertex.color.b = config.ground_blue;
        }
        debug!(dim = config.dim, edges = mesh.edge_count(), "terrain patch allocated");
        Ok(Self { mesh, config })
    }

    pub fn dim(&self) -> usize {
        self.config.dim
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn vertex(&self, row: usize, col: usize) -> &Vertex {
        &self.mesh.vertices[self.index(row, col)]
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.dim() && col < self.dim());
        row * self.dim() + col
    }

    /// 世界坐标 `(x, z)` 处未压平的地面高度
    pub fn ground_height(&self, x: f64, z: f64, noise: &impl NoiseSource) -> f64 {
        self.config.height_scale
            * noise.sample(x * self.config.sample_scale, z * self.config.sample_scale, 0.0)
    }

    /// 以 `center` 四舍五入后的位置为中心重新采样整个网格
    pub fn regenerate(&mut self, center: Vector3, noise: &impl NoiseSource) {
        let anchor = center.round();
        let half = (self.dim() / 2) as f64;

        for row in 0..self.dim() {
            for col in 0..self.dim() {
                let x = col as f64 - half + anchor.x;
                let z = row as f64 - half + anchor.z;
                let (y, color) = self.shade(self.ground_height(x, z, noise));

                let index = self.index(row, col);
                let vertex = &mut self.mesh.vertices[index];
                vertex.position = Vector3::new(x, y, z);
                vertex.color = color;
            }
        }
        self.mesh.origin = Vector3::new(anchor.x, 0.0, anchor.z);
    }

    /// 高度到（压平后的高度, 颜色）
    fn shade(&self, height: f64) -> (f64, Color) {
        let c = &self.config;
        if height > c.water_level {
            return (c.water_level, c.water_color);
        }
        let ramp = (c.ramp_base + height) * c.ramp_step;
        (height, Color::from_channels(ramp, 256.0 - ramp, c.ground_blue as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{NoiseConfig, NoiseField};
    use approx::assert_relative_eq;

    fn small() -> PatchConfig {
        PatchConfig { dim: 8, ..PatchConfig::default() }
    }

    #[test]
    fn regenerate_keeps_topology() {
        let noise = NoiseField::new(&NoiseConfig::default()).unwrap();
        let mut patch = TerrainPatch::new(small()).unwrap();
        let edges = patch.mesh().edges.clone();
        assert_eq!(patch.config().dim, 8);
        assert_eq!(patch.mesh().vertex_count(), 64);

        patch.regenerate(Vector3::new(1028.3, -1.0, 1027.6), &noise);
        assert_eq!(patch.mesh().vertex_count(), 64);
        assert_eq!(patch.mesh().edges, edges);

        patch.regenerate(Vector3::new(-40.0, 0.0, 12.0), &noise);
        assert_eq!(patch.mesh().edges, edges);
    }

    #[test]
    fn patch_is_centred_on_rounded_camera() {
        let flat = |_: f64, _: f64, _: f64| 0.0;
        let mut patch = TerrainPatch::new(small()).unwrap();
        patch.regenerate(Vector3::new(1028.4, 2.0, 99.6), &flat);

        let centre = patch.vertex(4, 4).position;
        assert_eq!((centre.x, centre.z), (1028.0, 100.0));
        let corner = patch.vertex(0, 0).position;
        assert_eq!((corner.x, corner.z), (1024.0, 96.0));
        // row 沿 Z，col 沿 X
        assert_eq!(patch.vertex(1, 0).position.z, 97.0);
        assert_eq!(patch.vertex(0, 1).position.x, 1025.0);
        assert_eq!(patch.mesh().origin, Vector3::new(1028.0, 0.0, 100.0));
    }

    #[test]
    fn high_values_are_clamped_to_water() {
        let deep = |_: f64, _: f64, _: f64| 1.0;
        let mut patch = TerrainPatch::new(small()).unwrap();
        patch.regenerate(Vector3::ZERO, &deep);
        for vertex in &patch.mesh().vertices {
            assert_eq!(vertex.position.y, 3.0);
            assert_eq!(vertex.color, Color::new(64, 128, 255));
        }
    }

    #[test]
    fn ground_colour_ramps_with_height() {
        let mut patch = TerrainPatch::new(small()).unwrap();

        patch.regenerate(Vector3::ZERO, &|_: f64, _: f64, _: f64| 0.0);
        assert_eq!(patch.vertex(3, 3).color, Color::new(120, 136, 255));

        let h = 2.5 / 6.5;
        patch.regenerate(Vector3::ZERO, &move |_: f64, _: f64, _: f64| h);
        let v = patch.vertex(3, 3);
        assert_relative_eq!(v.position.y, 2.5, epsilon = 1e-12);
        assert_eq!(v.color, Color::new(180, 76, 255));
    }

    #[test]
    fn ground_height_matches_noise() {
        let noise = NoiseField::new(&NoiseConfig::default()).unwrap();
        let patch = TerrainPatch::new(PatchConfig::default()).unwrap();
        let expected = 6.5 * noise.sample(102.8, 51.3, 0.0);
        assert_relative_eq!(patch.ground_height(1028.0, 513.0, &noise), expected, epsilon = 1e-12);
    }

    #[test]
    fn rejects_degenerate_config() {
        assert!(TerrainPatch::new(PatchConfig { dim: 1, ..PatchConfig::default() }).is_err());
        let bad = PatchConfig { height_scale: f64::INFINITY, ..PatchConfig::default() };
        assert!(matches!(bad.validate(), Err(EngineError::InvalidConfig(_))));
    }
}
