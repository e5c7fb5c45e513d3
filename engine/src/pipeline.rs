use crate::api::{Color, EngineError};
use crate::camera::Camera;
use crate::mesh::{Mesh, Vertex};

/// 输出画面的尺寸与缩放
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub fov: f64, // 投影缩放系数，越大视野越窄
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1600.0, height: 900.0, fov: 1.0 }
    }
}

impl Viewport {
    const ZOOM_STEP: f64 = 0.1;

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "viewport must have a positive finite size, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.fov.is_finite() {
            return Err(EngineError::InvalidConfig(format!("fov must be finite, got {}", self.fov)));
        }
        Ok(())
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    /// 滚轮缩放，`delta` 为滚动的格数
    pub fn zoom(&mut self, delta: f64) {
        self.fov += delta * Self::ZOOM_STEP;
    }
}

/// 投影到屏幕上的一条线段，屏幕坐标原点在左上角，Y 向下
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub depth: f64, // 两端投影系数的平均值，越小越远
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub edges: usize,
    pub near_culled: usize,
    pub offscreen_culled: usize,
    pub drawn: usize,
}

/// 一帧的绘制列表，按从远到近排好序
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub segments: Vec<Segment>,
    pub stats: FrameStats,
}

/// 单条边的投影结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    Visible(Segment),
    BehindCamera,
    OffScreen,
}

/// 画家算法线框渲染：投影所有边、剔除、按深度从远到近排序
#[derive(Debug, Clone, Default)]
pub struct RenderPipeline {
    viewport: Viewport,
}

impl RenderPipeline {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn render<'a>(&self, meshes: impl IntoIterator<Item = &'a Mesh>, camera: &Camera) -> Frame {
        let mut frame = Frame::default();
        self.render_into(meshes, camera, &mut frame);
        frame
    }

    /// 复用 `frame` 的缓冲区
    pub fn render_into<'a>(
        &self,
        meshes: impl IntoIterator<Item = &'a Mesh>,
        camera: &Camera,
        frame: &mut Frame,
    ) {
        frame.segments.clear();
        let mut stats = FrameStats::default();

        for mesh in meshes {
            for &edge in &mesh.edges {
                stats.edges += 1;
                let (a, b) = mesh.endpoints(edge);
                match self.project_edge(a, b, camera) {
                    Visibility::Visible(segment) => frame.segments.push(segment),
                    Visibility::BehindCamera => stats.near_culled += 1,
                    Visibility::OffScreen => stats.offscreen_culled += 1,
                }
            }
        }

        // 稳定排序：深度相同的线段保持提交顺序
        frame.segments.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        stats.drawn = frame.segments.len();
        frame.stats = stats;
    }

    pub fn project_edge(&self, a: &Vertex, b: &Vertex, camera: &Camera) -> Visibility {
        let pa = camera.to_camera_space(a.position);
        let pb = camera.to_camera_space(b.position);
        if pa.z <= 0.0 || pb.z <= 0.0 {
            return Visibility::BehindCamera;
        }

        let vp = &self.viewport;
        let ka = vp.half_width() / pa.z;
        let kb = vp.half_width() / pb.z;
        let start = [pa.x * ka * vp.fov + vp.half_width(), pa.y * ka * vp.fov + vp.half_height()];
        let end = [pb.x * kb * vp.fov + vp.half_width(), pb.y * kb * vp.fov + vp.half_height()];

        // 粗略剔除：两端都在左/上方之外，或都在右/下方之外。
        // 不区分具体是哪条边界，一端在左侧之外、另一端在上方之外的斜线
        // 即使穿过画面也会被剔除，这是有意保留的行为
        let before = |p: [f64; 2]| p[0] < 0.0 || p[1] < 0.0;
        let beyond = |p: [f64; 2]| p[0] > vp.width || p[1] > vp.height;
        if (before(start) && before(end)) || (beyond(start) && beyond(end)) {
            return Visibility::OffScreen;
        }

        Visibility::Visible(Segment { start, end, depth: (ka + kb) / 2.0, color: a.color })
    }
}
