//! 程序化噪声地形与按深度排序的线框渲染。
//!
//! 引擎本身不依赖任何窗口或图形库：`RenderPipeline` 输出排好序的屏幕线段，
//! 由上层（`wire_viewer`）负责真正画出来。

pub mod api;
pub mod camera;
pub mod generators;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod sampling;
pub mod terrain;

pub use api::{Color, EngineError, NoiseSource, Seed};
pub use camera::{Camera, ControlInput, Motion, MotionConfig};
pub use generators::{generate_cone, generate_sphere, generate_terrain};
pub use math::Vector3;
pub use mesh::{Mesh, Vertex};
pub use pipeline::{Frame, FrameStats, RenderPipeline, Segment, Viewport, Visibility};
pub use sampling::{NoiseConfig, NoiseField};
pub use terrain::{PatchConfig, TerrainPatch};
