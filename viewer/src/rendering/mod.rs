use bevy::core_pipeline::clear_color::ClearColorConfig;
use bevy::prelude::*;
use wire_engine::{Frame, RenderPipeline, Viewport};

use crate::controller::FirstPersonController;
use crate::world::{Terrain, WireMesh};
use crate::FrameSet;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        // 不清屏时多重采样缓冲不保留上一帧
        app.insert_resource(Msaa::Off)
            .add_systems(Startup, (setup_camera, configure_gizmos))
            .add_systems(Update, (build_frame, draw_frame).chain().in_set(FrameSet::Render));
    }
}

/// 渲染管线和上一帧的绘制列表
#[derive(Resource)]
pub struct Renderer {
    pub pipeline: RenderPipeline,
    pub frame: Frame,
}

impl Renderer {
    pub fn new(pipeline: RenderPipeline) -> Self {
        Self { pipeline, frame: Frame::default() }
    }
}

// 每帧先盖一层半透明黑色，上一帧的线条逐渐淡出
const FADE_ALPHA: u8 = 0xAA;

fn setup_camera(mut commands: Commands, renderer: Res<Renderer>) {
    commands.spawn(Camera2dBundle {
        camera_2d: Camera2d { clear_color: ClearColorConfig::None },
        ..default()
    });
    // gizmo 总是画在精灵之上
    commands.spawn(SpriteBundle {
        sprite: fade_sprite(renderer.pipeline.viewport()),
        ..default()
    });
}

/// 覆盖整个画面的半透明黑色矩形
pub fn fade_sprite(viewport: &Viewport) -> Sprite {
    Sprite {
        color: Color::rgba_u8(0, 0, 0, FADE_ALPHA),
        custom_size: Some(Vec2::new(viewport.width as f32, viewport.height as f32)),
        ..default()
    }
}

fn configure_gizmos(mut config: ResMut<GizmoConfig>) {
    config.line_width = 1.0;
}

fn build_frame(
    mut renderer: ResMut<Renderer>,
    terrain: Res<Terrain>,
    meshes: Query<&WireMesh>,
    player: Query<&FirstPersonController>,
) {
    let Ok(controller) = player.get_single() else {
        return;
    };
    let Renderer { pipeline, frame } = &mut *renderer;
    let scene = std::iter::once(terrain.0.mesh()).chain(meshes.iter().map(|mesh| &mesh.0));
    pipeline.render_into(scene, &controller.camera, frame);
}

/// 按排好的顺序画线，后画的覆盖先画的
fn draw_frame(renderer: Res<Renderer>, mut gizmos: Gizmos) {
    let viewport = renderer.pipeline.viewport();
    for segment in &renderer.frame.segments {
        let c = segment.color;
        gizmos.line_2d(
            to_world(segment.start, viewport),
            to_world(segment.end, viewport),
            Color::rgb_u8(c.r, c.g, c.b),
        );
    }
}

/// 屏幕坐标（左上角原点，Y 向下）-> bevy 2D 世界坐标（中心原点，Y 向上）
pub fn to_world(point: [f64; 2], viewport: &Viewport) -> Vec2 {
    Vec2::new(
        (point[0] - viewport.half_width()) as f32,
        (viewport.half_height() - point[1]) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_corners_map_to_world() {
        let viewport = Viewport::default();
        assert_eq!(to_world([0.0, 0.0], &viewport), Vec2::new(-800.0, 450.0));
        assert_eq!(to_world([800.0, 450.0], &viewport), Vec2::ZERO);
        assert_eq!(to_world([1600.0, 900.0], &viewport), Vec2::new(800.0, -450.0));
    }

    #[test]
    fn fade_covers_the_screen_translucently() {
        let sprite = fade_sprite(&Viewport::default());
        assert_eq!(sprite.custom_size, Some(Vec2::new(1600.0, 900.0)));
        assert_eq!(sprite.color.r(), 0.0);
        assert!((sprite.color.a() - 170.0 / 255.0).abs() < 1e-6);
    }
}
