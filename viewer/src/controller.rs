use bevy::app::AppExit;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use wire_engine::{Camera as WireCamera, ControlInput, Motion, MotionConfig, Vector3};

use crate::rendering::Renderer;
use crate::ui::ViewerSettings;
use crate::world::{update_terrain, Noise, Terrain};
use crate::FrameSet;

// 触控板按像素滚动，换算成"格"
const PIXELS_PER_LINE: f64 = 40.0;

pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSpawn>()
            .add_systems(Startup, spawn_player)
            .add_systems(Update, (handle_input, handle_zoom, handle_quit).in_set(FrameSet::Input))
            .add_systems(Update, apply_physics.in_set(FrameSet::World).after(update_terrain));
    }
}

/// 出生位置和运动参数
#[derive(Resource, Clone)]
pub struct PlayerSpawn {
    pub position: Vector3,
    pub motion: MotionConfig,
}

impl Default for PlayerSpawn {
    fn default() -> Self {
        Self {
            position: Vector3::new(1028.0, 0.0, 1028.0),
            motion: MotionConfig::default(),
        }
    }
}

#[derive(Component)]
pub struct FirstPersonController {
    pub camera: WireCamera,
    pub motion: Motion,
}

fn spawn_player(mut commands: Commands, spawn: Res<PlayerSpawn>) {
    info!(
        "Player spawning at ({}, {}, {})",
        spawn.position.x, spawn.position.y, spawn.position.z
    );
    commands.spawn(FirstPersonController {
        camera: WireCamera::new(spawn.position),
        motion: Motion::new(spawn.motion.clone()),
    });
}

/// 键盘状态到控制输入，`look` 为已换算成圈的鼠标视角增量
pub fn control_input(keyboard: &Input<KeyCode>, look: (f64, f64)) -> ControlInput {
    let axis = |positive: KeyCode, negative: KeyCode| {
        let mut value = 0.0;
        if keyboard.pressed(positive) { value += 1.0; }
        if keyboard.pressed(negative) { value -= 1.0; }
        value
    };

    ControlInput {
        forward: axis(KeyCode::W, KeyCode::S),
        strafe: axis(KeyCode::D, KeyCode::A),
        turn: axis(KeyCode::Left, KeyCode::Right),
        tilt: axis(KeyCode::Down, KeyCode::Up),
        look_yaw: look.0,
        look_pitch: look.1,
        fast: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        ascend: keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
        jump: keyboard.pressed(KeyCode::Space),
    }
}

fn handle_input(
    mut query: Query<&mut FirstPersonController>,
    keyboard: Res<Input<KeyCode>>,
    mouse_buttons: Res<Input<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut contexts: EguiContexts,
    settings: Res<ViewerSettings>,
    time: Res<Time>,
) {
    // 事件每帧都要读掉，否则松开按键后会累积
    let delta: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();

    // 只有按住鼠标拖动、且不在 egui 窗口上时才转动视角
    let dragging = mouse_buttons.any_pressed([MouseButton::Left, MouseButton::Right, MouseButton::Middle])
        && !contexts.ctx_mut().wants_pointer_input();
    let look = if dragging {
        let sensitivity = settings.mouse_sensitivity;
        (delta.x as f64 * sensitivity, -(delta.y as f64) * sensitivity)
    } else {
        (0.0, 0.0)
    };

    let input = control_input(&keyboard, look);
    let dt = time.delta_seconds_f64();
    for mut controller in query.iter_mut() {
        let FirstPersonController { camera, motion } = &mut *controller;
        motion.steer(camera, &input, dt);
    }
}

/// 滚轮事件折算成缩放格数；指针在 egui 窗口上时滚轮交给 egui
pub fn zoom_steps<'a>(events: impl IntoIterator<Item = &'a MouseWheel>, pointer_captured: bool) -> f64 {
    let steps: f64 = events
        .into_iter()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y as f64,
            MouseScrollUnit::Pixel => event.y as f64 / PIXELS_PER_LINE,
        })
        .sum();
    if pointer_captured { 0.0 } else { steps }
}

fn handle_zoom(
    mut wheel: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut renderer: ResMut<Renderer>,
) {
    let captured = contexts.ctx_mut().wants_pointer_input();
    let steps = zoom_steps(wheel.read(), captured);
    if steps != 0.0 {
        renderer.pipeline.viewport_mut().zoom(steps);
    }
}

fn handle_quit(keyboard: Res<Input<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        info!("Escape pressed, exiting");
        exit.send(AppExit);
    }
}

fn apply_physics(
    mut query: Query<&mut FirstPersonController>,
    noise: Res<Noise>,
    terrain: Res<Terrain>,
    time: Res<Time>,
) {
    let dt = time.delta_seconds_f64();
    for mut controller in query.iter_mut() {
        let FirstPersonController { camera, motion } = &mut *controller;
        let ground = terrain.0.ground_height(camera.position.x, camera.position.z, &noise.0);
        motion.settle(camera, ground, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_axes() {
        let mut keyboard = Input::<KeyCode>::default();
        keyboard.press(KeyCode::W);
        keyboard.press(KeyCode::A);
        keyboard.press(KeyCode::Up);
        keyboard.press(KeyCode::ShiftRight);

        let input = control_input(&keyboard, (0.01, -0.02));
        assert_eq!(input.forward, 1.0);
        assert_eq!(input.strafe, -1.0);
        assert_eq!(input.turn, 0.0);
        assert_eq!(input.tilt, -1.0);
        assert_eq!((input.look_yaw, input.look_pitch), (0.01, -0.02));
        assert!(input.fast);
        assert!(!input.ascend && !input.jump);
    }

    fn wheel(unit: MouseScrollUnit, y: f32) -> MouseWheel {
        MouseWheel { unit, x: 0.0, y, window: Entity::PLACEHOLDER }
    }

    #[test]
    fn wheel_lines_and_pixels_become_zoom_steps() {
        let events = [wheel(MouseScrollUnit::Line, 2.0), wheel(MouseScrollUnit::Pixel, -40.0)];
        assert_eq!(zoom_steps(&events, false), 1.0);
    }

    #[test]
    fn wheel_over_egui_does_not_zoom() {
        let events = [wheel(MouseScrollUnit::Line, 3.0)];
        assert_eq!(zoom_steps(&events, true), 0.0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut keyboard = Input::<KeyCode>::default();
        keyboard.press(KeyCode::Left);
        keyboard.press(KeyCode::Right);
        keyboard.press(KeyCode::ControlLeft);
        keyboard.press(KeyCode::Space);

        let input = control_input(&keyboard, (0.0, 0.0));
        assert_eq!(input.turn, 0.0);
        assert!(input.ascend && input.jump);
    }
}
