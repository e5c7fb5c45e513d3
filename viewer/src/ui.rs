use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::controller::FirstPersonController;
use crate::rendering::Renderer;
use crate::world::{Noise, Terrain, WireMesh};
use crate::FrameSet;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .insert_resource(DebugState::default())
            .insert_resource(ViewerSettings::default())
            .add_systems(
                Update,
                (toggle_settings, debug_ui_system, viewer_settings_ui)
                    .chain()
                    .after(FrameSet::Render),
            );
    }
}

#[derive(Resource, Default)]
pub struct DebugState {
    pub fps: f32,
}

#[derive(Resource, Clone)]
pub struct ViewerSettings {
    pub show_debug: bool,
    pub show_settings: bool,
    pub mouse_sensitivity: f64, // 圈/像素
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            show_debug: true,
            show_settings: false,
            mouse_sensitivity: 0.0004,
        }
    }
}

fn toggle_settings(keyboard: Res<Input<KeyCode>>, mut settings: ResMut<ViewerSettings>) {
    if keyboard.just_pressed(KeyCode::F3) {
        settings.show_settings = !settings.show_settings;
    }
}

fn debug_ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<DebugState>,
    diagnostics: Res<DiagnosticsStore>,
    mut settings: ResMut<ViewerSettings>,
    renderer: Res<Renderer>,
    noise: Res<Noise>,
    terrain: Res<Terrain>,
    player: Query<&FirstPersonController>,
    meshes: Query<&WireMesh>,
) {
    if let Some(fps_diagnostic) = diagnostics.get(FrameTimeDiagnosticsPlugin::FPS) {
        if let Some(fps) = fps_diagnostic.smoothed() { state.fps = fps as f32; }
    }
    if !settings.show_debug {
        return;
    }

    let stats = renderer.frame.stats;
    let ctx = contexts.ctx_mut();
    egui::Window::new("Debug").show(ctx, |ui| {
        ui.label(format!("FPS: {:.1}", state.fps));
        if let Ok(controller) = player.get_single() {
            let camera = &controller.camera;
            ui.label(format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                camera.position.x, camera.position.y, camera.position.z
            ));
            ui.label(format!("Yaw / pitch: {:.3} / {:.3} turns", camera.yaw(), camera.pitch()));
            ui.label(format!("Grounded: {}", controller.motion.is_grounded()));
        }
        ui.label(format!("FOV: {:.2}", renderer.pipeline.viewport().fov));
        let field = &noise.0;
        ui.label(format!(
            "Seed: {} ({} octaves, falloff {:.2})",
            field.seed().0,
            field.octaves(),
            field.falloff()
        ));
        let patch = terrain.0.config();
        ui.label(format!("Terrain: {0}x{0}, water at {1:.1}", patch.dim, patch.water_level));
        ui.separator();
        ui.label(format!("Edges: {}", stats.edges));
        ui.label(format!("Behind camera: {}", stats.near_culled));
        ui.label(format!("Off screen: {}", stats.offscreen_culled));
        ui.label(format!("Drawn: {}", stats.drawn));
        ui.separator();
        for (i, mesh) in meshes.iter().enumerate() {
            if let Some(c) = mesh.0.centroid() {
                ui.label(format!("Mesh {i}: {} edges @ ({:.1}, {:.1}, {:.1})", mesh.0.edge_count(), c.x, c.y, c.z));
            }
        }
        ui.separator();
        ui.label("WASD move, arrows/drag look, Shift sprint, Ctrl up, Space jump, wheel zoom");
        if ui.button("Settings (F3)").clicked() {
            settings.show_settings = !settings.show_settings;
        }
    });
}

fn viewer_settings_ui(
    mut contexts: EguiContexts,
    mut settings: ResMut<ViewerSettings>,
    mut renderer: ResMut<Renderer>,
    mut player: Query<&mut FirstPersonController>,
) {
    if !settings.show_settings {
        return;
    }

    let ctx = contexts.ctx_mut();
    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.add(egui::Slider::new(&mut renderer.pipeline.viewport_mut().fov, 0.2..=5.0).text("FOV"));
            ui.add(
                egui::Slider::new(&mut settings.mouse_sensitivity, 0.0001..=0.002)
                    .logarithmic(true)
                    .text("Mouse sensitivity"),
            );
            if let Ok(mut controller) = player.get_single_mut() {
                ui.add(egui::Slider::new(&mut controller.motion.config.gravity, 0.0..=10.0).text("Gravity"));
            }
            ui.checkbox(&mut settings.show_debug, "Show debug window");
        });
}
