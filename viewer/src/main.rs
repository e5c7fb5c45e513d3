use anyhow::Context;
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use wire_engine::{MotionConfig, NoiseConfig, NoiseField, PatchConfig, RenderPipeline, TerrainPatch, Viewport};

mod controller;
mod rendering;
mod ui;
mod world;

use crate::controller::{ControllerPlugin, PlayerSpawn};
use crate::rendering::{Renderer, RenderingPlugin};
use crate::ui::UiPlugin;
use crate::world::{Noise, Terrain, WorldPlugin};

/// 每帧依次执行：采集输入 -> 更新世界 -> 投影并绘制
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    World,
    Render,
}

fn main() -> anyhow::Result<()> {
    let viewport = Viewport::default();
    viewport.validate().context("invalid viewport")?;

    let motion = MotionConfig::default();
    motion.validate().context("invalid motion config")?;

    let noise_config = NoiseConfig::default();
    let noise = NoiseField::new(&noise_config).context("failed to build noise field")?;
    let terrain = TerrainPatch::new(PatchConfig::default()).context("failed to allocate terrain patch")?;

    App::new()
        .insert_resource(Noise(noise))
        .insert_resource(Terrain(terrain))
        .insert_resource(Renderer::new(RenderPipeline::new(viewport)))
        .insert_resource(PlayerSpawn { motion, ..default() })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Wireframe Terrain".into(),
                resolution: WindowResolution::new(viewport.width as f32, viewport.height as f32),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(LogDiagnosticsPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .configure_sets(Update, (FrameSet::Input, FrameSet::World, FrameSet::Render).chain())
        .add_plugins(ControllerPlugin)
        .add_plugins(WorldPlugin)
        .add_plugins(RenderingPlugin)
        .add_plugins(UiPlugin)
        .run();

    Ok(())
}
