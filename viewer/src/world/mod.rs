use bevy::prelude::*;
use wire_engine::{
    generate_cone, generate_sphere, Color as WireColor, Mesh, NoiseField, TerrainPatch, Vector3,
};

use crate::controller::{FirstPersonController, PlayerSpawn};
use crate::FrameSet;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(Update, (update_terrain, spin_meshes).in_set(FrameSet::World));
    }
}

/// 启动时生成的噪声场，之后只读
#[derive(Resource)]
pub struct Noise(pub NoiseField);

/// 跟随摄像机的地形块
#[derive(Resource)]
pub struct Terrain(pub TerrainPatch);

/// 参与线框渲染的普通网格
#[derive(Component)]
pub struct WireMesh(pub Mesh);

/// 每秒绕网格原点旋转的圈数（X、Y、Z）
#[derive(Component)]
pub struct Spin {
    pub turns_per_second: Vector3,
}

fn setup_scene(mut commands: Commands, spawn: Res<PlayerSpawn>) {
    let start = spawn.position;

    let mut sphere = generate_sphere(start.add(Vector3::new(-2.0, -1.5, 8.0)), 1.2, 12);
    sphere.recolor(WireColor::new(255, 200, 64));
    commands.spawn((
        WireMesh(sphere),
        Spin { turns_per_second: Vector3::new(0.05, 0.1, 0.0) },
    ));

    let mut cone = generate_cone(start.add(Vector3::new(3.0, -1.0, 10.0)), 1.0, 2.0, 16);
    cone.recolor(WireColor::new(255, 96, 96));
    commands.spawn((
        WireMesh(cone),
        Spin { turns_per_second: Vector3::new(0.0, 0.0, 0.08) },
    ));

    info!("Scene ready: 2 meshes around ({}, {})", start.x, start.z);
}

pub fn update_terrain(
    noise: Res<Noise>,
    mut terrain: ResMut<Terrain>,
    player: Query<&FirstPersonController>,
) {
    let Ok(controller) = player.get_single() else {
        return;
    };
    terrain.0.regenerate(controller.camera.position, &noise.0);
}

fn spin_meshes(mut query: Query<(&mut WireMesh, &Spin)>, time: Res<Time>) {
    let dt = time.delta_seconds_f64();
    for (mut mesh, spin) in query.iter_mut() {
        let pivot = mesh.0.origin;
        mesh.0.rotate(spin.turns_per_second.scale(dt), pivot);
    }
}
