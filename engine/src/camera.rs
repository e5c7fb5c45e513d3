use std::f64::consts::TAU;

use crate::api::EngineError;
use crate::math::Vector3;

/// 第一人称摄像机。`rotation.x` 为偏航、`rotation.y` 为俯仰，单位都是圈；`rotation.z` 不使用。
///
/// 世界坐标沿用屏幕约定：+Y 朝下。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub position: Vector3,
    pub rotation: Vector3,
}

impl Camera {
    pub fn new(position: Vector3) -> Self {
        Self { position, rotation: Vector3::ZERO }
    }

    pub fn yaw(&self) -> f64 {
        self.rotation.x
    }

    pub fn pitch(&self) -> f64 {
        self.rotation.y
    }

    pub fn look(&mut self, yaw: f64, pitch: f64) {
        self.rotation.x += yaw;
        self.rotation.y += pitch;
    }

    /// 水平面内的前进方向
    pub fn forward(&self) -> Vector3 {
        let (sin, cos) = ((0.25 + self.yaw()) * TAU).sin_cos();
        Vector3::new(cos, 0.0, sin)
    }

    /// 水平面内的右方向
    pub fn right(&self) -> Vector3 {
        let (sin, cos) = (self.yaw() * TAU).sin_cos();
        Vector3::new(cos, 0.0, sin)
    }

    /// 世界坐标 -> 摄像机坐标（摄像机在原点，视线沿 +Z）
    pub fn to_camera_space(&self, point: Vector3) -> Vector3 {
        point
            .subtract(self.position)
            .rotate_y(Vector3::ZERO, self.yaw())
            .rotate_x(Vector3::ZERO, self.pitch())
    }
}

/// 一帧的控制输入，由输入层采集
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlInput {
    pub forward: f64,     // W = 1, S = -1
    pub strafe: f64,      // D = 1, A = -1
    pub turn: f64,        // 方向键左 = 1, 右 = -1
    pub tilt: f64,        // 方向键下 = 1, 上 = -1
    pub look_yaw: f64,    // 鼠标拖动，单位为圈
    pub look_pitch: f64,
    pub fast: bool,
    pub ascend: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    pub walk_speed: f64,
    pub sprint_speed: f64,
    pub turn_speed: f64,   // 圈/秒
    pub gravity: f64,      // 沿 +Y（向下）
    pub jump_speed: f64,
    pub eye_height: f64,
    pub ceiling: f64,      // 视点 Y 的上限，即最低可到达的位置
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 1.8,
            sprint_speed: 3.6,
            turn_speed: 0.6,
            gravity: 3.6,
            jump_speed: 3.0,
            eye_height: 0.3,
            ceiling: 2.7,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let values = [
            self.walk_speed,
            self.sprint_speed,
            self.turn_speed,
            self.gravity,
            self.jump_speed,
            self.eye_height,
            self.ceiling,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::InvalidConfig(format!("motion parameters must be finite: {self:?}")));
        }
        Ok(())
    }
}

/// 摄像机的简单物理：键盘移动、跳跃、重力和贴地
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Motion {
    pub velocity: Vector3,
    pub config: MotionConfig,
}

impl Motion {
    pub fn new(config: MotionConfig) -> Self {
        Self { velocity: Vector3::ZERO, config }
    }

    /// 只有垂直速度恰好为零（站在地面上）时才能起跳
    pub fn is_grounded(&self) -> bool {
        self.velocity.y == 0.0
    }

    /// 应用视角和移动输入
    pub fn steer(&mut self, camera: &mut Camera, input: &ControlInput, dt: f64) {
        let turn = self.config.turn_speed * dt;
        camera.look(
            input.look_yaw + input.turn * turn,
            input.look_pitch + input.tilt * turn,
        );

        let speed = (if input.fast { self.config.sprint_speed } else { self.config.walk_speed }) * dt;
        let step = camera
            .forward()
            .scale(input.forward * speed)
            .add(camera.right().scale(input.strafe * speed));
        camera.position = camera.position.add(step);

        if input.ascend {
            camera.position.y -= speed;
        }
        if input.jump && self.is_grounded() {
            self.velocity.y = -self.config.jump_speed;
        }
    }

    /// 积分速度，并让视点贴在 `ground` 上方 `eye_height` 处
    pub fn settle(&mut self, camera: &mut Camera, ground: f64, dt: f64) {
        camera.position = camera.position.add(self.velocity.scale(dt));

        let rest = ground - self.config.eye_height;
        if camera.position.y < rest {
            // 悬空
            self.velocity.y += self.config.gravity * dt;
        } else {
            self.velocity.y = 0.0;
            camera.position.y = rest;
        }
        if camera.position.y > self.config.ceiling {
            camera.position.y = self.config.ceiling;
        }
    }
}
