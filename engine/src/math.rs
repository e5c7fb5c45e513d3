use std::f64::consts::TAU;

/// 三维点/向量。所有运算都返回新值。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

// 刻意使用具名方法而不是运算符重载
#[allow(clippy::should_implement_trait)]
impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vector3) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn subtract(self, other: Vector3) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn negate(self) -> Self {
        self.scale(-1.0)
    }

    /// 每个分量四舍五入到整数
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round(), self.z.round())
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Vector3) -> f64 {
        self.subtract(other).length()
    }

    /// 绕经过 `pivot` 的 X 轴旋转 `turns` 圈
    pub fn rotate_x(self, pivot: Vector3, turns: f64) -> Self {
        let (sin, cos) = (turns * TAU).sin_cos();
        let d = self.subtract(pivot);
        Self::new(
            self.x,
            pivot.y + (d.y * cos - d.z * sin),
            pivot.z + (d.z * cos + d.y * sin),
        )
    }

    /// 绕经过 `pivot` 的 Y 轴旋转 `turns` 圈
    pub fn rotate_y(self, pivot: Vector3, turns: f64) -> Self {
        let (sin, cos) = (turns * TAU).sin_cos();
        let d = self.subtract(pivot);
        Self::new(
            pivot.x + (d.x * cos + d.z * sin),
            self.y,
            pivot.z + (d.z * cos - d.x * sin),
        )
    }

    /// 绕经过 `pivot` 的 Z 轴旋转 `turns` 圈
    pub fn rotate_z(self, pivot: Vector3, turns: f64) -> Self {
        let (sin, cos) = (turns * TAU).sin_cos();
        let d = self.subtract(pivot);
        Self::new(
            pivot.x + (d.x * cos - d.y * sin),
            pivot.y + (d.y * cos + d.x * sin),
            self.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: Vector3, b: Vector3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
    }

    #[test]
    fn affine_helpers() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-4.0, 0.5, 2.0);
        assert_eq!(a.add(b), Vector3::new(-3.0, 2.5, 5.0));
        assert_eq!(a.subtract(b), Vector3::new(5.0, 1.5, 1.0));
        assert_eq!(a.scale(2.0), Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a.add(a.negate()), Vector3::ZERO);
        assert_eq!(Vector3::new(1.4, -2.6, 3.5).round(), Vector3::new(1.0, -3.0, 4.0));
        assert_relative_eq!(Vector3::new(3.0, 4.0, 0.0).distance(Vector3::ZERO), 5.0);
    }

    #[test]
    fn quarter_turns_about_each_axis() {
        let o = Vector3::ZERO;
        assert_vec_eq(Vector3::new(0.0, 1.0, 0.0).rotate_x(o, 0.25), Vector3::new(0.0, 0.0, 1.0));
        assert_vec_eq(Vector3::new(1.0, 0.0, 0.0).rotate_y(o, 0.25), Vector3::new(0.0, 0.0, -1.0));
        assert_vec_eq(Vector3::new(1.0, 0.0, 0.0).rotate_z(o, 0.25), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn rotation_is_about_the_pivot() {
        let pivot = Vector3::new(10.0, 0.0, 5.0);
        let p = Vector3::new(11.0, 7.0, 5.0);
        assert_vec_eq(p.rotate_y(pivot, 0.5), Vector3::new(9.0, 7.0, 5.0));
        // 轴上的点保持不动
        assert_vec_eq(pivot.rotate_z(pivot, 0.3), pivot);
    }

    #[test]
    fn full_turn_is_identity() {
        let p = Vector3::new(0.3, -1.7, 2.2);
        let pivot = Vector3::new(1.0, 1.0, 1.0);
        assert_vec_eq(p.rotate_x(pivot, 1.0), p);
        assert_vec_eq(p.rotate_y(pivot, -1.0), p);
    }
}
