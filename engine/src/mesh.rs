use crate::api::Color;
use crate::math::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub color: Color,
}

impl Vertex {
    pub const fn new(position: Vector3, color: Color) -> Self {
        Self { position, color }
    }

    /// 白色顶点
    pub const fn at(position: Vector3) -> Self {
        Self::new(position, Color::WHITE)
    }
}

/// 线框网格：顶点、边（顶点下标对）以及旋转用的参考原点。
///
/// `origin` 不一定是几何中心，由创建或移动网格的一方负责维护。
/// 边的下标必须指向有效顶点，这里不做校验，越界访问会 panic。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<[usize; 2]>,
    pub origin: Vector3,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, edges: Vec<[usize; 2]>, origin: Vector3) -> Self {
        Self { vertices, edges, origin }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn endpoints(&self, edge: [usize; 2]) -> (&Vertex, &Vertex) {
        (&self.vertices[edge[0]], &self.vertices[edge[1]])
    }

    /// 相对平移，原点一起移动
    pub fn translate(&mut self, offset: Vector3) {
        for vertex in &mut self.vertices {
            vertex.position = vertex.position.add(offset);
        }
        self.origin = self.origin.add(offset);
    }

    /// 把原点移到 `target`，保持各顶点相对原点的偏移
    pub fn absolute_translate(&mut self, target: Vector3) {
        let old_origin = self.origin;
        for vertex in &mut self.vertices {
            vertex.position = vertex.position.subtract(old_origin).add(target);
        }
        self.origin = target;
    }

    /// 依次绕 X、Y、Z 轴旋转 `angles` 中对应的圈数，旋转中心为 `pivot`。
    /// 旋转不可交换，X→Y→Z 的顺序是接口的一部分。
    pub fn rotate(&mut self, angles: Vector3, pivot: Vector3) {
        for vertex in &mut self.vertices {
            vertex.position = vertex
                .position
                .rotate_x(pivot, angles.x)
                .rotate_y(pivot, angles.y)
                .rotate_z(pivot, angles.z);
        }
    }

    pub fn recolor(&mut self, color: Color) {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
    }

    pub fn centroid(&self) -> Option<Vector3> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::ZERO, |acc, v| acc.add(v.position));
        Some(sum.scale(1.0 / self.vertices.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![
                Vertex::at(Vector3::new(0.0, 0.0, 0.0)),
                Vertex::at(Vector3::new(2.0, 0.0, 0.0)),
                Vertex::new(Vector3::new(0.0, 3.0, 1.0), Color::new(10, 20, 30)),
            ],
            vec![[0, 1], [1, 2], [2, 0]],
            Vector3::new(0.5, 0.5, 0.5),
        )
    }

    fn assert_vec_eq(a: Vector3, b: Vector3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
    }

    #[test]
    fn translate_round_trip() {
        let original = triangle();
        let mut mesh = original.clone();
        let v = Vector3::new(3.25, -1.5, 8.0);
        mesh.translate(v);
        assert_eq!(mesh.origin, Vector3::new(3.75, -1.0, 8.5));
        assert_eq!(mesh.vertices[1].position, Vector3::new(5.25, -1.5, 8.0));
        mesh.translate(v.negate());
        assert_eq!(mesh, original);
    }

    #[test]
    fn absolute_translate_keeps_offsets() {
        let mut mesh = triangle();
        let before: Vec<Vector3> = mesh
            .vertices
            .iter()
            .map(|v| v.position.subtract(mesh.origin))
            .collect();

        let target = Vector3::new(-10.0, 4.0, 7.0);
        mesh.absolute_translate(target);

        assert_eq!(mesh.origin, target);
        for (vertex, offset) in mesh.vertices.iter().zip(before) {
            assert_vec_eq(vertex.position.subtract(mesh.origin), offset);
        }
        assert_eq!(mesh.edges, triangle().edges);
    }

    #[test]
    fn rotate_applies_x_then_y_then_z() {
        let pivot = Vector3::new(1.0, 2.0, -1.0);
        let angles = Vector3::new(0.1, 0.35, -0.2);
        let mut mesh = triangle();
        mesh.rotate(angles, pivot);

        for (rotated, original) in mesh.vertices.iter().zip(triangle().vertices) {
            let expected = original
                .position
                .rotate_x(pivot, 0.1)
                .rotate_y(pivot, 0.35)
                .rotate_z(pivot, -0.2);
            assert_vec_eq(rotated.position, expected);
        }
        // 旋转不移动原点，也不改颜色
        assert_eq!(mesh.origin, triangle().origin);
        assert_eq!(mesh.vertices[2].color, Color::new(10, 20, 30));
    }

    #[test]
    fn rotation_order_matters() {
        let mut xy = Mesh::new(vec![Vertex::at(Vector3::new(0.0, 1.0, 0.0))], vec![], Vector3::ZERO);
        xy.rotate(Vector3::new(0.25, 0.25, 0.0), Vector3::ZERO);
        // X 四分之一圈: (0,1,0) -> (0,0,1)；再 Y 四分之一圈: (0,0,1) -> (1,0,0)
        assert_vec_eq(xy.vertices[0].position, Vector3::new(1.0, 0.0, 0.0));

        let p = Vector3::new(0.0, 1.0, 0.0);
        let yx = p.rotate_y(Vector3::ZERO, 0.25).rotate_x(Vector3::ZERO, 0.25);
        assert_vec_eq(yx, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn centroid_and_recolor() {
        let mut mesh = triangle();
        let c = mesh.centroid().unwrap();
        assert_vec_eq(c, Vector3::new(2.0 / 3.0, 1.0, 1.0 / 3.0));
        mesh.recolor(Color::BLACK);
        assert!(mesh.vertices.iter().all(|v| v.color == Color::BLACK));
        assert_eq!(Mesh::default().centroid(), None);
    }
}
