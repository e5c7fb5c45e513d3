use std::f64::consts::PI;

use crate::api::NoiseSource;
use crate::math::Vector3;
use crate::mesh::{Mesh, Vertex};

/// 经纬网格球体：`resolution × resolution` 个顶点加一个极点。
///
/// 极点位于 `position.y - radius`，与相邻的最后一圈纬线相连；
/// 其余顶点之间连纬向边和（首尾相接的）经向边。
pub fn generate_sphere(position: Vector3, radius: f64, resolution: usize) -> Mesh {
    let step = PI / resolution as f64;
    let mut vertices = Vec::with_capacity(resolution * resolution + 1);
    let mut edges = Vec::with_capacity(resolution * resolution * 2 + resolution);

    for latitude in 0..resolution {
        let r = (step * latitude as f64).sin() * radius;
        let y = (step * latitude as f64).cos() * radius;
        for longitude in 0..resolution {
            let x = (2.0 * step * longitude as f64).cos() * r;
            let z = (2.0 * step * longitude as f64).sin() * r;
            vertices.push(Vertex::at(position.add(Vector3::new(x, y, z))));
        }
    }

    let pole = vertices.len();
    vertices.push(Vertex::at(Vector3::new(position.x, position.y - radius, position.z)));

    if resolution > 0 {
        let last_ring = (resolution - 1) * resolution;
        for longitude in 0..resolution {
            edges.push([pole, last_ring + longitude]);
        }
    }

    for latitude in 0..resolution {
        for longitude in 0..resolution {
            let index = latitude * resolution + longitude;
            if latitude + 1 < resolution {
                edges.push([index, index + resolution]);
            }
            if longitude + 1 < resolution {
                edges.push([index, index + 1]);
            } else if resolution > 1 {
                // 经线首尾相接
                edges.push([index, latitude * resolution]);
            }
        }
    }

    Mesh::new(vertices, edges, position)
}

/// 圆锥：顶点在 `position.y - height / 2`，底面圆环在 `position.y + height / 2`。
pub fn generate_cone(position: Vector3, radius: f64, height: f64, resolution: usize) -> Mesh {
    let step = 2.0 * PI / resolution as f64;
    let mut vertices = Vec::with_capacity(resolution + 1);
    let mut edges = Vec::with_capacity(resolution * 2);

    vertices.push(Vertex::at(Vector3::new(position.x, position.y - height / 2.0, position.z)));
    for i in 0..resolution {
        let angle = step * i as f64;
        vertices.push(Vertex::at(Vector3::new(
            position.x + angle.cos() * radius,
            position.y + height / 2.0,
            position.z + angle.sin() * radius,
        )));
        edges.push([0, i + 1]);
        if i > 0 {
            edges.push([i, i + 1]);
        }
    }
    // 两个底面顶点之间已经有一条边
    if resolution > 2 {
        edges.push([resolution, 1]);
    }

    Mesh::new(vertices, edges, position)
}

/// 规则网格地形。
///
/// 顶点 `(x, z)` 的高度为
/// `amplitude * noise(smoothness * (n.x + x), smoothness * (n.z + z), n.y) + position.y`，
/// 世界 Y 作为噪声的第三个参数，高度是三维噪声场的一个二维切片。
/// 每个顶点只连 +X 和 +Z 方向的邻居，没有对角线。
pub fn generate_terrain(
    position: Vector3,
    noise_origin: Vector3,
    size: f64,
    resolution: usize,
    amplitude: f64,
    smoothness: f64,
    noise: &impl NoiseSource,
) -> Mesh {
    let step = size / resolution as f64;
    let mut vertices = Vec::with_capacity(resolution * resolution);
    let mut edges = Vec::with_capacity(2 * resolution * resolution.saturating_sub(1));

    for z in 0..resolution {
        for x in 0..resolution {
            let (fx, fz) = (x as f64, z as f64);
            let height = amplitude
                * noise.sample(
                    smoothness * (noise_origin.x + fx),
                    smoothness * (noise_origin.z + fz),
                    noise_origin.y,
                );
            vertices.push(Vertex::at(Vector3::new(
                step * fx + position.x,
                height + position.y,
                step * fz + position.z,
            )));

            let index = z * resolution + x;
            if z + 1 < resolution {
                edges.push([index, index + resolution]);
            }
            if x + 1 < resolution {
                edges.push([index, index + 1]);
            }
        }
    }

    Mesh::new(vertices, edges, position)
}
