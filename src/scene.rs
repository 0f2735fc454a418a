use glam::{Mat3, Mat4, Vec3};

use crate::collision::{Aabb, ObstacleCollider};
use crate::config::OBSTACLE_NAME_MARKER;
use crate::mesh::{Mesh, SubMesh, Vertex};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to parse glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("glTF document has no scene")]
    NoScene,
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(target_arch = "wasm32")]
    #[error("failed to fetch scene: {0}")]
    Fetch(String),
}

/// Renderable geometry baked into world space plus the obstacle colliders.
#[derive(Default)]
pub struct LoadedScene {
    pub mesh: Mesh,
    pub obstacles: Vec<ObstacleCollider>,
}

pub fn is_obstacle_name(name: &str) -> bool {
    name.contains(OBSTACLE_NAME_MARKER)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_scene(path: &std::path::Path) -> Result<LoadedScene, SceneError> {
    let data = std::fs::read(path)?;
    load_scene_from_bytes(&data)
}

#[cfg(target_arch = "wasm32")]
pub async fn fetch_scene(url: &str) -> Result<LoadedScene, SceneError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fetch_err = |e: wasm_bindgen::JsValue| SceneError::Fetch(format!("{:?}", e));

    let window = web_sys::window().ok_or_else(|| SceneError::Fetch("no window".into()))?;
    let resp: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(fetch_err)?
        .unchecked_into();
    if !resp.ok() {
        return Err(SceneError::Fetch(format!("{} returned {}", url, resp.status())));
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(fetch_err)?)
        .await
        .map_err(fetch_err)?;
    let data = js_sys::Uint8Array::new(&buf).to_vec();
    load_scene_from_bytes(&data)
}

pub fn load_scene_from_bytes(data: &[u8]) -> Result<LoadedScene, SceneError> {
    let (document, buffers, _images) = gltf::import_slice(data)?;
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(SceneError::NoScene)?;

    let mut loaded = LoadedScene::default();
    for node in scene.nodes() {
        visit_node(&node, Mat4::IDENTITY, &buffers, &mut loaded);
    }

    log::info!(
        "Loaded scene: {} submeshes, {} triangles, {} obstacles",
        loaded.mesh.submeshes.len(),
        loaded.mesh.triangle_count(),
        loaded.obstacles.len()
    );
    Ok(loaded)
}

fn visit_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    loaded: &mut LoadedScene,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        let mut local_bounds = Aabb::EMPTY;

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let Some(positions) = reader.read_positions().map(|i| i.collect::<Vec<_>>()) else {
                continue;
            };
            if positions.is_empty() {
                continue;
            }

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|i| i.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let [r, g, b, _] = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            let vertices = positions
                .iter()
                .zip(&normals)
                .map(|(pos, norm)| Vertex {
                    position: world.transform_point3(Vec3::from(*pos)).to_array(),
                    normal: (normal_matrix * Vec3::from(*norm))
                        .normalize_or_zero()
                        .to_array(),
                    color: [r, g, b],
                })
                .collect();

            local_bounds = local_bounds.union(Aabb::from_points(positions.iter().copied().map(Vec3::from)));
            loaded.mesh.submeshes.push(SubMesh { vertices, indices });
        }

        let name = node
            .name()
            .filter(|n| is_obstacle_name(n))
            .or_else(|| mesh.name().filter(|n| is_obstacle_name(n)));
        if let Some(name) = name
            && !local_bounds.is_empty()
        {
            log::debug!("Obstacle {} local bounds {:?}", name, local_bounds);
            loaded
                .obstacles
                .push(ObstacleCollider::new(name, local_bounds, world));
        }
    }

    for child in node.children() {
        visit_node(&child, world, buffers, loaded);
    }
}
