//! # Scene — The Desk Still-Life
//!
//! A [`Scene`] owns everything the renderer needs to draw one frame: the
//! generated meshes, the texture file list, the placed objects, both lights,
//! the Phong constants, and the camera. There is no global state; the app
//! holds one `Scene` and hands references to the renderer.
//!
//! ## Sharing
//!
//! Objects refer to meshes and textures by index ([`MeshId`],
//! [`TextureId`]). Adding a mesh whose [`ShapeDesc`] equals one already in
//! the scene returns the existing id, so the two desk light markers share a
//! single cube and each texture file is decoded once.
//!
//! ```text
//!  objects ──MeshId──▶ meshes   (ShapeDesc, MeshBuffer)
//!     │
//!     └──TextureId──▶ textures (file paths, decoded by the renderer)
//! ```

use std::path::{Path, PathBuf};

use crate::camera::FlyCamera;
use crate::config::ViewerConfig;
use crate::lighting::{PhongParams, PointLight};
use crate::math::{Mat4, Transform, Vec2, Vec3};
use crate::mesh::{CylinderDesc, MeshBuffer, ShapeDesc, ShapeError, SphereDesc};

/// Uniform scale applied to every desk prop.
const PROP_SCALE: f32 = 1.25;
/// Scale of the cubes that mark light positions.
const LIGHT_MARKER_SCALE: f32 = 0.2;

/// Index into [`Scene::meshes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

/// Index into [`Scene::textures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// How an object is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Phong-lit base texture. Where `overlay` has non-zero alpha it replaces
    /// the base texel.
    Textured {
        base: TextureId,
        overlay: Option<TextureId>,
        uv_scale: Vec2,
    },
    /// Flat white, unaffected by lights.
    Emissive,
}

impl Surface {
    pub fn textured(base: TextureId) -> Self {
        Surface::Textured {
            base,
            overlay: None,
            uv_scale: Vec2::ONE,
        }
    }

    pub fn with_overlay(base: TextureId, overlay: TextureId) -> Self {
        Surface::Textured {
            base,
            overlay: Some(overlay),
            uv_scale: Vec2::ONE,
        }
    }
}

/// A generated mesh and the descriptor it came from.
#[derive(Debug, Clone)]
pub struct SceneMesh {
    pub desc: ShapeDesc,
    pub buffer: MeshBuffer,
}

/// One placed object.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub mesh: MeshId,
    pub transform: Transform,
    pub surface: Surface,
}

/// Per-object data the renderer needs each frame.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    pub mesh: MeshId,
    pub model: Mat4,
    pub normal_matrix: Mat4,
    pub surface: Surface,
}

#[derive(Debug, Clone)]
pub struct Scene {
    meshes: Vec<SceneMesh>,
    textures: Vec<PathBuf>,
    objects: Vec<SceneObject>,
    lights: [PointLight; 2],
    phong: PhongParams,
    camera: FlyCamera,
}

impl Scene {
    /// Empty scene lit by the default key and fill lights.
    pub fn new(camera: FlyCamera) -> Self {
        Self {
            meshes: Vec::new(),
            textures: Vec::new(),
            objects: Vec::new(),
            lights: [PointLight::key(), PointLight::fill()],
            phong: PhongParams::default(),
            camera,
        }
    }

    /// Generate a mesh, or reuse the one already built from an equal
    /// descriptor.
    pub fn add_mesh(&mut self, desc: ShapeDesc) -> Result<MeshId, ShapeError> {
        if let Some(index) = self.meshes.iter().position(|m| m.desc == desc) {
            return Ok(MeshId(index));
        }
        let buffer = desc.build()?;
        log::debug!(
            "mesh {}: {} {} vertices, {} triangles",
            self.meshes.len(),
            desc.kind(),
            buffer.vertex_count(),
            buffer.triangle_count()
        );
        self.meshes.push(SceneMesh { desc, buffer });
        Ok(MeshId(self.meshes.len() - 1))
    }

    /// Register a texture file, reusing the id of an identical path.
    pub fn add_texture(&mut self, path: impl Into<PathBuf>) -> TextureId {
        let path = path.into();
        if let Some(index) = self.textures.iter().position(|p| *p == path) {
            return TextureId(index);
        }
        self.textures.push(path);
        TextureId(self.textures.len() - 1)
    }

    pub fn spawn(&mut self, name: impl Into<String>, mesh: MeshId, transform: Transform, surface: Surface) {
        self.objects.push(SceneObject {
            name: name.into(),
            mesh,
            transform,
            surface,
        });
    }

    /// The desk: table, bottle, pen, box, perfume, and two light markers.
    pub fn desk(config: &ViewerConfig) -> Result<Self, ShapeError> {
        let detail = config.tessellation;
        let sphere = |radius| {
            ShapeDesc::Sphere(SphereDesc::new(radius, detail.sectors, detail.stacks).smooth(detail.smooth))
        };
        let cylinder = |base, top, height| {
            ShapeDesc::Cylinder(
                CylinderDesc::new(base, top, height, detail.sectors, detail.stacks).smooth(detail.smooth),
            )
        };
        let prop = |x, y, z| Transform::from_xyz(x, y, z).with_scale(PROP_SCALE);
        let upright = |x, y, z| prop(x, y, z).with_rotation_deg(Vec3::X, 90.0);
        let lying = |x, y, z| prop(x, y, z).with_rotation_deg(Vec3::Y, 90.0);

        let mut scene = Scene::new(config.camera.build());
        let dir = config.render.texture_dir.as_path();
        let tex = |scene: &mut Scene, file: &str| scene.add_texture(texture_path(dir, file));

        let table = scene.add_mesh(ShapeDesc::Plane { half_extent: 5.0 })?;
        let wood = tex(&mut scene, "plane.jpg");
        scene.spawn("table", table, Transform::from_xyz(0.0, -2.0, 0.0), Surface::textured(wood));

        let glass = tex(&mut scene, "glass.jpg");
        let label = tex(&mut scene, "Label.png");
        let body = scene.add_mesh(cylinder(0.5, 0.5, 2.0))?;
        scene.spawn("bottle body", body, upright(0.0, -0.75, -1.5), Surface::with_overlay(glass, label));
        let neck = scene.add_mesh(cylinder(0.2, 0.2, 1.0))?;
        scene.spawn("bottle neck", neck, upright(0.0, 1.5, -1.5), Surface::textured(glass));
        let shoulder = scene.add_mesh(sphere(0.5))?;
        scene.spawn("bottle shoulder", shoulder, upright(0.0, 0.5, -1.5), Surface::textured(glass));

        let pen = tex(&mut scene, "pen.jpg");
        let cap_end = scene.add_mesh(sphere(0.04))?;
        scene.spawn("pen cap end", cap_end, prop(-0.47, -1.95, 0.0), Surface::textured(pen));
        let barrel = scene.add_mesh(cylinder(0.04, 0.04, 0.75))?;
        scene.spawn("pen barrel", barrel, lying(0.0, -1.95, 0.0), Surface::textured(pen));
        let tip = scene.add_mesh(cylinder(0.04, 0.0, 0.1))?;
        scene.spawn("pen tip", tip, lying(0.53, -1.95, 0.0), Surface::textured(pen));

        let cardboard = tex(&mut scene, "box.jpg");
        let block = scene.add_mesh(ShapeDesc::Cuboid { half_extents: Vec3::new(0.5, 0.75, 0.25) })?;
        let box_transform = prop(-2.0, -1.05, -1.0).with_rotation_deg(Vec3::Y, 45.0);
        scene.spawn("box", block, box_transform, Surface::textured(cardboard));

        let perfume = tex(&mut scene, "perfume.jpg");
        let bottle = scene.add_mesh(cylinder(0.25, 0.25, 2.0))?;
        scene.spawn("perfume", bottle, upright(1.5, -0.75, -1.0), Surface::textured(perfume));

        let marker = scene.add_mesh(ShapeDesc::Cuboid { half_extents: Vec3::splat(0.5) })?;
        for (name, light) in [("key light", scene.lights[0]), ("fill light", scene.lights[1])] {
            let p = light.position;
            let transform = Transform::from_xyz(p.x, p.y, p.z).with_scale(LIGHT_MARKER_SCALE);
            scene.spawn(name, marker, transform, Surface::Emissive);
        }

        log::info!(
            "desk scene: {} objects, {} meshes, {} textures",
            scene.objects.len(),
            scene.meshes.len(),
            scene.textures.len()
        );
        Ok(scene)
    }

    /// Model and normal matrices for every object, in spawn order.
    pub fn draw_list(&self) -> impl Iterator<Item = DrawItem> + '_ {
        self.objects.iter().map(|object| DrawItem {
            mesh: object.mesh,
            model: object.transform.matrix(),
            normal_matrix: object.transform.normal_matrix(),
            surface: object.surface,
        })
    }

    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    pub fn mesh(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(id.0)
    }

    pub fn textures(&self) -> &[PathBuf] {
        &self.textures
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[PointLight; 2] {
        &self.lights
    }

    pub fn phong(&self) -> &PhongParams {
        &self.phong
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.camera
    }
}

fn texture_path(dir: &Path, file: &str) -> PathBuf {
    dir.join(file)
}
