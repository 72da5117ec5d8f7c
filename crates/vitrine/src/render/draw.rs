//! # Draw — The Frame Orchestrator
//!
//! [`Renderer`] owns every GPU resource and turns a [`Scene`] into a frame.
//!
//! ## Per-Frame Flow
//!
//! ```text
//! Renderer::render(scene)
//!   │
//!   ├─ 1. Depth check ─── recreate depth texture if resized
//!   │
//!   ├─ 2. Frame uniform ─── projection × view, eye, both lights
//!   │
//!   ├─ 3. Model uniforms ─── one aligned slot per draw item
//!   │
//!   ├─ 4. Render pass
//!   │     Clear color+depth, bind fill or line pipeline
//!   │     Bind group 0 once
//!   │     Loop: group 1 when the surface changes, group 2 per object
//!   │     draw_indexed triangles, or lines in wireframe mode
//!   │
//!   └─ 5. Submit and present
//! ```
//!
//! Meshes, textures and material bind groups are all created in
//! [`Renderer::new`]; nothing is uploaded per frame except uniforms.

use std::sync::Arc;

use winit::window::Window;

use super::mesh::MeshStore;
use super::pass::{ClearColor, FrameContext};
use super::pipeline::{pack_models, MeshRenderer};
use super::texture::TextureStore;
use super::uniforms::{FrameUniform, MaterialUniform, ModelUniform};
use super::{GpuContext, GpuError};
use crate::config::ViewerConfig;
use crate::scene::{DrawItem, Scene, Surface};

/// A material bind group and the surface it was built for.
struct MaterialEntry {
    surface: Surface,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    gpu: GpuContext,
    pipelines: MeshRenderer,
    meshes: MeshStore,
    materials: Vec<MaterialEntry>,
    clear_color: ClearColor,
    near: f32,
    far: f32,
    wireframe: bool,
}

impl Renderer {
    /// Bring up the device and upload everything the scene will draw.
    pub fn new(window: Arc<Window>, scene: &Scene, config: &ViewerConfig) -> Result<Self, GpuError> {
        let gpu = GpuContext::new(window, config.render.vsync)?;
        let pipelines = MeshRenderer::new(&gpu);
        let meshes = MeshStore::new(&gpu, scene.meshes());
        let textures = TextureStore::new(&gpu, scene.textures());

        let materials = unique_surfaces(scene)
            .into_iter()
            .map(|surface| {
                let (base, overlay) = match surface {
                    Surface::Textured { base, overlay, .. } => (Some(base), overlay),
                    Surface::Emissive => (None, None),
                };
                let bind_group = pipelines.material_bind_group(
                    &gpu.device,
                    &MaterialUniform::from(&surface),
                    textures.view(base),
                    textures.view(overlay),
                );
                MaterialEntry { surface, bind_group }
            })
            .collect::<Vec<_>>();
        log::info!("{} materials, {} objects", materials.len(), scene.objects().len());

        Ok(Self {
            gpu,
            pipelines,
            meshes,
            materials,
            clear_color: ClearColor(config.render.clear_color),
            near: config.camera.near,
            far: config.camera.far,
            wireframe: false,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn recover_surface(&mut self) {
        self.gpu.reconfigure();
    }

    pub fn toggle_wireframe(&mut self) {
        self.wireframe = !self.wireframe;
        log::info!("wireframe {}", if self.wireframe { "on" } else { "off" });
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.gpu.aspect_ratio()
    }

    /// Draw one frame of `scene`.
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        // ── 1. Depth check ──────────────────────────────────────────────
        let (sw, sh) = self.gpu.surface_size();
        self.pipelines.resize_depth_if_needed(&self.gpu.device, sw, sh);

        // ── 2. Frame uniform ────────────────────────────────────────────
        let frame_uniform = frame_uniform(scene, self.gpu.aspect_ratio(), self.near, self.far);
        self.gpu
            .queue
            .write_buffer(&self.pipelines.frame_buffer, 0, bytemuck::cast_slice(&[frame_uniform]));

        // ── 3. Model uniforms ───────────────────────────────────────────
        let items: Vec<DrawItem> = scene.draw_list().collect();
        let stride = if items.is_empty() {
            0
        } else {
            let stride = self.pipelines.ensure_model_capacity(&self.gpu.device, items.len());
            let models: Vec<ModelUniform> = items.iter().map(ModelUniform::from).collect();
            self.gpu
                .queue
                .write_buffer(&self.pipelines.model_buffer, 0, &pack_models(&models, stride as usize));
            stride
        };

        // ── 4. Render pass ──────────────────────────────────────────────
        let mut frame = FrameContext::begin(&self.gpu)?;
        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.pipelines.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !items.is_empty() {
                let pipeline = if self.wireframe {
                    &self.pipelines.line_pipeline
                } else {
                    &self.pipelines.fill_pipeline
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &self.pipelines.frame_bind_group, &[]);

                let mut current_material: Option<usize> = None;
                for (i, item) in items.iter().enumerate() {
                    let Some(mesh) = self.meshes.get(item.mesh) else {
                        continue;
                    };
                    let count = if self.wireframe { mesh.line_count } else { mesh.index_count };
                    if count == 0 {
                        continue;
                    }
                    let Some(material) = self.materials.iter().position(|m| m.surface == item.surface) else {
                        continue;
                    };

                    if current_material != Some(material) {
                        pass.set_bind_group(1, &self.materials[material].bind_group, &[]);
                        current_material = Some(material);
                    }
                    pass.set_bind_group(2, &self.pipelines.model_bind_group, &[i as u32 * stride]);

                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    let indices = if self.wireframe { &mesh.line_buffer } else { &mesh.index_buffer };
                    pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..count, 0, 0..1);
                }
            }
        }

        // ── 5. Submit ───────────────────────────────────────────────────
        frame.finish(&self.gpu);
        Ok(())
    }
}

/// Camera, lights and Phong constants for one frame.
pub(crate) fn frame_uniform(scene: &Scene, aspect: f32, near: f32, far: f32) -> FrameUniform {
    let camera = scene.camera();
    let view_proj = camera.projection_matrix(aspect, near, far) * camera.view_matrix();
    FrameUniform::new(view_proj, camera.position(), scene.lights(), scene.phong())
}

/// Distinct surfaces in first-use order.
pub(crate) fn unique_surfaces(scene: &Scene) -> Vec<Surface> {
    let mut surfaces: Vec<Surface> = Vec::new();
    for object in scene.objects() {
        if !surfaces.contains(&object.surface) {
            surfaces.push(object.surface);
        }
    }
    surfaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FlyCamera;
    use crate::math::{Transform, Vec3, Vec4};
    use crate::mesh::{ShapeDesc, SphereDesc};
    use crate::scene::TextureId;

    #[test]
    fn surfaces_are_deduplicated_in_order() {
        let mut scene = Scene::new(FlyCamera::default());
        let mesh = scene.add_mesh(ShapeDesc::Sphere(SphereDesc::new(1.0, 8, 4))).unwrap();
        let wood = scene.add_texture("wood.jpg");
        let glass = scene.add_texture("glass.jpg");
        scene.spawn("a", mesh, Transform::IDENTITY, Surface::textured(wood));
        scene.spawn("b", mesh, Transform::IDENTITY, Surface::Emissive);
        scene.spawn("c", mesh, Transform::IDENTITY, Surface::textured(wood));
        scene.spawn("d", mesh, Transform::IDENTITY, Surface::with_overlay(glass, wood));

        let surfaces = unique_surfaces(&scene);
        assert_eq!(
            surfaces,
            vec![
                Surface::textured(TextureId(0)),
                Surface::Emissive,
                Surface::with_overlay(TextureId(1), TextureId(0)),
            ]
        );
    }

    #[test]
    fn desk_needs_one_material_per_distinct_surface() {
        let scene = Scene::desk(&ViewerConfig::default()).unwrap();
        let surfaces = unique_surfaces(&scene);
        assert!(surfaces.len() <= scene.objects().len());
        assert!(surfaces.contains(&Surface::Emissive), "light markers are unlit");
    }

    #[test]
    fn frame_uniform_projects_what_the_camera_faces() {
        let scene = Scene::new(FlyCamera::new(Vec3::new(0.0, 0.0, 5.0)));
        let uniform = frame_uniform(&scene, 4.0 / 3.0, 0.1, 100.0);
        assert_eq!(uniform.view_position, [0.0, 0.0, 5.0]);

        let view_proj = crate::math::Mat4::from_cols_array_2d(&uniform.view_proj);
        let clip = view_proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5, "origin is centered, got {ndc}");
        assert!((0.0..1.0).contains(&ndc.z), "origin is inside the depth range, got {}", ndc.z);
    }
}
