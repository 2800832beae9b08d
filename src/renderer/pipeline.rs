//! WebGPU render pipeline setup

use std::fmt;

use glam::Vec2;

use wgpu::util::DeviceExt;

use super::frame::Frame;
use super::vertex::Vertex;

/// Renderer setup failures
#[derive(Debug)]
pub enum RenderError {
    Surface(wgpu::CreateSurfaceError),
    NoAdapter(String),
    Device(wgpu::RequestDeviceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Surface(e) => write!(f, "failed to create surface: {e}"),
            RenderError::NoAdapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            RenderError::Device(e) => write!(f, "failed to create device: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::Device(e)
    }
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("retro-arcade-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        // Colors are authored gamma-encoded, so prefer a linear swapchain format
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| RenderError::NoAdapter("surface reports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
        })
    }

    /// Create the instance, surface and adapter for a canvas, then the pipeline
    #[cfg(target_arch = "wasm32")]
    pub async fn from_canvas(canvas: web_sys::HtmlCanvasElement) -> Result<Self, RenderError> {
        let (width, height) = (canvas.width(), canvas.height());
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::NoAdapter(e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);
        Self::new(surface, &adapter, width, height).await
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload a frame's triangles and present them
    pub fn render(&mut self, frame: &Frame) -> Result<(), wgpu::SurfaceError> {
        let (world_w, world_h) = frame.size();
        let ndc_vertices: Vec<Vertex> = frame
            .vertices()
            .iter()
            .map(|v| {
                let (x, y) = game_to_ndc(v.position[0], v.position[1], world_w, world_h, self.size);
                Vertex::new(x, y, v.color)
            })
            .collect();

        self.vertex_count = ndc_vertices.len() as u32;
        let needed = std::mem::size_of_val(ndc_vertices.as_slice()) as wgpu::BufferAddress;
        if needed > self.vertex_buffer.size() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        } else if needed > 0 {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&ndc_vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        let [r, g, b, a] = frame.clear_color();
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Map canvas pixels (origin top-left, y down) to NDC
///
/// The game area is scaled uniformly to fit the viewport and centred, so a
/// game keeps its aspect ratio on any canvas.
pub fn game_to_ndc(x: f32, y: f32, world_w: f32, world_h: f32, viewport: (u32, u32)) -> (f32, f32) {
    let (vw, vh) = (viewport.0.max(1) as f32, viewport.1.max(1) as f32);
    let scale = (vw / world_w).min(vh / world_h);
    let px = (x - world_w * 0.5) * scale;
    let py = (y - world_h * 0.5) * scale;
    (px / (vw * 0.5), -py / (vh * 0.5))
}

/// Map a point on the canvas element (CSS pixels) back to game pixels
///
/// Inverse of the letterboxing in [`game_to_ndc`].
pub fn canvas_to_game(x: f32, y: f32, world_w: f32, world_h: f32, client: (f32, f32)) -> Vec2 {
    let (cw, ch) = (client.0.max(1.0), client.1.max(1.0));
    let scale = (cw / world_w).min(ch / world_h);
    let offset_x = (cw - world_w * scale) * 0.5;
    let offset_y = (ch - world_h * scale) * 0.5;
    Vec2::new((x - offset_x) / scale, (y - offset_y) / scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_to_game_letterbox() {
        // 600x600 game centred in a 1200x600 element
        let p = canvas_to_game(300.0, 0.0, 600.0, 600.0, (1200.0, 600.0));
        assert_eq!(p, Vec2::ZERO);
        let p = canvas_to_game(600.0, 150.0, 600.0, 600.0, (1200.0, 600.0));
        assert_eq!(p, Vec2::new(300.0, 150.0));
        // Half-size element
        let p = canvas_to_game(100.0, 50.0, 400.0, 200.0, (200.0, 100.0));
        assert_eq!(p, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_game_to_ndc_corners() {
        // Exact fit: corners map to the NDC corners
        let (x, y) = game_to_ndc(0.0, 0.0, 600.0, 400.0, (600, 400));
        assert!((x + 1.0).abs() < 1e-5 && (y - 1.0).abs() < 1e-5);
        let (x, y) = game_to_ndc(600.0, 400.0, 600.0, 400.0, (600, 400));
        assert!((x - 1.0).abs() < 1e-5 && (y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_game_to_ndc_letterbox() {
        // Square game on a wide viewport keeps full height, narrower width
        let (x, y) = game_to_ndc(0.0, 0.0, 600.0, 600.0, (1200, 600));
        assert!((y - 1.0).abs() < 1e-5);
        assert!((x + 0.5).abs() < 1e-5);
    }
}
