//! wgpu + egui implementation of the drawing capabilities
//!
//! ## Architecture
//!
//! - `transform`: logical render space to egui points (letterboxing, DPI)
//!
//! A frame is one egui pass. The pass is opened lazily by the first draw
//! call (normally [`RenderSurface::clear`]) and closed by
//! [`RenderSurface::present`], which tessellates everything painted in
//! between and submits it to the surface.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use egui::Context;
use glam::Vec2;
use tracing::{debug, info, warn};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::window::Window;

use crate::render::{
    AssetError, Canvas, Color, Rect, RenderError, RenderSurface, TextAnchor, TextStyle, TextureId,
};

mod transform;

pub use transform::ViewTransform;
use transform::to_color32;

/// Renderer handles wgpu setup and paints through an egui painter
pub struct Renderer {
    window: Arc<Window>,
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    egui_ctx: Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    render_size: Vec2,
    /// Painter and mapping of the open pass
    pass: Option<(egui::Painter, ViewTransform)>,
    textures: HashMap<TextureId, egui::TextureHandle>,
    next_texture: u64,
}

impl Renderer {
    /// Creates a new renderer for the given window
    ///
    /// `render_size` is the logical resolution everything is drawn in.
    pub async fn new(window: Arc<Window>, render_size: Vec2, vsync: bool) -> anyhow::Result<Self> {
        info!("Initializing wgpu renderer");

        // Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window.clone())?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        info!(
            adapter.name = adapter.get_info().name,
            adapter.backend = ?adapter.get_info().backend,
            "Found GPU adapter"
        );

        // Request device and queue
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await?;

        // Configure surface
        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        info!(
            surface.width = config.width,
            surface.height = config.height,
            surface.format = ?config.format,
            vsync,
            "Surface configured"
        );

        // Initialize egui
        let egui_ctx = Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                ..Default::default()
            },
        );

        info!(
            render.width = render_size.x,
            render.height = render_size.y,
            "egui initialized successfully"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            egui_ctx,
            egui_state,
            egui_renderer,
            render_size,
            pass: None,
            textures: HashMap::new(),
            next_texture: 1,
        })
    }

    fn window_size(&self) -> Vec2 {
        Vec2::new(self.config.width as f32, self.config.height as f32)
    }

    /// Opens the frame's egui pass if it is not open yet
    fn begin_pass(&mut self) -> (egui::Painter, ViewTransform) {
        if let Some((painter, view)) = &self.pass {
            return (painter.clone(), *view);
        }

        let raw_input = self.egui_state.take_egui_input(&self.window);
        self.egui_ctx.begin_pass(raw_input);

        let view = ViewTransform::new(
            self.window_size(),
            self.render_size,
            self.egui_ctx.pixels_per_point(),
        );
        let painter = egui::Painter::new(
            self.egui_ctx.clone(),
            egui::LayerId::background(),
            view.window_area(self.window_size()),
        );
        self.pass = Some((painter.clone(), view));
        (painter, view)
    }

    fn layout_text(
        &mut self,
        text: &str,
        size: f32,
        color: Color,
    ) -> (egui::Painter, ViewTransform, Arc<egui::Galley>) {
        let (painter, view) = self.begin_pass();
        let font = egui::FontId::proportional(size * view.scale());
        let galley = painter.layout_no_wrap(text.to_owned(), font, to_color32(color));
        (painter, view, galley)
    }

    /// Uploads, draws and presents whatever the closed pass produced
    fn submit(
        &mut self,
        tris: &[egui::ClippedPrimitive],
        pixels_per_point: f32,
    ) -> Result<(), RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(e.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            tris,
            &screen_descriptor,
        );

        // Render pass - use forget_lifetime() for egui_wgpu compatibility
        {
            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut rpass.forget_lifetime(), tris, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();

        Ok(())
    }
}

impl Canvas for Renderer {
    fn size(&self) -> Vec2 {
        self.render_size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (painter, view) = self.begin_pass();
        painter.rect_filled(view.to_screen_rect(rect), 0.0, to_color32(color));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) -> Rect {
        let (painter, view, galley) = self.layout_text(text, style.size, style.color);
        let size = view.to_logical_size(galley.size());
        let top_left = match style.anchor {
            TextAnchor::TopLeft => pos,
            TextAnchor::Center => pos - size / 2.0,
        };

        painter.galley(view.to_screen_pos(top_left), galley, to_color32(style.color));
        Rect::from_min_size(top_left, size)
    }

    fn measure_text(&mut self, text: &str, size: f32) -> Vec2 {
        let (_, view, galley) = self.layout_text(text, size, Color::WHITE);
        view.to_logical_size(galley.size())
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId, AssetError> {
        if !path.is_file() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let image = image::open(path)
            .map_err(|e| AssetError::Decode {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();
        let size = [image.width() as usize, image.height() as usize];
        let pixels = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());

        let handle = self.egui_ctx.load_texture(
            path.display().to_string(),
            pixels,
            egui::TextureOptions::LINEAR,
        );

        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, handle);
        debug!(
            texture = id.0,
            path = %path.display(),
            width = size[0],
            height = size[1],
            "Texture loaded"
        );
        Ok(id)
    }

    fn draw_texture(&mut self, texture: TextureId, rect: Rect, tint: Color) {
        let Some(handle_id) = self.textures.get(&texture).map(|h| h.id()) else {
            warn!(texture = texture.0, "Draw of unknown texture skipped");
            return;
        };
        let (painter, view) = self.begin_pass();
        painter.image(
            handle_id,
            view.to_screen_rect(rect),
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            to_color32(tint),
        );
    }

    fn unload_texture(&mut self, texture: TextureId) {
        // Dropping the handle frees the GPU texture at the end of the next pass
        if self.textures.remove(&texture).is_some() {
            debug!(texture = texture.0, "Texture unloaded");
        }
    }
}

impl RenderSurface for Renderer {
    fn clear(&mut self, color: Color) {
        let (painter, view) = self.begin_pass();
        // Letterbox bars stay black
        painter.rect_filled(painter.clip_rect(), 0.0, egui::Color32::BLACK);
        painter.rect_filled(view.render_area(), 0.0, to_color32(color));
    }

    fn draw_overlay(&mut self, opacity: f32) {
        let (painter, view) = self.begin_pass();
        painter.rect_filled(
            view.render_area(),
            0.0,
            to_color32(Color::BLACK.with_alpha(opacity)),
        );
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            info!(width, height, "Surface resized");
        }
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.begin_pass();
        self.pass = None;
        let full_output = self.egui_ctx.end_pass();

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        // Texture updates must land even when this frame is dropped
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let result = self.submit(&tris, full_output.pixels_per_point);

        // Cleanup textures
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        result
    }
}
