use anyhow::Result;
use egui_wgpu::Renderer;
use egui_winit::State;
use wgpu::{CommandEncoder, Device, Queue, TextureView};
use winit::{event::WindowEvent, window::Window};

/// Everything the overlay shows for the current frame. Assembled by the
/// render loop from the track metadata and transport state; the overlay
/// itself holds no engine state.
pub struct OverlayStatus {
    pub title: String,
    pub sample_rate: u32,
    pub duration_seconds: f32,
    pub tempo_bpm: f32,
    pub beat_count: usize,
    pub routine: &'static str,
    pub position_seconds: f32,
    pub paused: bool,
    /// Transport still inside the sample buffer.
    pub playing: bool,
    pub audio_available: bool,
}

/// Track metadata panel drawn over the visualization. The tempo and
/// beat figures are display-only; nothing downstream reads them back.
pub struct MetadataOverlay {
    context: egui::Context,
    state: State,
    renderer: Renderer,
    visible: bool,
}

impl MetadataOverlay {
    pub fn new(window: &Window, device: &Device, surface_format: wgpu::TextureFormat) -> Self {
        let context = egui::Context::default();

        let state = State::new(context.clone(), egui::ViewportId::ROOT, &window, None, None);

        let renderer = Renderer::new(device, surface_format, None, 1);

        Self {
            context,
            state,
            renderer,
            visible: true,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        device: &Device,
        queue: &Queue,
        window: &Window,
        size_in_pixels: [u32; 2],
        status: &OverlayStatus,
    ) -> Result<()> {
        if !self.visible {
            return Ok(());
        }

        let raw_input = self.state.take_egui_input(window);
        let full_output = self.context.run(raw_input, |ctx| {
            Self::panel(ctx, status);
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: full_output.pixels_per_point,
        };

        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        Ok(())
    }

    fn panel(ctx: &egui::Context, status: &OverlayStatus) {
        egui::Window::new("Now Playing")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(status.title.as_str());
                ui.separator();

                ui.label(format!(
                    "{} / {}",
                    format_time(status.position_seconds),
                    format_time(status.duration_seconds)
                ));
                ui.label(format!("Sample rate: {} Hz", status.sample_rate));
                ui.label(format!("Tempo: {:.2} BPM", status.tempo_bpm));
                ui.label(format!("Detected beats: {}", status.beat_count));

                ui.separator();
                ui.label(format!("Visualization: {}", status.routine));
                if status.paused {
                    ui.colored_label(egui::Color32::YELLOW, "Paused");
                } else if !status.playing {
                    ui.colored_label(egui::Color32::GRAY, "Finished");
                }
                if !status.audio_available {
                    ui.colored_label(egui::Color32::LIGHT_RED, "No audio device");
                }
            });
    }
}

fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
