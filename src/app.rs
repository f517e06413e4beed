use anyhow::Result;
use log::{error, info};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopWindowTarget},
    window::{Fullscreen, Window, WindowBuilder},
};

use crate::audio::{PlaybackTransport, SpectrumExtractor, Track};
use crate::config::VisualizerConfig;
use crate::graphics::GraphicsEngine;
use crate::input::{Command, InputController};
use crate::ui::{MetadataOverlay, OverlayStatus};
use crate::viz::{Primitive, Viewport, VisualizationEngine};

/// Top-level fixed-cadence driver. One tick: input dispatch, position
/// advance (unless paused), spectrum extraction, routine render,
/// present, then sleep off the rest of the frame budget. Best-effort
/// pacing only; there is no hard real-time guarantee.
struct App<'a> {
    graphics: GraphicsEngine<'a>,
    overlay: MetadataOverlay,
    transport: PlaybackTransport,
    extractor: SpectrumExtractor,
    visualizations: VisualizationEngine,
    input: InputController,
    viewport: Viewport,
    track: Arc<Track>,
    started_at: Instant,
    last_frame: Instant,
    frame_budget: Duration,
}

pub fn run(track: Arc<Track>, config: VisualizerConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(format!("VibeScope - {}", track.title))
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .build(&event_loop)?,
    );
    if config.fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    let graphics = pollster::block_on(GraphicsEngine::new(&window))?;
    let overlay = MetadataOverlay::new(&window, &graphics.device, graphics.config.format);

    let mut transport = PlaybackTransport::new(config.tick_rate);
    transport.start(Arc::clone(&track))?;
    info!(
        "playing '{}' ({:.1}s, {:.2} BPM, {} beats)",
        track.title,
        track.duration_seconds(),
        track.tempo_bpm,
        track.beat_times.len()
    );

    let size = window.inner_size();
    let tick_rate = config.tick_rate.max(1);
    let mut app = App {
        graphics,
        overlay,
        transport,
        extractor: SpectrumExtractor::new(tick_rate),
        visualizations: VisualizationEngine::new(),
        input: InputController::new(),
        viewport: Viewport {
            width: size.width.max(1),
            height: size.height.max(1),
            fullscreen: config.fullscreen,
        },
        track,
        started_at: Instant::now(),
        last_frame: Instant::now(),
        frame_budget: Duration::from_secs_f64(1.0 / tick_rate as f64),
    };

    let window_clone = Arc::clone(&window);
    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => {
            app.overlay.handle_event(&window_clone, &event);
            match event {
                WindowEvent::CloseRequested => {
                    app.quit(elwt);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let Some(command) =
                        app.input
                            .map_key(event.physical_key, event.state, event.repeat)
                    {
                        app.apply(command, &window_clone, elwt);
                    }
                }
                WindowEvent::Resized(physical_size) => {
                    app.viewport.width = physical_size.width.max(1);
                    app.viewport.height = physical_size.height.max(1);
                    app.graphics.resize(physical_size);
                }
                WindowEvent::RedrawRequested => {
                    app.frame(&window_clone);
                }
                _ => {}
            }
        }
        Event::AboutToWait => {
            // Sleep off whatever remains of this frame's budget before
            // asking for the next redraw; this is the loop's only block.
            let elapsed = app.last_frame.elapsed();
            if elapsed < app.frame_budget {
                std::thread::sleep(app.frame_budget - elapsed);
            }
            app.last_frame = Instant::now();
            window_clone.request_redraw();
        }
        _ => {}
    })?;

    Ok(())
}

impl App<'_> {
    fn apply(&mut self, command: Command, window: &Window, elwt: &EventLoopWindowTarget<()>) {
        match command {
            Command::TogglePause => {
                if let Err(err) = self.transport.toggle_pause() {
                    error!("transport error: {err}");
                }
            }
            Command::NextVisualization => {
                let kind = self.visualizations.next();
                info!("switched to {}", kind.label());
            }
            Command::PreviousVisualization => {
                let kind = self.visualizations.prev();
                info!("switched to {}", kind.label());
            }
            Command::ToggleFullscreen => self.set_fullscreen(window, !self.viewport.fullscreen),
            Command::Back => {
                if self.viewport.fullscreen {
                    self.set_fullscreen(window, false);
                } else {
                    self.quit(elwt);
                }
            }
            Command::ToggleOverlay => self.overlay.toggle(),
        }
    }

    fn set_fullscreen(&mut self, window: &Window, fullscreen: bool) {
        window.set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        self.viewport.fullscreen = fullscreen;
        // the Resized event updates the viewport dimensions
    }

    /// Quit path: the audio stream is stopped before the event loop
    /// exits so the output device is released ahead of process teardown.
    fn quit(&mut self, elwt: &EventLoopWindowTarget<()>) {
        info!("shutting down");
        self.transport.stop();
        elwt.exit();
    }

    fn frame(&mut self, window: &Window) {
        self.transport.advance_tick();
        let tick = self.transport.current_frame();
        let spectrum = self.extractor.extract(&self.track, tick);
        let elapsed = self.started_at.elapsed().as_secs_f32();

        let kind = self.visualizations.current();
        let viewport = self.viewport;
        // A faulting routine costs one frame of geometry, never the loop.
        let primitives: Vec<Primitive> =
            match catch_unwind(AssertUnwindSafe(|| kind.render(&spectrum, elapsed, &viewport))) {
                Ok(primitives) => primitives,
                Err(_) => {
                    error!("{} failed; skipping this frame", kind.label());
                    Vec::new()
                }
            };

        let status = OverlayStatus {
            title: self.track.title.clone(),
            sample_rate: self.track.sample_rate,
            duration_seconds: self.track.duration_seconds(),
            tempo_bpm: self.track.tempo_bpm,
            beat_count: self.track.beat_times.len(),
            routine: kind.label(),
            position_seconds: tick as f32 / self.transport.tick_rate().max(1) as f32,
            paused: self.transport.is_paused(),
            playing: self.transport.is_active(),
            audio_available: self.transport.audio_available(),
        };

        if let Err(err) = self
            .graphics
            .render(&primitives, window, &mut self.overlay, &status)
        {
            error!("render error: {err}");
        }
    }
}
