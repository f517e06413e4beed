pub mod border;
pub mod circular_wave;
pub mod frequency_bars;
pub mod particle_system;
pub mod primitives;
pub mod tunnel_rings;

pub use primitives::{Color, Primitive};

/// Current drawable surface dimensions and fullscreen state. Routines
/// re-derive all geometry from this every frame; nothing caches absolute
/// coordinates across resizes.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Viewport {
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// The closed set of rendering routines, in cycling order. Each variant
/// is a pure function of the spectrum, the wall-clock time and the
/// viewport; none carries state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationKind {
    CircularWave,
    FrequencyBars,
    ParticleSystem,
    TunnelRings,
}

impl VisualizationKind {
    pub const ALL: [VisualizationKind; 4] = [
        VisualizationKind::CircularWave,
        VisualizationKind::FrequencyBars,
        VisualizationKind::ParticleSystem,
        VisualizationKind::TunnelRings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VisualizationKind::CircularWave => "Circular wave",
            VisualizationKind::FrequencyBars => "Frequency bars",
            VisualizationKind::ParticleSystem => "Particle system",
            VisualizationKind::TunnelRings => "Tunnel rings",
        }
    }

    /// `elapsed` is continuous wall-clock seconds since the app started,
    /// deliberately independent of the playback position so motion keeps
    /// flowing while paused.
    pub fn render(&self, spectrum: &[f32], elapsed: f32, viewport: &Viewport) -> Vec<Primitive> {
        match self {
            VisualizationKind::CircularWave => circular_wave::render(spectrum, elapsed, viewport),
            VisualizationKind::FrequencyBars => frequency_bars::render(spectrum, elapsed, viewport),
            VisualizationKind::ParticleSystem => {
                particle_system::render(spectrum, elapsed, viewport)
            }
            VisualizationKind::TunnelRings => tunnel_rings::render(spectrum, elapsed, viewport),
        }
    }
}

/// Holds the active selection among the fixed routine list and cycles it
/// with wrap-around in both directions.
pub struct VisualizationEngine {
    active: usize,
}

impl VisualizationEngine {
    pub fn new() -> Self {
        Self { active: 0 }
    }

    pub fn current(&self) -> VisualizationKind {
        VisualizationKind::ALL[self.active]
    }

    pub fn next(&mut self) -> VisualizationKind {
        self.active = (self.active + 1) % VisualizationKind::ALL.len();
        self.current()
    }

    pub fn prev(&mut self) -> VisualizationKind {
        let len = VisualizationKind::ALL.len();
        self.active = (self.active + len - 1) % len;
        self.current()
    }
}

impl Default for VisualizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a spectrum bin by linear index mapping, clamping at the end so
/// routines never index out of range, and treating an empty spectrum as
/// silence.
pub(crate) fn bin_intensity(spectrum: &[f32], index: usize) -> f32 {
    if spectrum.is_empty() {
        return 0.0;
    }
    spectrum[index.min(spectrum.len() - 1)]
}
