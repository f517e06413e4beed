use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Discrete commands the render loop executes. Resize and window-close
/// arrive as their own winit events; everything else is a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    NextVisualization,
    PreviousVisualization,
    ToggleFullscreen,
    /// Escape: leaves fullscreen when fullscreen, quits otherwise.
    Back,
    ToggleOverlay,
}

/// Pure key-to-command mapping. Key repeats and releases map to nothing
/// so holding space does not stutter the transport.
pub struct InputController;

impl InputController {
    pub fn new() -> Self {
        Self
    }

    pub fn map_key(
        &self,
        key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<Command> {
        if state != ElementState::Pressed || repeat {
            return None;
        }
        match key {
            PhysicalKey::Code(KeyCode::Space) => Some(Command::TogglePause),
            PhysicalKey::Code(KeyCode::ArrowLeft) => Some(Command::PreviousVisualization),
            PhysicalKey::Code(KeyCode::ArrowRight) => Some(Command::NextVisualization),
            PhysicalKey::Code(KeyCode::KeyF) => Some(Command::ToggleFullscreen),
            PhysicalKey::Code(KeyCode::Escape) => Some(Command::Back),
            PhysicalKey::Code(KeyCode::F1) => Some(Command::ToggleOverlay),
            _ => None,
        }
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}
