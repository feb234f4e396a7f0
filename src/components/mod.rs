use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod banner;
pub mod connection_dialog;
pub mod dialog_overlay;
pub mod help_overlay;
pub mod tray_bar;

pub use banner::Banner;
pub use connection_dialog::{ConnectionDialog, DialogField, DialogOutcome};
pub use dialog_overlay::DialogFrame;
pub use help_overlay::HelpOverlay;
pub use tray_bar::TrayBar;

/// Overlays drawn above the session windows.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}
