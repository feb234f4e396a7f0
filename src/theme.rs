use ratatui::style::Color;

// Centralized theme colors for the shell around the session windows.

// Tray
pub fn tray_bg() -> Color {
    Color::DarkGray
}
pub fn tray_fg() -> Color {
    Color::White
}
pub fn tray_button_bg() -> Color {
    Color::Green
}
pub fn tray_button_fg() -> Color {
    Color::Black
}
pub fn tray_active_bg() -> Color {
    Color::Gray
}
pub fn tray_active_fg() -> Color {
    Color::Black
}
pub fn tray_minimized_fg() -> Color {
    Color::Gray
}

// Dialogs
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_field_bg() -> Color {
    Color::DarkGray
}
pub fn dialog_focus_bg() -> Color {
    Color::Blue
}
pub fn dialog_hint_fg() -> Color {
    Color::Gray
}

// Banner
pub fn error_bg() -> Color {
    Color::Red
}
pub fn error_fg() -> Color {
    Color::White
}
pub fn info_bg() -> Color {
    Color::Cyan
}
pub fn info_fg() -> Color {
    Color::Black
}

// Desktop behind the windows
pub fn desktop_bg() -> Color {
    Color::Reset
}
