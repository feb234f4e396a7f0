//! Shared crate-wide constants.

/// Bridge endpoint every transport connects to unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws";

/// Geometry a freshly opened window starts with, and the fallback used when
/// a maximized window is restored without a saved snapshot.
///
/// Units: logical pixels.
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 500;

/// Minimum window size of the default variant.
pub const MIN_WINDOW_WIDTH: u32 = 200;
pub const MIN_WINDOW_HEIGHT: u32 = 150;

/// Minimum window size of the large variant.
pub const LARGE_MIN_WINDOW_WIDTH: u32 = 350;
pub const LARGE_MIN_WINDOW_HEIGHT: u32 = 200;

/// First value handed out by the z-index pool. Everything drawn above the
/// windows (dialog, tray) is stacked relative to the current maximum.
pub const INITIAL_Z_INDEX: u64 = 50;

/// Glyph cell size assumed when the terminal does not report its pixel size.
pub const FALLBACK_CELL_WIDTH: u16 = 8;
pub const FALLBACK_CELL_HEIGHT: u16 = 16;

/// Window chrome in cells: one border column on each side, a top border
/// plus a title row, and a bottom border.
pub const CHROME_LEFT_CELLS: u16 = 1;
pub const CHROME_RIGHT_CELLS: u16 = 1;
pub const CHROME_TOP_CELLS: u16 = 2;
pub const CHROME_BOTTOM_CELLS: u16 = 1;

/// Rows reserved at the bottom of the screen for the session tray.
pub const TRAY_HEIGHT: u16 = 1;

/// Columns the tray shifts per scroll-control click.
pub const TRAY_SCROLL_STEP: u16 = 16;

/// Text written into a session's terminal once its transport opens.
pub fn connecting_banner(host: &str, port: u16) -> String {
    format!("Connecting to {host}:{port}\r\n")
}

/// Two title-bar clicks on the same window within this window count as a
/// double click.
pub const DOUBLE_CLICK_WINDOW: std::time::Duration = std::time::Duration::from_millis(500);
