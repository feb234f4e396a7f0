//! Connection tray: one entry per opened session, clicked to minimize or
//! restore its window.
//!
//! All measurements here are in terminal columns.

use crate::constants::TRAY_SCROLL_STEP;
use crate::session::{SessionId, SessionTarget};

pub const OPEN_BUTTON_LABEL: &str = " Open Connection SSH ";
const SCROLL_CONTROL_WIDTH: u16 = 3;
const ENTRY_GAP: u16 = 1;

/// Tray projection of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    pub id: SessionId,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub minimized: bool,
}

impl ConnectionRecord {
    pub fn new(id: SessionId, target: &SessionTarget) -> Self {
        Self {
            id,
            host: target.host.clone(),
            port: target.port,
            user: target.user.clone(),
            minimized: false,
        }
    }

    pub fn label(&self) -> String {
        format!(" {}@{}:{} ", self.user, self.host, self.port)
    }

    fn width(&self) -> u16 {
        self.label().chars().count().min(u16::MAX as usize) as u16
    }
}

/// Half-open column span `[start, start + width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u16,
    pub width: u16,
}

impl Span {
    pub fn contains(&self, col: u16) -> bool {
        col >= self.start && col < self.start.saturating_add(self.width)
    }
}

/// A tray entry placed on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedEntry {
    pub id: SessionId,
    pub span: Span,
    /// Columns of the label cut off on the left by scrolling.
    pub clip_left: u16,
    pub minimized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayLayout {
    pub open_button: Span,
    pub scroll_left: Option<Span>,
    pub scroll_right: Option<Span>,
    pub entries: Vec<PlacedEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayHit {
    OpenConnection,
    ScrollLeft,
    ScrollRight,
    Entry(SessionId),
}

#[derive(Debug, Default)]
pub struct Tray {
    records: Vec<ConnectionRecord>,
    width: u16,
    offset: u16,
    needs_scroll: bool,
}

impl Tray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ConnectionRecord] {
        &self.records
    }

    pub fn record(&self, id: SessionId) -> Option<&ConnectionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn is_minimized(&self, id: SessionId) -> bool {
        self.record(id).is_some_and(|record| record.minimized)
    }

    pub fn push(&mut self, record: ConnectionRecord) {
        if self.record(record.id).is_some() {
            return;
        }
        self.records.push(record);
        self.recompute();
    }

    pub fn remove(&mut self, id: SessionId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.recompute();
        }
        removed
    }

    /// Flip the minimized flag. Returns the new value, or `None` when the
    /// session has no tray entry.
    pub fn toggle_minimize(&mut self, id: SessionId) -> Option<bool> {
        let record = self.records.iter_mut().find(|record| record.id == id)?;
        record.minimized = !record.minimized;
        Some(record.minimized)
    }

    /// Record the tray's on-screen width.
    pub fn set_width(&mut self, width: u16) {
        self.width = width;
        self.recompute();
    }

    pub fn needs_scroll(&self) -> bool {
        self.needs_scroll
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn scroll_left(&mut self) {
        self.offset = self.offset.saturating_sub(TRAY_SCROLL_STEP);
    }

    pub fn scroll_right(&mut self) {
        self.offset = self
            .offset
            .saturating_add(TRAY_SCROLL_STEP)
            .min(self.max_offset());
    }

    /// Total width of all entries laid side by side.
    pub fn natural_width(&self) -> u16 {
        let labels: u32 = self.records.iter().map(|r| r.width() as u32).sum();
        let gaps = self.records.len().saturating_sub(1) as u32 * ENTRY_GAP as u32;
        (labels + gaps).min(u16::MAX as u32) as u16
    }

    fn open_button_width() -> u16 {
        OPEN_BUTTON_LABEL.chars().count() as u16
    }

    /// Columns available to the entries, after the open button (and the
    /// scroll controls, when shown).
    fn entries_width(&self, scrolling: bool) -> u16 {
        let reserved = Self::open_button_width() + ENTRY_GAP;
        let controls = if scrolling {
            2 * (SCROLL_CONTROL_WIDTH + ENTRY_GAP)
        } else {
            0
        };
        self.width.saturating_sub(reserved + controls)
    }

    fn max_offset(&self) -> u16 {
        if !self.needs_scroll {
            return 0;
        }
        self.natural_width()
            .saturating_sub(self.entries_width(true))
    }

    fn recompute(&mut self) {
        self.needs_scroll = self.natural_width() > self.entries_width(false);
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn layout(&self) -> TrayLayout {
        let open_button = Span {
            start: 0,
            width: Self::open_button_width().min(self.width),
        };
        let mut cursor = open_button.width + ENTRY_GAP;

        let (scroll_left, scroll_right) = if self.needs_scroll {
            let left = Span {
                start: cursor,
                width: SCROLL_CONTROL_WIDTH,
            };
            let right = Span {
                start: self.width.saturating_sub(SCROLL_CONTROL_WIDTH),
                width: SCROLL_CONTROL_WIDTH,
            };
            cursor += SCROLL_CONTROL_WIDTH + ENTRY_GAP;
            (Some(left), Some(right))
        } else {
            (None, None)
        };

        let viewport_start = cursor;
        let viewport_end = viewport_start.saturating_add(self.entries_width(self.needs_scroll));

        let mut entries = Vec::new();
        let mut natural = 0u16;
        for record in &self.records {
            let width = record.width();
            let start = natural as i32 - self.offset as i32 + viewport_start as i32;
            let end = start + width as i32;
            natural = natural.saturating_add(width + ENTRY_GAP);

            let visible_start = start.max(viewport_start as i32);
            let visible_end = end.min(viewport_end as i32);
            if visible_end <= visible_start {
                continue;
            }
            entries.push(PlacedEntry {
                id: record.id,
                span: Span {
                    start: visible_start as u16,
                    width: (visible_end - visible_start) as u16,
                },
                clip_left: (visible_start - start) as u16,
                minimized: record.minimized,
            });
        }

        TrayLayout {
            open_button,
            scroll_left,
            scroll_right,
            entries,
        }
    }

    pub fn hit(&self, col: u16) -> Option<TrayHit> {
        let layout = self.layout();
        if layout.open_button.contains(col) {
            return Some(TrayHit::OpenConnection);
        }
        if layout.scroll_left.is_some_and(|span| span.contains(col)) {
            return Some(TrayHit::ScrollLeft);
        }
        if layout.scroll_right.is_some_and(|span| span.contains(col)) {
            return Some(TrayHit::ScrollRight);
        }
        layout
            .entries
            .iter()
            .find(|entry| entry.span.contains(col))
            .map(|entry| TrayHit::Entry(entry.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionIds;

    fn record(ids: &mut SessionIds, host: &str) -> ConnectionRecord {
        ConnectionRecord::new(
            ids.allocate(),
            &SessionTarget {
                host: host.into(),
                port: 22,
                user: "u".into(),
            },
        )
    }

    #[test]
    fn toggle_minimize_flips_flag() {
        let mut ids = SessionIds::default();
        let mut tray = Tray::new();
        let r = record(&mut ids, "a");
        let id = r.id;
        tray.push(r);
        assert_eq!(tray.toggle_minimize(id), Some(true));
        assert!(tray.is_minimized(id));
        assert_eq!(tray.toggle_minimize(id), Some(false));
        assert_eq!(tray.toggle_minimize(ids.allocate()), None);
    }

    #[test]
    fn needs_scroll_tracks_width_and_entries() {
        let mut ids = SessionIds::default();
        let mut tray = Tray::new();
        tray.set_width(80);
        tray.push(record(&mut ids, "alpha.example.com"));
        assert!(!tray.needs_scroll());

        tray.push(record(&mut ids, "bravo.example.com"));
        tray.push(record(&mut ids, "charlie.example.com"));
        assert!(tray.needs_scroll());

        tray.set_width(200);
        assert!(!tray.needs_scroll());
    }

    #[test]
    fn remove_drops_record_and_recomputes() {
        let mut ids = SessionIds::default();
        let mut tray = Tray::new();
        tray.set_width(60);
        let first = record(&mut ids, "alpha.example.com");
        let id = first.id;
        tray.push(first);
        tray.push(record(&mut ids, "bravo.example.com"));
        assert!(tray.needs_scroll());
        assert!(tray.remove(id));
        assert!(!tray.remove(id));
        assert!(!tray.needs_scroll());
        assert_eq!(tray.records().len(), 1);
    }

    #[test]
    fn scrolling_shifts_entries_and_stays_in_range() {
        let mut ids = SessionIds::default();
        let mut tray = Tray::new();
        tray.set_width(60);
        for host in ["alpha.example.com", "bravo.example.com", "charlie.example.com"] {
            tray.push(record(&mut ids, host));
        }
        assert!(tray.needs_scroll());
        let before = tray.layout().entries[0].span;

        tray.scroll_right();
        assert_eq!(tray.offset(), TRAY_SCROLL_STEP);
        let after = tray.layout().entries[0].clone();
        assert_eq!(after.clip_left, TRAY_SCROLL_STEP);
        assert_eq!(after.span.start, before.start);

        for _ in 0..20 {
            tray.scroll_right();
        }
        assert!(tray.offset() <= tray.natural_width());
        for _ in 0..20 {
            tray.scroll_left();
        }
        assert_eq!(tray.offset(), 0);
    }

    #[test]
    fn hit_testing() {
        let mut ids = SessionIds::default();
        let mut tray = Tray::new();
        tray.set_width(100);
        let r = record(&mut ids, "host");
        let id = r.id;
        tray.push(r);
        assert_eq!(tray.hit(0), Some(TrayHit::OpenConnection));
        let entry = tray.layout().entries[0].span;
        assert_eq!(tray.hit(entry.start), Some(TrayHit::Entry(id)));
        assert_eq!(tray.hit(99), None);
    }
}
