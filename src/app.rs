//! Terminal front end around [`SessionManager`]: routes crossterm events to
//! the manager and the overlays, and draws the desktop.
//!
//! Screen layout: the desktop fills every row but the last, which holds the
//! tray. Window geometry lives in logical pixels; the desktop's top-left
//! cell is pixel `(0, 0)`.

use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Clear;

use crate::actions::Action;
use crate::components::{
    Banner, Component, ConnectionDialog, DialogOutcome, HelpOverlay, TrayBar,
};
use crate::constants::{DOUBLE_CLICK_WINDOW, TRAY_HEIGHT};
use crate::manager::SessionManager;
use crate::session::{ConnectionState, SessionId};
use crate::shortcuts::Shortcuts;
use crate::terminal::{CellMetrics, key_to_bytes};
use crate::theme;
use crate::tray::TrayHit;
use crate::ui::UiFrame;
use crate::window::{
    ChromeButton, ChromeHit, ChromeState, FrameDecorator, WindowDecorator, content_rect,
};

#[derive(Debug)]
pub struct App {
    manager: SessionManager,
    shortcuts: Shortcuts,
    decorator: Box<dyn WindowDecorator>,
    dialog: ConnectionDialog,
    help: HelpOverlay,
    screen: Rect,
    last_title_click: Option<(SessionId, Instant)>,
}

impl App {
    pub fn new(manager: SessionManager, shortcuts: Shortcuts) -> Self {
        let help = HelpOverlay::new(&shortcuts);
        Self {
            manager,
            shortcuts,
            decorator: Box::new(FrameDecorator),
            dialog: ConnectionDialog::new(),
            help,
            screen: Rect::default(),
            last_title_click: None,
        }
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SessionManager {
        &mut self.manager
    }

    pub fn dialog(&self) -> &ConnectionDialog {
        &self.dialog
    }

    pub fn should_quit(&self) -> bool {
        self.manager.quit_requested()
    }

    pub fn desktop(&self) -> Rect {
        Rect {
            height: self.screen.height.saturating_sub(TRAY_HEIGHT),
            ..self.screen
        }
    }

    fn tray_area(&self) -> Rect {
        let desktop = self.desktop();
        Rect {
            y: desktop.y + desktop.height,
            height: self.screen.height - desktop.height,
            ..self.screen
        }
    }

    /// Adopt a new screen size in cells.
    pub fn resize(&mut self, screen: Rect) {
        if screen == self.screen {
            return;
        }
        self.screen = screen;
        let viewport = self.manager.metrics().viewport_for(self.desktop());
        self.manager.set_viewport(viewport);
        self.manager.tray_mut().set_width(screen.width);
        tracing::debug!(
            cols = screen.width,
            rows = screen.height,
            width = viewport.width,
            height = viewport.height,
            "screen resized"
        );
    }

    pub fn set_metrics(&mut self, metrics: CellMetrics) {
        self.manager.set_metrics(metrics);
        let viewport = metrics.viewport_for(self.desktop());
        self.manager.set_viewport(viewport);
    }

    /// Apply pending transport traffic. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        self.manager.pump_transport_events()
    }

    /// Route one input event. Returns whether a redraw is needed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(text),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                self.resize(Rect::new(0, 0, *cols, *rows));
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if let Some(action) = self.shortcuts.lookup(key) {
            self.run_action(action);
            return true;
        }
        let event = Event::Key(*key);
        if self.manager.help_visible() {
            if HelpOverlay::is_close_event(&event) {
                self.manager.set_help_visible(false);
            } else {
                self.help.handle_event(&event);
            }
            return true;
        }
        if self.manager.dialog_visible() {
            let outcome = self.dialog.handle_key(key);
            self.apply_dialog(outcome);
            return true;
        }
        let Some(id) = self.manager.focused() else {
            return false;
        };
        if self.manager.is_minimized(id) {
            return false;
        }
        self.manager.send_input(id, &key_to_bytes(*key))
    }

    fn run_action(&mut self, action: Action) {
        self.manager.apply_action(action);
        if action == Action::ToggleConnectionDialog && self.manager.dialog_visible() {
            self.dialog.set_error(None);
        }
    }

    fn apply_dialog(&mut self, outcome: DialogOutcome) {
        match outcome {
            DialogOutcome::Ignored | DialogOutcome::Consumed => {}
            DialogOutcome::Cancel => {
                self.manager.set_dialog_visible(false);
                self.dialog.set_error(None);
            }
            DialogOutcome::Submit(request) => match self.manager.open_session(&request) {
                Ok(id) => {
                    tracing::debug!(session_id = id.get(), "connection dialog submitted");
                    self.dialog.clear_secrets();
                }
                Err(err) => {
                    tracing::debug!(error = %err, "connection request rejected");
                    self.dialog.set_error(Some(err.to_string()));
                }
            },
        }
    }

    fn handle_paste(&mut self, text: &str) -> bool {
        if self.manager.help_visible() {
            return false;
        }
        if self.manager.dialog_visible() {
            self.dialog.paste(text);
            return true;
        }
        match self.manager.focused() {
            Some(id) if !self.manager.is_minimized(id) => {
                self.manager.send_input(id, text.as_bytes())
            }
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(col, row),
            MouseEventKind::Drag(MouseButton::Left) => {
                let pointer = self.manager.metrics().cell_to_point(self.desktop(), col, row);
                self.manager.pointer_moved(pointer)
            }
            MouseEventKind::Up(_) => {
                let active = self.manager.interaction().is_active();
                self.manager.end_interaction();
                active
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
                if self.manager.help_visible() =>
            {
                self.help.handle_event(&Event::Mouse(*mouse))
            }
            MouseEventKind::ScrollUp if self.tray_area().contains((col, row).into()) => {
                self.manager.tray_mut().scroll_left();
                true
            }
            MouseEventKind::ScrollDown if self.tray_area().contains((col, row).into()) => {
                self.manager.tray_mut().scroll_right();
                true
            }
            _ => false,
        }
    }

    fn mouse_down(&mut self, col: u16, row: u16) -> bool {
        if self.manager.help_visible() {
            self.manager.set_help_visible(false);
            return true;
        }

        let tray = self.tray_area();
        if tray.contains((col, row).into()) {
            match self.manager.tray().hit(col - tray.x) {
                Some(TrayHit::OpenConnection) => {
                    self.manager.set_dialog_visible(true);
                    self.dialog.set_error(None);
                }
                Some(TrayHit::ScrollLeft) => self.manager.tray_mut().scroll_left(),
                Some(TrayHit::ScrollRight) => self.manager.tray_mut().scroll_right(),
                Some(TrayHit::Entry(id)) => {
                    self.manager.toggle_minimize(id);
                }
                None => return false,
            }
            return true;
        }

        let desktop = self.desktop();
        if self.manager.notice().is_some() && Banner::rect_for(desktop).contains((col, row).into()) {
            self.manager.dismiss_notice();
            return true;
        }

        if self.manager.dialog_visible() && self.dialog.rect_for(desktop).contains((col, row).into())
        {
            let outcome = self.dialog.click(col, row);
            self.apply_dialog(outcome);
            return true;
        }

        let metrics = self.manager.metrics();
        let hit = self
            .manager
            .visible_windows()
            .into_iter()
            .rev()
            .find_map(|(id, geometry)| {
                let rect = metrics.window_rect(desktop, &geometry);
                let state = self.chrome_state(id, false);
                self.decorator
                    .hit_test(rect, state, col, row)
                    .map(|hit| (id, hit))
            });
        let Some((id, hit)) = hit else {
            return false;
        };

        match hit {
            ChromeHit::Button(ChromeButton::Minimize) => {
                self.manager.toggle_minimize(id);
            }
            ChromeHit::Button(ChromeButton::Maximize) => self.manager.toggle_maximize(id),
            ChromeHit::Button(ChromeButton::Close) => self.manager.close_session(id),
            ChromeHit::TitleBar => {
                let now = Instant::now();
                let double = self.last_title_click.is_some_and(|(prev_id, prev)| {
                    prev_id == id && now.duration_since(prev) <= DOUBLE_CLICK_WINDOW
                });
                if double {
                    self.last_title_click = None;
                    self.manager.toggle_maximize(id);
                } else {
                    self.last_title_click = Some((id, now));
                    let pointer = metrics.cell_to_point(desktop, col, row);
                    self.manager.begin_drag(id, pointer);
                }
            }
            ChromeHit::Resize(edge) => self.manager.begin_resize(id, edge),
            ChromeHit::Body => self.manager.bring_to_front(id),
        }
        true
    }

    fn chrome_state(&self, id: SessionId, focused: bool) -> ChromeState {
        ChromeState {
            focused,
            maximized: self.manager.is_maximized(id),
            minimizable: self.manager.tray().record(id).is_some(),
        }
    }

    fn window_title(&self, id: SessionId) -> String {
        let Some(session) = self.manager.session(id) else {
            return String::new();
        };
        match session.state() {
            ConnectionState::Open => session.title(),
            state => format!("{} [{}]", session.title(), state.label()),
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        self.resize(frame.area());
        let desktop = self.desktop();
        frame.render_widget(Clear, desktop);
        frame.restyle(desktop, Style::default().bg(theme::desktop_bg()));

        let metrics = self.manager.metrics();
        let focused = self.manager.focused();
        for (id, geometry) in self.manager.visible_windows() {
            let rect = metrics.window_rect(desktop, &geometry);
            let title = self.window_title(id);
            let is_focused = focused == Some(id);
            let state = self.chrome_state(id, is_focused);
            let content = content_rect(rect).intersection(desktop);
            frame.render_widget(Clear, content);
            let buffer = frame.buffer_mut();
            self.decorator
                .render_window(buffer, rect, desktop, &title, state);
            if let Some(session) = self.manager.session(id)
                && content.width > 0
                && content.height > 0
            {
                session.emulator().render(buffer, content, is_focused);
            }
        }

        frame.render_widget(TrayBar::new(self.manager.tray(), focused), self.tray_area());
        if let Some(notice) = self.manager.notice() {
            frame.render_widget(Banner::new(notice), desktop);
        }
        if self.manager.dialog_visible() {
            self.dialog.render(frame, desktop);
        }
        if self.manager.help_visible() {
            self.help.render(frame, desktop);
        }
    }
}
