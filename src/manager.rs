//! Top-level state store: every live session together with its window,
//! tray entry and lifecycle, plus the single pointer interaction and the
//! overlay flags.
//!
//! The manager is headless. It never draws and never reads input devices;
//! the TUI feeds it pointer positions in logical pixels and key bytes, and
//! renders from its accessors.

use std::collections::BTreeMap;

use crate::actions::Action;
use crate::constants::connecting_banner;
use crate::error::ValidationError;
use crate::protocol::{ClientMessage, ConnectionConfig, ServerMessage};
use crate::session::{ConnectionRequest, Session, SessionId, SessionIds, StateEvent};
use crate::terminal::{CellMetrics, TermSize, TerminalEmulator, Vt100Emulator};
use crate::transport::{Connector, TransportEvent};
use crate::tray::{ConnectionRecord, Tray};
use crate::window::engine;
use crate::window::{
    Interaction, MinimumSize, Point, ResizeEdge, Size, WindowGeometry, ZOrder, default_geometry,
};

pub type EmulatorFactory = fn() -> Box<dyn TerminalEmulator>;

fn vt100_emulator() -> Box<dyn TerminalEmulator> {
    Box::new(Vt100Emulator::default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// The single dismissible banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub session: Option<SessionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerOptions {
    pub minimum: MinimumSize,
    pub metrics: CellMetrics,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            minimum: MinimumSize::DEFAULT,
            metrics: CellMetrics::default(),
        }
    }
}

#[derive(Debug)]
pub struct SessionManager {
    connector: Box<dyn Connector>,
    new_emulator: EmulatorFactory,
    ids: SessionIds,
    sessions: BTreeMap<SessionId, Session>,
    windows: BTreeMap<SessionId, WindowGeometry>,
    tray: Tray,
    zorder: ZOrder,
    interaction: Interaction<SessionId>,
    viewport: Size,
    minimum: MinimumSize,
    metrics: CellMetrics,
    dialog_visible: bool,
    help_visible: bool,
    notice: Option<Notice>,
    quit_requested: bool,
}

impl SessionManager {
    pub fn new(connector: Box<dyn Connector>, viewport: Size, options: ManagerOptions) -> Self {
        Self {
            connector,
            new_emulator: vt100_emulator,
            ids: SessionIds::default(),
            sessions: BTreeMap::new(),
            windows: BTreeMap::new(),
            tray: Tray::new(),
            zorder: ZOrder::new(),
            interaction: Interaction::Idle,
            viewport,
            minimum: options.minimum,
            metrics: options.metrics,
            dialog_visible: true,
            help_visible: false,
            notice: None,
            quit_requested: false,
        }
    }

    pub fn with_emulator_factory(mut self, factory: EmulatorFactory) -> Self {
        self.new_emulator = factory;
        self
    }

    // ----- accessors -------------------------------------------------------

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().copied().collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn geometry(&self, id: SessionId) -> Option<WindowGeometry> {
        self.windows.get(&id).copied()
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    pub fn tray_mut(&mut self) -> &mut Tray {
        &mut self.tray
    }

    pub fn interaction(&self) -> Interaction<SessionId> {
        self.interaction
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn minimum(&self) -> MinimumSize {
        self.minimum
    }

    pub fn max_z_index(&self) -> u64 {
        self.zorder.max()
    }

    pub fn endpoint(&self) -> &str {
        self.connector.endpoint()
    }

    pub fn is_minimized(&self, id: SessionId) -> bool {
        self.tray.is_minimized(id)
    }

    pub fn is_maximized(&self, id: SessionId) -> bool {
        self.windows
            .get(&id)
            .is_some_and(|geometry| geometry.is_maximized(self.viewport))
    }

    /// Visible windows, back to front.
    pub fn visible_windows(&self) -> Vec<(SessionId, WindowGeometry)> {
        let mut windows: Vec<_> = self
            .windows
            .iter()
            .filter(|(id, _)| !self.is_minimized(**id))
            .map(|(id, geometry)| (*id, *geometry))
            .collect();
        windows.sort_by_key(|(_, geometry)| geometry.z_index);
        windows
    }

    /// The session keyboard input goes to: the frontmost visible window,
    /// or the frontmost window of all when every one is minimized.
    pub fn focused(&self) -> Option<SessionId> {
        let front = |visible_only: bool| {
            self.windows
                .iter()
                .filter(|(id, _)| !visible_only || !self.is_minimized(**id))
                .max_by_key(|(_, geometry)| geometry.z_index)
                .map(|(id, _)| *id)
        };
        front(true).or_else(|| front(false))
    }

    pub fn dialog_visible(&self) -> bool {
        self.dialog_visible
    }

    pub fn set_dialog_visible(&mut self, visible: bool) {
        self.dialog_visible = visible;
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn set_help_visible(&mut self, visible: bool) {
        self.help_visible = visible;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // ----- lifecycle -------------------------------------------------------

    /// Validate `request` and start a session for it.
    ///
    /// On failure nothing changes. On success the window is created in
    /// front of all others and the transport starts connecting; the session
    /// stays `Connecting` until the transport reports it is open.
    pub fn open_session(&mut self, request: &ConnectionRequest) -> Result<SessionId, ValidationError> {
        let validated = request.validate()?;
        let id = self.ids.allocate();
        let geometry = engine::fit_to_viewport(
            default_geometry(self.zorder.next()),
            self.viewport,
            self.minimum,
        );
        let transport = self.connector.connect();
        let emulator = (self.new_emulator)();

        tracing::info!(
            session_id = id.get(),
            target = %validated.target,
            endpoint = self.connector.endpoint(),
            "session opened"
        );
        let mut session = Session::new(id, validated, emulator, transport);
        let content = self.metrics.content_box(geometry.size);
        session.emulator.fit(content, self.metrics);

        self.sessions.insert(id, session);
        self.windows.insert(id, geometry);
        Ok(id)
    }

    /// Drain every session's transport and apply the events.
    ///
    /// Returns whether anything happened.
    pub fn pump_transport_events(&mut self) -> bool {
        let mut progressed = false;
        for id in self.session_ids() {
            let Some(session) = self.sessions.get_mut(&id) else {
                continue;
            };
            let events = session.transport.poll();
            for event in events {
                progressed = true;
                if !self.sessions.contains_key(&id) {
                    break;
                }
                self.handle_transport_event(id, event);
            }
        }
        progressed
    }

    fn handle_transport_event(&mut self, id: SessionId, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.on_transport_open(id),
            TransportEvent::Message(ServerMessage::Output { content }) => {
                self.on_transport_output(id, &content)
            }
            TransportEvent::Message(ServerMessage::Error { content }) => {
                self.on_transport_error(id, content)
            }
            TransportEvent::Message(ServerMessage::Unknown) => {
                tracing::trace!(session_id = id.get(), "ignoring unknown message type");
            }
            TransportEvent::Failed(reason) => {
                tracing::warn!(session_id = id.get(), %reason, "transport failed");
                // The socket is gone; stop traffic now rather than at teardown.
                if let Some(session) = self.sessions.get_mut(&id) {
                    session.advance(StateEvent::Closed);
                }
                self.show_error(id, reason);
            }
            TransportEvent::Closed => self.teardown(id),
        }
    }

    fn on_transport_open(&mut self, id: SessionId) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        if !session.advance(StateEvent::Opened) {
            return;
        }
        tracing::info!(session_id = id.get(), "transport open");

        let config = ConnectionConfig::new(&session.target, &session.credential);
        match ClientMessage::config(&config) {
            Ok(message) => {
                if let Err(err) = session.transport.send(message) {
                    tracing::warn!(session_id = id.get(), error = %err, "failed to send config");
                }
            }
            Err(err) => {
                tracing::error!(session_id = id.get(), error = %err, "failed to encode config");
            }
        }

        self.tray.push(ConnectionRecord::new(id, &session.target));
        session
            .emulator
            .write(connecting_banner(&session.target.host, session.target.port).as_bytes());
        self.dialog_visible = false;
        self.sync_size(id);
    }

    fn on_transport_output(&mut self, id: SessionId, content: &str) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        session.emulator.write(content.as_bytes());
        session.advance(StateEvent::Output);
        self.notice = None;
    }

    fn on_transport_error(&mut self, id: SessionId, content: String) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        tracing::warn!(session_id = id.get(), message = %content, "remote error");
        session.advance(StateEvent::Error);
        self.show_error(id, content);
    }

    fn show_error(&mut self, id: SessionId, text: String) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            text,
            session: Some(id),
        });
        self.dialog_visible = true;
    }

    /// Remove every trace of a session. Safe to call for ids already gone.
    fn teardown(&mut self, id: SessionId) {
        let Some(mut session) = self.sessions.remove(&id) else {
            return;
        };
        session.advance(StateEvent::Closed);
        session.emulator.dispose();
        self.windows.remove(&id);
        self.tray.remove(id);
        if self.interaction.target() == Some(id) {
            self.interaction = Interaction::Idle;
        }
        tracing::info!(session_id = id.get(), "session closed");
    }

    /// User-initiated close. Unknown ids are ignored.
    pub fn close_session(&mut self, id: SessionId) {
        let Some(session) = self.sessions.get_mut(&id) else {
            tracing::debug!(session_id = id.get(), "close requested for unknown session");
            return;
        };
        session.transport.close();
        self.teardown(id);
    }

    /// Forward keystrokes. Dropped unless the transport is open.
    pub fn send_input(&mut self, id: SessionId, bytes: &[u8]) -> bool {
        if bytes.is_empty() {
            return false;
        }
        let Some(session) = self.sessions.get_mut(&id) else {
            return false;
        };
        if !session.state.is_transport_open() {
            return false;
        }
        match session.transport.send(ClientMessage::input(bytes)) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(session_id = id.get(), error = %err, "failed to send input");
                false
            }
        }
    }

    // ----- geometry --------------------------------------------------------

    /// Raise `id` above every other window.
    pub fn bring_to_front(&mut self, id: SessionId) {
        let Some(geometry) = self.windows.get_mut(&id) else {
            return;
        };
        let z_index = self.zorder.raise(geometry.z_index);
        *geometry = geometry.with_z_index(z_index);
    }

    pub fn begin_drag(&mut self, id: SessionId, pointer: Point) {
        let Some(geometry) = self.windows.get(&id) else {
            return;
        };
        if self.is_minimized(id) {
            return;
        }
        let offset = Point::new(
            pointer.x.saturating_sub(geometry.position.x),
            pointer.y.saturating_sub(geometry.position.y),
        );
        self.interaction = Interaction::Moving { id, offset };
        self.bring_to_front(id);
    }

    /// Start resizing from `edge`, which stays the moving edge until release.
    pub fn begin_resize(&mut self, id: SessionId, edge: impl Into<ResizeEdge>) {
        if !self.windows.contains_key(&id) || self.is_minimized(id) {
            return;
        }
        self.interaction = Interaction::Resizing {
            id,
            edge: edge.into(),
        };
        self.bring_to_front(id);
    }

    /// Apply the active gesture. Returns whether a window changed.
    pub fn pointer_moved(&mut self, pointer: Point) -> bool {
        let Some(id) = self.interaction.target() else {
            return false;
        };
        let Some(current) = self.windows.get(&id).copied() else {
            self.interaction = Interaction::Idle;
            return false;
        };
        let next = match self.interaction {
            Interaction::Idle => return false,
            Interaction::Moving { offset, .. } => {
                engine::drag_to(current, pointer, offset, self.viewport)
            }
            Interaction::Resizing { edge, .. } => {
                engine::resize_to(current, edge, pointer, self.viewport, self.minimum)
            }
        };
        if next == current {
            return false;
        }
        self.windows.insert(id, next);
        if next.size != current.size {
            self.sync_size(id);
        }
        true
    }

    /// Reset the gesture. Called on every pointer release, wherever it lands.
    pub fn end_interaction(&mut self) {
        self.interaction = Interaction::Idle;
    }

    pub fn toggle_maximize(&mut self, id: SessionId) {
        let Some(current) = self.windows.get(&id).copied() else {
            return;
        };
        let next = engine::toggle_maximize(current, self.viewport, self.minimum);
        self.windows.insert(id, next);
        self.bring_to_front(id);
        self.sync_size(id);
    }

    /// Flip the minimized flag. `None` when the session has no tray entry.
    pub fn toggle_minimize(&mut self, id: SessionId) -> Option<bool> {
        let minimized = self.tray.toggle_minimize(id)?;
        if minimized {
            if self.interaction.target() == Some(id) {
                self.interaction = Interaction::Idle;
            }
        } else {
            self.bring_to_front(id);
        }
        tracing::debug!(session_id = id.get(), minimized, "minimize toggled");
        Some(minimized)
    }

    /// Adopt a new viewport and bring every window back inside it.
    pub fn set_viewport(&mut self, viewport: Size) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        for id in self.session_ids() {
            let Some(current) = self.windows.get(&id).copied() else {
                continue;
            };
            let next = engine::fit_to_viewport(current, viewport, self.minimum);
            self.windows.insert(id, next);
            if next.size != current.size {
                self.sync_size(id);
            }
        }
    }

    pub fn set_metrics(&mut self, metrics: CellMetrics) {
        if metrics == self.metrics {
            return;
        }
        self.metrics = metrics;
        for id in self.session_ids() {
            self.sync_size(id);
        }
    }

    /// Re-fit the emulator to the window and tell the remote side about a
    /// changed grid, at most once per distinct size.
    fn sync_size(&mut self, id: SessionId) -> Option<TermSize> {
        let geometry = self.windows.get(&id)?;
        let session = self.sessions.get_mut(&id)?;
        let content = self.metrics.content_box(geometry.size);
        let size = session.emulator.fit(content, self.metrics);
        if !session.state.is_transport_open() || session.last_synced == Some(size) {
            return None;
        }
        let message = ClientMessage::Resize {
            rows: size.rows,
            cols: size.cols,
        };
        match session.transport.send(message) {
            Ok(()) => {
                session.last_synced = Some(size);
                tracing::debug!(
                    session_id = id.get(),
                    rows = size.rows,
                    cols = size.cols,
                    "resize sync sent"
                );
                Some(size)
            }
            Err(err) => {
                tracing::warn!(session_id = id.get(), error = %err, "failed to send resize");
                None
            }
        }
    }

    // ----- focus -----------------------------------------------------------

    fn cycle_focus(&mut self, forward: bool) -> Option<SessionId> {
        let candidates: Vec<SessionId> = self
            .windows
            .keys()
            .copied()
            .filter(|id| !self.is_minimized(*id))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let next = match self
            .focused()
            .and_then(|current| candidates.iter().position(|id| *id == current))
        {
            Some(index) if forward => candidates[(index + 1) % candidates.len()],
            Some(index) => candidates[(index + candidates.len() - 1) % candidates.len()],
            None => candidates[0],
        };
        self.bring_to_front(next);
        Some(next)
    }

    pub fn focus_next(&mut self) -> Option<SessionId> {
        self.cycle_focus(true)
    }

    pub fn focus_prev(&mut self) -> Option<SessionId> {
        self.cycle_focus(false)
    }

    /// Run a shortcut action against the current state.
    pub fn apply_action(&mut self, action: Action) {
        tracing::debug!(%action, "shortcut dispatched");
        match action {
            Action::FocusNext => {
                self.focus_next();
            }
            Action::FocusPrev => {
                self.focus_prev();
            }
            Action::ToggleMinimize => {
                if let Some(id) = self.focused() {
                    self.toggle_minimize(id);
                }
            }
            Action::ToggleMaximize => {
                if let Some(id) = self.focused() {
                    self.toggle_maximize(id);
                }
            }
            Action::CloseSession => {
                if let Some(id) = self.focused() {
                    self.close_session(id);
                }
            }
            Action::ToggleConnectionDialog => self.dialog_visible = !self.dialog_visible,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Quit => self.quit_requested = true,
        }
    }

    /// Close every session. Used on shutdown.
    pub fn close_all(&mut self) {
        for id in self.session_ids() {
            self.close_session(id);
        }
    }
}
