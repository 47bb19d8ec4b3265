//! # Playback State Service
//!
//! Wraps a single host [`MediaElement`] and republishes what it does as a
//! stream of immutable [`PlaybackState`] snapshots.
//!
//! ## Overview
//!
//! - Snapshots are broadcast through a `tokio::sync::watch` channel: every
//!   subscriber immediately sees the latest value, then each update.
//! - [`PlaybackService::play_stream`] starts a [`PlaybackSession`] that owns the
//!   element until it is torn down (stop, cancel, drop or `ended`).
//! - All snapshot updates go through one `publish` helper, driven by the pure
//!   [`PlaybackState::transition`] function.
//!
//! ## Locking
//!
//! The session registry is a `parking_lot::Mutex` that is never held while
//! calling into the media element. Hosts are free to emit events
//! synchronously from inside `play()`, `pause()` or `set_current_time()`.

use bridge_traits::media::{MediaElement, MediaEventKind, MediaEventListener};
use core_runtime::logging::redact_url;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::{PlaybackError, Result};
use crate::session::{PlaybackSession, PlaybackSessionId, SessionShared};
use crate::state::{MediaReadout, PlaybackState, StateInput, DEFAULT_VOLUME};

#[derive(Default)]
struct Registry {
    sessions: Vec<Arc<SessionShared>>,
    /// Session currently allowed to drive the element and the snapshot.
    current: Option<PlaybackSessionId>,
}

pub(crate) struct ServiceInner {
    element: Arc<dyn MediaElement>,
    state_tx: watch::Sender<PlaybackState>,
    registry: Mutex<Registry>,
}

impl ServiceInner {
    fn publish(&self, input: StateInput) {
        self.state_tx.send_if_modified(|state| {
            let next = state.transition(&input);
            if next == *state {
                return false;
            }
            debug!(from = ?state.status, to = ?next.status, ?input, "Playback state transition");
            *state = next;
            true
        });
    }

    fn is_current(&self, id: PlaybackSessionId) -> bool {
        self.registry.lock().current == Some(id)
    }

    fn has_current(&self) -> bool {
        self.registry.lock().current.is_some()
    }

    fn on_media_event(&self, session: &SessionShared, kind: MediaEventKind) {
        if session.token.is_cancelled() || !self.is_current(session.id) {
            return;
        }

        if kind == MediaEventKind::Error {
            warn!(session_id = %session.id, "Media element reported an error");
        }

        let readout = MediaReadout::from_element(self.element.as_ref());
        self.publish(StateInput::Media { kind, readout });
        session.forward(kind);

        if kind == MediaEventKind::Ended {
            info!(session_id = %session.id, "Playback ended");
            self.teardown(session.id);
        }
    }

    /// Release everything a session holds. Safe to call repeatedly.
    pub(crate) fn teardown(&self, id: PlaybackSessionId) {
        let (session, owned) = {
            let mut registry = self.registry.lock();
            let Some(pos) = registry.sessions.iter().position(|s| s.id == id) else {
                return;
            };
            let session = registry.sessions.remove(pos);
            let owned = registry.current == Some(id);
            if owned {
                registry.current = None;
            }
            (session, owned)
        };

        // Cancel first so the listener ignores what pause/seek emit below.
        session.token.cancel();

        if owned {
            if let Err(e) = self.element.pause() {
                warn!(session_id = %id, error = %e, "Failed to pause media element");
            }
            if let Err(e) = self.element.set_current_time(0.0) {
                warn!(session_id = %id, error = %e, "Failed to rewind media element");
            }
        }

        let listener = session.listener.lock().take();
        if let Some(listener) = listener {
            self.element.remove_listener(listener);
        }
        session.close();

        if owned {
            self.publish(StateInput::Reset);
        }
        debug!(session_id = %id, owned, "Playback session torn down");
    }

    fn active_sessions(&self) -> Vec<PlaybackSessionId> {
        self.registry.lock().sessions.iter().map(|s| s.id).collect()
    }
}

/// Service exposing a host media element as a replay-latest snapshot stream.
///
/// Cheap to clone; clones share the element and the snapshot channel.
#[derive(Clone)]
pub struct PlaybackService {
    inner: Arc<ServiceInner>,
}

impl PlaybackService {
    /// Wrap `element`, adopting its current volume.
    pub fn new(element: Arc<dyn MediaElement>) -> Self {
        let volume = element.volume();
        let volume = if (0.0..=1.0).contains(&volume) {
            volume
        } else {
            DEFAULT_VOLUME
        };

        let (state_tx, _) = watch::channel(PlaybackState::with_volume(volume));
        Self {
            inner: Arc::new(ServiceInner {
                element,
                state_tx,
                registry: Mutex::new(Registry::default()),
            }),
        }
    }

    /// Wrap `element` and set its output volume up front.
    pub fn with_initial_volume(element: Arc<dyn MediaElement>, volume: f64) -> Result<Self> {
        let service = Self::new(element);
        service.set_volume(volume)?;
        Ok(service)
    }

    /// Subscribe to snapshots. The receiver starts at the latest value.
    pub fn state(&self) -> watch::Receiver<PlaybackState> {
        self.inner.state_tx.subscribe()
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> PlaybackState {
        self.inner.state_tx.borrow().clone()
    }

    /// The media element this service drives.
    pub fn element(&self) -> &Arc<dyn MediaElement> {
        &self.inner.element
    }

    /// Load `url` into the element and start playing it.
    ///
    /// The returned session must be kept alive for as long as playback should
    /// continue; dropping it stops playback.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidSource`] for an empty URL and
    /// [`PlaybackError::Bridge`] when the element rejects the source outright.
    pub fn play_stream(&self, url: &str) -> Result<PlaybackSession> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PlaybackError::InvalidSource("empty media URL".to_string()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(SessionShared::new(tx));
        let id = shared.id;

        {
            let mut registry = self.inner.registry.lock();
            if let Some(previous) = registry.current {
                warn!(
                    session_id = %id,
                    superseded = %previous,
                    "Starting playback while another session owns the media element"
                );
            }
            registry.sessions.push(shared.clone());
            registry.current = Some(id);
        }

        self.inner.publish(StateInput::Load);

        // Attach before touching the source so synchronous hosts lose nothing.
        let listener_id = self.inner.element.add_listener(self.listener_for(&shared));
        *shared.listener.lock() = Some(listener_id);

        info!(session_id = %id, url = %redact_url(url), "Starting playback session");
        let session = PlaybackSession::new(shared, rx, Arc::downgrade(&self.inner));

        let started = self
            .inner
            .element
            .set_src(url)
            .and_then(|_| self.inner.element.load())
            .and_then(|_| self.inner.element.play());

        if let Err(e) = started {
            warn!(session_id = %id, error = %e, "Media element rejected source");
            drop(session);
            return Err(e.into());
        }

        Ok(session)
    }

    fn listener_for(&self, session: &Arc<SessionShared>) -> MediaEventListener {
        let service: Weak<ServiceInner> = Arc::downgrade(&self.inner);
        let session = session.clone();
        Arc::new(move |kind| {
            if let Some(service) = service.upgrade() {
                service.on_media_event(&session, kind);
            }
        })
    }

    /// Resume playback. Does nothing when no session is active.
    pub fn play(&self) -> Result<()> {
        if !self.inner.has_current() {
            debug!("play() ignored: nothing loaded");
            return Ok(());
        }
        self.inner.element.play()?;
        Ok(())
    }

    /// Pause playback. Does nothing when no session is active.
    pub fn pause(&self) -> Result<()> {
        if !self.inner.has_current() {
            debug!("pause() ignored: nothing loaded");
            return Ok(());
        }
        self.inner.element.pause()?;
        Ok(())
    }

    /// Tear down every active session.
    pub fn stop(&self) {
        let sessions = self.inner.active_sessions();
        if sessions.is_empty() {
            return;
        }
        info!(count = sessions.len(), "Stopping playback");
        for id in sessions {
            self.inner.teardown(id);
        }
    }

    /// Move the playback position. Bounds are the caller's concern.
    pub fn seek_to(&self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() {
            return Err(PlaybackError::InvalidSeek(seconds));
        }
        if !self.inner.has_current() {
            debug!(seconds, "seek_to() ignored: nothing loaded");
            return Ok(());
        }
        debug!(seconds, "Seeking");
        self.inner.element.set_current_time(seconds)?;
        Ok(())
    }

    /// Set the output volume and publish it immediately.
    pub fn set_volume(&self, volume: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(PlaybackError::InvalidVolume(volume));
        }
        self.inner.element.set_volume(volume)?;
        self.inner.publish(StateInput::VolumeSet(volume));
        Ok(())
    }

    /// Number of sessions that have not been torn down yet.
    pub fn active_session_count(&self) -> usize {
        self.inner.registry.lock().sessions.len()
    }
}

impl std::fmt::Debug for PlaybackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackService")
            .field("state", &*self.inner.state_tx.borrow())
            .field("sessions", &self.active_session_count())
            .finish()
    }
}
