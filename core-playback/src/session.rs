//! Playback sessions.
//!
//! A [`PlaybackSession`] is the handle returned by
//! [`PlaybackService::play_stream`](crate::PlaybackService::play_stream). It is
//! a [`Stream`] of the raw media events observed while the session owns the
//! media element, and the only way to keep that ownership alive: dropping the
//! handle tears the session down.

use bridge_traits::media::{ListenerId, MediaEventKind};
use futures::Stream;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::service::ServiceInner;

/// Identifies one `play_stream` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaybackSessionId(Uuid);

impl PlaybackSessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PlaybackSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaybackSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw lifecycle event delivered on a session stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackEvent {
    pub session_id: PlaybackSessionId,
    pub kind: MediaEventKind,
}

/// State shared between a session handle, its media listener and the service
/// registry.
pub(crate) struct SessionShared {
    pub(crate) id: PlaybackSessionId,
    pub(crate) token: CancellationToken,
    pub(crate) listener: Mutex<Option<ListenerId>>,
    pub(crate) events: Mutex<Option<mpsc::UnboundedSender<PlaybackEvent>>>,
}

impl SessionShared {
    pub(crate) fn new(events: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        Self {
            id: PlaybackSessionId::new(),
            token: CancellationToken::new(),
            listener: Mutex::new(None),
            events: Mutex::new(Some(events)),
        }
    }

    /// Forward an event to the session stream. Returns `false` once the
    /// stream has been closed.
    pub(crate) fn forward(&self, kind: MediaEventKind) -> bool {
        match self.events.lock().as_ref() {
            Some(tx) => tx
                .send(PlaybackEvent {
                    session_id: self.id,
                    kind,
                })
                .is_ok(),
            None => false,
        }
    }

    /// Close the session stream. Buffered events are still delivered.
    pub(crate) fn close(&self) {
        self.events.lock().take();
    }
}

/// A running `play_stream` subscription.
///
/// The stream ends after `ended` is delivered, or once the session is
/// cancelled (directly, or through [`PlaybackService::stop`](crate::PlaybackService::stop)).
/// Dropping the handle is equivalent to cancelling it.
pub struct PlaybackSession {
    shared: Arc<SessionShared>,
    events: mpsc::UnboundedReceiver<PlaybackEvent>,
    service: Weak<ServiceInner>,
}

impl PlaybackSession {
    pub(crate) fn new(
        shared: Arc<SessionShared>,
        events: mpsc::UnboundedReceiver<PlaybackEvent>,
        service: Weak<ServiceInner>,
    ) -> Self {
        Self {
            shared,
            events,
            service,
        }
    }

    pub fn id(&self) -> PlaybackSessionId {
        self.shared.id
    }

    /// Whether the session still owns a live subscription.
    pub fn is_active(&self) -> bool {
        !self.shared.token.is_cancelled()
    }

    /// Tear this session down. Other sessions are unaffected.
    pub fn cancel(&self) {
        if let Some(service) = self.service.upgrade() {
            service.teardown(self.shared.id);
        } else {
            self.shared.token.cancel();
            self.shared.close();
        }
    }

    /// Resolves once the session has been torn down, for whatever reason.
    pub async fn finished(&self) {
        self.shared.token.cancelled().await
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.shared.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Stream for PlaybackSession {
    type Item = PlaybackEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
