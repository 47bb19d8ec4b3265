//! Headless media element.
//!
//! An in-process stand-in for the HTML `<audio>` element. It renders nothing;
//! it tracks source, position, volume and paused state, and emits the same
//! event sequence a browser would, synchronously from inside the control call
//! that caused it. Hosts without a native player use it to drive the core
//! deterministically, and the playback integration tests script it with
//! [`finish_loading`](HeadlessMediaElement::finish_loading),
//! [`advance`](HeadlessMediaElement::advance) and
//! [`fail`](HeadlessMediaElement::fail).

use bridge_traits::{
    error::{BridgeError, Result},
    media::{ListenerId, MediaElement, MediaEventKind, MediaEventListener},
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

#[derive(Debug)]
struct Playhead {
    src: Option<String>,
    duration: f64,
    current_time: f64,
    volume: f64,
    paused: bool,
    ready: bool,
}

impl Default for Playhead {
    fn default() -> Self {
        Self {
            src: None,
            duration: f64::NAN,
            current_time: 0.0,
            volume: 1.0,
            paused: true,
            ready: false,
        }
    }
}

/// Scriptable media element that never touches an audio device.
pub struct HeadlessMediaElement {
    playhead: Mutex<Playhead>,
    listeners: Mutex<Vec<(ListenerId, MediaEventListener)>>,
    history: Mutex<Vec<MediaEventKind>>,
    next_listener: AtomicU64,
    auto_ready: Option<f64>,
}

impl HeadlessMediaElement {
    /// Element that waits for [`finish_loading`](Self::finish_loading) after
    /// every `load()`.
    pub fn new() -> Self {
        Self {
            playhead: Mutex::new(Playhead::default()),
            listeners: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            auto_ready: None,
        }
    }

    /// Element that reports every source as ready, with the given duration,
    /// as soon as it is loaded.
    pub fn with_auto_ready(duration: f64) -> Self {
        Self {
            auto_ready: Some(duration),
            ..Self::new()
        }
    }

    /// Simulate metadata arrival: emits `loadedmetadata` and `canplay`, then
    /// `playing` when playback was already requested.
    pub fn finish_loading(&self, duration: f64) {
        let resume = {
            let mut playhead = self.playhead.lock();
            if playhead.src.is_none() {
                return;
            }
            playhead.duration = duration;
            playhead.ready = true;
            !playhead.paused
        };

        self.emit(MediaEventKind::LoadedMetadata);
        self.emit(MediaEventKind::CanPlay);
        if resume {
            self.emit(MediaEventKind::Playing);
        }
    }

    /// Move the playhead forward while playing. Reaching the duration pauses
    /// the element and emits `ended`, like a browser does.
    pub fn advance(&self, seconds: f64) {
        let ended = {
            let mut playhead = self.playhead.lock();
            if playhead.paused || !playhead.ready {
                return;
            }
            playhead.current_time += seconds;
            if playhead.duration.is_finite() && playhead.current_time >= playhead.duration {
                playhead.current_time = playhead.duration;
                playhead.paused = true;
                true
            } else {
                false
            }
        };

        self.emit(MediaEventKind::TimeUpdate);
        if ended {
            self.emit(MediaEventKind::Pause);
            self.emit(MediaEventKind::Ended);
        }
    }

    /// Simulate a network or decode failure on the current source.
    pub fn fail(&self) {
        {
            let mut playhead = self.playhead.lock();
            playhead.paused = true;
            playhead.ready = false;
        }
        self.emit(MediaEventKind::Error);
    }

    /// Whether playback is currently paused.
    pub fn is_paused(&self) -> bool {
        self.playhead.lock().paused
    }

    /// The currently assigned source.
    pub fn src(&self) -> Option<String> {
        self.playhead.lock().src.clone()
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Every event emitted so far, oldest first.
    pub fn history(&self) -> Vec<MediaEventKind> {
        self.history.lock().clone()
    }

    /// Drop the recorded event history.
    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    fn emit(&self, kind: MediaEventKind) {
        trace!(event = %kind, "Headless media event");
        self.history.lock().push(kind);

        // Snapshot so listeners can detach themselves mid-dispatch.
        let listeners: Vec<MediaEventListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(kind);
        }
    }
}

impl Default for HeadlessMediaElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for HeadlessMediaElement {
    fn set_src(&self, url: &str) -> Result<()> {
        let mut playhead = self.playhead.lock();
        *playhead = Playhead {
            src: Some(url.to_string()),
            volume: playhead.volume,
            ..Playhead::default()
        };
        Ok(())
    }

    fn load(&self) -> Result<()> {
        {
            let mut playhead = self.playhead.lock();
            if playhead.src.is_none() {
                return Err(BridgeError::NotAvailable("no media source assigned".into()));
            }
            playhead.current_time = 0.0;
            playhead.ready = false;
            playhead.paused = true;
        }

        self.emit(MediaEventKind::LoadStart);
        if let Some(duration) = self.auto_ready {
            self.finish_loading(duration);
        }
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let ready = {
            let mut playhead = self.playhead.lock();
            if playhead.src.is_none() {
                return Err(BridgeError::NotAvailable("no media source assigned".into()));
            }
            if !playhead.paused {
                return Ok(());
            }
            playhead.paused = false;
            playhead.ready
        };

        self.emit(MediaEventKind::Play);
        if ready {
            self.emit(MediaEventKind::Playing);
        }
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        {
            let mut playhead = self.playhead.lock();
            if playhead.paused {
                return Ok(());
            }
            playhead.paused = true;
        }

        self.emit(MediaEventKind::Pause);
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.playhead.lock().current_time
    }

    fn set_current_time(&self, seconds: f64) -> Result<()> {
        {
            let mut playhead = self.playhead.lock();
            let upper = if playhead.duration.is_finite() {
                playhead.duration
            } else {
                f64::INFINITY
            };
            playhead.current_time = seconds.clamp(0.0, upper);
        }

        self.emit(MediaEventKind::TimeUpdate);
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.playhead.lock().duration
    }

    fn volume(&self) -> f64 {
        self.playhead.lock().volume
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(BridgeError::OperationFailed(format!(
                "volume {volume} outside [0, 1]"
            )));
        }

        let changed = {
            let mut playhead = self.playhead.lock();
            let changed = playhead.volume != volume;
            playhead.volume = volume;
            changed
        };

        if changed {
            self.emit(MediaEventKind::VolumeChange);
        }
        Ok(())
    }

    fn has_source(&self) -> bool {
        self.playhead.lock().src.is_some()
    }

    fn add_listener(&self, listener: MediaEventListener) -> ListenerId {
        let id = ListenerId::new(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.lock().retain(|(existing, _)| *existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recording(element: &HeadlessMediaElement) -> (ListenerId, Arc<Mutex<Vec<MediaEventKind>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let id = element.add_listener(Arc::new(move |kind| sink.lock().push(kind)));
        (id, seen)
    }

    #[test]
    fn autoplay_before_metadata_emits_playing_once_ready() {
        let element = HeadlessMediaElement::new();
        let (_, seen) = recording(&element);

        element.set_src("https://cdn.example.com/a.mp3").unwrap();
        element.load().unwrap();
        element.play().unwrap();
        element.finish_loading(120.0);

        assert_eq!(
            *seen.lock(),
            vec![
                MediaEventKind::LoadStart,
                MediaEventKind::Play,
                MediaEventKind::LoadedMetadata,
                MediaEventKind::CanPlay,
                MediaEventKind::Playing,
            ]
        );
        assert_eq!(element.duration(), 120.0);
        assert!(!element.is_paused());
    }

    #[test]
    fn auto_ready_reports_metadata_on_load() {
        let element = HeadlessMediaElement::with_auto_ready(30.0);
        element.set_src("https://cdn.example.com/a.mp3").unwrap();
        element.load().unwrap();

        assert_eq!(
            element.history(),
            vec![
                MediaEventKind::LoadStart,
                MediaEventKind::LoadedMetadata,
                MediaEventKind::CanPlay,
            ]
        );
    }

    #[test]
    fn play_without_source_is_rejected() {
        let element = HeadlessMediaElement::new();
        assert!(matches!(element.play(), Err(BridgeError::NotAvailable(_))));
        assert!(element.history().is_empty());
    }

    #[test]
    fn pause_is_silent_when_already_paused() {
        let element = HeadlessMediaElement::with_auto_ready(10.0);
        element.set_src("https://cdn.example.com/a.mp3").unwrap();
        element.load().unwrap();
        element.clear_history();

        element.pause().unwrap();
        assert!(element.history().is_empty());
    }

    #[test]
    fn advancing_past_duration_ends_playback() {
        let element = HeadlessMediaElement::with_auto_ready(5.0);
        element.set_src("https://cdn.example.com/a.mp3").unwrap();
        element.load().unwrap();
        element.play().unwrap();
        element.clear_history();

        element.advance(3.0);
        assert_eq!(element.current_time(), 3.0);
        element.advance(3.0);

        assert_eq!(element.current_time(), 5.0);
        assert!(element.is_paused());
        assert_eq!(
            element.history(),
            vec![
                MediaEventKind::TimeUpdate,
                MediaEventKind::TimeUpdate,
                MediaEventKind::Pause,
                MediaEventKind::Ended,
            ]
        );
    }

    #[test]
    fn seeking_clamps_to_known_duration() {
        let element = HeadlessMediaElement::with_auto_ready(60.0);
        element.set_src("https://cdn.example.com/a.mp3").unwrap();
        element.load().unwrap();

        element.set_current_time(90.0).unwrap();
        assert_eq!(element.current_time(), 60.0);
        element.set_current_time(-4.0).unwrap();
        assert_eq!(element.current_time(), 0.0);
    }

    #[test]
    fn volume_survives_source_changes() {
        let element = HeadlessMediaElement::new();
        element.set_volume(0.25).unwrap();
        element.set_src("https://cdn.example.com/a.mp3").unwrap();

        assert_eq!(element.volume(), 0.25);
        assert!(element.set_volume(1.5).is_err());
    }

    #[test]
    fn listener_can_detach_itself_mid_dispatch() {
        let element = Arc::new(HeadlessMediaElement::new());
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&element);
        let own_id = slot.clone();
        let id = element.add_listener(Arc::new(move |_| {
            if let (Some(element), Some(id)) = (weak.upgrade(), *own_id.lock()) {
                element.remove_listener(id);
            }
        }));
        *slot.lock() = Some(id);

        element.fail();
        assert_eq!(element.listener_count(), 0);
    }
}
