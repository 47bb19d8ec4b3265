//! `MediaElement` implementation backed by an `HTMLAudioElement`.
//!
//! Every listener registered through the bridge becomes one DOM event listener
//! per event kind. The DOM closures are owned by this adapter and released
//! when the listener is removed or the adapter is dropped.

use bridge_traits::{
    error::{BridgeError, Result},
    media::{ListenerId, MediaElement, MediaEventKind, MediaEventListener},
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlAudioElement};

type DomCallback = Closure<dyn FnMut(Event)>;

struct Registration {
    kind: MediaEventKind,
    callback: DomCallback,
}

fn describe(err: &JsValue) -> String {
    if err.is_string() {
        err.as_string().unwrap_or_default()
    } else if let Some(js_err) = err.dyn_ref::<js_sys::Error>() {
        js_err.message().into()
    } else {
        format!("{err:?}")
    }
}

fn js_error(context: &str, err: JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!("audio element {context}: {}", describe(&err)))
}

/// Browser media element adapter.
pub struct HtmlAudioMediaElement {
    audio: HtmlAudioElement,
    listeners: RefCell<HashMap<ListenerId, Vec<Registration>>>,
    next_listener: Cell<u64>,
}

impl HtmlAudioMediaElement {
    /// Create a detached `<audio>` element (`new Audio()`).
    pub fn new() -> Result<Self> {
        let audio = HtmlAudioElement::new().map_err(|err| js_error("create", err))?;
        Ok(Self::from_element(audio))
    }

    /// Reuse the `<audio>` element with the given DOM id, creating and
    /// appending it to `<body>` when it does not exist yet.
    pub fn attach_to_document(id: &str) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| BridgeError::NotAvailable("document".into()))?;

        if let Some(existing) = document.get_element_by_id(id) {
            let audio = existing
                .dyn_into::<HtmlAudioElement>()
                .map_err(|_| BridgeError::OperationFailed(format!("#{id} is not <audio>")))?;
            return Ok(Self::from_element(audio));
        }

        let audio: HtmlAudioElement = document
            .create_element("audio")
            .map_err(|err| js_error("create", err))?
            .dyn_into()
            .map_err(|_| BridgeError::OperationFailed("created element is not <audio>".into()))?;
        audio.set_id(id);
        audio
            .set_attribute("preload", "metadata")
            .map_err(|err| js_error("set preload", err))?;
        document
            .body()
            .ok_or_else(|| BridgeError::NotAvailable("document.body".into()))?
            .append_child(&audio)
            .map_err(|err| js_error("append", err))?;

        Ok(Self::from_element(audio))
    }

    /// Wrap an existing element.
    pub fn from_element(audio: HtmlAudioElement) -> Self {
        Self {
            audio,
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(1),
        }
    }

    /// The underlying DOM element.
    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }

    fn detach(&self, registrations: Vec<Registration>) {
        for registration in &registrations {
            if let Err(err) = self.audio.remove_event_listener_with_callback(
                registration.kind.as_str(),
                registration.callback.as_ref().unchecked_ref(),
            ) {
                warn!(error = %describe(&err), event = %registration.kind, "Failed to detach media listener");
            }
        }

        // The callback being dispatched right now may be one of these, so the
        // closures are released on the next microtask instead of here.
        wasm_bindgen_futures::spawn_local(async move {
            drop(registrations);
        });
    }
}

impl MediaElement for HtmlAudioMediaElement {
    fn set_src(&self, url: &str) -> Result<()> {
        self.audio.set_src(url);
        Ok(())
    }

    fn load(&self) -> Result<()> {
        self.audio.load();
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let promise = self.audio.play().map_err(|err| js_error("play", err))?;

        // Rejections (autoplay policy, source replaced mid-start) are reported
        // here; decode and network failures arrive as `error` events.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                debug!(reason = %describe(&err), "Play request rejected by the browser");
            }
        });
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        self.audio.pause().map_err(|err| js_error("pause", err))
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn set_current_time(&self, seconds: f64) -> Result<()> {
        self.audio.set_current_time(seconds);
        Ok(())
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }

    fn volume(&self) -> f64 {
        self.audio.volume()
    }

    fn set_volume(&self, volume: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(BridgeError::OperationFailed(format!(
                "volume {volume} outside [0, 1]"
            )));
        }
        self.audio.set_volume(volume);
        Ok(())
    }

    fn has_source(&self) -> bool {
        !self.audio.src().is_empty()
    }

    fn add_listener(&self, listener: MediaEventListener) -> ListenerId {
        let raw = self.next_listener.get();
        self.next_listener.set(raw + 1);
        let id = ListenerId::new(raw);

        let mut registrations = Vec::with_capacity(MediaEventKind::ALL.len());
        for kind in MediaEventKind::ALL {
            let listener = listener.clone();
            let callback = DomCallback::new(move |_event: Event| listener(kind));
            if let Err(err) = self
                .audio
                .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
            {
                warn!(error = %describe(&err), event = %kind, "Failed to attach media listener");
                continue;
            }
            registrations.push(Registration { kind, callback });
        }

        self.listeners.borrow_mut().insert(id, registrations);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&id);
        if let Some(registrations) = removed {
            self.detach(registrations);
        }
    }
}

impl Drop for HtmlAudioMediaElement {
    fn drop(&mut self) {
        let all: Vec<Vec<Registration>> = self.listeners.borrow_mut().drain().map(|(_, r)| r).collect();
        for registrations in all {
            self.detach(registrations);
        }
    }
}
