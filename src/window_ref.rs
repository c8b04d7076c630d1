//! Access to the page the scene lives in.
//!
//! The manager never touches `window` or `document` directly. It gets a
//! [`WindowRef`] instead, which lets the deferred loop start and the resize
//! hook be driven by tests.

use std::{cell::RefCell, rc::Rc};

/// Mirror of `document.readyState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn parse(state: &str) -> Self {
        match state {
            "loading" => ReadyState::Loading,
            "interactive" => ReadyState::Interactive,
            _ => ReadyState::Complete,
        }
    }

    pub fn is_loading(self) -> bool {
        self == ReadyState::Loading
    }
}

pub trait WindowRef {
    fn ready_state(&self) -> ReadyState;

    /// Run `callback` once the document content has loaded.
    fn on_content_loaded(&self, callback: Box<dyn FnOnce()>);

    /// Run `callback` every time the window is resized.
    fn on_resize(&self, callback: Box<dyn FnMut()>);
}

/// Native stand-in for the browser window. The document is always ready and
/// resize callbacks fire when the driver forwards a winit `Resized` event.
#[derive(Clone, Default)]
pub struct NativeWindow {
    resize_listeners: Rc<RefCell<Vec<Box<dyn FnMut()>>>>,
}

impl NativeWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch_resize(&self) {
        for listener in self.resize_listeners.borrow_mut().iter_mut() {
            listener();
        }
    }
}

impl std::fmt::Debug for NativeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeWindow")
            .field("resize_listeners", &self.resize_listeners.borrow().len())
            .finish()
    }
}

impl WindowRef for NativeWindow {
    fn ready_state(&self) -> ReadyState {
        ReadyState::Complete
    }

    fn on_content_loaded(&self, callback: Box<dyn FnOnce()>) {
        callback();
    }

    fn on_resize(&self, callback: Box<dyn FnMut()>) {
        self.resize_listeners.borrow_mut().push(callback);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserWindow;

#[cfg(target_arch = "wasm32")]
mod browser {
    use anyhow::anyhow;
    use wasm_bindgen::{JsCast, prelude::Closure};

    use super::{ReadyState, WindowRef};

    /// The real `window` / `document` pair of the page.
    #[derive(Debug, Clone)]
    pub struct BrowserWindow {
        window: web_sys::Window,
        document: web_sys::Document,
    }

    impl BrowserWindow {
        pub fn new() -> anyhow::Result<Self> {
            let window = web_sys::window().ok_or_else(|| anyhow!("no global `window` exists"))?;
            let document = window
                .document()
                .ok_or_else(|| anyhow!("the window has no `document`"))?;
            Ok(Self { window, document })
        }

        fn listen(&self, event: &str, closure: &Closure<dyn FnMut()>) {
            if let Err(e) = self
                .window
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::error!("Could not register `{}` listener: {:?}", event, e);
            }
        }
    }

    impl WindowRef for BrowserWindow {
        fn ready_state(&self) -> ReadyState {
            ReadyState::parse(&self.document.ready_state())
        }

        fn on_content_loaded(&self, callback: Box<dyn FnOnce()>) {
            let mut callback = Some(callback);
            let closure = Closure::<dyn FnMut()>::new(move || {
                if let Some(callback) = callback.take() {
                    callback();
                }
            });
            self.listen("DOMContentLoaded", &closure);
            // The listener lives as long as the page.
            closure.forget();
        }

        fn on_resize(&self, mut callback: Box<dyn FnMut()>) {
            let closure = Closure::<dyn FnMut()>::new(move || callback());
            self.listen("resize", &closure);
            closure.forget();
        }
    }
}
