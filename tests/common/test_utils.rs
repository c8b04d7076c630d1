#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use anyhow::bail;
use instant::Duration;
use shelf_ngin::{
    ReadyState, SceneBackend, SceneConfig, WindowRef,
    scene::{FreeCamera, HemisphericLight, Mesh},
};

/// Everything the scene asked of the engine or the page, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Attach,
    Camera(FreeCamera),
    Light(HemisphericLight),
    Mesh(Mesh),
    ContentLoadedListener,
    ResizeListener,
    Render,
    Resize,
}

/// Shared call log. Doubles as the canvas handed to [`RecordingBackend`].
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    refuse_attach: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas the engine cannot attach to.
    pub fn refusing() -> Self {
        Self {
            refuse_attach: true,
            ..Self::default()
        }
    }

    pub fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    pub fn meshes(&self) -> Vec<Mesh> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Mesh(mesh) => Some(mesh.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

pub struct RecordingBackend {
    recorder: Recorder,
}

impl SceneBackend for RecordingBackend {
    type Canvas = Recorder;

    async fn attach(canvas: Recorder, _config: &SceneConfig) -> anyhow::Result<Self> {
        if canvas.refuse_attach {
            bail!("no graphics adapter");
        }
        canvas.record(Call::Attach);
        Ok(Self { recorder: canvas })
    }

    fn add_camera(&mut self, camera: &FreeCamera) {
        self.recorder.record(Call::Camera(camera.clone()));
    }

    fn add_light(&mut self, light: &HemisphericLight) {
        self.recorder.record(Call::Light(light.clone()));
    }

    fn add_mesh(&mut self, mesh: &Mesh) {
        self.recorder.record(Call::Mesh(mesh.clone()));
    }

    fn render(&mut self, _dt: Duration) -> anyhow::Result<()> {
        self.recorder.record(Call::Render);
        Ok(())
    }

    fn resize(&mut self) {
        self.recorder.record(Call::Resize);
    }
}

#[derive(Default)]
struct PageState {
    ready_state: Option<ReadyState>,
    content_loaded: Vec<Box<dyn FnOnce()>>,
    resize: Vec<Box<dyn FnMut()>>,
}

/// A page whose load and resize events are fired by the test.
#[derive(Clone)]
pub struct RecordingWindow {
    recorder: Recorder,
    page: Rc<RefCell<PageState>>,
}

impl RecordingWindow {
    pub fn new(recorder: &Recorder, ready_state: ReadyState) -> Self {
        Self {
            recorder: recorder.clone(),
            page: Rc::new(RefCell::new(PageState {
                ready_state: Some(ready_state),
                ..PageState::default()
            })),
        }
    }

    pub fn fire_content_loaded(&self) {
        let listeners: Vec<_> = {
            let mut page = self.page.borrow_mut();
            page.ready_state = Some(ReadyState::Interactive);
            page.content_loaded.drain(..).collect()
        };
        for listener in listeners {
            listener();
        }
    }

    pub fn fire_resize(&self) {
        for listener in self.page.borrow_mut().resize.iter_mut() {
            listener();
        }
    }

    pub fn resize_listeners(&self) -> usize {
        self.page.borrow().resize.len()
    }
}

impl WindowRef for RecordingWindow {
    fn ready_state(&self) -> ReadyState {
        self.page.borrow().ready_state.unwrap_or(ReadyState::Complete)
    }

    fn on_content_loaded(&self, callback: Box<dyn FnOnce()>) {
        self.recorder.record(Call::ContentLoadedListener);
        self.page.borrow_mut().content_loaded.push(callback);
    }

    fn on_resize(&self, callback: Box<dyn FnMut()>) {
        self.recorder.record(Call::ResizeListener);
        self.page.borrow_mut().resize.push(callback);
    }
}
