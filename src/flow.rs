//! Application event loop.
//!
//! The [`App`] is the winit side of the scene: it creates the window (or binds
//! the page's canvas on the web), runs the host's one-time setup and then
//! drives the render loop from winit's redraw cycle. Nothing else runs per
//! frame.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and initializes the [`SceneHost`]
//!    (blocking on native, via `spawn_local` and an event-loop message on wasm)
//! 2. window events feed the camera controls and resize the surface
//! 3. every `RedrawRequested` ticks the host and requests the next redraw

use std::{fmt::Debug, sync::Arc};

#[cfg(target_arch = "wasm32")]
use anyhow::anyhow;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowAttributes},
};

use crate::{config::SceneConfig, context::Context, host::SceneHost, manager::SceneManager};

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformWindow = crate::window_ref::NativeWindow;
#[cfg(target_arch = "wasm32")]
pub type PlatformWindow = crate::window_ref::BrowserWindow;

/// The shelf scene rendered with wgpu on the current platform.
pub type ShelfHost = SceneHost<Context, PlatformWindow>;

pub(crate) enum FlowEvent {
    Initialized(Box<ShelfHost>),
    Exit,
}

impl FlowEvent {
    /// Turn the outcome of the host's setup into the message for the loop.
    fn from_init(result: anyhow::Result<ShelfHost>) -> Self {
        match result {
            Ok(host) => Self::Initialized(Box::new(host)),
            Err(e) => {
                log::error!("Scene initialization failed: {:#}", e);
                Self::Exit
            }
        }
    }
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized(SceneHost)"),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(not(target_arch = "wasm32"))]
    native_window: crate::window_ref::NativeWindow,
    #[allow(dead_code)]
    proxy: EventLoopProxy<FlowEvent>,
    config: SceneConfig,
    window: Option<Arc<Window>>,
    host: Option<ShelfHost>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            #[cfg(not(target_arch = "wasm32"))]
            native_window: crate::window_ref::NativeWindow::new(),
            proxy,
            config,
            window: None,
            host: None,
            last_time: Instant::now(),
        })
    }

    fn window_attributes(&self) -> anyhow::Result<WindowAttributes> {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Shelf");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas_id = &self.config.canvas_id;
            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(canvas_id))
                .ok_or_else(|| anyhow!("Canvas element `{}` not found", canvas_id))?
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .map_err(|_| anyhow!("Element `{}` is not a canvas", canvas_id))?;
            window_attributes = window_attributes.with_canvas(Some(canvas));
        }

        Ok(window_attributes)
    }

    fn platform_window(&self) -> anyhow::Result<PlatformWindow> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(self.native_window.clone())
        }
        #[cfg(target_arch = "wasm32")]
        {
            crate::window_ref::BrowserWindow::new()
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = Arc::new(event_loop.create_window(self.window_attributes()?)?);
        self.window = Some(window.clone());

        let manager = SceneManager::new(self.platform_window()?, self.config.clone());
        let mut host = SceneHost::new(manager);
        let init = async move { host.init(window).await.map(|_| host) };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let event = FlowEvent::from_init(self.async_runtime.block_on(init));
            self.user_event(event_loop, event);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = FlowEvent::from_init(init.await);
                if let Err(closed) = proxy.send_event(event) {
                    log::error!(
                        "The event loop closed before {:?} was delivered",
                        closed.0
                    );
                }
            });
        }
        Ok(())
    }

    fn install(&mut self, host: ShelfHost) {
        host.manager().request_resize();
        self.host = Some(host);
        self.last_time = Instant::now();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("App initialization failed: {:#}", e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(host) => self.install(*host),
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let host = match &mut self.host {
            Some(host) => host,
            None => return,
        };

        if let Some(ctx) = host.manager_mut().backend_mut() {
            ctx.camera.controller.handle_window_events(&event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_) => {
                #[cfg(not(target_arch = "wasm32"))]
                self.native_window.dispatch_resize();
                // The canvas can change size without the browser window resizing.
                #[cfg(target_arch = "wasm32")]
                host.manager().request_resize();
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                if let Err(e) = host.frame(dt) {
                    log::error!("{:#}", e);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Install the platform logger at the configured level. A logger that is
/// already installed natively is kept.
pub fn init_logging(config: &SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        use anyhow::Context as _;
        console_log::init_with_level(config.log_level).context("Could not initialize logger")?;
    }

    Ok(())
}

/// Open the scene and run it until the window closes.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    init_logging(&config)?;

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
