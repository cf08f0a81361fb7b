//! Ball Drop entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, MouseEvent, PageTransitionEvent};

    use ball_drop::renderer::{Canvas2d, RenderState, VertexBatch};
    use ball_drop::settings::{Settings, background_style, count_label};
    use ball_drop::sim::{Bounds, ClickOutcome, FrameClock, LoopState, PhysicsConfig, World};

    thread_local! {
        /// The running app, reachable from the JS exports
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// How the ball field reaches the screen
    enum Backend {
        Gpu {
            state: RenderState,
            batch: VertexBatch,
        },
        Canvas(Canvas2d),
        /// Context acquisition failed; physics still runs
        Headless,
    }

    /// App instance holding all state
    struct App {
        world: World,
        settings: Settings,
        backend: Backend,
        clock: FrameClock,
        canvas: HtmlCanvasElement,
        /// Canvas size in CSS pixels
        logical_size: (f32, f32),
        dpr: f64,
        /// Title prompt stays up until the first ball is spawned
        show_title: bool,
        /// The loop reschedules itself only while running
        loop_state: LoopState,
        /// Pending requestAnimationFrame id
        frame_handle: Option<i32>,
        /// Last count written to the HUD
        shown_count: Option<usize>,
    }

    impl App {
        /// Size the canvas backing store to the window
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let w = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(800.0);
            let h = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(600.0);
            self.dpr = window.device_pixel_ratio();
            self.logical_size = (w as f32, h as f32);

            let width = (w * self.dpr) as u32;
            let height = (h * self.dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            if let Backend::Gpu { state, .. } = &mut self.backend {
                state.resize(width, height, self.logical_size);
            }
            log::info!("Canvas {}x{} (dpr {})", w, h, self.dpr);
        }

        /// One animation frame: physics, draw, HUD
        fn frame(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            let (w, h) = self.logical_size;
            self.world.set_bounds(Bounds::new(w, h));
            self.world.step(dt);
            self.render();
            self.update_hud();
        }

        fn render(&mut self) {
            match &mut self.backend {
                Backend::Gpu { state, batch } => {
                    batch.clear();
                    self.world.draw_all(batch);
                    match state.render(batch.vertices()) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => state.reconfigure(),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Out of memory!");
                        }
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
                Backend::Canvas(canvas) => {
                    canvas.begin_frame(self.logical_size, self.dpr);
                    self.world.draw_all(canvas);
                }
                Backend::Headless => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let count = self.world.count();
            if self.shown_count == Some(count) {
                return;
            }
            self.shown_count = Some(count);

            let Some(document) = document() else {
                return;
            };
            if let Some(el) = document.get_element_by_id("counter") {
                el.set_text_content(Some(&count_label(count)));
            }
            if let Some(el) = document.get_element_by_id("title") {
                let class = if self.show_title { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }

        fn click(&mut self, x: f32, y: f32) {
            let radius = self.settings.ball_radius;
            let color = self.settings.color();
            match self.world.spawn_or_remove(x, y, radius, color) {
                ClickOutcome::Created { .. } => self.show_title = false,
                ClickOutcome::Removed { .. } => {}
                ClickOutcome::Ignored => log::warn!("Ignored click at ({}, {})", x, y),
            }
            // Force a HUD refresh even if the count round-trips within a frame
            self.shown_count = None;
        }

        fn set_gravity(&mut self, gravity: f32) {
            self.settings.gravity = gravity;
            self.settings.sanitize();
            self.world.set_gravity(self.settings.gravity);
            set_text("gravityValue", &self.settings.gravity_label());
            self.settings.save();
        }

        fn set_radius(&mut self, radius: f32) {
            self.settings.ball_radius = radius;
            self.settings.sanitize();
            set_text("sizeValue", &self.settings.radius_label());
            self.settings.save();
        }

        fn set_color(&mut self, color: String) {
            self.settings.ball_color = color;
            self.settings.sanitize();
            self.settings.save();
        }

        fn set_background(&mut self, url: &str) {
            apply_background(Some(url));
            let url = url.trim();
            self.settings.background_url = (!url.is_empty()).then(|| url.to_string());
            self.settings.save();
        }

        fn toggle_controls(&mut self) {
            self.settings.controls_visible = !self.settings.controls_visible;
            apply_controls_visibility(self.settings.controls_visible);
            self.settings.save();
        }

        fn cancel_pending_frame(&mut self) {
            if let (Some(handle), Some(window)) = (self.frame_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
        }

        /// Page is going into the back/forward cache
        fn pause(&mut self) {
            if self.loop_state.is_running() {
                self.loop_state.pause();
                self.cancel_pending_frame();
                log::info!("Simulation paused ({} balls)", self.world.count());
            }
        }

        /// Stop rescheduling frames for good and release the pending one
        fn stop(&mut self) {
            if self.loop_state == LoopState::Stopped {
                return;
            }
            self.loop_state.stop();
            self.cancel_pending_frame();
            log::info!("Simulation stopped ({} balls)", self.world.count());
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn apply_background(url: Option<&str>) {
        let Some(body) = document().and_then(|d| d.body()) else {
            return;
        };
        let style = body.style();
        for (property, value) in background_style(url) {
            if style.set_property(property, &value).is_err() {
                log::warn!("Failed to set body {}", property);
            }
        }
    }

    fn apply_controls_visibility(visible: bool) {
        let Some(controls) = document().and_then(|d| d.get_element_by_id("controls")) else {
            return;
        };
        if let Ok(controls) = controls.dyn_into::<web_sys::HtmlElement>() {
            let display = if visible { "block" } else { "none" };
            let _ = controls.style().set_property("display", display);
        }
    }

    /// Push stored settings into the control panel widgets
    fn sync_controls(document: &Document, settings: &Settings) {
        if let Some(el) = input(document, "gravitySlider") {
            el.set_value(&settings.gravity.to_string());
        }
        if let Some(el) = input(document, "sizeSlider") {
            el.set_value(&settings.radius_label());
        }
        if let Some(el) = input(document, "colorPicker") {
            el.set_value(&settings.ball_color);
        }
        if let Some(el) = input(document, "photoUrl") {
            el.set_value(settings.background_url.as_deref().unwrap_or(""));
        }
        set_text("gravityValue", &settings.gravity_label());
        set_text("sizeValue", &settings.radius_label());
        apply_controls_visibility(settings.controls_visible);
        apply_background(settings.background_url.as_deref());
    }

    /// `navigator.gpu` exists
    fn has_webgpu() -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let key = JsValue::from_str("gpu");
        js_sys::Reflect::get(&window.navigator(), &key)
            .map(|v| !v.is_undefined())
            .unwrap_or(false)
    }

    async fn create_backend(canvas: &HtmlCanvasElement, size: (u32, u32), logical: (f32, f32)) -> Backend {
        if !has_webgpu() {
            log::warn!("WebGPU unavailable, falling back to Canvas 2D");
            return match Canvas2d::new(canvas) {
                Some(canvas) => Backend::Canvas(canvas),
                None => {
                    log::error!("No 2D context either, rendering disabled");
                    Backend::Headless
                }
            };
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return Backend::Headless;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                // The canvas is already bound to a webgpu context, so no 2D fallback here
                log::error!("Failed to get adapter: {}", e);
                return Backend::Headless;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let state = RenderState::new(surface, &adapter, size.0, size.1, logical).await;
        Backend::Gpu {
            state,
            batch: VertexBatch::new(),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ball Drop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        sync_controls(&document, &settings);

        let seed = js_sys::Date::now() as u64;
        let config = PhysicsConfig {
            gravity: settings.gravity,
            ..Default::default()
        };

        let app = Rc::new(RefCell::new(App {
            world: World::with_config(seed, Bounds::new(800.0, 600.0), config),
            settings,
            backend: Backend::Headless,
            clock: FrameClock::default(),
            canvas: canvas.clone(),
            logical_size: (800.0, 600.0),
            dpr: 1.0,
            show_title: true,
            loop_state: LoopState::Running,
            frame_handle: None,
            shown_count: None,
        }));
        app.borrow_mut().fit_canvas();
        log::info!("World initialized with seed: {}", seed);

        let (size, logical) = {
            let a = app.borrow();
            ((a.canvas.width(), a.canvas.height()), a.logical_size)
        };
        let backend = create_backend(&canvas, size, logical).await;
        app.borrow_mut().backend = backend;

        setup_canvas_handlers(&canvas, app.clone());
        setup_controls(&document, app.clone());
        setup_lifecycle(app.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));
        install_window_hooks(&window);

        request_animation_frame(app);

        log::info!("Ball Drop running!");
    }

    fn setup_canvas_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f32 - rect.left() as f32;
            let y = event.client_y() as f32 - rect.top() as f32;
            app.borrow_mut().click(x, y);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Wire an `input` listener on a form control
    fn on_input(document: &Document, id: &str, mut handler: impl FnMut(String) + 'static) {
        let Some(el) = input(document, id) else {
            log::warn!("Missing control #{}", id);
            return;
        };
        let el_clone = el.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            handler(el_clone.value());
        });
        let _ = el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Wire a `click` listener on a button
    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            handler();
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(document: &Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_input(document, "gravitySlider", move |value| match value.parse::<f32>() {
                Ok(gravity) => app.borrow_mut().set_gravity(gravity),
                Err(_) => log::warn!("Bad gravity value {:?}", value),
            });
        }
        {
            let app = app.clone();
            on_input(document, "sizeSlider", move |value| match value.parse::<f32>() {
                Ok(radius) => app.borrow_mut().set_radius(radius),
                Err(_) => log::warn!("Bad size value {:?}", value),
            });
        }
        {
            let app = app.clone();
            on_input(document, "colorPicker", move |value| {
                app.borrow_mut().set_color(value);
            });
        }
        {
            let app = app.clone();
            on_click(document, "clearButton", move || {
                let mut a = app.borrow_mut();
                a.world.clear();
                a.shown_count = None;
            });
        }
        {
            let app = app.clone();
            on_click(document, "toggleControlsButton", move || {
                app.borrow_mut().toggle_controls();
            });
        }
        {
            let url_input = input(document, "photoUrl");
            on_click(document, "photoButton", move || {
                let url = url_input.as_ref().map(|el| el.value()).unwrap_or_default();
                app.borrow_mut().set_background(&url);
            });
        }
    }

    fn setup_lifecycle(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Window resize
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().fit_canvas();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Coming back from a hidden tab: measure from the next frame, not the last one
        if let Some(document) = window.document() {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if !document_clone.hidden() {
                    app.borrow_mut().clock.reset();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Page teardown; a page kept in the back/forward cache only pauses
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                let mut a = app.borrow_mut();
                if event.persisted() {
                    a.pause();
                } else {
                    a.stop();
                }
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restored from the back/forward cache
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if !event.persisted() {
                    return;
                }
                let resumed = {
                    let mut a = app.borrow_mut();
                    let resumed = a.loop_state.resume();
                    if resumed {
                        a.clock.reset();
                        log::info!("Simulation resumed ({} balls)", a.world.count());
                    }
                    resumed
                };
                if resumed {
                    request_animation_frame(app.clone());
                }
            });
            let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Expose the JS entry points as `window.setPhoto` / `window.stopSimulation`
    fn install_window_hooks(window: &web_sys::Window) {
        let set_photo_hook = Closure::<dyn Fn(String)>::new(|url: String| set_photo(&url));
        if js_sys::Reflect::set(window, &JsValue::from_str("setPhoto"), set_photo_hook.as_ref()).is_err() {
            log::warn!("Failed to install window.setPhoto");
        }
        set_photo_hook.forget();

        let stop_hook = Closure::<dyn Fn()>::new(stop_simulation);
        if js_sys::Reflect::set(window, &JsValue::from_str("stopSimulation"), stop_hook.as_ref()).is_err() {
            log::warn!("Failed to install window.stopSimulation");
        }
        stop_hook.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let app_clone = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app_clone, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => app.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame_handle = None;
            if !a.loop_state.is_running() {
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }

    /// Set (or with an empty string, remove) the page background image
    #[wasm_bindgen(js_name = setPhoto)]
    pub fn set_photo(url: &str) {
        let app = APP.with(|slot| slot.borrow().clone());
        match app {
            Some(app) => app.borrow_mut().set_background(url),
            None => apply_background(Some(url)),
        }
    }

    /// Stop the animation loop and release its frame registration
    #[wasm_bindgen(js_name = stopSimulation)]
    pub fn stop_simulation() {
        if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
            app.borrow_mut().stop();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Drop (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    println!("\nRunning headless drop...");
    headless_drop();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drop a row of balls for ten simulated seconds and report where they ended up
#[cfg(not(target_arch = "wasm32"))]
fn headless_drop() {
    use ball_drop::Rgba;
    use ball_drop::sim::{Bounds, World};

    let mut world = World::new(42, Bounds::new(800.0, 600.0));
    match serde_json::to_string(&world.config) {
        Ok(json) => log::info!("Physics config: {}", json),
        Err(e) => log::warn!("Config not serializable: {}", e),
    }
    let palette = ["#ff4136", "#2ecc40", "#0074d9", "#ffdc00", "#b10dc9"];
    for i in 0..12 {
        let color = Rgba::from_hex(palette[i % palette.len()]).unwrap_or_default();
        let x = 40.0 + 60.0 * i as f32;
        world.spawn_or_remove(x, 50.0 + 15.0 * (i % 3) as f32, 15.0 + 3.0 * (i % 4) as f32, color);
    }

    let dt = 1.0 / 60.0;
    let mut contacts = 0;
    for _ in 0..600 {
        contacts += world.step(dt);
    }

    let resting = world.balls().iter().filter(|b| b.at_rest).count();
    let escaped = world
        .balls()
        .iter()
        .filter(|b| b.pos.y + b.radius > 600.0 + 1e-3)
        .count();
    log::info!("{} contacts resolved over 600 frames", contacts);
    println!("{} balls, {} at rest, {} below the floor", world.count(), resting, escaped);

    match serde_json::to_string_pretty(&world.balls()[0]) {
        Ok(json) => println!("First ball:\n{}", json),
        Err(e) => log::error!("Snapshot failed: {}", e),
    }
    println!("✓ Headless drop finished");
}
