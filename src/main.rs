//! Lucky Reels entry point
//!
//! Mounts the machine onto the page on the web; runs a headless spin and
//! confetti burst natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement, Window};

    use lucky_reels::Settings;
    use lucky_reels::consts::*;
    use lucky_reels::platform::web::{self, WebScheduler};
    use lucky_reels::renderer::Canvas2dSurface;
    use lucky_reels::sim::{Feedback, Outcome, ParticleEngine, Reel, ReelMotion, REEL_EASE, SlotMachine};

    /// Page elements the game drives
    struct Dom {
        document: Document,
        housing: Element,
        strips: Vec<HtmlElement>,
        button: HtmlButtonElement,
        result: Element,
        /// Symbol height the strip transforms were last computed with
        placed_height: f32,
    }

    impl Dom {
        fn find(document: Document) -> Result<Self, JsValue> {
            let by_id = |id: &str| {
                document
                    .get_element_by_id(id)
                    .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
            };
            let strips = (1..=REEL_COUNT)
                .map(|i| by_id(&format!("reel-{i}"))?.dyn_into::<HtmlElement>().map_err(JsValue::from))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Self {
                housing: by_id("slot-machine")?,
                button: by_id("spin-button")?.dyn_into::<HtmlButtonElement>()?,
                result: by_id("result-display")?,
                strips,
                document,
                placed_height: 0.0,
            })
        }

        /// Replace a strip's symbol elements. Their height comes from the
        /// `.symbol` stylesheet rule so it can be re-measured on resize.
        fn render_strip(&self, strip_el: &HtmlElement, reel: &Reel) -> Result<(), JsValue> {
            strip_el.set_inner_html("");
            for sym in reel.strip().symbols() {
                let div = self.document.create_element("div")?;
                div.set_class_name(if sym.is_jackpot() { "symbol symbol-seven" } else { "symbol" });
                div.set_text_content(Some(sym.glyph()));
                strip_el.append_child(&div)?;
            }
            Ok(())
        }

        /// Jump a strip to an offset with no transition
        fn place(strip_el: &HtmlElement, offset_px: f32) -> Result<(), JsValue> {
            let style = strip_el.style();
            style.set_property("transition", "none")?;
            style.set_property("transform", &format!("translateY({offset_px}px)"))
        }

        /// Jump to the pre-roll position, then let CSS ease to the target
        fn animate(strip_el: &HtmlElement, motion: &ReelMotion) -> Result<(), JsValue> {
            Self::place(strip_el, motion.start_offset_px)?;
            // Force a reflow so the jump isn't merged into the transition
            let _ = strip_el.offset_height();
            let style = strip_el.style();
            style.set_property(
                "transition",
                &format!("transform {}s {}", motion.duration_ms / 1000.0, REEL_EASE.css()),
            )?;
            style.set_property(
                "transform",
                &format!("translateY({}px)", motion.target_offset_px),
            )
        }

        fn render_machine(&mut self, machine: &SlotMachine) -> Result<(), JsValue> {
            for (strip_el, reel) in self.strips.iter().zip(machine.reels()) {
                self.render_strip(strip_el, reel)?;
            }
            self.place_machine(machine)
        }

        /// Move every strip to its settled offset, keeping the symbol
        /// elements (and any highlight classes) in place
        fn place_machine(&mut self, machine: &SlotMachine) -> Result<(), JsValue> {
            for (strip_el, reel) in self.strips.iter().zip(machine.reels()) {
                Self::place(strip_el, reel.current_offset_px())?;
            }
            self.placed_height = machine_symbol_height(machine);
            Ok(())
        }

        fn show_feedback(&self, machine: &SlotMachine, feedback: &Feedback, shake: bool) {
            self.result.set_text_content(Some(&feedback.text));
            let class = match feedback.style.css_class() {
                Some(extra) => format!("result-display {extra}"),
                None => "result-display".to_string(),
            };
            self.result.set_class_name(&class);

            let housing_class = if feedback.housing_alert && shake {
                "slot-machine shake jackpot-glow"
            } else {
                "slot-machine"
            };
            self.housing.set_class_name(housing_class);

            for ((strip_el, reel), lit) in self.strips.iter().zip(machine.reels()).zip(feedback.highlights) {
                if !lit {
                    continue;
                }
                let center = strip_el.children().item(reel.center_index() as u32);
                if let Some(el) = center {
                    let _ = el.class_list().add_1("winning-symbol");
                }
            }
        }
    }

    struct App {
        window: Window,
        dom: Dom,
        machine: SlotMachine,
        confetti: ParticleEngine<WebScheduler, Canvas2dSurface>,
        settings: Settings,
    }

    impl App {
        fn measure_symbol_height(&self) -> f32 {
            web::measure_symbol_height(&self.dom.document, self.dom.strips.first())
        }

        fn on_resize(&mut self) {
            self.confetti.resize(web::viewport(&self.window));
            let measured = self.measure_symbol_height();
            self.machine.set_symbol_height(measured);
            if !self.machine.is_spinning() {
                if let Err(e) = self.dom.place_machine(&self.machine) {
                    log::warn!("Relayout failed: {:?}", e);
                }
            }
        }

        /// Catch up with a resize that landed mid-spin
        fn sync_layout(&mut self) {
            if machine_symbol_height(&self.machine) == self.dom.placed_height {
                return;
            }
            if let Err(e) = self.dom.place_machine(&self.machine) {
                log::warn!("Relayout failed: {:?}", e);
            }
        }

        /// Apply a finished spin to the page
        fn show_outcome(&mut self, outcome: &Outcome, app: &Weak<RefCell<App>>) {
            self.sync_layout();
            let feedback = outcome.feedback();
            let shake = self.settings.effective_machine_shake();
            self.dom.show_feedback(&self.machine, &feedback, shake);
            self.dom.button.set_disabled(false);

            if let Some(tier) = feedback.burst {
                if self.settings.confetti {
                    self.confetti.trigger(tier, web::viewport(&self.window));
                }
            }

            if feedback.housing_alert && shake {
                let app = app.clone();
                let cleared = web::set_timeout_once(&self.window, HOUSING_SHAKE_MS, move || {
                    if let Some(app) = app.upgrade() {
                        app.borrow().dom.housing.set_class_name("slot-machine");
                    }
                });
                if let Err(e) = cleared {
                    log::warn!("Could not schedule shake reset: {:?}", e);
                }
            }
        }
    }

    fn machine_symbol_height(machine: &SlotMachine) -> f32 {
        machine.reels()[0].symbol_height()
    }

    fn on_spin(app: Rc<RefCell<App>>) {
        let waits = {
            let mut a = app.borrow_mut();
            let now = js_sys::Date::now();
            let Some(plan) = a.machine.begin_spin(now) else {
                return;
            };

            a.dom.button.set_disabled(true);
            a.dom.show_feedback(&a.machine, &Feedback::spinning(), false);

            let waits = js_sys::Array::new();
            for (i, motion) in plan.motions.iter().enumerate() {
                let strip_el = &a.dom.strips[i];
                let reel = &a.machine.reels()[i];
                if let Err(e) = a.dom.render_strip(strip_el, reel).and_then(|_| Dom::animate(strip_el, motion)) {
                    log::warn!("Reel {} animation failed: {:?}", i + 1, e);
                }
                waits.push(&web::sleep(&a.window, motion.duration_ms));
            }
            let height = machine_symbol_height(&a.machine);
            a.dom.placed_height = height;
            waits
        };

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(js_sys::Promise::all(&waits)).await {
                log::warn!("Reel timers failed: {:?}", e);
            }
            let weak = Rc::downgrade(&app);
            let mut a = app.borrow_mut();
            if let Some(outcome) = a.machine.finish_spin() {
                a.show_outcome(&outcome, &weak);
            }
        });
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Lucky Reels starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let settings = Settings::load();
        settings.save();
        let seed = settings.session_seed(js_sys::Date::now() as u64);
        log::info!("Session seed: {}", seed);

        let mut dom = Dom::find(document.clone())?;
        let symbol_height = web::measure_symbol_height(&document, None);
        let machine = SlotMachine::new(seed, symbol_height);
        dom.render_machine(&machine)?;
        dom.result.set_text_content(Some(&Feedback::idle().text));

        let canvas = document
            .get_element_by_id("confetti-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

        let app = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
            let on_frame = weak.clone();
            let on_timeout = weak.clone();
            let scheduler = WebScheduler::new(
                window.clone(),
                move |handle| {
                    if let Some(app) = on_frame.upgrade() {
                        app.borrow_mut().confetti.on_frame(handle);
                    }
                },
                move |handle| {
                    if let Some(app) = on_timeout.upgrade() {
                        app.borrow_mut().confetti.on_respawn_cutoff(handle);
                    }
                },
            );
            let mut confetti = ParticleEngine::new(scheduler, seed.wrapping_add(1));
            match canvas.map(Canvas2dSurface::new) {
                Some(Ok(surface)) => confetti.attach_surface(surface),
                Some(Err(e)) => log::warn!("Confetti disabled: {:?}", e),
                None => log::warn!("No #confetti-canvas, confetti disabled"),
            }

            RefCell::new(App {
                window: window.clone(),
                dom,
                machine,
                confetti,
                settings,
            })
        });

        // Pick up the real symbol height now that strips are rendered
        app.borrow_mut().on_resize();

        setup_spin_button(Rc::clone(&app));
        setup_resize(Rc::clone(&app), &window);
        setup_unload(app, &window);

        log::info!("Lucky Reels running!");
        Ok(())
    }

    fn setup_spin_button(app: Rc<RefCell<App>>) {
        let button = app.borrow().dom.button.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            on_spin(Rc::clone(&app));
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: Rc<RefCell<App>>, window: &Window) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().on_resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the confetti loop when the page goes away
    fn setup_unload(app: Rc<RefCell<App>>, window: &Window) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().confetti.stop();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Lucky Reels failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lucky Reels (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let settings = lucky_reels::Settings::load();
    let seed = settings.session_seed(rand::random());
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use lucky_reels::consts::*;
    use lucky_reels::platform::ManualScheduler;
    use lucky_reels::renderer::RecordingSurface;
    use lucky_reels::sim::{ParticleEngine, SlotMachine};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    /// One spin at 60 fps, then the confetti burst it earned
    pub fn run(seed: u64) {
        log::info!("Seed: {}", seed);
        let mut machine = SlotMachine::new(seed, DEFAULT_SYMBOL_HEIGHT);

        let mut now = 0.0;
        let Some(plan) = machine.begin_spin(now) else {
            return;
        };
        while !machine.advance(now) {
            now += FRAME_MS;
        }
        log::info!(
            "Reels stopped after {:.0} ms (planned {:.0} ms)",
            now,
            plan.total_duration_ms()
        );

        let Some(outcome) = machine.finish_spin() else {
            return;
        };
        match serde_json::to_string(&outcome) {
            Ok(json) => log::info!("Outcome: {}", json),
            Err(e) => log::warn!("Could not encode outcome: {}", e),
        }
        let feedback = outcome.feedback();
        println!("{}", feedback.text);

        let Some(tier) = feedback.burst else {
            return;
        };
        let mut confetti = ParticleEngine::new(ManualScheduler::new(), seed.wrapping_add(1));
        confetti.attach_surface(RecordingSurface::new());
        confetti.trigger(tier, VIEWPORT);

        let started_ms = confetti.scheduler().now_ms();
        let mut frames = 0u32;
        loop {
            confetti.scheduler_mut().advance(FRAME_MS);
            while let Some(timer) = confetti.scheduler_mut().take_due_timer() {
                confetti.on_respawn_cutoff(timer);
            }
            let Some(frame) = confetti.scheduler_mut().take_frame() else {
                break;
            };
            confetti.on_frame(frame);
            frames += 1;
        }

        let draws = confetti.surface().map(|s| s.total_draws()).unwrap_or(0);
        log::info!(
            "Confetti ran {} frames ({:.1} s), {} particle draws",
            frames,
            (confetti.scheduler().now_ms() - started_ms) / 1000.0,
            draws
        );
    }
}
