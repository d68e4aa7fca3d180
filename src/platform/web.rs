//! Browser scheduling and layout measurement

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use super::{FrameHandle, Scheduler, TimerHandle};

/// `requestAnimationFrame`/`setTimeout` scheduler that reports fired
/// handles back through the given callbacks
pub struct WebScheduler {
    window: Window,
    on_frame: Rc<dyn Fn(FrameHandle)>,
    on_timeout: Rc<dyn Fn(TimerHandle)>,
}

impl WebScheduler {
    pub fn new(
        window: Window,
        on_frame: impl Fn(FrameHandle) + 'static,
        on_timeout: impl Fn(TimerHandle) + 'static,
    ) -> Self {
        Self {
            window,
            on_frame: Rc::new(on_frame),
            on_timeout: Rc::new(on_timeout),
        }
    }
}

impl Scheduler for WebScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        // The browser id is only known after scheduling, so the closure
        // reads it from a shared cell
        let id = Rc::new(Cell::new(0));
        let slot = Rc::clone(&id);
        let on_frame = Rc::clone(&self.on_frame);
        // Freed by the JS side once it has run
        let callback = Closure::once_into_js(move |_time: f64| {
            on_frame(FrameHandle(slot.get()));
        });
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(raw) => id.set(raw),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        FrameHandle(id.get())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }

    fn set_timeout(&mut self, delay_ms: f64) -> TimerHandle {
        let id = Rc::new(Cell::new(0));
        let slot = Rc::clone(&id);
        let on_timeout = Rc::clone(&self.on_timeout);
        match set_timeout_once(&self.window, delay_ms, move || {
            on_timeout(TimerHandle(slot.get()));
        }) {
            Ok(raw) => id.set(raw),
            Err(e) => log::warn!("setTimeout failed: {:?}", e),
        }
        TimerHandle(id.get())
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.0);
    }
}

/// Run `f` once after `delay_ms`, returning the browser timer id
pub fn set_timeout_once(
    window: &Window,
    delay_ms: f64,
    f: impl FnOnce() + 'static,
) -> Result<i32, JsValue> {
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms.max(0.0) as i32,
    )
}

/// A promise that resolves after `delay_ms`
pub fn sleep(window: &Window, delay_ms: f64) -> js_sys::Promise {
    let window = window.clone();
    js_sys::Promise::new(&mut |resolve, _reject| {
        let result = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            &resolve,
            delay_ms.max(0.0) as i32,
        );
        if let Err(e) = result {
            log::warn!("setTimeout failed, resolving immediately: {:?}", e);
            let _ = resolve.call0(&JsValue::NULL);
        }
    })
}

/// Current viewport size in CSS pixels
pub fn viewport(window: &Window) -> Vec2 {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Vec2::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Rendered height of one reel symbol.
///
/// Reads the first symbol of `strip`; if the strip is empty, measures a
/// hidden probe element carrying the symbol class instead. Returns 0 when
/// nothing can be measured (callers fall back to the default height).
pub fn measure_symbol_height(document: &Document, strip: Option<&HtmlElement>) -> f32 {
    if let Some(first) = strip
        .and_then(|s| s.first_element_child())
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        return first.offset_height() as f32;
    }

    let Some(body) = document.body() else {
        return 0.0;
    };
    let Some(probe) = document
        .create_element("div")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return 0.0;
    };
    probe.set_class_name("symbol");
    let _ = probe.style().set_property("visibility", "hidden");
    if body.append_child(&probe).is_err() {
        return 0.0;
    }
    let height = probe.offset_height() as f32;
    let _ = body.remove_child(&probe);
    height
}
