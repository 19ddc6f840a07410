use std::future::Future;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use js_sys::Promise;
use puzzle_core::ImageProbe;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

/// Probes candidates by loading them into a detached `<img>`.
pub struct WebProbe;

impl ImageProbe for WebProbe {
    fn load(&self, url: &str) -> impl Future<Output = bool> {
        let url = url.to_string();
        async move {
            let img = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(_) => return false,
            };
            let mut pending = PendingLoad {
                img: img.clone(),
                settled: false,
            };
            let promise = Promise::new(&mut |resolve, _reject| {
                let on_ok = resolve.clone();
                let onload = Closure::once(move || {
                    let _ = on_ok.call1(&JsValue::NULL, &JsValue::TRUE);
                });
                let onerror = Closure::once(move || {
                    let _ = resolve.call1(&JsValue::NULL, &JsValue::FALSE);
                });
                img.set_onload(Some(onload.as_ref().unchecked_ref()));
                img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
                onload.forget();
                onerror.forget();
            });
            img.set_src(&url);
            let loaded = matches!(
                wasm_bindgen_futures::JsFuture::from(promise).await,
                Ok(v) if v.as_bool() == Some(true)
            );
            pending.settled = true;
            loaded
        }
    }

    fn sleep(&self, dur: Duration) -> impl Future<Output = ()> {
        let ms = u32::try_from(dur.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(ms)
    }
}

/// Detaches the handlers when the probe future goes away. If the load never
/// settled (the timer won), the request is cut off by clearing `src`.
struct PendingLoad {
    img: HtmlImageElement,
    settled: bool,
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        self.img.set_onload(None);
        self.img.set_onerror(None);
        if !self.settled {
            self.img.set_src("");
        }
    }
}
