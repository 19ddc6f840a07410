use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlTemplateElement};

use crate::constants::{CLOSE_MODAL_ID, MODAL_TPL_ID, PRIZE_IMG_ID};
use crate::state::Msg;

/// Completion overlay attached to the body.
///
/// Owns the close button's click handler; dropping the overlay detaches
/// the handler and removes the markup, so nothing outlives the round.
pub struct Overlay {
    backdrop: Element,
    close_btn: Option<HtmlElement>,
    _onclick: Option<Closure<dyn FnMut()>>,
}

impl Overlay {
    pub fn element(&self) -> &Element {
        &self.backdrop
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        if let Some(btn) = &self.close_btn {
            btn.set_onclick(None);
        }
        self.backdrop.remove();
    }
}

/// Attach the completion overlay to the body.
///
/// Uses `<template id="modalTpl">` when the page provides one, otherwise a
/// plain backdrop with the prize image and one button.
pub fn show(document: &Document, prize_url: &str) -> Result<Overlay, JsValue> {
    let backdrop = match from_template(document)? {
        Some(el) => el,
        None => build_default(document)?,
    };
    if let Some(img) = backdrop.query_selector(&format!("#{PRIZE_IMG_ID}"))?
        && let Ok(img) = img.dyn_into::<HtmlImageElement>()
    {
        img.set_src(prize_url);
    }
    document
        .body()
        .ok_or("no body")?
        .append_child(&backdrop)?;

    let mut overlay = Overlay {
        backdrop,
        close_btn: None,
        _onclick: None,
    };
    if let Some(btn) = overlay
        .backdrop
        .query_selector(&format!("#{CLOSE_MODAL_ID}"))?
    {
        let btn: HtmlElement = btn.dyn_into()?;
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            crate::dispatch(Msg::CloseReveal);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        overlay.close_btn = Some(btn);
        overlay._onclick = Some(onclick);
    }
    Ok(overlay)
}

fn from_template(document: &Document) -> Result<Option<Element>, JsValue> {
    let Some(tpl) = document.get_element_by_id(MODAL_TPL_ID) else {
        return Ok(None);
    };
    let Ok(tpl) = tpl.dyn_into::<HtmlTemplateElement>() else {
        return Ok(None);
    };
    let content = tpl.content().clone_node_with_deep(true)?;
    let fragment: web_sys::DocumentFragment = content.dyn_into()?;
    fragment.query_selector(".modal-backdrop")
}

fn build_default(document: &Document) -> Result<Element, JsValue> {
    let backdrop = document.create_element("div")?;
    backdrop.set_class_name("modal-backdrop");
    backdrop.set_inner_html(&format!(
        "<div class=\"modal\">\
           <h2>Well done!</h2>\
           <img id=\"{PRIZE_IMG_ID}\" alt=\"prize\">\
           <button id=\"{CLOSE_MODAL_ID}\">Play again</button>\
         </div>"
    ));
    Ok(backdrop)
}
