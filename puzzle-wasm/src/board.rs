use log::{debug, warn};
use puzzle_core::{ProbeStatus, SwapRequest};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DragEvent, Element, Event, HtmlElement};

use crate::constants::DEBUG_ID;
use crate::state::{Msg, State};

const DRAG_MIME: &str = "text/plain";

/// Rebuild the grid from the current arrangement.
///
/// Each child carries `data-index` (source tile) and `data-pos` (board
/// position); tiles already in place get the `correct` class.
pub fn render(state: &State) -> Result<(), JsValue> {
    let Some(session) = &state.session else {
        return Ok(());
    };
    let arrangement = session.arrangement();
    let board = &state.board;
    board.set_inner_html("");
    board
        .style()
        .set_property("--cols", &arrangement.side().to_string())?;
    let background = format!("url(\"{}\")", state.image_url);
    for (pos, tile) in arrangement.tiles().iter().enumerate() {
        let el = state
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()?;
        el.set_class_name("tile");
        el.set_draggable(true);
        let data = el.dataset();
        data.set("index", &tile.to_string())?;
        data.set("pos", &pos.to_string())?;
        let style = el.style();
        style.set_property("background-image", &background)?;
        if let Some(crop) = arrangement.crop(pos) {
            style.set_property("background-position", &crop.to_css())?;
        }
        el.class_list()
            .toggle_with_force("correct", arrangement.is_correct(pos))?;
        board.append_child(&el)?;
    }
    Ok(())
}

fn tile_of(e: &Event) -> Option<HtmlElement> {
    let target: Element = e.target()?.dyn_into().ok()?;
    target.closest(".tile").ok()??.dyn_into().ok()
}

fn tile_pos(tile: &HtmlElement) -> Option<usize> {
    tile.dataset().get("pos")?.parse().ok()
}

/// Wire drag and drop once on the board container. Tiles are recreated on
/// every render, so the handlers look the tile up from the event target.
pub fn attach_drag_handlers(board: &HtmlElement) -> Result<(), JsValue> {
    {
        let dragstart = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            let Some(tile) = tile_of(&e) else { return };
            let Some(pos) = tile_pos(&tile) else { return };
            if let Some(dt) = e.data_transfer() {
                let _ = dt.set_data(DRAG_MIME, &pos.to_string());
            }
            let _ = tile.class_list().add_1("dragging");
        }));
        board.add_event_listener_with_callback("dragstart", dragstart.as_ref().unchecked_ref())?;
        dragstart.forget();
    }
    {
        let dragend = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            if let Some(tile) = tile_of(&e) {
                let _ = tile.class_list().remove_1("dragging");
            }
        }));
        board.add_event_listener_with_callback("dragend", dragend.as_ref().unchecked_ref())?;
        dragend.forget();
    }
    {
        let dragover = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
        }));
        board.add_event_listener_with_callback("dragover", dragover.as_ref().unchecked_ref())?;
        dragover.forget();
    }
    {
        let ondrop = Closure::<dyn FnMut(DragEvent)>::wrap(Box::new(move |e: DragEvent| {
            e.prevent_default();
            let Some(to) = tile_of(&e).as_ref().and_then(tile_pos) else {
                debug!("drop outside any tile");
                return;
            };
            let payload = e
                .data_transfer()
                .and_then(|dt| dt.get_data(DRAG_MIME).ok())
                .unwrap_or_default();
            match payload.parse::<usize>() {
                Ok(from) => crate::dispatch(Msg::Swap(SwapRequest { from, to })),
                Err(_) => warn!("ignoring drop with payload {payload:?}"),
            }
        }));
        board.add_event_listener_with_callback("drop", ondrop.as_ref().unchecked_ref())?;
        ondrop.forget();
    }
    Ok(())
}

/// Show which candidates were tried in `#debug`, if the page has one.
pub fn update_debug_list(document: &Document, statuses: &[ProbeStatus]) {
    let Some(el) = document.get_element_by_id(DEBUG_ID) else {
        return;
    };
    if let Err(e) = fill_debug_list(document, &el, statuses) {
        warn!("debug list: {e:?}");
    }
}

fn fill_debug_list(
    document: &Document,
    el: &Element,
    statuses: &[ProbeStatus],
) -> Result<(), JsValue> {
    el.set_inner_html("<h4>Image check</h4>");
    let ul = document.create_element("ul")?;
    for s in statuses {
        let li = document.create_element("li")?;
        li.set_text_content(Some(&s.url));
        li.set_class_name(if s.outcome.is_ok() { "ok" } else { "err" });
        ul.append_child(&li)?;
    }
    el.append_child(&ul)?;
    let small = document.create_element("div")?;
    small.set_class_name("small");
    small.set_text_content(Some(
        "Open DevTools (F12) → Console/Network for details.",
    ));
    el.append_child(&small)?;
    Ok(())
}
