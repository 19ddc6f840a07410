use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use puzzle_core::{PuzzleConfig, Session, Status, resolve_image};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

mod board;
mod confetti;
mod constants;
mod probe;
mod reveal;
mod state;
mod utils;

use crate::constants::{BOARD_ID, CONFIG_PATH, SHUFFLE_BTN_ID};
use crate::probe::WebProbe;
use crate::state::{Msg, STATE, State};
use crate::utils::{asset_url, fetch_text};

/// Route a message to the running instance.
pub(crate) fn dispatch(msg: Msg) {
    let Some(st) = STATE.with(|st| st.borrow().clone()) else {
        return;
    };
    let mut s = st.borrow_mut();
    update(&mut s, msg);
}

/// The single place where adapter state changes: apply the message, redraw,
/// and raise the reveal on the transition into `Solved`.
fn update(state: &mut State, msg: Msg) {
    let State {
        session,
        rng,
        overlay,
        ..
    } = state;
    let Some(session) = session.as_mut() else {
        debug!("{msg:?} before the board is ready");
        return;
    };
    let mut won = false;
    match msg {
        Msg::Swap(req) => {
            let before = session.status();
            match session.apply(req) {
                Ok(now) => won = before == Status::Unsolved && now == Status::Solved,
                Err(e) => {
                    warn!("rejected swap: {e}");
                    return;
                }
            }
        }
        Msg::Shuffle => {
            close_overlay(overlay);
            session.reshuffle(rng);
        }
        Msg::CloseReveal => {
            close_overlay(overlay);
            session.restart(rng);
        }
    }
    if let Err(e) = board::render(state) {
        error!("render failed: {e:?}");
    }
    if won {
        celebrate(state);
    }
}

fn close_overlay(overlay: &mut Option<reveal::Overlay>) {
    // Dropping the overlay removes its markup and releases the click handler.
    drop(overlay.take());
}

fn celebrate(state: &mut State) {
    if state.overlay.is_none() {
        match reveal::show(&state.document, &state.prize_url) {
            Ok(overlay) => state.overlay = Some(overlay),
            Err(e) => error!("failed to show reveal: {e:?}"),
        }
    }
    if let Err(e) = confetti::burst(&state.window, &state.document, &mut state.rng) {
        warn!("confetti failed: {e:?}");
    }
}

fn attach_ui(state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let s = state.borrow();
    board::attach_drag_handlers(&s.board)?;

    if let Some(btn) = s.document.get_element_by_id(SHUFFLE_BTN_ID) {
        let btn: HtmlElement = btn.dyn_into()?;
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            dispatch(Msg::Shuffle);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

/// Defaults, then `puzzle.json` if the host serves one, then the query string.
async fn load_config(window: &Window) -> PuzzleConfig {
    let mut cfg = match fetch_text(window, &asset_url(CONFIG_PATH)).await {
        Ok(Some(text)) => PuzzleConfig::from_json(&text).unwrap_or_else(|e| {
            warn!("{CONFIG_PATH}: {e}, using defaults");
            PuzzleConfig::default()
        }),
        Ok(None) => PuzzleConfig::default(),
        Err(e) => {
            debug!("{CONFIG_PATH} unavailable: {e:?}");
            PuzzleConfig::default()
        }
    };
    if let Ok(search) = window.location().search() {
        cfg.apply_query(&search);
    }
    cfg
}

async fn boot(state: Rc<RefCell<State>>) {
    let (window, document) = {
        let s = state.borrow();
        (s.window.clone(), s.document.clone())
    };
    let cfg = load_config(&window).await;
    let candidates: Vec<String> = cfg.candidates.iter().map(|c| asset_url(c)).collect();
    let resolution = resolve_image(&WebProbe, &candidates, cfg.probe_timeout(), |statuses| {
        board::update_debug_list(&document, statuses)
    })
    .await;

    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    s.image_url = resolution.source.url();
    s.prize_url = asset_url(&cfg.prize_url);
    match Session::new(cfg.side, &mut s.rng) {
        Ok(session) => {
            info!("{0}x{0} board ready", cfg.side);
            s.session = Some(session);
        }
        Err(e) => {
            error!("cannot start puzzle: {e}");
            return;
        }
    }
    if let Err(e) = board::render(s) {
        error!("render failed: {e:?}");
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    utils::init_logger();
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let board: HtmlElement = document
        .get_element_by_id(BOARD_ID)
        .ok_or("no #board element")?
        .dyn_into()?;

    let state = Rc::new(RefCell::new(State::new(window, document, board)));
    STATE.with(|st| st.replace(Some(state.clone())));
    attach_ui(&state)?;
    wasm_bindgen_futures::spawn_local(boot(state));
    Ok(())
}
