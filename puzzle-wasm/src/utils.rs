use log::{Level, LevelFilter, Metadata, Record};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

/// `log` backend writing to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[puzzle] {}", record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route `log` records to the console. Safe to call more than once.
pub fn init_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        let level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        log::set_max_level(level);
    }
}

/// Host-provided prefix for relative assets (`window.__BASE_URL`).
fn host_base(window: &Window) -> Option<String> {
    js_sys::Reflect::get(window, &JsValue::from_str("__BASE_URL"))
        .ok()?
        .as_string()
        .filter(|b| !b.trim().is_empty())
}

/// URL an asset is requested from, honouring `window.__BASE_URL`.
pub fn asset_url(path: &str) -> String {
    let base = web_sys::window().and_then(|w| host_base(&w));
    join_asset(base.as_deref(), path)
}

/// Place `path` under `base`. Paths that already carry a scheme or are
/// protocol-relative are returned trimmed; without a base the path stays
/// relative to the page.
fn join_asset(base: Option<&str>, path: &str) -> String {
    let path = path.trim();
    if has_scheme(path) || path.starts_with("//") {
        return path.to_string();
    }
    match base.map(str::trim) {
        Some(base) if !base.is_empty() => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches("./").trim_start_matches('/')
        ),
        _ => path.to_string(),
    }
}

/// `scheme:` prefix as in RFC 3986: a letter, then letters, digits, `+-.`.
fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// GET `url` as text. `Ok(None)` when the server answers with a non-2xx
/// status, `Err` when the request itself fails.
pub async fn fetch_text(window: &Window, url: &str) -> Result<Option<String>, JsValue> {
    let resp: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        log::debug!("{url}: HTTP {}", resp.status());
        return Ok(None);
    }
    let text = JsFuture::from(resp.text()?).await?;
    Ok(text.as_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_under_base() {
        assert_eq!(join_asset(Some("/game"), "puzzle.json"), "/game/puzzle.json");
        assert_eq!(join_asset(Some("/game/"), "/img/a.jpg"), "/game/img/a.jpg");
        assert_eq!(join_asset(Some("cdn/"), "./prize.png"), "cdn/prize.png");
        assert_eq!(
            join_asset(Some("https://x.test/app"), " a.jpg "),
            "https://x.test/app/a.jpg"
        );
    }

    #[test]
    fn missing_or_blank_base_keeps_path_page_relative() {
        assert_eq!(join_asset(None, "puzzle.json"), "puzzle.json");
        assert_eq!(join_asset(Some("  "), "img/a.jpg"), "img/a.jpg");
    }

    #[test]
    fn absolute_urls_pass_through() {
        for url in [
            "https://a.test/x.jpg",
            "http://a.test/x.jpg",
            "data:image/svg+xml;utf8,%3Csvg",
            "blob:https://a.test/1234",
            "//cdn.test/x.jpg",
        ] {
            assert_eq!(join_asset(Some("/base"), url), url);
        }
    }

    #[test]
    fn scheme_detection() {
        assert!(has_scheme("svn+ssh://host"));
        assert!(!has_scheme("img/a:b.jpg"));
        assert!(!has_scheme("1x:y"));
        assert!(!has_scheme("plain.jpg"));
    }
}
