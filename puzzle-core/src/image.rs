use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{Either, select};
use log::{info, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Per-candidate wait used when nothing else is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(8000);

/// Label recorded in the probe log for the embedded image.
pub const FALLBACK_LABEL: &str = "[embedded SVG fallback]";

const FALLBACK_SVG: &str = r##"
<svg xmlns="http://www.w3.org/2000/svg" width="800" height="800">
  <defs>
    <linearGradient id="g" x1="0" x2="1">
      <stop offset="0" stop-color="#f6d365"/>
      <stop offset="1" stop-color="#fda085"/>
    </linearGradient>
  </defs>
  <rect width="100%" height="100%" fill="url(#g)"/>
  <text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" font-size="48" fill="#333">Puzzle</text>
</svg>
"##;

// Same set `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Data URI of the built-in image. Always loadable, needs no network.
pub fn fallback_data_uri() -> String {
    format!(
        "data:image/svg+xml;utf8,{}",
        utf8_percent_encode(FALLBACK_SVG, URI_COMPONENT)
    )
}

/// Host hooks needed to try an image source.
///
/// The browser adapter loads through an `<img>` element and sleeps on a
/// timer; tests plug in ready or never-resolving futures.
pub trait ImageProbe {
    /// Resolves to `true` once `url` has loaded, `false` on a load error.
    fn load(&self, url: &str) -> impl Future<Output = bool>;
    fn sleep(&self, dur: Duration) -> impl Future<Output = ()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Loaded,
    Failed,
    TimedOut,
}

impl ProbeOutcome {
    pub fn is_ok(self) -> bool {
        self == ProbeOutcome::Loaded
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeStatus {
    pub url: String,
    pub outcome: ProbeOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    Candidate(String),
    Fallback,
}

impl ImageSource {
    /// URL to put into `background-image`.
    pub fn url(&self) -> String {
        match self {
            ImageSource::Candidate(u) => u.clone(),
            ImageSource::Fallback => fallback_data_uri(),
        }
    }
}

/// Result of walking the candidate list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub source: ImageSource,
    pub statuses: Vec<ProbeStatus>,
}

/// Try one candidate, giving up after `timeout`.
///
/// Whichever side loses the race is dropped, so a late load result is never
/// observed.
pub async fn probe_candidate<P: ImageProbe>(
    probe: &P,
    url: &str,
    timeout: Duration,
) -> ProbeOutcome {
    let load = pin!(probe.load(url));
    let timer = pin!(probe.sleep(timeout));
    match select(load, timer).await {
        Either::Left((true, _)) => ProbeOutcome::Loaded,
        Either::Left((false, _)) => ProbeOutcome::Failed,
        Either::Right(((), _)) => ProbeOutcome::TimedOut,
    }
}

/// Probe `candidates` one after another and pick the first that loads.
///
/// `on_status` sees the status list after every attempt. When no candidate
/// loads, the embedded image is chosen and recorded as a final entry.
pub async fn resolve_image<P, F>(
    probe: &P,
    candidates: &[String],
    timeout: Duration,
    mut on_status: F,
) -> Resolution
where
    P: ImageProbe,
    F: FnMut(&[ProbeStatus]),
{
    let mut statuses = Vec::with_capacity(candidates.len() + 1);
    for url in candidates {
        info!("probing {url}");
        let outcome = probe_candidate(probe, url, timeout).await;
        statuses.push(ProbeStatus {
            url: url.clone(),
            outcome,
        });
        on_status(&statuses);
        if outcome.is_ok() {
            info!("using {url}");
            return Resolution {
                source: ImageSource::Candidate(url.clone()),
                statuses,
            };
        }
        warn!("{url}: {outcome:?}");
    }
    warn!("no candidate image loaded, using embedded fallback");
    statuses.push(ProbeStatus {
        url: FALLBACK_LABEL.to_string(),
        outcome: ProbeOutcome::Loaded,
    });
    on_status(&statuses);
    Resolution {
        source: ImageSource::Fallback,
        statuses,
    }
}
