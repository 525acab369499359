use crate::{MapError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use fxhash::FxHashSet;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;

/// Shared blocking HTTP client with a custom User-Agent so that public tile
/// servers (e.g. OpenStreetMap) don't reject the request. Building the client
/// once avoids the cost of TLS and connection pool setup for every tile.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("airmap/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|e| {
            log::error!("falling back to default HTTP client: {e}");
            Client::new()
        })
});

const MAX_ATTEMPTS: usize = 2;
/// Failed URLs remembered before the record starts over
const MAX_REMEMBERED_FAILURES: usize = 1024;

/// Outcome of one tile download
#[derive(Debug)]
pub struct TileResult {
    pub url: String,
    pub data: Result<Vec<u8>>,
}

/// Fetches tiles on detached threads and reports completed downloads over a
/// channel drained by the UI thread.
pub struct TileLoader {
    tx: Sender<TileResult>,
    rx: Receiver<TileResult>,
    in_flight: FxHashSet<String>,
    failed: FxHashSet<String>,
    max_in_flight: usize,
}

impl TileLoader {
    pub fn new(max_in_flight: usize) -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            in_flight: FxHashSet::default(),
            failed: FxHashSet::default(),
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Starts downloading `url` unless it is already pending, failed before,
    /// or the in-flight cap is reached. Returns whether a download started.
    pub fn request(&mut self, url: &str) -> bool {
        if self.in_flight.contains(url)
            || self.failed.contains(url)
            || self.in_flight.len() >= self.max_in_flight
        {
            return false;
        }

        self.in_flight.insert(url.to_string());
        let url = url.to_string();
        let tx = self.tx.clone();

        thread::spawn(move || {
            let data = fetch_with_retry(&url);
            let _ = tx.send(TileResult { url, data });
        });
        true
    }

    /// Completed downloads since the last call
    pub fn poll(&mut self) -> Vec<TileResult> {
        let results: Vec<TileResult> = self.rx.try_iter().collect();
        for result in &results {
            self.in_flight.remove(&result.url);
            if result.data.is_err() {
                if self.failed.len() >= MAX_REMEMBERED_FAILURES {
                    log::debug!("forgetting {} failed tiles", self.failed.len());
                    self.failed.clear();
                }
                self.failed.insert(result.url.clone());
            }
        }
        results
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// Allows previously failed tiles to be requested again
    pub fn forget_failures(&mut self) {
        self.failed.clear();
    }

    /// Sender for results produced outside [`TileLoader::request`]
    pub fn sender(&self) -> Sender<TileResult> {
        self.tx.clone()
    }
}

impl Default for TileLoader {
    fn default() -> Self {
        Self::new(16)
    }
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let resp = HTTP_CLIENT.get(url).send()?;
    if !resp.status().is_success() {
        return Err(MapError::Tile(format!("HTTP {} for {url}", resp.status())));
    }
    Ok(resp.bytes()?.to_vec())
}

fn fetch_with_retry(url: &str) -> Result<Vec<u8>> {
    let mut attempt = 1;
    loop {
        log::debug!("fetch tile {url} attempt {attempt}");
        match fetch(url) {
            Ok(data) => {
                log::debug!("downloaded tile {url} ({} bytes)", data.len());
                return Ok(data);
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                log::warn!("tile {url} download failed on attempt {attempt}: {e}");
                attempt += 1;
                thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                log::warn!("giving up on tile {url}: {e}");
                return Err(e);
            }
        }
    }
}
