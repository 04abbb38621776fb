#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use attachment_engine::{
    Delivery, DeliveryError, DownloadSink, EngineEvent, FailureKind, FetchError, FetchMetadata,
    FetchOutput, Fetcher, Handoff, ProgressSink, TransientResource,
};
use bytes::Bytes;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// One `<table>` per entry, each with a `<caption>` insertion point and the
/// given hrefs as links.
pub fn page(tables: &[&[&str]]) -> String {
    let mut html = String::from("<html><body>");
    for links in tables {
        html.push_str("<table class=\"att\"><caption>Files</caption>");
        for href in links.iter() {
            html.push_str(&format!("<tr><td><a href=\"{href}\">file</a></td></tr>"));
        }
        html.push_str("</table>");
    }
    html.push_str("</body></html>");
    html
}

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn labels(&self, control_id: &str) -> Vec<(bool, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::ControlChanged { control_id: id, view } if id == control_id => {
                    Some((view.enabled, view.label.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| matches!(event, EngineEvent::JobCompleted { .. }))
            .cloned()
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Serves canned bodies with a delay and records how many fetches overlap.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Result<Bytes, u16>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    log: Mutex<Vec<(&'static str, String)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self {
            default_delay: Duration::from_millis(20),
            ..Self::default()
        }
    }

    pub fn ok(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Ok(Bytes::from(body.to_string())));
        self
    }

    pub fn status(mut self, url: &str, code: u16) -> Self {
        self.responses.insert(url.to_string(), Err(code));
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// `("start" | "end", url)` in the order things happened.
    pub fn log(&self) -> Vec<(&'static str, String)> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.log.lock().unwrap().push(("start", url.to_string()));

        let delay = self.delays.get(url).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;

        self.log.lock().unwrap().push(("end", url.to_string()));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.get(url) {
            Some(Ok(body)) => Ok(FetchOutput {
                bytes: body.clone(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    redirect_count: 0,
                    content_type: None,
                    byte_len: body.len() as u64,
                },
            }),
            Some(Err(code)) => Err(FetchError::new(
                FailureKind::HttpStatus(*code),
                format!("status {code}"),
            )),
            None => Err(FetchError::new(FailureKind::Network, "connection refused")),
        }
    }
}

/// Flips a flag when the transient resource holding it is dropped.
pub struct ReleaseProbe(pub Arc<AtomicBool>);

impl Drop for ReleaseProbe {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Records deliveries and hands back a pending resource, like a browser
/// download that still needs its object URL.
#[derive(Default)]
pub struct RecordingSink {
    deliveries: Mutex<Vec<(Delivery, String)>>,
    released: Mutex<Vec<Arc<AtomicBool>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn deliveries(&self) -> Vec<(Delivery, String)> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn all_released(&self) -> bool {
        self.released
            .lock()
            .unwrap()
            .iter()
            .all(|flag| flag.load(Ordering::SeqCst))
    }
}

#[async_trait::async_trait]
impl DownloadSink for RecordingSink {
    async fn deliver(&self, delivery: Delivery, filename: &str) -> Result<Handoff, DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Store {
                filename: filename.to_string(),
                message: "disk full".to_string(),
            });
        }
        self.deliveries
            .lock()
            .unwrap()
            .push((delivery, filename.to_string()));
        let flag = Arc::new(AtomicBool::new(false));
        self.released.lock().unwrap().push(flag.clone());
        Ok(Handoff::Pending(TransientResource::new(
            filename,
            ReleaseProbe(flag),
        )))
    }
}

/// Entry names and contents of a zip blob, in archive order.
pub fn zip_entries(blob: &Bytes) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(blob.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut body = String::new();
            entry.read_to_string(&mut body).unwrap();
            (entry.name().to_string(), body)
        })
        .collect()
}
