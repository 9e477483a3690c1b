//! Runs extractions on a worker thread, keeping only the result of the most recent request.
//!
//! Each request is tagged with a [RequestToken]. Results arriving for any token other than the
//! latest one are discarded, so a slow extraction of an earlier upload can never overwrite the
//! table from a later upload.

use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result, anyhow};

use super::{TableExtractor, extract_first};
use crate::{table::Table, upload::Upload};

/// Identifies one extraction request within an [ExtractionSession]. Later requests have greater
/// tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RequestToken(u64);

/// Result of one extraction, sent back from the worker.
#[derive(Debug)]
pub struct Response {
    pub token: RequestToken,
    pub result: Result<Table>,
}

/// What an [ExtractionSession] did with a [Response].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The response was for the latest request and its table is now current.
    Applied,
    /// The response was for the latest request, but extraction failed.
    Failed,
    /// The response was for an older request and was discarded.
    Stale,
}

struct Request {
    token: RequestToken,
    upload: Upload,
    response_sender: mpsc::Sender<Response>,
}

/// Sends requests to an [ExtractionServer].
#[derive(Clone)]
pub struct ExtractionClient {
    request_sender: mpsc::Sender<Request>,
}

/// Serialises extractions onto the thread calling [ExtractionServer::run].
pub struct ExtractionServer {
    extractor: Box<dyn TableExtractor>,

    request_sender: mpsc::Sender<Request>,
    request_receiver: mpsc::Receiver<Request>,
}

impl ExtractionServer {
    pub fn new(extractor: Box<dyn TableExtractor>) -> Self {
        let (request_sender, request_receiver) = mpsc::channel();
        Self {
            extractor,
            request_sender,
            request_receiver,
        }
    }

    pub fn client(&self) -> ExtractionClient {
        ExtractionClient {
            request_sender: self.request_sender.clone(),
        }
    }

    /// Starts the server on a new thread, returning a client for it and the thread's handle. The
    /// thread exits once every client has been dropped.
    pub fn spawn(extractor: Box<dyn TableExtractor>) -> Result<(ExtractionClient, JoinHandle<()>)> {
        let server = Self::new(extractor);
        let client = server.client();
        let handle = thread::Builder::new()
            .name("extraction".to_string())
            .spawn(move || server.run())
            .context("spawning extraction thread")?;
        Ok((client, handle))
    }

    /// Serves requests until every [ExtractionClient] has been dropped.
    pub fn run(self) {
        // Ensure that we terminate the loop below when the clients are dropped externally.
        drop(self.request_sender);

        let extractor = self.extractor;
        for request in self.request_receiver.iter() {
            log::debug!("Extracting for request {:?}.", request.token);
            let response = Response {
                token: request.token,
                result: extract_first(extractor.as_ref(), &request.upload),
            };
            utils::send_or_log_warning(&request.response_sender, "extraction response", response);
        }

        log::info!("Request channel closed; terminating extraction worker loop.");
    }
}

/// Tracks the current table across any number of uploads.
pub struct ExtractionSession {
    client: ExtractionClient,
    next_token: u64,
    latest: Option<RequestToken>,
    table: Option<Table>,

    /// Receives the answer to the latest request. Replacing it drops the receiver for any older
    /// request, so the worker's answer to that request goes nowhere.
    pending: Option<mpsc::Receiver<Response>>,
}

impl ExtractionSession {
    pub fn new(client: ExtractionClient) -> Self {
        Self {
            client,
            next_token: 0,
            latest: None,
            table: None,
            pending: None,
        }
    }

    /// Issues a new token, making any outstanding request stale.
    pub fn begin(&mut self) -> RequestToken {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.latest = Some(token);
        self.pending = None;
        token
    }

    /// Asks the worker to extract from `upload`. Supersedes any earlier request.
    pub fn submit(&mut self, upload: Upload) -> Result<RequestToken> {
        let token = self.begin();
        let (response_sender, response_receiver) = mpsc::channel();
        log::debug!("Submitting {:?} as request {:?}.", upload.name(), token);
        self.client
            .request_sender
            .send(Request {
                token,
                upload,
                response_sender,
            })
            .map_err(|_| anyhow!("could not request extraction - has the worker died?"))?;
        self.pending = Some(response_receiver);
        Ok(token)
    }

    /// Records `response` if it answers the latest request.
    pub fn apply(&mut self, response: Response) -> Outcome {
        if Some(response.token) != self.latest {
            log::info!(
                "Discarding stale extraction result for {:?} (latest is {:?}).",
                response.token,
                self.latest
            );
            return Outcome::Stale;
        }

        self.pending = None;
        match response.result {
            Ok(table) => {
                self.table = Some(table);
                Outcome::Applied
            }
            Err(err) => {
                log::warn!("Extraction for {:?} failed: {err:#}", response.token);
                Outcome::Failed
            }
        }
    }

    /// Applies the answer to the latest request if it has arrived, without blocking.
    pub fn poll(&mut self) -> Option<Outcome> {
        let response = self.pending.as_ref()?.try_recv().ok()?;
        Some(self.apply(response))
    }

    /// Blocks until the worker answers the latest request. Returns the resulting table, or the
    /// error that its extraction failed with.
    pub fn wait_latest(&mut self) -> Result<&Table> {
        let receiver = self
            .pending
            .take()
            .ok_or_else(|| anyhow!("no extraction is in progress"))?;
        let response = receiver
            .recv()
            .context("waiting for extraction response - has the worker died?")?;

        let token = response.token;
        match response.result {
            Ok(table) if Some(token) == self.latest => Ok(self.table.insert(table)),
            Ok(_) => Err(anyhow!("received result for stale request {token:?}")),
            Err(err) => Err(err.context(format!("extraction request {token:?}"))),
        }
    }

    /// The table from the most recent successful extraction, if any.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn latest(&self) -> Option<RequestToken> {
        self.latest
    }
}
