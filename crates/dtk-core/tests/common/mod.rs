//! Shared fakes for controller and dispatcher tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use dtk_core::{FetchError, Fetcher, Query};
use tokio::time::{self, Instant};

#[derive(Debug, Clone)]
enum Script {
    Items(Vec<String>),
    Fail,
    Panic,
    PanicOnCall,
}

#[derive(Debug, Clone)]
struct Reply {
    ready_at_ms: u64,
    script: Script,
}

/// Fetcher answering each query at a fixed point on the (paused) test clock.
///
/// Times are absolute, measured from the `start` instant given to `new`, so a
/// test reads like a timeline: "cat resolves at 2000 ms".
#[derive(Debug)]
pub struct ScriptedFetcher {
    start: Instant,
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            replies: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `query` resolves with `items` at `at_ms`.
    pub fn reply_at(mut self, query: &str, at_ms: u64, items: &[&str]) -> Self {
        let items = items.iter().map(|item| (*item).to_string()).collect();
        self.replies.insert(
            query.to_string(),
            Reply {
                ready_at_ms: at_ms,
                script: Script::Items(items),
            },
        );
        self
    }

    /// `query` fails with a transport error at `at_ms`.
    pub fn fail_at(mut self, query: &str, at_ms: u64) -> Self {
        self.replies.insert(
            query.to_string(),
            Reply {
                ready_at_ms: at_ms,
                script: Script::Fail,
            },
        );
        self
    }

    /// `query` panics inside the fetch at `at_ms`.
    pub fn panic_at(mut self, query: &str, at_ms: u64) -> Self {
        self.replies.insert(
            query.to_string(),
            Reply {
                ready_at_ms: at_ms,
                script: Script::Panic,
            },
        );
        self
    }

    /// `search` itself panics for `query`, before any future exists.
    pub fn panic_on_call(mut self, query: &str) -> Self {
        self.replies.insert(
            query.to_string(),
            Reply {
                ready_at_ms: 0,
                script: Script::PanicOnCall,
            },
        );
        self
    }

    /// Queries fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Fetcher for ScriptedFetcher {
    type Item = String;

    fn search(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());

        // Unscripted queries answer immediately with nothing.
        let reply = self.replies.get(query.as_str()).cloned().unwrap_or(Reply {
            ready_at_ms: 0,
            script: Script::Items(Vec::new()),
        });
        if matches!(reply.script, Script::PanicOnCall) {
            panic!("scripted fetcher panic on call");
        }
        let ready_at = self.start + Duration::from_millis(reply.ready_at_ms);

        async move {
            time::sleep_until(ready_at).await;
            match reply.script {
                Script::Items(items) => Ok(items),
                Script::Fail => Err(FetchError::Network("connection reset".to_string())),
                Script::Panic | Script::PanicOnCall => panic!("scripted fetcher panic"),
            }
        }
    }
}

/// Milliseconds elapsed since `start` on the test clock.
pub fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
