// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};

use rand::Rng;

const PREFIX: &str = "request_id_";

/// Record of every request id handed out by the lookup tools.
///
/// Ids are `request_id_` followed by a random number in
/// `[1000000, 9999999]`.  Uniqueness is not enforced; the log is a set, so a
/// repeated draw is recorded once.
#[derive(Debug, Default)]
pub struct RequestIdLog {
    ids: Mutex<HashSet<String>>,
}

static GLOBAL: OnceLock<Arc<RequestIdLog>> = OnceLock::new();

impl RequestIdLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide log shared by tools built without an explicit one.
    pub fn global() -> Arc<RequestIdLog> {
        GLOBAL.get_or_init(|| Arc::new(RequestIdLog::new())).clone()
    }

    /// Draw a fresh id and record it.
    pub fn issue(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(1_000_000..=9_999_999);
        let id = format!("{PREFIX}{n}");
        // A poisoned lock still holds a usable set.
        let mut ids = self.ids.lock().unwrap_or_else(|p| p.into_inner());
        ids.insert(id.clone());
        id
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().unwrap_or_else(|p| p.into_inner()).contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
