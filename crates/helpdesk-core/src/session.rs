// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::bail;
use chrono::{DateTime, Utc};
use helpdesk_model::Message;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

/// One conversation: its history and a free-form JSON state map.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    pub messages: Vec<Message>,
    pub state: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub last_update_time: DateTime<Utc>,
}

impl Session {
    fn new(app_name: &str, user_id: &str, id: String, state: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id,
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            messages: Vec::new(),
            state,
            created_at: now,
            last_update_time: now,
        }
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
        self.last_update_time = Utc::now();
    }
}

/// Shared handle to a live session.  The runner holds the lock for the whole
/// invocation, so concurrent runs on one session are serialised.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

type SessionKey = (String, String, String);

/// Process-local session store keyed by (app, user, session id).
#[derive(Debug, Default)]
pub struct InMemorySessionService {
    sessions: Mutex<HashMap<SessionKey, SessionHandle>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Option<SessionHandle> {
        let key = (app_name.to_string(), user_id.to_string(), session_id.to_string());
        self.sessions
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&key)
            .cloned()
    }

    /// Create a session.  A missing `session_id` gets a fresh UUID; reusing
    /// an existing id is an error.
    pub fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: Option<&str>,
        state: Map<String, Value>,
    ) -> anyhow::Result<SessionHandle> {
        let id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let key = (app_name.to_string(), user_id.to_string(), id.clone());

        let mut sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        if sessions.contains_key(&key) {
            bail!("session {id} already exists for {app_name}/{user_id}");
        }
        debug!(app = %app_name, user = %user_id, session = %id, "creating session");
        let handle = Arc::new(tokio::sync::Mutex::new(Session::new(app_name, user_id, id, state)));
        sessions.insert(key, handle.clone());
        Ok(handle)
    }

    /// Existing session, or a new one with an empty state map.  Lookup and
    /// insert happen under one lock, so racing first requests share a session.
    pub fn get_or_create(&self, app_name: &str, user_id: &str, session_id: &str) -> anyhow::Result<SessionHandle> {
        let key = (app_name.to_string(), user_id.to_string(), session_id.to_string());
        let mut sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        let handle = sessions.entry(key).or_insert_with(|| {
            debug!(app = %app_name, user = %user_id, session = %session_id, "creating session");
            let session = Session::new(app_name, user_id, session_id.to_string(), Map::new());
            Arc::new(tokio::sync::Mutex::new(session))
        });
        Ok(Arc::clone(handle))
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
