//! A scripted in-process driver for tests.
//!
//! Records every statement it is asked to run and answers with queued
//! responses, or an empty result once the queue runs dry.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use ogm_core::{NodeRecord, PropertyMap};

use crate::access::NodeAccess;
use crate::client::GraphError;
use crate::driver::{GraphDriver, GraphSession, QueryResult, Statement};

enum Response {
    Records(Vec<NodeRecord>),
    Failure(String),
}

#[derive(Default)]
struct ScriptState {
    responses: VecDeque<Response>,
    statements: Vec<Statement>,
    opened: usize,
    closed: usize,
    refuse_sessions: bool,
}

/// Driver that replays queued responses.
///
/// Clones share the same script and recordings.
#[derive(Clone, Default)]
pub struct ScriptedDriver {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `NodeAccess` backed by this driver, with the default policy.
    pub fn access(&self) -> NodeAccess {
        NodeAccess::new(Arc::new(self.clone()))
    }

    /// Queue the records returned by the next statement.
    pub fn push_records(&self, records: Vec<NodeRecord>) {
        self.lock().responses.push_back(Response::Records(records));
    }

    /// Queue unlabeled nodes with the given properties.
    pub fn push_properties(&self, nodes: Vec<PropertyMap>) {
        let records = nodes
            .into_iter()
            .map(|props| NodeRecord::new(Vec::new(), props))
            .collect();
        self.push_records(records);
    }

    /// Make the next statement fail with a driver error.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock()
            .responses
            .push_back(Response::Failure(message.into()));
    }

    /// Fail every subsequent `open_session`.
    pub fn refuse_sessions(&self) {
        self.lock().refuse_sessions = true;
    }

    /// Every statement run so far, in order.
    pub fn statements(&self) -> Vec<Statement> {
        self.lock().statements.clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.lock().opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl GraphDriver for ScriptedDriver {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, GraphError> {
        let mut state = self.lock();
        if state.refuse_sessions {
            return Err(GraphError::Connection("session refused".to_string()));
        }
        state.opened += 1;
        Ok(Box::new(ScriptedSession {
            driver: self.clone(),
        }))
    }
}

struct ScriptedSession {
    driver: ScriptedDriver,
}

#[async_trait]
impl GraphSession for ScriptedSession {
    async fn run(&mut self, statement: &Statement) -> Result<QueryResult, GraphError> {
        let mut state = self.driver.lock();
        state.statements.push(statement.clone());
        match state.responses.pop_front() {
            Some(Response::Records(records)) => Ok(QueryResult { records }),
            Some(Response::Failure(message)) => Err(GraphError::Driver(message)),
            None => Ok(QueryResult::default()),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), GraphError> {
        self.driver.lock().closed += 1;
        Ok(())
    }
}
