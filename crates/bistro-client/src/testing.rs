//! Scripted collaborators for workflow tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bistro_core::StackReset;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::navigation::{NavigationError, Navigator};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// One request seen by [`StubTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct Reply {
    result: Result<Value, ClientError>,
    delay: Duration,
}

/// In-memory [`Transport`] answering from a script.
///
/// Unscripted requests get a 404.
#[derive(Default)]
pub struct StubTransport {
    replies: Mutex<HashMap<(Method, String), Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, path: &str, value: Value) -> Self {
        self.script(method, path, Ok(value), Duration::ZERO)
    }

    pub fn on_delayed(self, method: Method, path: &str, value: Value, delay: Duration) -> Self {
        self.script(method, path, Ok(value), delay)
    }

    pub fn fail(self, method: Method, path: &str, error: ClientError) -> Self {
        self.script(method, path, Err(error), Duration::ZERO)
    }

    pub fn fail_delayed(self, method: Method, path: &str, error: ClientError, delay: Duration) -> Self {
        self.script(method, path, Err(error), delay)
    }

    fn script(self, method: Method, path: &str, result: Result<Value, ClientError>, delay: Duration) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Reply { result, delay });
        self
    }

    /// Every request received, in arrival order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    async fn answer(&self, method: Method, path: &str, body: Option<Value>) -> ClientResult<Value> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned();

        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Err(ClientError::Status {
                status: 404,
                body: format!("no route for {:?} {}", method, path),
            }),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.answer(Method::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.answer(Method::Post, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.answer(Method::Put, path, Some(body)).await
    }
}

/// [`Navigator`] that records resets, optionally refusing them.
#[derive(Default)]
pub struct RecordingNavigator {
    resets: Mutex<Vec<StackReset>>,
    failure: Option<NavigationError>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: NavigationError) -> Self {
        RecordingNavigator {
            resets: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub fn resets(&self) -> Vec<StackReset> {
        self.resets.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn reset(&self, reset: StackReset) -> Result<(), NavigationError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.resets.lock().unwrap().push(reset);
        Ok(())
    }
}
