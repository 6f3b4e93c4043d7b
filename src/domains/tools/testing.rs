//! Test doubles for the analytics API.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::api::{AnalyticsApi, ApiError, ApiResult};

/// Serves one canned payload (or error) and records every requested endpoint.
pub struct RecordingApi {
    response: Result<Value, (u16, String)>,
    calls: Mutex<Vec<String>>,
}

impl RecordingApi {
    pub fn returning(payload: Value) -> Self {
        Self {
            response: Ok(payload),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            response: Err((status, message.to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalyticsApi for RecordingApi {
    async fn get(&self, endpoint: &str) -> ApiResult<Value> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        match &self.response {
            Ok(payload) => Ok(payload.clone()),
            Err((status, message)) => Err(ApiError::status(*status, message.clone())),
        }
    }
}
