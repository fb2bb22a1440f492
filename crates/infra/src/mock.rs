//! # テスト用モック
//!
//! トランスポートのテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! mailbridge-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    error::InfraError,
    logger::TransportLogger,
    mandrill::{MandrillClient, MessagePayload, SendOutcome},
};

// ===== MockMandrillClient =====

#[derive(Debug, Clone)]
enum MockResponse {
    Outcomes(Vec<SendOutcome>),
    Failure(String),
}

/// 送信ペイロードを記録し、設定したレスポンスを返すクライアント
#[derive(Clone)]
pub struct MockMandrillClient {
    sent:     Arc<Mutex<Vec<MessagePayload>>>,
    response: MockResponse,
}

impl MockMandrillClient {
    /// 常に `[{"status": "sent"}]` を返すクライアント
    pub fn new() -> Self {
        Self::responding(vec![SendOutcome::sent("recipient@example.com")])
    }

    /// 指定した送信結果を返すクライアント
    pub fn responding(outcomes: Vec<SendOutcome>) -> Self {
        Self {
            sent:     Arc::new(Mutex::new(Vec::new())),
            response: MockResponse::Outcomes(outcomes),
        }
    }

    /// 常に通信エラーを返すクライアント
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent:     Arc::new(Mutex::new(Vec::new())),
            response: MockResponse::Failure(message.into()),
        }
    }

    /// 送信されたペイロード一覧
    pub fn sent(&self) -> Vec<MessagePayload> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockMandrillClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MandrillClient for MockMandrillClient {
    async fn send_message(&self, payload: &MessagePayload) -> Result<Vec<SendOutcome>, InfraError> {
        self.sent.lock().unwrap().push(payload.clone());
        match &self.response {
            MockResponse::Outcomes(outcomes) => Ok(outcomes.clone()),
            MockResponse::Failure(message) => Err(InfraError::unexpected(message.clone())),
        }
    }
}

// ===== RecordingLogger =====

/// 受け取ったメッセージを記録するログ出力先
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録されたメッセージ一覧
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl TransportLogger for RecordingLogger {
    fn log(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
