//! reqwest による Mandrill API クライアント実装

use std::fmt;

use async_trait::async_trait;

use super::{
    MandrillClient,
    payload::{ErrorResponse, MessagePayload, SendOutcome, SendRequest},
};
use crate::error::InfraError;

/// `messages/send` のパス
const SEND_PATH: &str = "/messages/send.json";

/// HTTP 経由の Mandrill クライアント
///
/// `reqwest::Client` をラップする。タイムアウトは構築時に設定し、
/// リトライは行わない。
#[derive(Clone)]
pub struct HttpMandrillClient {
    http:     reqwest::Client,
    base_url: String,
    api_key:  String,
}

impl HttpMandrillClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: API のベース URL（例: "https://mandrillapp.com/api/1.0"）
    /// - `api_key`: Mandrill の API キー
    /// - `timeout`: リクエストタイムアウト
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, InfraError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn send_url(&self) -> String {
        format!("{}{SEND_PATH}", self.base_url)
    }
}

impl fmt::Debug for HttpMandrillClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMandrillClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MandrillClient for HttpMandrillClient {
    #[tracing::instrument(skip_all, level = "debug", fields(recipients = payload.to.len()))]
    async fn send_message(&self, payload: &MessagePayload) -> Result<Vec<SendOutcome>, InfraError> {
        let request = SendRequest {
            key:     &self.api_key,
            message: payload,
        };

        let response = self.http.post(self.send_url()).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(error) => InfraError::mandrill_api(status.as_u16(), error.name, error.message),
                Err(_) => InfraError::unexpected_status(status.as_u16(), body),
            });
        }

        let outcomes: Vec<SendOutcome> = serde_json::from_str(&body)?;
        tracing::debug!(outcomes = outcomes.len(), "Mandrill 送信結果を受信");
        Ok(outcomes)
    }
}
