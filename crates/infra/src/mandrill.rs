//! # Mandrill API
//!
//! Mandrill の `messages/send` を呼び出すためのモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MandrillClient` で API 呼び出しを抽象化し、テストではモックに差し替える
//! - **プロバイダ**: [`MandrillApi`] が設定からクライアントを用意する。
//!   連携が無効、または API キー未設定の場合はクライアントを提供しない

mod api;
mod client;
pub mod payload;

pub use api::MandrillApi;
use async_trait::async_trait;
pub use client::HttpMandrillClient;
pub use payload::{Attachment, DeliveryStatus, MessagePayload, Recipient, RecipientType, SendOutcome};

use crate::error::InfraError;

/// Mandrill API クライアントトレイト
#[async_trait]
pub trait MandrillClient: Send + Sync {
    /// メッセージを送信し、宛先ごとの送信結果を返す
    async fn send_message(&self, payload: &MessagePayload) -> Result<Vec<SendOutcome>, InfraError>;
}
