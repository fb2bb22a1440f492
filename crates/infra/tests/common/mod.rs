//! テスト共通フィクスチャ
//!
//! Mandrill API を wiremock で代替する統合テストの共通ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mailbridge_domain::{Address, BodyPart, EmailMessage, MessageBody};
use mailbridge_infra::{MandrillApi, MandrillConfig, MandrillTransport, TransportLogger};
use mailbridge_shared::observability::{LogFormat, TracingConfig, init_tracing};
use wiremock::MockServer;

/// テスト用の API キー
pub const API_KEY: &str = "md-test-key";

/// 受け取ったメッセージを記録するログ出力先
#[derive(Clone, Default)]
pub struct CollectingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingLogger {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl TransportLogger for CollectingLogger {
    fn log(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// トレーシングを初期化する（複数回呼んでもよい）
pub fn setup_tracing() {
    init_tracing(&TracingConfig::new("mailbridge-test", LogFormat::Pretty).with_default_filter("debug"));
}

/// モックサーバーに接続するトランスポートを作成する
pub fn transport_for(server: &MockServer, logger: &CollectingLogger) -> MandrillTransport {
    let config = MandrillConfig::with_api_key(API_KEY).with_base_url(server.uri());
    MandrillTransport::new(MandrillApi::from_config(&config), Arc::new(logger.clone()))
}

/// To 1 件・BCC 1 件・HTML 本文のメッセージ
pub fn order_confirmation() -> EmailMessage {
    EmailMessage::builder()
        .subject("ご注文確認")
        .from(Address::with_name("shop@example.com", "Example Shop").unwrap())
        .to(Address::with_name("customer@example.com", "Customer").unwrap())
        .bcc(Address::new("audit@example.com").unwrap())
        .header("Reply-To", "support@example.com")
        .body(MessageBody::SinglePart(BodyPart::html("<p>Thank you</p>")))
        .build()
}
