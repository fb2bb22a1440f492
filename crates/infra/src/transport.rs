//! # メールトランスポート
//!
//! [`EmailMessage`] を送信するトランスポートを提供する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailTransport` でメール送信を抽象化
//! - **2 つの実装**: Mandrill（本番用）、Noop（送信無効化・テスト用）
//! - **環境変数切替**: `MAIL_TRANSPORT` でランタイム選択
//! - **エラーの 2 段階ポリシー**: 呼び出し元に返すのは送信拒否（[`MailError::SendingFailed`]）のみ。
//!   それ以外の失敗はログ出力先に記録して `Ok(())` を返す

mod mandrill;
mod noop;

use std::sync::Arc;

use async_trait::async_trait;
use mailbridge_domain::{EmailMessage, MailError};
pub use mandrill::MandrillTransport;
pub use noop::NoopTransport;

use crate::{
    config::{TransportBackend, TransportConfig},
    logger::TransportLogger,
    mandrill::MandrillApi,
};

/// メール送信トレイト
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// メールを送信する
    ///
    /// 送信 API に拒否された場合のみ `Err` を返す。
    async fn send_message(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// 設定に応じたトランスポートを作成する
pub fn build_transport(
    config: &TransportConfig,
    logger: Arc<dyn TransportLogger>,
) -> Arc<dyn MailTransport> {
    tracing::info!(backend = %config.backend, "メールトランスポートを初期化");
    match config.backend {
        TransportBackend::Mandrill => Arc::new(MandrillTransport::new(
            MandrillApi::from_config(&config.mandrill),
            logger,
        )),
        TransportBackend::Noop => Arc::new(NoopTransport),
    }
}
