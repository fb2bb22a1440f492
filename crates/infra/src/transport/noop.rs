//! Noop トランスポート実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! 送信を無効化したい環境やテストで使用する。

use async_trait::async_trait;
use mailbridge_domain::{EmailMessage, MailError};

use super::MailTransport;

/// Noop トランスポート（ログ出力のみ）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransport;

#[async_trait]
impl MailTransport for NoopTransport {
    async fn send_message(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            subject = %message.subject(),
            recipients = message.to().len() + message.bcc().len(),
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
