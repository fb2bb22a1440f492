//! # メール送信エラー定義
//!
//! トランスポートから呼び出し元に返されるエラーを表現する。
//!
//! ## 設計方針
//!
//! - **呼び出し元に返すのは送信拒否のみ**: 通信失敗や本文不正はトランスポート内部で
//!   ログ出力して握りつぶすため、ここには含めない
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## 使用例
//!
//! ```rust
//! use mailbridge_domain::MailError;
//!
//! let error = MailError::sending_failed("spam");
//! assert_eq!(error.to_string(), "Email sending failed: spam");
//! ```

use thiserror::Error;

/// メール送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    /// 送信 API がメールを拒否した
    ///
    /// メッセージ文言は送信 API 側の拒否理由をそのまま埋め込む固定書式。
    #[error("Email sending failed: {reason}")]
    SendingFailed {
        /// 送信 API が返した拒否理由（例: "spam", "hard-bounce"）
        reason: String,
    },

    /// バリデーションエラー
    ///
    /// メールアドレスの形式不正など、メッセージ構築時の入力エラー。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}

impl MailError {
    /// 送信拒否エラーを生成する
    pub fn sending_failed(reason: impl Into<String>) -> Self {
        Self::SendingFailed {
            reason: reason.into(),
        }
    }

    /// 送信拒否エラーの場合、拒否理由を返す
    pub fn reject_reason(&self) -> Option<&str> {
        match self {
            Self::SendingFailed { reason } => Some(reason),
            Self::Validation(_) => None,
        }
    }
}
