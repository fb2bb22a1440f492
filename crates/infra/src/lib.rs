//! # MailBridge インフラ層
//!
//! メールメッセージを Mandrill API 経由で送信するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはドメイン層の [`EmailMessage`](mailbridge_domain::EmailMessage) を
//! Mandrill の送信リクエストに変換し、API を呼び出し、レスポンスを
//! [`MailError`](mailbridge_domain::MailError) に対応付ける。
//!
//! ## 責務
//!
//! - **トランスポート**: [`MailTransport`] によるメール送信の抽象化
//! - **Mandrill API クライアント**: `messages/send` の呼び出し
//! - **API プロバイダ**: 設定に応じてクライアントを提供（未設定なら提供しない）
//! - **ログ出力先**: 握りつぶした送信エラーの記録先
//!
//! ## 依存関係
//!
//! ```text
//! infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - インフラ層エラー定義
//! - [`logger`] - 送信エラーのログ出力先
//! - [`mandrill`] - Mandrill API のペイロード・クライアント・プロバイダ
//! - [`transport`] - メールトランスポート
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use mailbridge_infra::{TracingLogger, TransportConfig, build_transport};
//!
//! async fn send(message: &mailbridge_domain::EmailMessage) -> Result<(), mailbridge_domain::MailError> {
//!     let config = TransportConfig::from_env();
//!     let transport = build_transport(&config, Arc::new(TracingLogger));
//!
//!     // 送信拒否のみ Err が返る。その他の失敗はログ出力のみ
//!     transport.send_message(message).await
//! }
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod mandrill;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod transport;

pub use config::{MandrillConfig, TransportBackend, TransportConfig};
pub use error::{InfraError, InfraErrorKind};
pub use logger::{TracingLogger, TransportLogger};
pub use mandrill::{HttpMandrillClient, MandrillApi, MandrillClient};
pub use transport::{MailTransport, MandrillTransport, NoopTransport, build_transport};
