//! # MailBridge ドメイン層
//!
//! 送信対象のメールメッセージを表現するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **送信手段から独立**: メッセージモデルは Mandrill などの送信 API を知らない
//! - **値オブジェクト**: [`Address`] は生成時にバリデーションを行う
//! - **ドメインエラー**: 呼び出し元に返すメール送信エラーは [`MailError`] に集約する
//!
//! ## 依存関係の方向
//!
//! ```text
//! infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`address`] - メールアドレスと表示名
//! - [`message`] - メールメッセージ、本文、パート
//! - [`error`] - メール送信エラー
//!
//! ## 使用例
//!
//! ```rust
//! use mailbridge_domain::{Address, BodyPart, EmailMessage, MessageBody};
//!
//! let message = EmailMessage::builder()
//!     .subject("ご注文ありがとうございます")
//!     .from(Address::with_name("shop@example.com", "Example Shop").unwrap())
//!     .to(Address::new("customer@example.com").unwrap())
//!     .body(MessageBody::SinglePart(BodyPart::html("<p>Hello</p>")))
//!     .build();
//!
//! assert_eq!(message.to().len(), 1);
//! ```

pub mod address;
pub mod error;
pub mod message;

pub use address::Address;
pub use error::MailError;
pub use message::{BodyPart, Disposition, EmailMessage, EmailMessageBuilder, MessageBody};
