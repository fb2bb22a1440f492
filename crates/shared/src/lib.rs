//! # MailBridge 共有ユーティリティ
//!
//! ドメイン層・インフラ層から共通で利用するユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - メール送信のロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は feature で切り替え、最小限に抑える

pub mod observability;

pub use observability::{LogFormat, TracingConfig};
