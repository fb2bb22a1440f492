//! # トランスポート設定
//!
//! 環境変数からメール送信の設定を読み込む。
//!
//! | 環境変数 | デフォルト | 説明 |
//! |---------|-----------|------|
//! | `MAIL_TRANSPORT` | `mandrill` | 送信バックエンド（`mandrill` / `noop`） |
//! | `MANDRILL_ENABLED` | `true` | Mandrill 連携の有効/無効 |
//! | `MANDRILL_API_KEY` | なし | API キー（未設定なら送信しない） |
//! | `MANDRILL_BASE_URL` | `https://mandrillapp.com/api/1.0` | API のベース URL |
//! | `MANDRILL_TIMEOUT_SECS` | `30` | リクエストタイムアウト（秒） |
//!
//! 値が不正な場合はデフォルトにフォールバックし、警告ログを出力する。

use std::{env, fmt, str::FromStr, time::Duration};

/// Mandrill API のデフォルトのベース URL
pub const DEFAULT_MANDRILL_BASE_URL: &str = "https://mandrillapp.com/api/1.0";

/// デフォルトのリクエストタイムアウト
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransportBackend {
    /// Mandrill API 経由で送信する
    #[default]
    Mandrill,
    /// 送信しない（ログ出力のみ）
    Noop,
}

/// トランスポート全体の設定
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub backend:  TransportBackend,
    pub mandrill: MandrillConfig,
}

/// Mandrill 連携の設定
#[derive(Clone)]
pub struct MandrillConfig {
    /// 連携の有効/無効
    pub enabled:  bool,
    /// API キー
    pub api_key:  Option<String>,
    /// API のベース URL（末尾スラッシュなし）
    pub base_url: String,
    /// リクエストタイムアウト
    pub timeout:  Duration,
}

impl TransportConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    ///
    /// テストでは環境変数の代わりに `HashMap` などを渡す。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            backend:  parse_or_default(&lookup, "MAIL_TRANSPORT", TransportBackend::default()),
            mandrill: MandrillConfig::from_lookup(&lookup),
        }
    }
}

impl MandrillConfig {
    /// 環境変数から Mandrill 設定を読み込む
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            enabled:  parse_or_default(&lookup, "MANDRILL_ENABLED", true),
            api_key:  lookup("MANDRILL_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url: lookup("MANDRILL_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_MANDRILL_BASE_URL.to_string()),
            timeout:  Duration::from_secs(parse_or_default(
                &lookup,
                "MANDRILL_TIMEOUT_SECS",
                DEFAULT_TIMEOUT.as_secs(),
            )),
        }
    }

    /// API キーを指定して有効な設定を作成する
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// ベース URL を上書きする
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for MandrillConfig {
    fn default() -> Self {
        Self {
            enabled:  true,
            api_key:  None,
            base_url: DEFAULT_MANDRILL_BASE_URL.to_string(),
            timeout:  DEFAULT_TIMEOUT,
        }
    }
}

// API キーをログに出さない
impl fmt::Debug for MandrillConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MandrillConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, "設定値が不正なためデフォルト値を使用します");
            default
        }
    }
}
