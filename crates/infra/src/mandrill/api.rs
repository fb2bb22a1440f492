//! Mandrill API プロバイダ
//!
//! 設定からクライアントを構築し、トランスポートに提供する。
//! クライアントを提供できないこと自体はエラーではなく、送信をスキップする合図として扱う。

use std::{fmt, sync::Arc};

use super::{HttpMandrillClient, MandrillClient};
use crate::config::MandrillConfig;

/// Mandrill API プロバイダ
#[derive(Clone)]
pub struct MandrillApi {
    client: Option<Arc<dyn MandrillClient>>,
}

impl MandrillApi {
    /// 設定からプロバイダを作成する
    ///
    /// 以下の場合はクライアントを提供しない:
    ///
    /// - 連携が無効（`enabled = false`）
    /// - API キーが未設定
    /// - HTTP クライアントの構築に失敗
    pub fn from_config(config: &MandrillConfig) -> Self {
        if !config.enabled {
            tracing::debug!("Mandrill 連携は無効です");
            return Self::disabled();
        }

        let Some(api_key) = config.api_key.as_deref().filter(|key| !key.is_empty()) else {
            tracing::debug!("MANDRILL_API_KEY が未設定のため Mandrill クライアントを作成しません");
            return Self::disabled();
        };

        match HttpMandrillClient::new(&config.base_url, api_key, config.timeout) {
            Ok(client) => Self::with_client(Arc::new(client)),
            Err(e) => {
                tracing::warn!(error = %e, "Mandrill クライアントの作成に失敗");
                Self::disabled()
            }
        }
    }

    /// 任意のクライアントでプロバイダを作成する
    pub fn with_client(client: Arc<dyn MandrillClient>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// クライアントを提供しないプロバイダを作成する
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// API クライアントを取得する
    ///
    /// 利用できない場合は `None`。
    pub fn api(&self) -> Option<Arc<dyn MandrillClient>> {
        self.client.clone()
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }
}

impl fmt::Debug for MandrillApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MandrillApi")
            .field("available", &self.is_available())
            .finish()
    }
}
