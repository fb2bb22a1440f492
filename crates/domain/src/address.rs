//! # メールアドレス
//!
//! 送信元・宛先を表す値オブジェクト。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MailError;

/// メールアドレスの最大長
const MAX_EMAIL_LENGTH: usize = 255;

/// メールアドレスと表示名（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
/// 表示名は任意で、未設定の場合は空文字列として扱う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    email: String,
    name:  Option<String>,
}

impl Address {
    /// 表示名なしのアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式である
    /// - 最大 255 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `MailError::Validation` を返す。
    pub fn new(email: impl Into<String>) -> Result<Self, MailError> {
        let email = email.into();
        validate_email(&email)?;
        Ok(Self { email, name: None })
    }

    /// 表示名付きのアドレスを作成する
    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Result<Self, MailError> {
        let mut address = Self::new(email)?;
        let name = name.into();
        address.name = (!name.is_empty()).then_some(name);
        Ok(address)
    }

    /// メールアドレスを取得する
    pub fn email(&self) -> &str {
        &self.email
    }

    /// 表示名を取得する
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 表示名を取得する（未設定の場合は空文字列）
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

fn validate_email(value: &str) -> Result<(), MailError> {
    if value.is_empty() {
        return Err(MailError::Validation(
            "メールアドレスは必須です".to_string(),
        ));
    }

    let Some((local, domain)) = value.split_once('@') else {
        return Err(MailError::Validation(
            "メールアドレスの形式が不正です".to_string(),
        ));
    };

    if local.is_empty() || domain.is_empty() {
        return Err(MailError::Validation(
            "メールアドレスの形式が不正です".to_string(),
        ));
    }

    if value.len() > MAX_EMAIL_LENGTH {
        return Err(MailError::Validation(
            "メールアドレスは255文字以内である必要があります".to_string(),
        ));
    }

    Ok(())
}
