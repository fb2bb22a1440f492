//! # メールメッセージ
//!
//! トランスポートに渡される送信対象メールのモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`EmailMessage`] | メールメッセージ | 件名・送信元・宛先・ヘッダー・本文 |
//! | [`MessageBody`] | 本文 | 単一パートまたはマルチパート |
//! | [`BodyPart`] | パート | 本文の一部、または添付ファイル |
//! | [`Disposition`] | 配置 | パートを本文に埋め込むか添付として扱うか |
//!
//! メッセージはトランスポートから読み取り専用で参照される。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::address::Address;

/// パートの配置（Content-Disposition）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Disposition {
    /// 本文中に表示する
    Inline,
    /// 添付ファイルとして扱う
    Attachment,
}

/// 本文パート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    content:     Vec<u8>,
    mime_type:   String,
    disposition: Option<Disposition>,
    filename:    Option<String>,
}

impl BodyPart {
    /// 配置・ファイル名なしのパートを作成する
    pub fn new(content: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            content:     content.into(),
            mime_type:   mime_type.into(),
            disposition: None,
            filename:    None,
        }
    }

    /// `text/html` のパートを作成する
    pub fn html(content: impl Into<String>) -> Self {
        Self::new(content.into(), "text/html")
    }

    /// `text/plain` のパートを作成する
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content.into(), "text/plain")
    }

    /// 添付ファイルのパートを作成する
    pub fn attachment(
        content: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self::new(content, mime_type)
            .with_disposition(Disposition::Attachment)
            .with_filename(filename)
    }

    /// 配置を設定する
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = Some(disposition);
        self
    }

    /// ファイル名を設定する
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// 生のコンテンツ
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// MIME タイプ（例: "text/html", "image/png"）
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn disposition(&self) -> Option<Disposition> {
        self.disposition
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// 添付ファイルとして扱うパートかどうか
    pub fn is_attachment(&self) -> bool {
        self.disposition == Some(Disposition::Attachment)
    }
}

/// メール本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// 単一パート
    SinglePart(BodyPart),
    /// マルチパート（パート順を保持する）
    MultiPart(Vec<BodyPart>),
}

impl MessageBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::MultiPart(_))
    }

    /// 全パートをスライスとして返す
    pub fn parts(&self) -> &[BodyPart] {
        match self {
            Self::SinglePart(part) => std::slice::from_ref(part),
            Self::MultiPart(parts) => parts,
        }
    }
}

impl Default for MessageBody {
    fn default() -> Self {
        Self::MultiPart(Vec::new())
    }
}

/// メールメッセージ
///
/// [`EmailMessage::builder`] で組み立てる。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailMessage {
    subject: String,
    from:    Vec<Address>,
    to:      Vec<Address>,
    bcc:     Vec<Address>,
    headers: Option<BTreeMap<String, String>>,
    body:    MessageBody,
}

impl EmailMessage {
    pub fn builder() -> EmailMessageBuilder {
        EmailMessageBuilder::default()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// 送信元アドレス一覧
    pub fn from(&self) -> &[Address] {
        &self.from
    }

    /// 先頭の送信元アドレス
    pub fn sender(&self) -> Option<&Address> {
        self.from.first()
    }

    /// 宛先（To）一覧
    pub fn to(&self) -> &[Address] {
        &self.to
    }

    /// BCC 一覧
    pub fn bcc(&self) -> &[Address] {
        &self.bcc
    }

    /// 追加ヘッダー（ヘッダー名 → 値）
    pub fn headers(&self) -> Option<&BTreeMap<String, String>> {
        self.headers.as_ref()
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }
}

/// [`EmailMessage`] のビルダー
#[derive(Debug, Default)]
pub struct EmailMessageBuilder {
    message: EmailMessage,
}

impl EmailMessageBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.message.subject = subject.into();
        self
    }

    /// 送信元を追加する
    pub fn from(mut self, address: Address) -> Self {
        self.message.from.push(address);
        self
    }

    /// 宛先（To）を追加する
    pub fn to(mut self, address: Address) -> Self {
        self.message.to.push(address);
        self
    }

    /// BCC を追加する
    pub fn bcc(mut self, address: Address) -> Self {
        self.message.bcc.push(address);
        self
    }

    /// ヘッダーを 1 件追加する
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message
            .headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: MessageBody) -> Self {
        self.message.body = body;
        self
    }

    pub fn build(self) -> EmailMessage {
        self.message
    }
}
