//! # Mandrill ペイロード
//!
//! `messages/send` のリクエスト・レスポンスの JSON 形式を定義する。
//!
//! リクエスト:
//!
//! ```json
//! {
//!   "key": "<API キー>",
//!   "message": {
//!     "subject": "...", "from_name": "...", "from_email": "...",
//!     "to": [{"email": "...", "name": "...", "type": "bcc"}],
//!     "headers": {"Reply-To": "..."},
//!     "html": "...",
//!     "attachments": [{"type": "image/png", "name": "x.png", "content": "<base64>"}]
//!   }
//! }
//! ```
//!
//! レスポンス: 宛先ごとの `[{"email", "status", "reject_reason", "_id"}]`

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use mailbridge_domain::{Address, BodyPart};
use serde::{Deserialize, Serialize};

/// 送信メッセージ
///
/// 送信ごとに新規作成し、1 回だけ使用する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub subject:     String,
    pub from_name:   String,
    pub from_email:  String,
    /// To → BCC の順に並ぶ宛先
    pub to:          Vec<Recipient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers:     Option<BTreeMap<String, String>>,
    pub html:        String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

/// 宛先の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Bcc,
}

/// 宛先
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name:  String,
    /// To の場合は省略する
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind:  Option<RecipientType>,
}

impl Recipient {
    /// To の宛先を作成する
    pub fn to(address: &Address) -> Self {
        Self {
            email: address.email().to_string(),
            name:  address.name_or_empty().to_string(),
            kind:  None,
        }
    }

    /// BCC の宛先を作成する
    pub fn bcc(address: &Address) -> Self {
        Self {
            kind: Some(RecipientType::Bcc),
            ..Self::to(address)
        }
    }
}

/// 添付ファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME タイプ
    #[serde(rename = "type")]
    pub mime_type: String,
    /// ファイル名
    pub name:      String,
    /// base64 エンコードした内容
    pub content:   String,
}

impl Attachment {
    /// 本文パートから添付ファイルを作成する
    ///
    /// ファイル名がない場合は空文字列とする。
    pub fn from_part(part: &BodyPart) -> Self {
        Self {
            mime_type: part.mime_type().to_string(),
            name:      part.filename().unwrap_or_default().to_string(),
            content:   STANDARD.encode(part.content()),
        }
    }
}

/// `messages/send` のリクエスト本文
#[derive(Debug, Serialize)]
pub(crate) struct SendRequest<'a> {
    pub key:     &'a str,
    pub message: &'a MessagePayload,
}

/// 宛先ごとの送信ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Queued,
    Scheduled,
    Rejected,
    Invalid,
    /// 未知のステータス
    #[serde(other)]
    Unknown,
}

/// 宛先ごとの送信結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    #[serde(default)]
    pub email:         Option<String>,
    #[serde(default)]
    pub status:        Option<DeliveryStatus>,
    #[serde(default)]
    pub reject_reason: Option<String>,
    #[serde(rename = "_id", default)]
    pub id:            Option<String>,
}

impl SendOutcome {
    /// 送信成功の結果を作成する
    pub fn sent(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            status: Some(DeliveryStatus::Sent),
            ..Self::default()
        }
    }

    /// 送信拒否の結果を作成する
    pub fn rejected(email: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            status: Some(DeliveryStatus::Rejected),
            reject_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.status == Some(DeliveryStatus::Rejected)
    }
}

/// Mandrill のエラーレスポンス
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub name:    String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_toの宛先にはtypeキーが出力されない() {
        let address = Address::with_name("a@example.com", "A").unwrap();
        let value = serde_json::to_value(Recipient::to(&address)).unwrap();
        assert_eq!(value, json!({"email": "a@example.com", "name": "A"}));
    }

    #[test]
    fn test_bccの宛先にはtype_bccが出力される() {
        let address = Address::new("b@example.com").unwrap();
        let value = serde_json::to_value(Recipient::bcc(&address)).unwrap();
        assert_eq!(
            value,
            json!({"email": "b@example.com", "name": "", "type": "bcc"})
        );
    }

    #[test]
    fn test_添付なしヘッダーなしのペイロードはキーを省略する() {
        let payload = MessagePayload {
            subject: "件名".to_string(),
            html: "Hello".to_string(),
            ..MessagePayload::default()
        };
        let value = serde_json::to_value(&payload).unwrap();

        let object = value.as_object().unwrap();
        assert!(!object.contains_key("attachments"));
        assert!(!object.contains_key("headers"));
        assert_eq!(object["from_name"], "");
        assert_eq!(object["from_email"], "");
    }

    #[test]
    fn test_添付ファイルの内容はbase64エンコードされる() {
        let part = BodyPart::attachment(vec![0x89, b'P', b'N', b'G'], "image/png", "x.png");
        let value = serde_json::to_value(Attachment::from_part(&part)).unwrap();
        assert_eq!(
            value,
            json!({"type": "image/png", "name": "x.png", "content": "iVBORw=="})
        );
    }

    #[test]
    fn test_送信結果をデシリアライズできる() {
        let body = r#"[
            {"email": "a@example.com", "status": "sent", "reject_reason": null, "_id": "abc"},
            {"email": "b@example.com", "status": "rejected", "reject_reason": "spam", "_id": "def"},
            {}
        ]"#;
        let outcomes: Vec<SendOutcome> = serde_json::from_str(body).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].status, Some(DeliveryStatus::Sent));
        assert_eq!(outcomes[0].id.as_deref(), Some("abc"));
        assert!(outcomes[1].is_rejected());
        assert_eq!(outcomes[1].reject_reason.as_deref(), Some("spam"));
        assert_eq!(outcomes[2], SendOutcome::default());
    }

    #[test]
    fn test_未知のステータスはunknownになる() {
        let outcome: SendOutcome = serde_json::from_str(r#"{"status": "deferred"}"#).unwrap();
        assert_eq!(outcome.status, Some(DeliveryStatus::Unknown));
        assert!(!outcome.is_rejected());
    }

    #[test]
    fn test_リクエスト本文はkeyとmessageを持つ() {
        let payload = MessagePayload::default();
        let request = SendRequest {
            key:     "md-key",
            message: &payload,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["key"], "md-key");
        assert!(value["message"].is_object());
    }
}
