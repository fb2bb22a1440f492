//! Mandrill トランスポート実装
//!
//! [`EmailMessage`] を Mandrill の送信ペイロードに変換し、`messages/send` を呼び出す。
//!
//! 処理の流れ:
//!
//! ```text
//! API クライアント取得 → ペイロード構築 → 本文組み立て → 送信 → 結果検査
//! ```
//!
//! 内部処理は [`SendError`] を返し、`send_message` で送信拒否のみを呼び出し元に返す。

use std::sync::Arc;

use async_trait::async_trait;
use mailbridge_domain::{EmailMessage, MailError, MessageBody};
use thiserror::Error;

use super::MailTransport;
use crate::{
    error::InfraError,
    logger::TransportLogger,
    mandrill::{Attachment, MandrillApi, MessagePayload, Recipient, SendOutcome},
};

/// 送信処理の内部エラー
#[derive(Debug, Error)]
enum SendError {
    /// 組み立てた本文が空
    #[error("Empty body")]
    EmptyBody,

    /// 送信結果が 1 件も返らなかった
    #[error("Mandrill API の送信結果が空です")]
    EmptyResult,

    /// 送信 API に拒否された（呼び出し元に返す）
    #[error(transparent)]
    Rejected(MailError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

/// Mandrill トランスポート
///
/// API プロバイダとログ出力先をコンストラクタで受け取る。
/// 送信ごとにペイロードを新規作成し、状態は持たない。
pub struct MandrillTransport {
    api:    MandrillApi,
    logger: Arc<dyn TransportLogger>,
}

impl MandrillTransport {
    pub fn new(api: MandrillApi, logger: Arc<dyn TransportLogger>) -> Self {
        Self { api, logger }
    }

    async fn try_send(&self, message: &EmailMessage) -> Result<(), SendError> {
        let Some(client) = self.api.api() else {
            tracing::debug!(
                subject = %message.subject(),
                "Mandrill クライアントが利用できないため送信をスキップ"
            );
            return Ok(());
        };

        let payload = build_payload(message)?;
        let outcomes = client.send_message(&payload).await?;
        process_result(&outcomes)
    }
}

#[async_trait]
impl MailTransport for MandrillTransport {
    #[tracing::instrument(skip_all, level = "debug", fields(subject = %message.subject()))]
    async fn send_message(&self, message: &EmailMessage) -> Result<(), MailError> {
        match self.try_send(message).await {
            Ok(()) => Ok(()),
            Err(SendError::Rejected(error)) => Err(error),
            Err(other) => {
                self.logger.log(&other.to_string());
                Ok(())
            }
        }
    }
}

/// メッセージからペイロードを構築する
fn build_payload(message: &EmailMessage) -> Result<MessagePayload, SendError> {
    let (from_name, from_email) = message
        .sender()
        .map(|sender| (sender.name_or_empty().to_string(), sender.email().to_string()))
        .unwrap_or_default();

    let to = message
        .to()
        .iter()
        .map(Recipient::to)
        .chain(message.bcc().iter().map(Recipient::bcc))
        .collect();

    let payload = MessagePayload {
        subject: message.subject().to_string(),
        from_name,
        from_email,
        to,
        headers: message.headers().filter(|h| !h.is_empty()).cloned(),
        ..MessagePayload::default()
    };

    prepare_body(payload, message.body())
}

/// 本文を組み立て、`html` と `attachments` を設定する
///
/// マルチパートの場合、添付パートは `attachments` に、それ以外はパート順に連結して本文とする。
/// 本文が空になった場合は送信を中止する。
fn prepare_body(mut payload: MessagePayload, body: &MessageBody) -> Result<MessagePayload, SendError> {
    let mut attachments = Vec::new();
    let mut content = String::new();

    match body {
        MessageBody::MultiPart(parts) => {
            for part in parts {
                if part.is_attachment() {
                    attachments.push(Attachment::from_part(part));
                } else {
                    content.push_str(&String::from_utf8_lossy(part.content()));
                }
            }
        }
        MessageBody::SinglePart(part) => {
            content = String::from_utf8_lossy(part.content()).into_owned();
        }
    }

    if content.is_empty() {
        return Err(SendError::EmptyBody);
    }
    payload.html = content;

    if !attachments.is_empty() {
        payload.attachments = Some(attachments);
    }

    Ok(payload)
}

/// 送信結果を検査する
///
/// 全宛先の結果を確認し、最初に見つかった `rejected` を送信拒否エラーにする。
fn process_result(outcomes: &[SendOutcome]) -> Result<(), SendError> {
    if outcomes.is_empty() {
        return Err(SendError::EmptyResult);
    }

    match outcomes.iter().find(|outcome| outcome.is_rejected()) {
        Some(rejected) => {
            let reason = rejected.reject_reason.clone().unwrap_or_default();
            tracing::info!(
                recipient = rejected.email.as_deref().unwrap_or_default(),
                reason = %reason,
                "Mandrill がメールを拒否"
            );
            Err(SendError::Rejected(MailError::sending_failed(reason)))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use mailbridge_domain::{Address, BodyPart, Disposition};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{
        mandrill::RecipientType,
        mock::{MockMandrillClient, RecordingLogger},
    };

    fn address(email: &str, name: &str) -> Address {
        Address::with_name(email, name).unwrap()
    }

    fn html_message() -> EmailMessage {
        EmailMessage::builder()
            .subject("ご注文確認")
            .from(address("shop@example.com", "Example Shop"))
            .to(address("customer@example.com", "顧客"))
            .body(MessageBody::SinglePart(BodyPart::html("Hello")))
            .build()
    }

    fn transport(client: &MockMandrillClient, logger: &RecordingLogger) -> MandrillTransport {
        MandrillTransport::new(
            MandrillApi::with_client(Arc::new(client.clone())),
            Arc::new(logger.clone()),
        )
    }

    // ===== build_payload =====

    #[test]
    fn test_送信元がなければfrom_nameとfrom_emailは空文字列() {
        let message = EmailMessage::builder()
            .to(address("a@example.com", "A"))
            .body(MessageBody::SinglePart(BodyPart::html("Hello")))
            .build();

        let payload = build_payload(&message).unwrap();
        assert_eq!(payload.from_name, "");
        assert_eq!(payload.from_email, "");

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["from_name"], "");
        assert_eq!(value["from_email"], "");
    }

    #[test]
    fn test_送信元は先頭のアドレスを使う() {
        let message = EmailMessage::builder()
            .from(address("first@example.com", "First"))
            .from(address("second@example.com", "Second"))
            .body(MessageBody::SinglePart(BodyPart::html("Hello")))
            .build();

        let payload = build_payload(&message).unwrap();
        assert_eq!(payload.from_name, "First");
        assert_eq!(payload.from_email, "first@example.com");
    }

    #[rstest]
    #[case(0, 0)]
    #[case(2, 0)]
    #[case(0, 3)]
    #[case(2, 3)]
    fn test_宛先はtoの後にbccが順序を保って並ぶ(#[case] n: usize, #[case] m: usize) {
        let mut builder = EmailMessage::builder().body(MessageBody::SinglePart(BodyPart::html("x")));
        for i in 0..n {
            builder = builder.to(address(&format!("to{i}@example.com"), &format!("To {i}")));
        }
        for i in 0..m {
            builder = builder.bcc(address(&format!("bcc{i}@example.com"), ""));
        }

        let payload = build_payload(&builder.build()).unwrap();

        assert_eq!(payload.to.len(), n + m);
        for (i, recipient) in payload.to[..n].iter().enumerate() {
            assert_eq!(recipient.email, format!("to{i}@example.com"));
            assert_eq!(recipient.name, format!("To {i}"));
            assert_eq!(recipient.kind, None);
        }
        for (i, recipient) in payload.to[n..].iter().enumerate() {
            assert_eq!(recipient.email, format!("bcc{i}@example.com"));
            assert_eq!(recipient.name, "");
            assert_eq!(recipient.kind, Some(RecipientType::Bcc));
        }
    }

    #[test]
    fn test_ヘッダーはそのままコピーされる() {
        let message = EmailMessage::builder()
            .header("Reply-To", "support@example.com")
            .header("X-Tag", "order")
            .body(MessageBody::SinglePart(BodyPart::html("Hello")))
            .build();

        let payload = build_payload(&message).unwrap();
        let headers = payload.headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["Reply-To"], "support@example.com");
        assert_eq!(headers["X-Tag"], "order");
    }

    #[test]
    fn test_ヘッダーがなければheadersは省略される() {
        let payload = build_payload(&html_message()).unwrap();
        assert!(payload.headers.is_none());
    }

    // ===== prepare_body =====

    #[test]
    fn test_単一パートの内容がhtmlになり添付は省略される() {
        let body = MessageBody::SinglePart(BodyPart::html("Hello"));
        let payload = prepare_body(MessagePayload::default(), &body).unwrap();

        assert_eq!(payload.html, "Hello");
        assert!(payload.attachments.is_none());
        let value = serde_json::to_value(&payload).unwrap();
        assert!(!value.as_object().unwrap().contains_key("attachments"));
    }

    #[test]
    fn test_マルチパートの添付パートはattachmentsに入る() {
        let image = vec![0x89, b'P', b'N', b'G'];
        let body = MessageBody::MultiPart(vec![
            BodyPart::text("A").with_disposition(Disposition::Inline),
            BodyPart::attachment(image.clone(), "image/png", "x.png"),
        ]);

        let payload = prepare_body(MessagePayload::default(), &body).unwrap();

        assert_eq!(payload.html, "A");
        let attachments = payload.attachments.unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(
            attachments[0],
            Attachment::from_part(&BodyPart::attachment(image, "image/png", "x.png"))
        );
        assert_eq!(attachments[0].mime_type, "image/png");
        assert_eq!(attachments[0].name, "x.png");
    }

    #[test]
    fn test_マルチパートの本文パートは順番に連結される() {
        let body = MessageBody::MultiPart(vec![
            BodyPart::html("<p>1</p>"),
            BodyPart::attachment(b"pdf".to_vec(), "application/pdf", "a.pdf"),
            BodyPart::html("<p>2</p>"),
        ]);

        let payload = prepare_body(MessagePayload::default(), &body).unwrap();
        assert_eq!(payload.html, "<p>1</p><p>2</p>");
    }

    #[rstest]
    #[case::空の単一パート(MessageBody::SinglePart(BodyPart::html("")))]
    #[case::パートなし(MessageBody::MultiPart(vec![]))]
    #[case::空パートのみ(MessageBody::MultiPart(vec![BodyPart::html(""), BodyPart::text("")]))]
    #[case::添付のみ(MessageBody::MultiPart(vec![BodyPart::attachment(b"x".to_vec(), "text/csv", "a.csv")]))]
    fn test_本文が空ならempty_bodyエラー(#[case] body: MessageBody) {
        let result = prepare_body(MessagePayload::default(), &body);
        assert!(matches!(result, Err(SendError::EmptyBody)));
    }

    // ===== process_result =====

    #[test]
    fn test_rejectedなら拒否理由付きのmail_errorになる() {
        let outcomes = vec![SendOutcome::rejected("a@example.com", "spam")];
        let Err(SendError::Rejected(error)) = process_result(&outcomes) else {
            panic!("Rejected が返ること");
        };
        assert_eq!(error.to_string(), "Email sending failed: spam");
    }

    #[rstest]
    #[case::sent(vec![SendOutcome::sent("a@example.com")])]
    #[case::statusなし(vec![SendOutcome::default()])]
    #[case::queued(vec![SendOutcome { status: Some(crate::mandrill::DeliveryStatus::Queued), ..SendOutcome::default() }])]
    fn test_rejected以外は成功(#[case] outcomes: Vec<SendOutcome>) {
        assert!(process_result(&outcomes).is_ok());
    }

    #[test]
    fn test_2件目以降の宛先の拒否も検出する() {
        let outcomes = vec![
            SendOutcome::sent("a@example.com"),
            SendOutcome::rejected("b@example.com", "hard-bounce"),
        ];
        let result = process_result(&outcomes);
        assert!(matches!(
            result,
            Err(SendError::Rejected(MailError::SendingFailed { reason })) if reason == "hard-bounce"
        ));
    }

    #[test]
    fn test_拒否理由がなければ空文字列で埋め込む() {
        let outcomes = vec![SendOutcome {
            status: Some(crate::mandrill::DeliveryStatus::Rejected),
            ..SendOutcome::default()
        }];
        let Err(SendError::Rejected(error)) = process_result(&outcomes) else {
            panic!("Rejected が返ること");
        };
        assert_eq!(error.reject_reason(), Some(""));
    }

    #[test]
    fn test_送信結果が空ならempty_resultエラー() {
        assert!(matches!(process_result(&[]), Err(SendError::EmptyResult)));
    }

    // ===== send_message =====

    #[tokio::test]
    async fn test_送信成功時はペイロードを送りokを返す() {
        let client = MockMandrillClient::new();
        let logger = RecordingLogger::new();

        let result = transport(&client, &logger).send_message(&html_message()).await;

        assert!(result.is_ok());
        let sent = client.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "ご注文確認");
        assert_eq!(sent[0].from_name, "Example Shop");
        assert_eq!(sent[0].html, "Hello");
        assert!(logger.messages().is_empty());
    }

    #[tokio::test]
    async fn test_クライアントがなければ送信せずokを返す() {
        let logger = RecordingLogger::new();
        let transport = MandrillTransport::new(MandrillApi::disabled(), Arc::new(logger.clone()));

        assert!(transport.send_message(&html_message()).await.is_ok());
        assert!(logger.messages().is_empty());
    }

    #[tokio::test]
    async fn test_本文が空なら送信せずログだけ出してokを返す() {
        let client = MockMandrillClient::new();
        let logger = RecordingLogger::new();
        let message = EmailMessage::builder()
            .to(address("a@example.com", "A"))
            .body(MessageBody::MultiPart(vec![BodyPart::html("")]))
            .build();

        let result = transport(&client, &logger).send_message(&message).await;

        assert!(result.is_ok());
        assert!(client.sent().is_empty());
        assert_eq!(logger.messages(), vec!["Empty body".to_string()]);
    }

    #[tokio::test]
    async fn test_拒否された場合はmail_errorを返しログは出さない() {
        let client = MockMandrillClient::responding(vec![SendOutcome::rejected(
            "customer@example.com",
            "spam",
        )]);
        let logger = RecordingLogger::new();

        let result = transport(&client, &logger).send_message(&html_message()).await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("spam"));
        assert_eq!(error, MailError::sending_failed("spam"));
        assert!(logger.messages().is_empty());
    }

    #[tokio::test]
    async fn test_通信エラーはログに記録してokを返す() {
        let client = MockMandrillClient::failing("connection refused");
        let logger = RecordingLogger::new();

        let result = transport(&client, &logger).send_message(&html_message()).await;

        assert!(result.is_ok());
        assert_eq!(client.sent().len(), 1);
        let messages = logger.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_送信結果が空ならログに記録してokを返す() {
        let client = MockMandrillClient::responding(vec![]);
        let logger = RecordingLogger::new();

        let result = transport(&client, &logger).send_message(&html_message()).await;

        assert!(result.is_ok());
        assert_eq!(
            logger.messages(),
            vec!["Mandrill API の送信結果が空です".to_string()]
        );
    }
}
