//! # 送信エラーのログ出力先
//!
//! トランスポートが握りつぶしたエラーのメッセージを受け取る。
//! デフォルト実装 [`TracingLogger`] は `tracing` の warn イベントとして出力する。

/// ログ出力先トレイト
pub trait TransportLogger: Send + Sync {
    /// エラーメッセージを記録する
    fn log(&self, message: &str);
}

/// `tracing` に出力するログ出力先
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TransportLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::warn!(target: "mailbridge::transport", error = message, "メール送信に失敗");
    }
}
