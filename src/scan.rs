use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::message::Message;

/// Source of decoded codes, typically a camera capture/decode pipeline.
///
/// Holding an implementation holds the capture resource; dropping it
/// releases the device. `next_code` returns `None` when the stream ends
/// without a decode (device lost, capture cancelled).
#[async_trait]
pub trait CodeSource: Send {
    async fn next_code(&mut self) -> Option<String>;
}

/// A running scan: a background decode loop that feeds the first decoded
/// code into the list's message channel as search input.
///
/// The loop stops itself after one non-empty decode, dropping the source
/// and with it the capture resource. Dropping the session (the scan view
/// being dismissed) aborts the loop, which releases the source too — the
/// resource is let go on success, failure, and dismissal alike.
pub struct ScanSession {
    handle: JoinHandle<()>,
}

impl ScanSession {
    pub fn start(mut source: impl CodeSource + 'static, tx: UnboundedSender<Message>) -> Self {
        let handle = tokio::spawn(async move {
            while let Some(code) = source.next_code().await {
                if code.is_empty() {
                    continue;
                }
                log::info!("Scanned code: {}", code);
                let _ = tx.send(Message::CodeScanned(code));
                return;
            }
            log::debug!("Scan ended without a decoded code");
        });
        Self { handle }
    }

    /// Stop scanning without waiting for a decode.
    pub fn dismiss(self) {
        self.handle.abort();
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
