use std::sync::mpsc::{self, Sender};
use std::thread;

use log::debug;
use tokio::sync::oneshot;

use super::{barcode_slot, qr_slot, BarcodeSlot, EncodedSymbols, QrSlot, SymbolOptions};
use crate::{Error, LabelRecord, Result};

enum Command {
    Barcode(String, oneshot::Sender<BarcodeSlot>),
    Qr(String, oneshot::Sender<QrSlot>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly symbol encoder backed by a dedicated worker thread.
///
/// Each request completes through a oneshot channel, so callers on an event
/// loop can await encodes without blocking. Results carry the value they were
/// encoded from; feed them to [`crate::LabelEditor::accept_symbols`] which
/// discards any that a newer edit has superseded.
#[derive(Clone)]
pub struct SymbolWorker {
    cmd_tx: Sender<Command>,
}

impl SymbolWorker {
    /// Spawn the worker thread.
    pub fn spawn(options: SymbolOptions) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Barcode(value, resp) => {
                        let _ = resp.send(barcode_slot(&value, &options.barcode));
                    }
                    Command::Qr(value, resp) => {
                        let _ = resp.send(qr_slot(&value, &options.qr));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            debug!("symbol worker stopped");
        });

        Self { cmd_tx }
    }

    /// Encode a tracking number on the worker thread
    pub async fn encode_barcode(&self, value: &str) -> Result<BarcodeSlot> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Barcode(value.to_string(), tx))
            .map_err(|_| Error::Other("Symbol worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Barcode encode canceled: {}", e)))
    }

    /// Encode an order id on the worker thread
    pub async fn encode_qr(&self, value: &str) -> Result<QrSlot> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Qr(value.to_string(), tx))
            .map_err(|_| Error::Other("Symbol worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("QR encode canceled: {}", e)))
    }

    /// Encode both symbols for `record`, keyed by the values it holds now.
    pub async fn encode_for(&self, record: &LabelRecord) -> Result<EncodedSymbols> {
        let (barcode, qr) = futures::join!(
            self.encode_barcode(&record.resi_number),
            self.encode_qr(&record.order_id)
        );
        Ok(EncodedSymbols {
            barcode: Some(barcode?),
            qr: Some(qr?),
        })
    }

    /// Stop the worker thread. Other clones of this handle stop working too.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn worker_encodes_and_closes() {
        let worker = SymbolWorker::spawn(SymbolOptions::default());
        let slot = worker.encode_barcode("SPXID064356436531").await.unwrap();
        assert_eq!(slot.source, "SPXID064356436531");
        assert_eq!(slot.options, SymbolOptions::default().barcode);
        assert!(slot.image.is_some());

        let empty = worker.encode_qr("").await.unwrap();
        assert!(empty.image.is_none());

        let clone = worker.clone();
        worker.close().await.unwrap();
        assert!(clone.encode_qr("late").await.is_err());
    }
}
