use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::bridge::relay::{BridgeMessage, MessageBridge, RelayReply};
use crate::error::AutofillError;

struct Envelope {
    message: BridgeMessage,
    reply: Sender<Result<RelayReply, AutofillError>>,
}

/// Runs a bridge on its own worker thread, like an extension background
/// context. Callers send a message and block on the single reply.
pub struct BackgroundBridge {
    sender: Option<Sender<Envelope>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundBridge {
    pub fn spawn(bridge: Box<dyn MessageBridge + Send>) -> Result<Self, AutofillError> {
        let (sender, receiver) = mpsc::channel::<Envelope>();

        let worker = thread::Builder::new()
            .name("rexy-relay".into())
            .spawn(move || {
                for envelope in receiver {
                    let result = bridge.send(envelope.message);
                    // Caller may have gone away; nothing to report to.
                    let _ = envelope.reply.send(result);
                }
                debug!("relay worker stopped");
            })
            .map_err(|e| AutofillError::BridgeClosed(format!("failed to start relay worker: {}", e)))?;

        Ok(BackgroundBridge {
            sender: Some(sender),
            worker: Some(worker),
        })
    }
}

impl MessageBridge for BackgroundBridge {
    fn send(&self, message: BridgeMessage) -> Result<RelayReply, AutofillError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| AutofillError::BridgeClosed("relay worker shut down".into()))?;

        let (reply, response) = mpsc::channel();
        sender
            .send(Envelope { message, reply })
            .map_err(|_| AutofillError::BridgeClosed("relay worker is not running".into()))?;

        response
            .recv()
            .map_err(|_| AutofillError::BridgeClosed("relay worker dropped the request".into()))?
    }
}

impl Drop for BackgroundBridge {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
