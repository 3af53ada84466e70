use crossbeam_channel::{Receiver, Sender, TrySendError};

/// A unit of work run on the render thread.
pub type Command = Box<dyn FnOnce() + Send + 'static>;

/// Runs pending commands synchronously on the render thread.
pub trait CommandDrain {
    /// Runs the commands queued so far; returns how many ran.
    fn drain_pending(&mut self) -> usize;
}

/// Render-thread end of the queue.
#[derive(Debug)]
pub struct CommandQueue {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

/// Producer handle; cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Commands waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDrain for CommandQueue {
    /// Commands posted while draining (including by a running command) wait for the
    /// next drain so one call always terminates.
    fn drain_pending(&mut self) -> usize {
        let budget = self.rx.len();
        let mut ran = 0;
        while ran < budget {
            let Ok(cmd) = self.rx.try_recv() else {
                break;
            };
            cmd();
            ran += 1;
        }
        if ran > 0 {
            log::trace!("drained {ran} command(s)");
        }
        ran
    }
}

impl CommandSender {
    /// Queues `f` for the render thread. Returns `false` if the queue is gone.
    pub fn post<F>(&self, f: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.tx.try_send(Box::new(f)) {
            Ok(()) => true,
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("command dropped: render thread queue closed");
                false
            }
            // Unbounded channel; cannot be full.
            Err(TrySendError::Full(_)) => false,
        }
    }
}
