//! Bridges the async ledger feed onto the render thread.

use std::thread;

use crossbeam_channel::Receiver;
use tokio::sync::mpsc::UnboundedSender;
use xrpl_feed::{run_feed, FeedCommand, FeedConfig, FeedEvent};

pub struct FeedHandle {
    pub events: Receiver<FeedEvent>,
    commands: UnboundedSender<FeedCommand>,
}

impl FeedHandle {
    /// Asks the feed thread for expanded detail on one ledger.
    pub fn request_detail(&self, ledger_index: u64) {
        // A dead feed thread just means the panel stays on "no data".
        let _ = self
            .commands
            .send(FeedCommand::FetchLedger { ledger_index });
    }
}

/// Spawns the feed client on its own thread with a current-thread runtime.
pub fn spawn_feed(config: FeedConfig) -> FeedHandle {
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();

    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .unwrap();

        rt.block_on(run_feed(config, event_tx, command_rx));
        log::info!("Feed thread completed");
    });

    FeedHandle {
        events: event_rx,
        commands: command_tx,
    }
}
