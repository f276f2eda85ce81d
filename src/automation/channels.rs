//! Communication channels for the reforge automation

use super::types::{AutomationCommand, AutomationEvent};
use tokio::sync::mpsc;

/// Create the command channel and the event channel
///
/// Events are unbounded so the blocking worker never waits on the UI.
pub fn create_automation_channels() -> (
    mpsc::Sender<AutomationCommand>,
    mpsc::Receiver<AutomationCommand>,
    mpsc::UnboundedSender<AutomationEvent>,
    mpsc::UnboundedReceiver<AutomationEvent>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (cmd_tx, cmd_rx, event_tx, event_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::RunState;

    #[tokio::test]
    async fn test_channels_deliver_in_order() {
        let (cmd_tx, mut cmd_rx, event_tx, mut event_rx) = create_automation_channels();
        cmd_tx.send(AutomationCommand::Stop).await.unwrap();
        assert_eq!(cmd_rx.recv().await, Some(AutomationCommand::Stop));

        event_tx.send(AutomationEvent::StateChanged(RunState::Preparing)).unwrap();
        event_tx.send(AutomationEvent::StateChanged(RunState::Attempting(1))).unwrap();
        drop(event_tx);
        let mut states = Vec::new();
        while let Some(event) = event_rx.recv().await {
            if let AutomationEvent::StateChanged(state) = event {
                states.push(state);
            }
        }
        assert_eq!(states, vec![RunState::Preparing, RunState::Attempting(1)]);
    }
}
