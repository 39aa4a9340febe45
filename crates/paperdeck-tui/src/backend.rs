use std::sync::Arc;

use paperdeck_core::PaperSource;
use tokio::sync::mpsc;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Listen for fetch commands and run each one in its own task.
///
/// Requests are never cancelled; responses are sent back in completion order,
/// which may differ from issue order.
pub async fn run(
    source: Arc<dyn PaperSource>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            BackendCommand::Fetch(fetch) => {
                let source = source.clone();
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    let result = source.fetch(&fetch.request).await;
                    if let Err(e) = &result {
                        tracing::warn!(source = source.name(), seq = fetch.ticket.seq, error = %e, "fetch failed");
                    }
                    let _ = tx.send(BackendEvent::PapersLoaded {
                        ticket: fetch.ticket,
                        result,
                    });
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use paperdeck_core::mock::{MockResponse, MockSource};
    use paperdeck_core::{Config, Paper, PaperListController};

    use super::*;

    #[tokio::test]
    async fn results_come_back_tagged_with_their_ticket() {
        let source: Arc<dyn PaperSource> = Arc::new(MockSource::new(MockResponse::Page(vec![
            Paper::new("A", "a"),
        ])));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(source, cmd_rx, event_tx));

        let mut controller = PaperListController::new(&Config::default());
        let cmd = controller.initial_load();
        let ticket = cmd.ticket;
        cmd_tx.send(BackendCommand::Fetch(cmd)).unwrap();

        let BackendEvent::PapersLoaded { ticket: got, result } = event_rx.recv().await.unwrap();
        assert_eq!(got, ticket);
        assert_eq!(result.unwrap().len(), 1);
    }
}
