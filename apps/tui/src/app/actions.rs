use crate::app::requests::{Request, Response};
use crate::device::DeviceClient;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Runs device requests off the UI task and reports back over a channel.
#[derive(Debug, Clone)]
pub struct AppActions {
    client: Arc<DeviceClient>,
    tx: UnboundedSender<Response>,
    next_seq: u64,
}

impl AppActions {
    pub fn new(client: DeviceClient, tx: UnboundedSender<Response>) -> Self {
        Self {
            client: Arc::new(client),
            tx,
            next_seq: 0,
        }
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }

    /// Spawns `request` and returns its sequence number. Requests are never
    /// cancelled; a reply that arrives after shutdown is dropped with the channel.
    pub fn dispatch(&mut self, request: Request) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = request.execute(&client).await;
            if tx
                .send(Response {
                    seq,
                    request,
                    outcome,
                })
                .is_err()
            {
                tracing::debug!(seq, "response receiver gone");
            }
        });

        seq
    }

    pub fn dispatch_all(&mut self, requests: Vec<Request>) {
        for request in requests {
            self.dispatch(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn unreachable_device_reports_a_network_failure() -> color_eyre::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        // Port 9 (discard) on localhost is closed on test machines.
        let client = DeviceClient::new("http://127.0.0.1:9", None)?;
        let mut actions = AppActions::new(client, tx);

        let first = actions.dispatch(Request::Buffer);
        let second = actions.dispatch(Request::Stats);
        assert!(second > first);

        let mut seen = Vec::new();
        for _ in 0..2 {
            let response = rx
                .recv()
                .await
                .ok_or_else(|| color_eyre::eyre::eyre!("channel closed"))?;
            assert!(response.outcome.as_ref().is_err_and(|err| err.is_network()));
            seen.push(response.seq);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![first, second]);
        Ok(())
    }
}
