//! Background catalog fetch

use std::sync::Arc;

use gamecast_backend::CatalogSource;
use tokio::sync::mpsc;
use tracing::info;

use crate::message::Message;

pub(super) fn spawn_fetch(catalog: Arc<dyn CatalogSource>, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        let msg = match catalog.fetch_catalog().await {
            Ok(games) => {
                info!("Fetched {} games", games.len());
                Message::CatalogLoaded { games }
            }
            Err(error) => Message::CatalogFailed { error },
        };
        let _ = msg_tx.send(msg).await;
    });
}
