use crate::catalog::{self, Catalog, CatalogSource, LoadFailure};
use crate::config;
use crate::i18n::Language;
use ratatui::style::Color;
use std::time::Duration;
use tokio::sync::mpsc;

pub enum Action {
    LoadCatalog { generation: u64, language: Option<Language> },
}

pub enum NetworkEvent {
    CatalogLoaded {
        generation: u64,
        result: Result<Catalog, LoadFailure>,
    },
    AccentUpdate(Color),
}

pub async fn run_network_loop(
    source: CatalogSource,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    event_tx: mpsc::UnboundedSender<NetworkEvent>,
) {
    let client = reqwest::Client::builder()
        .user_agent(concat!("rchapters/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(20))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    while let Some(action) = action_rx.recv().await {
        let client = client.clone();
        let source = source.clone();
        let event_tx = event_tx.clone();

        tokio::spawn(async move {
            match action {
                Action::LoadCatalog { generation, language } => {
                    let result = catalog::load(&client, &source, language).await;
                    match &result {
                        Ok(catalog) => log::info!("catalog #{} loaded: {} chapters", generation, catalog.len()),
                        Err(e) => log::error!("catalog #{} failed: {}", generation, e),
                    }
                    let _ = event_tx.send(NetworkEvent::CatalogLoaded { generation, result });
                }
            }
        });
    }
}

pub async fn run_config_watcher(event_tx: mpsc::UnboundedSender<NetworkEvent>) {
    let mut last_color = config::load_config().accent;
    let mut interval = tokio::time::interval(Duration::from_secs(1));

    loop {
        interval.tick().await;
        let new_color = config::load_config().accent;
        if new_color != last_color {
            last_color = new_color;
            log::debug!("accent color changed to {:?}", new_color);
            if event_tx.send(NetworkEvent::AccentUpdate(new_color)).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_action_answers_with_same_generation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("chapters.json"),
            r#"{ "chapters": [ { "id": 9, "title": "Nine", "description": "" } ] }"#,
        )
        .unwrap();

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_network_loop(
            CatalogSource::new(dir.path().to_string_lossy()),
            action_rx,
            event_tx,
        ));

        action_tx.send(Action::LoadCatalog { generation: 3, language: None }).unwrap();
        match event_rx.recv().await {
            Some(NetworkEvent::CatalogLoaded { generation, result }) => {
                assert_eq!(generation, 3);
                assert_eq!(result.unwrap().chapters()[0].id, 9);
            }
            _ => panic!("expected a catalog event"),
        }
    }
}
