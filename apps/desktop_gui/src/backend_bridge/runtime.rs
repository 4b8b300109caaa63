//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use swipe_core::{fetch_with_fallback, CataasItemSource, FallbackItems, ImageFetcher, Settings};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::decode_preview_image;

struct Backend {
    primary: CataasItemSource,
    fallback: FallbackItems,
    images: ImageFetcher,
}

impl Backend {
    fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            primary: CataasItemSource::from_settings(settings)?,
            fallback: FallbackItems::from_settings(settings)?,
            images: ImageFetcher::from_settings(settings)?,
        })
    }
}

fn startup_failure(ui_tx: &Sender<UiEvent>, message: String) {
    tracing::error!("{message}");
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
        UiErrorContext::BackendStartup,
        message,
    )));
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                startup_failure(&ui_tx, format!("failed to build runtime: {err}"));
                return;
            }
        };

        let backend = match Backend::from_settings(&settings) {
            Ok(backend) => Arc::new(backend),
            Err(err) => {
                startup_failure(&ui_tx, format!("failed to prepare HTTP clients: {err:#}"));
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                let backend = Arc::clone(&backend);
                let ui_tx = ui_tx.clone();
                match cmd {
                    BackendCommand::FetchItems { generation, count } => {
                        tokio::spawn(async move {
                            let event = match fetch_with_fallback(
                                &backend.primary,
                                &backend.fallback,
                                count,
                            )
                            .await
                            {
                                Ok(supplied) => UiEvent::ItemsLoaded {
                                    generation,
                                    items: supplied.items,
                                    origin: supplied.origin,
                                },
                                Err(err) => {
                                    tracing::error!(generation, "no items for session: {err}");
                                    UiEvent::SupplyFailed {
                                        generation,
                                        error: UiError::from_message(
                                            UiErrorContext::LoadItems,
                                            err.to_string(),
                                        ),
                                    }
                                }
                            };
                            let _ = ui_tx.send(event);
                        });
                    }
                    BackendCommand::FetchImage {
                        session_id,
                        item,
                        position,
                        purpose,
                    } => {
                        tokio::spawn(async move {
                            let result = backend
                                .images
                                .load(&item, position, purpose, |bytes| {
                                    decode_preview_image(bytes, purpose)
                                })
                                .await;
                            let event = match result {
                                Ok(loaded) => UiEvent::ImageLoaded {
                                    session_id,
                                    item_id: item.id,
                                    purpose,
                                    image: loaded.image,
                                    substituted: loaded.substituted,
                                },
                                Err(err) => UiEvent::ImageFailed {
                                    session_id,
                                    item_id: item.id,
                                    purpose,
                                    error: UiError::from_message(
                                        UiErrorContext::LoadImage,
                                        err.to_string(),
                                    ),
                                },
                            };
                            let _ = ui_tx.send(event);
                        });
                    }
                }
            }
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}
