// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bridge between the blocking TUI thread and the async network side.
//!
//! The TUI issues commands tagged with caller-chosen sequence numbers and
//! polls for events every tick. Commands execute concurrently; there is no
//! cancellation, stale results are fenced out by their sequence number at
//! the receiving end. Dropping the handle stops the dispatcher.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::ai::{self, AiBackend, GenerationError};
use crate::model::{Document, JsonField, Tour, TourFields, TourId};
use crate::query::TourQuery;
use crate::store::{StoreError, TourPage, TourStore};

#[derive(Debug, Clone)]
pub enum RemoteCommand {
    LoadPage {
        seq: u64,
        query: TourQuery,
    },
    FetchTour {
        seq: u64,
        id: TourId,
    },
    CheckSlug {
        seq: u64,
        slug: String,
        exclude: Option<TourId>,
    },
    Insert {
        seq: u64,
        fields: TourFields,
    },
    Update {
        seq: u64,
        id: TourId,
        fields: TourFields,
    },
    Delete {
        seq: u64,
        id: TourId,
    },
    Generate {
        seq: u64,
        field: JsonField,
        document: Document,
        prompt: String,
    },
}

#[derive(Debug)]
pub enum RemoteEvent {
    PageLoaded {
        seq: u64,
        result: Result<TourPage, StoreError>,
    },
    TourFetched {
        seq: u64,
        result: Result<Tour, StoreError>,
    },
    SlugChecked {
        seq: u64,
        result: Result<bool, StoreError>,
    },
    Inserted {
        seq: u64,
        result: Result<Tour, StoreError>,
    },
    Updated {
        seq: u64,
        result: Result<Tour, StoreError>,
    },
    Deleted {
        seq: u64,
        id: TourId,
        result: Result<(), StoreError>,
    },
    Generated {
        seq: u64,
        field: JsonField,
        result: Result<Document, GenerationError>,
    },
}

/// TUI-side endpoint of the bridge.
pub struct RemoteHandle {
    commands: mpsc::UnboundedSender<RemoteCommand>,
    events: mpsc::UnboundedReceiver<RemoteEvent>,
}

impl RemoteHandle {
    pub fn send(&self, command: RemoteCommand) {
        let _ = self.commands.send(command);
    }

    /// Non-blocking poll, used from the TUI tick.
    pub fn try_next(&mut self) -> Option<RemoteEvent> {
        self.events.try_recv().ok()
    }

    /// Awaits the next event; the async-side counterpart of `try_next`.
    pub async fn next(&mut self) -> Option<RemoteEvent> {
        self.events.recv().await
    }
}

/// Handle wired to bare channels instead of a dispatcher, so TUI logic can
/// run without a runtime and tests can inspect outgoing commands.
#[cfg(test)]
pub(crate) fn test_pair() -> (
    RemoteHandle,
    mpsc::UnboundedReceiver<RemoteCommand>,
    mpsc::UnboundedSender<RemoteEvent>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (
        RemoteHandle {
            commands: command_tx,
            events: event_rx,
        },
        command_rx,
        event_tx,
    )
}

/// Starts the dispatcher on the current runtime and returns its handle.
pub fn spawn(store: Arc<dyn TourStore>, ai: Arc<dyn AiBackend>) -> RemoteHandle {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<RemoteCommand>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<RemoteEvent>();

    tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            let store = store.clone();
            let ai = ai.clone();
            let event_tx = event_tx.clone();
            tokio::spawn(async move {
                let _ = event_tx.send(execute(store, ai, command).await);
            });
        }
    });

    RemoteHandle {
        commands: command_tx,
        events: event_rx,
    }
}

async fn execute(
    store: Arc<dyn TourStore>,
    ai: Arc<dyn AiBackend>,
    command: RemoteCommand,
) -> RemoteEvent {
    match command {
        RemoteCommand::LoadPage { seq, query } => RemoteEvent::PageLoaded {
            seq,
            result: store.list(&query).await,
        },
        RemoteCommand::FetchTour { seq, id } => RemoteEvent::TourFetched {
            seq,
            result: store.fetch(&id).await,
        },
        RemoteCommand::CheckSlug { seq, slug, exclude } => RemoteEvent::SlugChecked {
            seq,
            result: store.slug_exists(&slug, exclude.as_ref()).await,
        },
        RemoteCommand::Insert { seq, fields } => RemoteEvent::Inserted {
            seq,
            result: store.insert(&fields).await,
        },
        RemoteCommand::Update { seq, id, fields } => RemoteEvent::Updated {
            seq,
            result: store.update(&id, &fields).await,
        },
        RemoteCommand::Delete { seq, id } => {
            let result = store.delete(&id).await;
            RemoteEvent::Deleted { seq, id, result }
        }
        RemoteCommand::Generate {
            seq,
            field,
            document,
            prompt,
        } => RemoteEvent::Generated {
            seq,
            field,
            result: ai::generate(ai.as_ref(), &document, &prompt).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{spawn, RemoteCommand, RemoteEvent};
    use crate::ai::{AiBackend, GenerationError};
    use crate::model::{Document, JsonField, TourFields};
    use crate::query::TourQuery;
    use crate::store::MemoryTourStore;

    struct CannedAi(&'static str);

    #[async_trait::async_trait]
    impl AiBackend for CannedAi {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<String, GenerationError> {
            Ok(self.0.to_owned())
        }
    }

    fn demo_handle() -> super::RemoteHandle {
        spawn(
            Arc::new(MemoryTourStore::demo()),
            Arc::new(CannedAi("{\"days\": 7}")),
        )
    }

    #[tokio::test]
    async fn load_page_echoes_the_sequence_number() {
        let mut handle = demo_handle();
        handle.send(RemoteCommand::LoadPage {
            seq: 41,
            query: TourQuery::default(),
        });

        match handle.next().await.expect("event") {
            RemoteEvent::PageLoaded { seq, result } => {
                assert_eq!(seq, 41);
                let page = result.expect("page");
                assert_eq!(page.total, 5);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn insert_then_check_slug() {
        let mut handle = spawn(
            Arc::new(MemoryTourStore::new()),
            Arc::new(CannedAi("{}")),
        );

        let mut fields = TourFields::default();
        fields.set_title("Fjord Week");
        fields.set_slug("fjord-week");
        handle.send(RemoteCommand::Insert { seq: 1, fields });

        match handle.next().await.expect("event") {
            RemoteEvent::Inserted { seq, result } => {
                assert_eq!(seq, 1);
                result.expect("inserted row");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        handle.send(RemoteCommand::CheckSlug {
            seq: 2,
            slug: "fjord-week".to_owned(),
            exclude: None,
        });
        match handle.next().await.expect("event") {
            RemoteEvent::SlugChecked { seq, result } => {
                assert_eq!(seq, 2);
                assert!(result.expect("probe"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_runs_through_the_backend() {
        let mut handle = demo_handle();
        handle.send(RemoteCommand::Generate {
            seq: 9,
            field: JsonField::Itinerary,
            document: Document::empty_list(),
            prompt: "plan a week".to_owned(),
        });

        match handle.next().await.expect("event") {
            RemoteEvent::Generated { seq, field, result } => {
                assert_eq!(seq, 9);
                assert_eq!(field, JsonField::Itinerary);
                let document = result.expect("generated document");
                assert_eq!(
                    document,
                    Document::parse("{\"days\": 7}").expect("parsed")
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
