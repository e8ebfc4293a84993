//! Ordered record of everything a walker emitted.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::{Diagnostic, EntryKind};
use crate::walker::Walker;

/// One emitted event, notifications and diagnostics interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    Found(EntryKind, PathBuf),
    Diagnostic(Diagnostic, PathBuf),
}

impl TranscriptEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::Found(_, path) | Self::Diagnostic(_, path) => path,
        }
    }
}

/// Shared buffer fed by listeners registered on a walker.
///
/// Cloning yields another handle to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    events: Arc<Mutex<Vec<TranscriptEvent>>>,
}

impl Transcript {
    /// Registers one notification listener and one diagnostic listener on
    /// `walker`. Listeners registered earlier still run first.
    pub fn attach(walker: &mut Walker) -> Self {
        let transcript = Self::default();

        let events = Arc::clone(&transcript.events);
        walker.on_found(move |entry| {
            events
                .lock()
                .push(TranscriptEvent::Found(entry.kind(), entry.path().to_path_buf()));
            Ok(())
        });

        let events = Arc::clone(&transcript.events);
        walker.on_diagnostic(move |event| {
            events.lock().push(TranscriptEvent::Diagnostic(
                event.diagnostic,
                event.path.clone(),
            ));
            Ok(())
        });

        transcript
    }

    pub fn events(&self) -> Vec<TranscriptEvent> {
        self.events.lock().clone()
    }

    pub fn diagnostics(&self) -> Vec<(Diagnostic, PathBuf)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                TranscriptEvent::Diagnostic(diagnostic, path) => Some((*diagnostic, path.clone())),
                TranscriptEvent::Found(..) => None,
            })
            .collect()
    }

    /// Paths reported through found-entry notifications, in order.
    pub fn found(&self) -> Vec<(EntryKind, PathBuf)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                TranscriptEvent::Found(kind, path) => Some((*kind, path.clone())),
                TranscriptEvent::Diagnostic(..) => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
