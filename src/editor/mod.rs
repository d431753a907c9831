// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document editing state for the record form.
//!
//! A [`FieldEditor`] owns the authoritative document of one JSON field and
//! mediates every mutation: raw-mode commits, and AI generation results,
//! which are fenced by sequence number so only the latest request applies.

pub mod draft;
pub mod raw;

pub use draft::{BasicField, EditDraft};
pub use raw::{LineInput, RawBuffer};

use crate::ai::GenerationError;
use crate::model::{Document, JsonField};
use crate::ui::Notifications;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Tree,
    Raw,
}

/// Per-field editing state machine.
///
/// The committed document changes in exactly three places: construction, a
/// raw-mode commit, and a generation result carrying the latest sequence
/// number. In raw mode every keystroke revalidates but never commits; the
/// commit happens on blur.
#[derive(Debug, Clone)]
pub struct FieldEditor {
    field: JsonField,
    document: Document,
    mode: EditorMode,
    raw: RawBuffer,
    parse_error: Option<String>,
    seq: u64,
    in_flight: bool,
}

impl FieldEditor {
    pub fn new(field: JsonField, document: Document) -> Self {
        let raw = RawBuffer::from_text(&document.to_pretty());
        Self {
            field,
            document,
            mode: EditorMode::Tree,
            raw,
            parse_error: None,
            seq: 0,
            in_flight: false,
        }
    }

    pub fn field(&self) -> JsonField {
        self.field
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_raw(&self) -> bool {
        self.mode == EditorMode::Raw
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    pub fn raw(&self) -> &RawBuffer {
        &self.raw
    }

    /// Callers revalidate after mutating the buffer.
    pub fn raw_mut(&mut self) -> &mut RawBuffer {
        &mut self.raw
    }

    /// Re-seeds the raw buffer from the committed document.
    pub fn enter_raw(&mut self) {
        self.mode = EditorMode::Raw;
        self.raw = RawBuffer::from_text(&self.document.to_pretty());
        self.parse_error = None;
    }

    pub fn toggle_mode(&mut self, notices: &mut Notifications) {
        match self.mode {
            EditorMode::Tree => self.enter_raw(),
            EditorMode::Raw => {
                self.blur(notices);
            }
        }
    }

    /// Parses the current raw text and records the outcome inline. Never
    /// touches the committed document.
    pub fn revalidate(&mut self) {
        if self.mode != EditorMode::Raw {
            return;
        }
        self.parse_error = match Document::parse(&self.raw.text()) {
            Ok(_) => None,
            Err(err) => Some(err.to_string()),
        };
    }

    /// Leaves raw mode. Parseable text commits and is reported; text that
    /// never parsed is discarded without touching the document.
    ///
    /// Returns true when the document changed.
    pub fn blur(&mut self, notices: &mut Notifications) -> bool {
        if self.mode != EditorMode::Raw {
            return false;
        }

        let committed = match Document::parse(&self.raw.text()) {
            Ok(parsed) if parsed != self.document => {
                self.document = parsed;
                notices.success(format!("{} updated", self.field.label()));
                true
            }
            Ok(_) | Err(_) => false,
        };

        self.mode = EditorMode::Tree;
        self.parse_error = None;
        committed
    }

    /// Records the sequence number of the generation request now in flight.
    /// Numbers are issued by the caller from one process-wide counter, so a
    /// request abandoned with an earlier editor can never match. Results
    /// carrying any other number are ignored.
    pub fn begin_generation(&mut self, seq: u64) {
        self.seq = seq;
        self.in_flight = true;
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight
    }

    pub fn apply_generation(
        &mut self,
        seq: u64,
        result: Result<Document, GenerationError>,
        notices: &mut Notifications,
    ) {
        if seq != self.seq {
            return;
        }
        self.in_flight = false;

        match result {
            Ok(document) => {
                self.document = document;
                if self.mode == EditorMode::Raw {
                    self.raw = RawBuffer::from_text(&self.document.to_pretty());
                    self.parse_error = None;
                }
                notices.success(format!("{} generated", self.field.label()));
            }
            Err(_) => {
                notices.error(GenerationError::USER_MESSAGE);
            }
        }
    }
}
