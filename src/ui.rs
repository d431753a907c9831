// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Process-wide notification queue.
//!
//! Components that emit user feedback receive the queue explicitly instead of
//! reaching for a global. The TUI drains it one notice at a time into its
//! toast slot; `rev` bumps on every push so pollers can detect new entries
//! without draining.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    kind: NoticeKind,
    message: String,
}

impl Notice {
    pub fn kind(&self) -> NoticeKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notifications {
    pending: VecDeque<Notice>,
    rev: u64,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.pending.push_back(Notice {
            kind,
            message: message.into(),
        });
        self.rev = self.rev.wrapping_add(1);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeKind::Info, message);
    }

    /// Oldest notice first.
    pub fn take_next(&mut self) -> Option<Notice> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeKind, Notifications};

    #[test]
    fn drains_in_push_order() {
        let mut notices = Notifications::new();
        notices.success("saved");
        notices.error("boom");

        let first = notices.take_next().expect("first notice");
        assert_eq!(first.kind(), NoticeKind::Success);
        assert_eq!(first.message(), "saved");

        let second = notices.take_next().expect("second notice");
        assert_eq!(second.kind(), NoticeKind::Error);
        assert!(notices.take_next().is_none());
    }

    #[test]
    fn rev_bumps_on_push_not_on_drain() {
        let mut notices = Notifications::new();
        assert_eq!(notices.rev(), 0);

        notices.info("loading");
        assert_eq!(notices.rev(), 1);

        notices.take_next();
        assert_eq!(notices.rev(), 1);
        assert!(notices.is_empty());
    }
}
