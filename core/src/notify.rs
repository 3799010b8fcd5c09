//! Transient on-screen notifications ("+1 小金鱼", "⚡ 加速已激活！").
//!
//! Notifications are plain data with a dismiss deadline. The session pushes
//! them, expires them on tick, and the overlay projects whatever is visible.

use std::collections::VecDeque;

use chrono::{NaiveDateTime, TimeDelta};
use dragonfin_types::color::Rgba;

/// Maximum notifications shown at once; the oldest is dropped beyond this.
pub const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    FishEaten { category: u32 },
    EffectActivated { effect_id: String },
    EffectAlreadyActive { effect_id: String },
    EffectExpired { effect_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u32,
    pub message: String,
    /// Background color
    pub color: Rgba,
    pub kind: NotificationKind,
    pub shown_at: NaiveDateTime,
    pub dismiss_at: NaiveDateTime,
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    next_id: u32,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification for `ttl`. Returns its id.
    pub fn push(
        &mut self,
        message: impl Into<String>,
        color: Rgba,
        kind: NotificationKind,
        now: NaiveDateTime,
        ttl: TimeDelta,
    ) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        if self.items.len() >= MAX_VISIBLE {
            self.items.pop_front();
        }
        self.items.push_back(Notification {
            id,
            message: message.into(),
            color,
            kind,
            shown_at: now,
            dismiss_at: now + ttl,
        });
        id
    }

    /// Drop notifications whose deadline has passed. Returns how many were removed.
    pub fn expire(&mut self, now: NaiveDateTime) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.dismiss_at > now);
        before - self.items.len()
    }

    pub fn dismiss(&mut self, id: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        before != self.items.len()
    }

    /// Visible notifications, oldest first
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
