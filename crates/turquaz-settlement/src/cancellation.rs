//! Per-creator force-cancel watermarks.
//!
//! `force_cancel_all(creator, cutoff)` voids every order by `creator` whose
//! creation time is at or before `cutoff`. Watermarks only ever move
//! forward, so a cancelled order can never become settleable again.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use turquaz_types::{Address, Order};

#[derive(Debug, Default)]
pub struct CancellationRegistry {
    watermarks: HashMap<Address, DateTime<Utc>>,
}

impl CancellationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `caller`'s watermark to `cutoff`. A lower `cutoff` is a no-op.
    ///
    /// `caller` is the authenticated identity supplied by the host; nobody
    /// can cancel on behalf of someone else. Returns the effective watermark.
    pub fn force_cancel_all(&mut self, caller: Address, cutoff: DateTime<Utc>) -> DateTime<Utc> {
        let mark = self.watermarks.entry(caller).or_insert(cutoff);
        if cutoff > *mark {
            *mark = cutoff;
        }
        *mark
    }

    #[must_use]
    pub fn watermark(&self, creator: &Address) -> Option<DateTime<Utc>> {
        self.watermarks.get(creator).copied()
    }

    #[must_use]
    pub fn is_cancelled(&self, order: &Order) -> bool {
        self.watermark(&order.creator)
            .is_some_and(|mark| order.creation_time <= mark)
    }
}
