//! Snapshot renderer for the browse view
//!
//! A terminal cannot redraw a grid in place, so the renderer remembers what
//! it printed last and only prints what changed: new items after a
//! `LoadMore`, the full list after a replace, and the status line when it
//! differs from the previous one.

use super::output::OutputWriter;
use crate::output;
use crate::session::RenderSnapshot;

/// How the item list moved between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDelta {
    /// Same items as before
    Unchanged,
    /// Earlier items kept; new ones start at this index
    Appended(usize),
    /// List replaced wholesale (possibly by an empty one)
    Replaced,
}

/// Compare item ids of the last rendered list against a new one
#[must_use]
pub fn item_delta(previous: &[u64], snapshot: &RenderSnapshot) -> ItemDelta {
    let current = &snapshot.items;
    let same_prefix = previous.len() <= current.len()
        && previous
            .iter()
            .zip(current)
            .all(|(id, record)| *id == record.id);

    match (same_prefix, previous.len() == current.len()) {
        (true, true) => ItemDelta::Unchanged,
        (true, false) if !previous.is_empty() => ItemDelta::Appended(previous.len()),
        _ => ItemDelta::Replaced,
    }
}

/// Prints snapshots incrementally
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    shown: Vec<u64>,
    last_subject: Option<String>,
    last_status: Option<String>,
    quiet: bool,
}

impl SnapshotRenderer {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }

    /// Print whatever changed since the previous call
    pub fn render(&mut self, snapshot: &RenderSnapshot, out: &dyn OutputWriter) -> ItemDelta {
        let subject = output::subject_line(snapshot);
        if self.last_subject.as_ref() != Some(&subject) {
            out.info(&subject);
            self.last_subject = Some(subject);
        }

        let delta = item_delta(&self.shown, snapshot);
        let fresh = match delta {
            ItemDelta::Unchanged => &snapshot.items[..0],
            ItemDelta::Appended(from) => &snapshot.items[from..],
            ItemDelta::Replaced => {
                if !snapshot.items.is_empty() || !self.shown.is_empty() {
                    out.info("---");
                }
                &snapshot.items[..]
            }
        };
        for record in fresh {
            out.write(&output::image_line(record, self.quiet));
        }
        self.shown = snapshot.items.iter().map(|record| record.id).collect();

        let status = output::status_line(snapshot);
        if self.last_status.as_ref() != Some(&status) {
            if snapshot.error_message.is_some() && !snapshot.is_loading {
                out.error(&status);
            } else {
                out.info(&status);
            }
            self.last_status = Some(status);
        }

        delta
    }
}
