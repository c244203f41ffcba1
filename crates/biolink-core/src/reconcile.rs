//! Position reconciliation
//!
//! After any structural change (insert, remove, move), link positions
//! must again form the contiguous sequence `0..N-1` in display order.
//! [`reconcile`] restores that invariant in memory and reports which
//! records need their stored position updated.

use uuid::Uuid;

use crate::models::LinkItem;

/// A stored-position correction for one link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub id: Uuid,
    pub position: u32,
}

/// Restore the contiguous-position invariant over `links`
///
/// Walks the sequence in its current order and assigns `position =
/// index` to every element whose stored position differs. Returns one
/// update per changed element, in sequence order. Running it again on
/// the result yields no updates.
///
/// Order is determined entirely by the slice order at the moment of the
/// call; no secondary key is consulted.
pub fn reconcile(links: &mut [LinkItem]) -> Vec<PositionUpdate> {
    let mut updates = Vec::new();

    for (index, link) in links.iter_mut().enumerate() {
        let position = index as u32;
        if link.position != position {
            link.position = position;
            updates.push(PositionUpdate {
                id: link.id,
                position,
            });
        }
    }

    updates
}
