// snapper::mirror
//
// The bidirectional node<->id registry (spec.md §4.6). The core only
// depends on the `Mirror` trait; `HashMirror` is the one concrete
// implementation this crate ships, keyed on `NodeHandle` (a pointer-
// identity wrapper around `kuchikiki::NodeRef`, since kuchikiki's
// `NodeRef` is an `Rc<Node>` clone handle rather than a hashable id).

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use kuchikiki::NodeRef;

use crate::model::SerializedNodeWithId;

pub use crate::model::IGNORED_NODE;

/// Pointer-identity wrapper so a live DOM node can be a `HashMap` key.
/// Two handles compare equal iff they wrap the same underlying `Rc`
/// allocation, mirroring JS's node-identity-by-reference semantics.
#[derive(Clone)]
pub struct NodeHandle(pub NodeRef);

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0 .0, &other.0 .0)
    }
}

impl Eq for NodeHandle {}

impl Hash for NodeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0 .0) as usize).hash(state);
    }
}

/// Explicit id allocator (DESIGN NOTES §9: replaces the process-wide
/// counter spec.md §3 describes). Starts at 1 so the document node can
/// claim id 1 as its first allocation.
#[derive(Debug)]
pub struct IdAllocator {
    next: Cell<i64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        IdAllocator { next: Cell::new(1) }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&self) -> i64 {
        let id = self.next.get();
        self.next.set(id + 1);
        id
    }

    /// `cleanupSnapshot` (spec.md §3): resets the counter to 1.
    pub fn reset(&self) {
        self.next.set(1);
    }
}

/// The caller-supplied node<->id registry (spec.md §4.6 / §6 "Mirror
/// contract"). Implementations only need to remember mappings already
/// handed to them via `add`; id generation is the walker's job via
/// `IdAllocator`, not the mirror's.
pub trait Mirror {
    fn has_node(&self, node: &NodeHandle) -> bool;

    /// Returns 0 if absent (spec.md §4.6: "0 if absent, implementation-
    /// defined").
    fn get_id(&self, node: &NodeHandle) -> i64;

    fn add(&self, node: NodeHandle, serialized: SerializedNodeWithId);

    fn get_node(&self, id: i64) -> Option<NodeHandle>;
}

/// Default `Mirror` backed by a `HashMap`. Not `Sync`: traversal is
/// single-threaded cooperative per spec.md §5, so interior mutability
/// via `RefCell` is sufficient and avoids needless locking.
#[derive(Default)]
pub struct HashMirror {
    by_node: std::cell::RefCell<HashMap<NodeHandle, (i64, SerializedNodeWithId)>>,
    by_id: std::cell::RefCell<HashMap<i64, NodeHandle>>,
    allocator: IdAllocator,
}

impl HashMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.allocator
    }

    /// `cleanupSnapshot`: clears all mappings and resets the id counter.
    pub fn reset(&self) {
        self.by_node.borrow_mut().clear();
        self.by_id.borrow_mut().clear();
        self.allocator.reset();
    }

    pub fn get_serialized(&self, node: &NodeHandle) -> Option<SerializedNodeWithId> {
        self.by_node.borrow().get(node).map(|(_, s)| s.clone())
    }
}

impl Mirror for HashMirror {
    fn has_node(&self, node: &NodeHandle) -> bool {
        self.by_node.borrow().contains_key(node)
    }

    fn get_id(&self, node: &NodeHandle) -> i64 {
        self.by_node.borrow().get(node).map(|(id, _)| *id).unwrap_or(0)
    }

    fn add(&self, node: NodeHandle, serialized: SerializedNodeWithId) {
        let id = serialized.id;
        self.by_id.borrow_mut().insert(id, node.clone());
        self.by_node.borrow_mut().insert(node, (id, serialized));
    }

    fn get_node(&self, id: i64) -> Option<NodeHandle> {
        self.by_id.borrow().get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchikiki::traits::TendrilSink;

    #[test]
    fn reuses_id_for_same_live_node() {
        let doc = kuchikiki::parse_html().one("<div>hi</div>");
        let div = doc.descendants().elements().next().unwrap().as_node().clone();
        let mirror = HashMirror::new();
        let handle = NodeHandle(div.clone());

        assert!(!mirror.has_node(&handle));
        let id = mirror.allocator().alloc();
        mirror.add(
            handle.clone(),
            SerializedNodeWithId::new(
                id,
                None,
                crate::model::NodeData::Comment {
                    text_content: String::new(),
                },
            ),
        );

        assert!(mirror.has_node(&handle));
        assert_eq!(mirror.get_id(&handle), id);
    }

    #[test]
    fn cleanup_resets_counter() {
        let mirror = HashMirror::new();
        assert_eq!(mirror.allocator().alloc(), 1);
        assert_eq!(mirror.allocator().alloc(), 2);
        mirror.reset();
        assert_eq!(mirror.allocator().alloc(), 1);
    }
}
