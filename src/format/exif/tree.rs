//! Materialized IFD tree.
//!
//! Directories relate to each other along three axes:
//!
//! - **Nesting**: a tag in the parent holds the child's offset (IFD0 → Exif)
//! - **Chain**: the next-IFD pointer links siblings (IFD0 → IFD1)
//! - **Discovery**: the breadth-first order in which IFDs were first reached,
//!   which is also how ids are assigned (root = 0)
//!
//! Nodes live in a flat arena indexed by id; parent, child and next links
//! are ids into the same arena.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::IfdError;

use super::enumerate::{IfdEnumerate, IfdTagEntry, TagVisitor, Traversal};
use super::tags::IFD_STANDARD;

/// Dense IFD identifier, assigned in discovery order.
pub type IfdId = usize;

// =============================================================================
// Ifd
// =============================================================================

/// One decoded directory and its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ifd {
    pub id: IfdId,

    /// Directory whose tag designated this one
    pub parent: Option<IfdId>,

    /// Offset of the parent directory
    pub parent_offset: Option<u32>,

    pub name: String,

    /// Position in its chain (0 for the first IFD of a chain)
    pub index: usize,

    pub offset: u32,

    pub entries: Vec<IfdTagEntry>,

    /// Nested directories, in the order their tags appear
    pub children: Vec<IfdId>,

    /// Raw next-IFD pointer (0 = end of chain)
    pub next_ifd_offset: u32,

    /// Next directory in the chain
    pub next_ifd: Option<IfdId>,
}

impl fmt::Display for Ifd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IFD<ID=({}) N=[{}] IDX=({}) OFF=(0x{:04x}) COUNT=({}) CHILDREN=({}) PARENT=(0x{:04x}) NEXT-IFD=(0x{:04x})>",
            self.id,
            self.name,
            self.index,
            self.offset,
            self.entries.len(),
            self.children.len(),
            self.parent_offset.unwrap_or(0),
            self.next_ifd_offset
        )
    }
}

// =============================================================================
// IfdTree
// =============================================================================

/// Every IFD reachable from the root, in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct IfdTree {
    ifds: Vec<Ifd>,

    #[serde(skip)]
    by_offset: HashMap<u32, IfdId>,
}

impl IfdTree {
    /// The root IFD (id 0).
    pub fn root(&self) -> &Ifd {
        &self.ifds[0]
    }

    /// Look up an IFD by id.
    pub fn get(&self, id: IfdId) -> Option<&Ifd> {
        self.ifds.get(id)
    }

    /// Look up an IFD by its offset.
    pub fn find_by_offset(&self, offset: u32) -> Option<&Ifd> {
        self.by_offset.get(&offset).map(|&id| &self.ifds[id])
    }

    /// All IFDs in discovery order.
    pub fn ifds(&self) -> &[Ifd] {
        &self.ifds
    }

    pub fn len(&self) -> usize {
        self.ifds.len()
    }

    /// Always false for a collected tree; the root is always present.
    pub fn is_empty(&self) -> bool {
        self.ifds.is_empty()
    }

    pub fn parent(&self, ifd: &Ifd) -> Option<&Ifd> {
        ifd.parent.map(|id| &self.ifds[id])
    }

    pub fn next(&self, ifd: &Ifd) -> Option<&Ifd> {
        ifd.next_ifd.map(|id| &self.ifds[id])
    }

    pub fn children<'a>(&'a self, ifd: &'a Ifd) -> impl Iterator<Item = &'a Ifd> + 'a {
        ifd.children.iter().map(move |&id| &self.ifds[id])
    }

    /// Render the tree, children indented under their parent and chain
    /// successors at the same level marked with `>`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(&mut out, 0, 0, false);
        out
    }

    /// Print [`IfdTree::render`] to stdout.
    pub fn print_tree(&self) {
        print!("{}", self.render());
    }

    fn render_node(&self, out: &mut String, id: IfdId, level: usize, next_link: bool) {
        let ifd = &self.ifds[id];
        let indent = " ".repeat(level * 2);
        let prefix = if next_link { ">" } else { " " };

        out.push_str(&format!("{indent}{prefix}{ifd}\n"));

        for &child in &ifd.children {
            self.render_node(out, child, level + 1, false);
        }

        if let Some(next) = ifd.next_ifd {
            self.render_node(out, next, level, true);
        }
    }
}

// =============================================================================
// Collection
// =============================================================================

/// An IFD waiting to be decoded.
struct QueuedIfd {
    name: String,
    index: usize,
    offset: u32,
    parent: Option<IfdId>,
}

impl IfdEnumerate {
    /// Decode every IFD reachable from `root_ifd_offset` into a tree.
    ///
    /// Directories are decoded breadth-first, each exactly once. Any error
    /// aborts the collection; no partial tree is returned.
    pub fn collect(&self, root_ifd_offset: u32) -> Result<IfdTree, IfdError> {
        let mut ifds: Vec<Ifd> = Vec::new();
        let mut by_offset: HashMap<u32, IfdId> = HashMap::new();

        // Next-IFD offset -> IFD whose pointer it came from
        let mut edges: HashMap<u32, IfdId> = HashMap::new();

        let mut traversal = Traversal::new(self.max_directories());

        let mut queue = VecDeque::from([QueuedIfd {
            name: IFD_STANDARD.to_string(),
            index: 0,
            offset: root_ifd_offset,
            parent: None,
        }]);

        while let Some(queued) = queue.pop_front() {
            traversal.enter(queued.offset)?;

            let (next_ifd_offset, entries) = self.decode(
                &queued.name,
                queued.index,
                queued.offset,
                None::<&mut dyn TagVisitor>,
                false,
                &mut traversal,
            )?;

            let id = ifds.len();

            if let Some(&previous) = edges.get(&queued.offset) {
                ifds[previous].next_ifd = Some(id);
            }

            if let Some(parent) = queued.parent {
                ifds[parent].children.push(id);
            }

            for entry in &entries {
                let Some(child_name) = entry.child_ifd_name else {
                    continue;
                };

                if entry.value_offset == 0 {
                    debug!(ifd = child_name, "Nested IFD pointer is zero, skipping");
                    continue;
                }

                queue.push_back(QueuedIfd {
                    name: child_name.to_string(),
                    index: 0,
                    offset: entry.value_offset,
                    parent: Some(id),
                });
            }

            if next_ifd_offset != 0 {
                edges.insert(next_ifd_offset, id);

                queue.push_back(QueuedIfd {
                    name: queued.name.clone(),
                    index: queued.index + 1,
                    offset: next_ifd_offset,
                    parent: None,
                });
            }

            let parent_offset = queued.parent.map(|parent| ifds[parent].offset);

            by_offset.insert(queued.offset, id);
            ifds.push(Ifd {
                id,
                parent: queued.parent,
                parent_offset,
                name: queued.name,
                index: queued.index,
                offset: queued.offset,
                entries,
                children: Vec::new(),
                next_ifd_offset,
                next_ifd: None,
            });
        }

        debug!("Collected {} IFDs", ifds.len());

        Ok(IfdTree { ifds, by_offset })
    }
}

// =============================================================================
// Tests
// =============================================================================
