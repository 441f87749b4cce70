#![forbid(unsafe_code)]

//! DOM patches derived from document snapshots.
//!
//! The presenter keeps one [`NodeSnapshot`] per connected node and, on each
//! present, compares the document against it. The resulting [`DomPatch`]
//! list is everything the host must do to its live DOM.
//!
//! Patch order within one present:
//! 1. removals of nodes that became disconnected,
//! 2. for each connected node in document order: insert (if new), then
//!    property changes.
//!
//! A full repaint treats the whole document as pre-existing markup: every
//! locatable node is adopted and its current state is written out, but text
//! and classes are left to the markup unless the document sets them.

use std::collections::HashMap;

use regform_core::document::{Document, InputType, NodeId, Tag};
use regform_core::style::PROPERTIES;

/// How the host finds a pre-existing element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "by", rename_all = "snake_case"))]
pub enum Locator {
    Body,
    Id { id: String },
    /// The `nth` element, in document order, carrying `class`.
    Class { class: String, nth: usize },
}

/// One mutation for the host DOM. `node` values are [`NodeId::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum DomPatch {
    Adopt {
        node: u32,
        locator: Locator,
    },
    Insert {
        node: u32,
        parent: u32,
        tag: &'static str,
        classes: Vec<String>,
    },
    Remove {
        node: u32,
    },
    SetStyle {
        node: u32,
        property: &'static str,
        value: String,
    },
    RemoveStyle {
        node: u32,
        property: &'static str,
    },
    SetAttribute {
        node: u32,
        name: &'static str,
        value: String,
    },
    AddClass {
        node: u32,
        class: String,
    },
    RemoveClass {
        node: u32,
        class: String,
    },
    SetText {
        node: u32,
        text: String,
    },
    SetValue {
        node: u32,
        value: String,
    },
    SetChecked {
        node: u32,
        checked: bool,
    },
    SetDisabled {
        node: u32,
        disabled: bool,
    },
}

impl DomPatch {
    /// The node this patch targets.
    #[must_use]
    pub const fn node(&self) -> u32 {
        match self {
            Self::Adopt { node, .. }
            | Self::Insert { node, .. }
            | Self::Remove { node }
            | Self::SetStyle { node, .. }
            | Self::RemoveStyle { node, .. }
            | Self::SetAttribute { node, .. }
            | Self::AddClass { node, .. }
            | Self::RemoveClass { node, .. }
            | Self::SetText { node, .. }
            | Self::SetValue { node, .. }
            | Self::SetChecked { node, .. }
            | Self::SetDisabled { node, .. } => *node,
        }
    }
}

/// Presented state of one connected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    tag: Tag,
    classes: Vec<String>,
    styles: Vec<(&'static str, String)>,
    text: String,
    input_type: Option<InputType>,
    value: String,
    checked: bool,
    disabled: bool,
}

impl NodeSnapshot {
    fn capture(doc: &Document, id: NodeId) -> Option<Self> {
        let node = doc.node(id)?;
        Some(Self {
            tag: node.tag,
            classes: node.classes.clone(),
            styles: node.view.declarations(),
            text: node.text.clone(),
            input_type: node.input_type,
            value: node.value.clone(),
            checked: node.checked,
            disabled: node.disabled,
        })
    }

    fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }
}

/// Snapshots of every connected node at the last present.
pub type SnapshotMap = HashMap<u32, NodeSnapshot>;

fn locate(doc: &Document, id: NodeId, class_counts: &HashMap<String, usize>) -> Option<Locator> {
    let node = doc.node(id)?;
    if id == doc.root() {
        return Some(Locator::Body);
    }
    if let Some(dom_id) = &node.dom_id {
        return Some(Locator::Id { id: dom_id.clone() });
    }
    let class = node.classes.first()?;
    let nth = class_counts.get(class).copied().unwrap_or(0);
    Some(Locator::Class {
        class: class.clone(),
        nth,
    })
}

/// Diff `doc` against `prev`, returning patches and the new snapshot map.
#[must_use]
pub fn diff_document(
    prev: &SnapshotMap,
    doc: &Document,
    full_repaint: bool,
) -> (Vec<DomPatch>, SnapshotMap) {
    let empty = SnapshotMap::new();
    let prev = if full_repaint { &empty } else { prev };
    let connected = doc.descendants_inclusive(doc.root());
    let mut next = SnapshotMap::with_capacity(connected.len());
    let mut patches = Vec::new();

    let mut removed: Vec<u32> = prev
        .keys()
        .copied()
        .filter(|&raw| !connected.iter().any(|n| n.get() == raw))
        .collect();
    removed.sort_unstable();
    patches.extend(removed.into_iter().map(|node| DomPatch::Remove { node }));

    // Per-class running count, for locating class-only nodes.
    let mut class_counts: HashMap<String, usize> = HashMap::new();

    for &id in &connected {
        let Some(cur) = NodeSnapshot::capture(doc, id) else {
            continue;
        };
        let raw = id.get();
        match prev.get(&raw) {
            Some(old) => diff_node(raw, Some(old), &cur, &mut patches),
            None if full_repaint => {
                if let Some(locator) = locate(doc, id, &class_counts) {
                    patches.push(DomPatch::Adopt { node: raw, locator });
                    diff_node(raw, None, &cur, &mut patches);
                }
            }
            None => {
                let parent = doc
                    .node(id)
                    .and_then(|n| n.parent())
                    .map_or(doc.root().get(), NodeId::get);
                patches.push(DomPatch::Insert {
                    node: raw,
                    parent,
                    tag: cur.tag.as_str(),
                    classes: cur.classes.clone(),
                });
                let as_new = NodeSnapshot {
                    classes: cur.classes.clone(),
                    ..blank(cur.tag)
                };
                diff_node(raw, Some(&as_new), &cur, &mut patches);
            }
        }
        if let Some(node) = doc.node(id) {
            for class in &node.classes {
                *class_counts.entry(class.clone()).or_default() += 1;
            }
        }
        next.insert(raw, cur);
    }
    (patches, next)
}

fn blank(tag: Tag) -> NodeSnapshot {
    NodeSnapshot {
        tag,
        classes: Vec::new(),
        styles: Vec::new(),
        text: String::new(),
        input_type: None,
        value: String::new(),
        checked: false,
        disabled: false,
    }
}

/// Emit patches turning `old` into `cur`. With `old == None` (adoption),
/// every state the document sets is written, but markup-owned text and
/// classes are kept.
fn diff_node(node: u32, old: Option<&NodeSnapshot>, cur: &NodeSnapshot, out: &mut Vec<DomPatch>) {
    for property in PROPERTIES {
        let before = old.and_then(|o| o.style(property));
        match (before, cur.style(property)) {
            (Some(a), Some(b)) if a == b => {}
            (_, Some(value)) => out.push(DomPatch::SetStyle {
                node,
                property,
                value: value.to_owned(),
            }),
            (Some(_), None) => out.push(DomPatch::RemoveStyle { node, property }),
            (None, None) => {}
        }
    }

    if let Some(old) = old {
        for class in cur.classes.iter().filter(|c| !old.classes.contains(c)) {
            out.push(DomPatch::AddClass {
                node,
                class: class.clone(),
            });
        }
        for class in old.classes.iter().filter(|c| !cur.classes.contains(c)) {
            out.push(DomPatch::RemoveClass {
                node,
                class: class.clone(),
            });
        }
    }

    let old_text = old.map(|o| o.text.as_str()).unwrap_or_default();
    if cur.text != old_text {
        out.push(DomPatch::SetText {
            node,
            text: cur.text.clone(),
        });
    }

    let Some(input_type) = cur.input_type else {
        let adopted_button = old.is_none() && cur.tag == Tag::Button;
        if cur.disabled != old.is_some_and(|o| o.disabled) || adopted_button {
            out.push(DomPatch::SetDisabled {
                node,
                disabled: cur.disabled,
            });
        }
        return;
    };

    if old.and_then(|o| o.input_type) != Some(input_type) {
        out.push(DomPatch::SetAttribute {
            node,
            name: "type",
            value: input_type.as_str().to_owned(),
        });
    }
    if input_type == InputType::Checkbox {
        if old.is_none_or(|o| o.checked != cur.checked) {
            out.push(DomPatch::SetChecked {
                node,
                checked: cur.checked,
            });
        }
    } else if old.is_none_or(|o| o.value != cur.value) {
        out.push(DomPatch::SetValue {
            node,
            value: cur.value.clone(),
        });
    }
    if old.is_some_and(|o| o.disabled != cur.disabled) {
        out.push(DomPatch::SetDisabled {
            node,
            disabled: cur.disabled,
        });
    }
}
