#![forbid(unsafe_code)]

//! A DOM-like arena tree.
//!
//! [`Document`] is the boundary the controller consumes and mutates. It keeps
//! only what the interaction layer observes: identity, classes, inline
//! [`ViewState`], text, and form-control state. Nodes live in an arena and
//! are never freed; removing a node detaches it, so a stale [`NodeId`] stays
//! safe to use and simply refers to a disconnected node.
//!
//! Because nothing is freed, every node ever created counts against the
//! document's node limit ([`MAX_NODES`] unless lowered with
//! [`Document::with_node_limit`]). Once the limit is reached
//! [`Document::create_element`] returns `None` instead of handing out an id
//! twice.

use core::fmt;
use std::collections::HashMap;

use crate::element::ElementIds;
use crate::palette;
use crate::style::ViewState;

/// Upper bound on nodes a [`Document`] can hold; ids are `u32` indices.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Handle to a node in a [`Document`]. Never reused within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Element tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Body,
    Form,
    Input,
    Button,
    Paragraph,
    Icon,
    /// Any tag the controller has no use for.
    Other,
}

impl Tag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Form => "form",
            Self::Input => "input",
            Self::Button => "button",
            Self::Paragraph => "p",
            Self::Icon => "i",
            Self::Other => "span",
        }
    }

    /// Map a DOM tag name (any case) to a tag.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "body" => Self::Body,
            "form" => Self::Form,
            "input" => Self::Input,
            "button" => Self::Button,
            "p" => Self::Paragraph,
            "i" => Self::Icon,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` attribute of an `<input>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Email,
    Password,
    Checkbox,
}

impl InputType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Checkbox => "checkbox",
        }
    }

    /// Map an `<input>` `type` attribute; unknown types behave as text.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "email" => Self::Email,
            "password" => Self::Password,
            "checkbox" => Self::Checkbox,
            _ => Self::Text,
        }
    }
}

/// An element the host found on its live page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub tag: Tag,
    /// `Some` only for `<input>` elements.
    pub input_type: Option<InputType>,
    pub value: String,
    pub default_value: String,
    pub checked: bool,
    pub default_checked: bool,
}

impl PageElement {
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            input_type: None,
            value: String::new(),
            default_value: String::new(),
            checked: false,
            default_checked: false,
        }
    }

    #[must_use]
    pub fn input(input_type: InputType) -> Self {
        Self {
            input_type: Some(input_type),
            ..Self::new(Tag::Input)
        }
    }

    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self.default_checked = checked;
        self
    }
}

/// What the host found on its page: the element under each configured id
/// that exists, and the marker class of every social-login button in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub elements: HashMap<String, PageElement>,
    pub social_markers: Vec<String>,
}

impl PageSnapshot {
    /// The stock page: every id present with the expected kind, terms
    /// unchecked, and `social_buttons` alternating Google/Apple buttons.
    #[must_use]
    pub fn stock(ids: &ElementIds, social_buttons: usize) -> Self {
        let mut page = Self::default()
            .with(&ids.form, PageElement::new(Tag::Form))
            .with(&ids.first_name, PageElement::input(InputType::Text))
            .with(&ids.last_name, PageElement::input(InputType::Text))
            .with(&ids.email, PageElement::input(InputType::Email))
            .with(&ids.password, PageElement::input(InputType::Password))
            .with(&ids.password_toggle, PageElement::new(Tag::Icon))
            .with(&ids.terms, PageElement::input(InputType::Checkbox))
            .with(&ids.submit, PageElement::new(Tag::Button));
        page.social_markers = (0..social_buttons)
            .map(|index| stock_marker(index).to_owned())
            .collect();
        page
    }

    #[must_use]
    pub fn with(mut self, dom_id: &str, element: PageElement) -> Self {
        self.elements.insert(dom_id.to_owned(), element);
        self
    }

    #[must_use]
    pub fn without(mut self, dom_id: &str) -> Self {
        self.elements.remove(dom_id);
        self
    }
}

fn stock_marker(index: usize) -> &'static str {
    if index % 2 == 0 {
        "google-btn"
    } else {
        "apple-btn"
    }
}

/// One element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: Tag,
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    pub view: ViewState,
    pub text: String,
    /// `Some` only for `<input>` elements.
    pub input_type: Option<InputType>,
    pub value: String,
    pub default_value: String,
    pub checked: bool,
    pub default_checked: bool,
    pub disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            dom_id: None,
            classes: Vec::new(),
            view: ViewState::new(),
            text: String::new(),
            input_type: None,
            value: String::new(),
            default_value: String::new(),
            checked: false,
            default_checked: false,
            disabled: false,
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node behaves as a form control that `reset` restores.
    #[must_use]
    pub const fn is_control(&self) -> bool {
        self.input_type.is_some()
    }
}

/// DOM-like document rooted at a `<body>` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    node_limit: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document containing only `<body>`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Tag::Body)],
            node_limit: MAX_NODES,
        }
    }

    /// Cap the number of nodes this document may ever hold, existing ones
    /// included. Clamped to [`MAX_NODES`].
    #[must_use]
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit.min(MAX_NODES);
        self
    }

    /// The canonical registration form with `social_buttons` social-login
    /// buttons placed after it.
    #[must_use]
    pub fn registration_form(ids: &ElementIds, social_buttons: usize) -> Self {
        let mut builder = DocumentBuilder::new()
            .form(&ids.form)
            .input(&ids.first_name, InputType::Text)
            .input(&ids.last_name, InputType::Text)
            .input(&ids.email, InputType::Email)
            .input(&ids.password, InputType::Password)
            .icon(&ids.password_toggle, &["fas", "fa-eye"])
            .checkbox(&ids.terms, false)
            .button(&ids.submit)
            .end_form();
        for index in 0..social_buttons {
            builder = builder.social_button(stock_marker(index));
        }
        builder.build()
    }

    /// Mirror a host page: the form, when present, holds every control
    /// found under `ids`; social buttons follow it. Ids the page lacks are
    /// left out, so binding reports them.
    #[must_use]
    pub fn from_snapshot(ids: &ElementIds, page: &PageSnapshot) -> Self {
        let mut builder = DocumentBuilder::new();
        match page.elements.get(&ids.form) {
            Some(form) if form.tag == Tag::Form => builder = builder.form(&ids.form),
            Some(other) => builder = builder.element(&ids.form, other),
            None => {}
        }
        for dom_id in [
            &ids.first_name,
            &ids.last_name,
            &ids.email,
            &ids.password,
            &ids.password_toggle,
            &ids.terms,
            &ids.submit,
        ] {
            if let Some(element) = page.elements.get(dom_id) {
                builder = builder.element(dom_id, element);
            }
        }
        builder = builder.end_form();
        for marker in &page.social_markers {
            builder = builder.social_button(marker);
        }
        builder.build()
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever created, connected or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Iterate every node ever created with its id.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx as u32), node))
    }

    /// Create a detached element, or `None` once the node limit is reached.
    pub fn create_element(&mut self, tag: Tag) -> Option<NodeId> {
        if self.nodes.len() >= self.node_limit {
            return None;
        }
        let id = NodeId(u32::try_from(self.nodes.len()).ok()?);
        self.nodes.push(Node::new(tag));
        Some(id)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    ///
    /// Returns `false` (and changes nothing) if either id is unknown, if
    /// `child` is the root, or if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.node(parent).is_none() || self.node(child).is_none() || child == self.root() {
            return false;
        }
        if self.ancestors_inclusive(parent).any(|a| a == child) {
            return false;
        }
        self.detach(child);
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(child);
        true
    }

    /// Detach `id` from its parent. Returns `false` if it had none.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root() || self.node(id).is_none() {
            return false;
        }
        self.detach(id)
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0 as usize].parent.take() else {
            return false;
        };
        self.nodes[parent.0 as usize].children.retain(|&c| c != id);
        true
    }

    fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(Some(id), move |&n| self.node(n).and_then(Node::parent))
    }

    /// Whether `id` is reachable from the root.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.node(id).is_some() && self.ancestors_inclusive(id).any(|a| a == self.root())
    }

    /// Pre-order traversal of `id` and its descendants.
    pub fn descendants_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0 as usize].children.iter().rev());
        }
        out
    }

    /// First connected element, in document order, with this DOM id.
    #[must_use]
    pub fn get_element_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.descendants_inclusive(self.root())
            .into_iter()
            .find(|&n| self.nodes[n.0 as usize].dom_id.as_deref() == Some(dom_id))
    }

    /// Connected elements, in document order, carrying any of `classes`.
    #[must_use]
    pub fn query_class_any(&self, classes: &[&str]) -> Vec<NodeId> {
        self.descendants_inclusive(self.root())
            .into_iter()
            .filter(|&n| {
                let node = &self.nodes[n.0 as usize];
                classes.iter().any(|c| node.has_class(c))
            })
            .collect()
    }

    /// Toggle `class` on `id`. Returns the new presence, or `None` for an
    /// unknown node.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> Option<bool> {
        let node = self.node_mut(id)?;
        if let Some(pos) = node.classes.iter().position(|c| c == class) {
            node.classes.remove(pos);
            Some(false)
        } else {
            node.classes.push(class.to_owned());
            Some(true)
        }
    }

    /// Replace the text content of `id`. Returns `false` for unknown nodes.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.text.clear();
        node.text.push_str(text);
        true
    }

    /// Restore every control under `form` to its default value and checked
    /// state. Inline styles and `type` attributes are left alone.
    pub fn reset_form(&mut self, form: NodeId) {
        for id in self.descendants_inclusive(form) {
            let node = &mut self.nodes[id.0 as usize];
            if node.is_control() {
                node.value.clone_from(&node.default_value);
                node.checked = node.default_checked;
            }
        }
    }

    /// Current value of a control; empty for unknown nodes.
    #[must_use]
    pub fn value(&self, id: NodeId) -> &str {
        self.node(id).map_or("", |n| n.value.as_str())
    }

    #[must_use]
    pub fn view(&self, id: NodeId) -> ViewState {
        self.node(id).map(|n| n.view).unwrap_or_default()
    }

    /// Mutate the view-state of `id`; unknown nodes are ignored.
    pub fn update_view(&mut self, id: NodeId, f: impl FnOnce(&mut ViewState)) {
        if let Some(node) = self.node_mut(id) {
            f(&mut node.view);
        }
    }
}

/// Fluent builder for documents.
///
/// Controls are appended to the most recently opened form, or to `<body>`
/// when no form is open.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    doc: Document,
    open_form: Option<NodeId>,
}

impl DocumentBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn parent(&self) -> NodeId {
        self.open_form.unwrap_or(self.doc.root())
    }

    fn push(&mut self, tag: Tag, dom_id: Option<&str>, classes: &[&str]) -> Option<NodeId> {
        let id = self.doc.create_element(tag)?;
        let node = self.doc.node_mut(id)?;
        node.dom_id = dom_id.map(str::to_owned);
        node.classes = classes.iter().map(|c| (*c).to_owned()).collect();
        let parent = self.parent();
        self.doc.append_child(parent, id);
        Some(id)
    }

    fn push_control(&mut self, dom_id: &str, input_type: InputType) -> Option<&mut Node> {
        let id = self.push(Tag::Input, Some(dom_id), &[])?;
        let node = self.doc.node_mut(id)?;
        node.input_type = Some(input_type);
        Some(node)
    }

    /// Open a form; subsequent controls land inside it.
    #[must_use]
    pub fn form(mut self, dom_id: &str) -> Self {
        self.open_form = None;
        self.open_form = self.push(Tag::Form, Some(dom_id), &[]);
        self
    }

    /// Close the open form; subsequent elements land in `<body>`.
    #[must_use]
    pub fn end_form(mut self) -> Self {
        self.open_form = None;
        self
    }

    #[must_use]
    pub fn input(mut self, dom_id: &str, input_type: InputType) -> Self {
        self.push_control(dom_id, input_type);
        self
    }

    #[must_use]
    pub fn checkbox(mut self, dom_id: &str, checked: bool) -> Self {
        if let Some(node) = self.push_control(dom_id, InputType::Checkbox) {
            node.checked = checked;
            node.default_checked = checked;
        }
        self
    }

    /// An element observed on a host page, with its form-control state.
    #[must_use]
    pub fn element(mut self, dom_id: &str, observed: &PageElement) -> Self {
        let Some(id) = self.push(observed.tag, Some(dom_id), &[]) else {
            return self;
        };
        if let Some(node) = self.doc.node_mut(id) {
            node.input_type = observed.input_type;
            node.value.clone_from(&observed.value);
            node.default_value.clone_from(&observed.default_value);
            node.checked = observed.checked;
            node.default_checked = observed.default_checked;
        }
        self
    }

    #[must_use]
    pub fn button(mut self, dom_id: &str) -> Self {
        self.push(Tag::Button, Some(dom_id), &[]);
        self
    }

    #[must_use]
    pub fn icon(mut self, dom_id: &str, classes: &[&str]) -> Self {
        self.push(Tag::Icon, Some(dom_id), classes);
        self
    }

    /// A social-login button identified only by its marker class.
    #[must_use]
    pub fn social_button(mut self, marker: &str) -> Self {
        self.push(Tag::Button, None, &[marker]);
        self
    }

    #[must_use]
    pub fn build(self) -> Document {
        self.doc
    }
}

/// Build a detached confirmation paragraph styled per the palette.
///
/// `None` when the document's node limit is reached.
pub fn create_success_message(doc: &mut Document) -> Option<NodeId> {
    let id = doc.create_element(Tag::Paragraph)?;
    if let Some(node) = doc.node_mut(id) {
        node.classes.push(palette::SUCCESS_CLASS.to_owned());
        node.view.color = Some(palette::SUCCESS_COLOR);
        node.view.margin_top_px = Some(palette::SUCCESS_MARGIN_TOP_PX);
        node.view.font_weight = Some(palette::SUCCESS_FONT_WEIGHT);
        node.view.text_align = Some(palette::SUCCESS_TEXT_ALIGN);
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn canonical(social: usize) -> Document {
        Document::registration_form(&ElementIds::default(), social)
    }

    #[test]
    fn canonical_form_exposes_every_id() {
        let doc = canonical(2);
        let ids = ElementIds::default();
        for id in [
            &ids.form,
            &ids.first_name,
            &ids.last_name,
            &ids.email,
            &ids.password,
            &ids.terms,
            &ids.submit,
            &ids.password_toggle,
        ] {
            assert!(doc.get_element_by_id(id).is_some(), "missing #{id}");
        }
        let password = doc.get_element_by_id("password").unwrap();
        assert_eq!(
            doc.node(password).unwrap().input_type,
            Some(InputType::Password)
        );
        let terms = doc.get_element_by_id("terms").unwrap();
        assert!(!doc.node(terms).unwrap().checked);
    }

    #[test]
    fn social_buttons_alternate_markers_in_document_order() {
        let doc = canonical(3);
        let found = doc.query_class_any(&["google-btn", "apple-btn"]);
        assert_eq!(found.len(), 3);
        let markers: Vec<_> = found
            .iter()
            .map(|&n| doc.node(n).unwrap().classes[0].clone())
            .collect();
        assert_eq!(markers, vec!["google-btn", "apple-btn", "google-btn"]);
        assert!(canonical(0).query_class_any(&["google-btn"]).is_empty());
    }

    #[test]
    fn removed_nodes_are_disconnected_and_unqueryable() {
        let mut doc = canonical(0);
        let form = doc.get_element_by_id("registrationForm").unwrap();
        let msg = create_success_message(&mut doc).unwrap();
        assert!(!doc.is_connected(msg));
        assert!(doc.append_child(form, msg));
        assert!(doc.is_connected(msg));
        assert_eq!(doc.query_class_any(&[palette::SUCCESS_CLASS]), vec![msg]);

        assert!(doc.remove(msg));
        assert!(!doc.remove(msg));
        assert!(!doc.is_connected(msg));
        assert!(doc.query_class_any(&[palette::SUCCESS_CLASS]).is_empty());
        let submit = doc.get_element_by_id("submitBtn").unwrap();
        assert_eq!(doc.node(form).unwrap().children().last(), Some(&submit));
    }

    #[test]
    fn append_child_rejects_cycles_and_root() {
        let mut doc = canonical(0);
        let form = doc.get_element_by_id("registrationForm").unwrap();
        let email = doc.get_element_by_id("email").unwrap();
        assert!(!doc.append_child(email, form));
        assert!(!doc.append_child(form, doc.root()));
        assert!(!doc.append_child(form, form));
        assert!(doc.is_connected(form));
    }

    #[test]
    fn reset_restores_defaults_but_keeps_styles_and_type() {
        let mut doc = canonical(0);
        let email = doc.get_element_by_id("email").unwrap();
        let password = doc.get_element_by_id("password").unwrap();
        let terms = doc.get_element_by_id("terms").unwrap();
        let form = doc.get_element_by_id("registrationForm").unwrap();

        doc.node_mut(email).unwrap().value = "a@b.c".into();
        doc.update_view(email, |v| v.border_color = Some(palette::VALID));
        {
            let node = doc.node_mut(password).unwrap();
            node.value = "hunter22".into();
            node.input_type = Some(InputType::Text);
        }
        doc.node_mut(terms).unwrap().checked = true;

        doc.reset_form(form);

        assert_eq!(doc.value(email), "");
        assert_eq!(doc.view(email).border_color, Some(palette::VALID));
        assert_eq!(doc.value(password), "");
        assert_eq!(
            doc.node(password).unwrap().input_type,
            Some(InputType::Text)
        );
        assert!(!doc.node(terms).unwrap().checked);
    }

    #[test]
    fn toggle_class_flips_presence() {
        let mut doc = canonical(0);
        let icon = doc.get_element_by_id("togglePassword").unwrap();
        assert_eq!(doc.toggle_class(icon, palette::EYE_SLASH_CLASS), Some(true));
        assert!(doc.node(icon).unwrap().has_class(palette::EYE_SLASH_CLASS));
        assert_eq!(doc.toggle_class(icon, palette::EYE_SLASH_CLASS), Some(false));
        assert!(doc.node(icon).unwrap().has_class("fa-eye"));
    }

    #[test]
    fn set_text_replaces_content() {
        let mut doc = canonical(0);
        let msg = create_success_message(&mut doc).unwrap();
        assert!(doc.set_text(msg, "first"));
        assert!(doc.set_text(msg, "second"));
        assert_eq!(doc.node(msg).unwrap().text, "second");
        assert!(!doc.set_text(NodeId(9999), "x"));
    }

    #[test]
    fn builder_places_controls_outside_closed_form() {
        let doc = DocumentBuilder::new()
            .form("f")
            .end_form()
            .button("loose")
            .build();
        let loose = doc.get_element_by_id("loose").unwrap();
        assert_eq!(doc.node(loose).unwrap().parent(), Some(doc.root()));
    }

    #[test]
    fn first_match_wins_for_duplicate_ids() {
        let doc = DocumentBuilder::new().button("dup").button("dup").build();
        let first = doc.get_element_by_id("dup").unwrap();
        assert_eq!(doc.node(doc.root()).unwrap().children()[0], first);
    }

    #[test]
    fn snapshot_mirror_matches_stock_layout() {
        let ids = ElementIds::default();
        let mirrored = Document::from_snapshot(&ids, &PageSnapshot::stock(&ids, 3));
        let stock = canonical(3);
        assert_eq!(mirrored.len(), stock.len());
        let form = mirrored.get_element_by_id(&ids.form).unwrap();
        for dom_id in ids.all().into_iter().skip(1) {
            let id = mirrored.get_element_by_id(dom_id).unwrap();
            assert_eq!(mirrored.node(id).unwrap().parent(), Some(form), "#{dom_id}");
        }
        assert_eq!(mirrored.query_class_any(&["google-btn", "apple-btn"]).len(), 3);
    }

    #[test]
    fn snapshot_mirror_carries_control_state_and_omits_missing_ids() {
        let ids = ElementIds::default();
        let mut email = PageElement::input(InputType::Email);
        email.value = "typed@before.init".into();
        let page = PageSnapshot::stock(&ids, 0)
            .with(&ids.terms, PageElement::input(InputType::Checkbox).checked(true))
            .with(&ids.email, email)
            .without(&ids.submit);
        let page = PageSnapshot {
            social_markers: vec!["fb-btn".into()],
            ..page
        };
        let doc = Document::from_snapshot(&ids, &page);

        let terms = doc.get_element_by_id(&ids.terms).unwrap();
        assert!(doc.node(terms).unwrap().checked);
        assert!(doc.node(terms).unwrap().default_checked);
        let email = doc.get_element_by_id(&ids.email).unwrap();
        assert_eq!(doc.value(email), "typed@before.init");
        assert_eq!(doc.get_element_by_id(&ids.submit), None);
        assert_eq!(doc.query_class_any(&["fb-btn"]).len(), 1);
    }

    #[test]
    fn tag_and_input_type_names_parse_loosely() {
        assert_eq!(Tag::from_name("BUTTON"), Tag::Button);
        assert_eq!(Tag::from_name("section"), Tag::Other);
        assert_eq!(InputType::from_name("Password"), InputType::Password);
        assert_eq!(InputType::from_name("tel"), InputType::Text);
    }

    #[test]
    fn node_limit_stops_creation_without_reusing_ids() {
        let base = canonical(0);
        let full = base.len();
        let mut doc = base.with_node_limit(full + 1);
        let last = create_success_message(&mut doc).unwrap();
        assert_eq!(last.get() as usize, full);
        assert_eq!(create_success_message(&mut doc), None);
        assert_eq!(doc.create_element(Tag::Paragraph), None);
        assert_eq!(doc.len(), full + 1);

        // A limit above the id space is clamped.
        let doc = Document::new().with_node_limit(usize::MAX);
        assert_eq!(doc.node_limit, MAX_NODES);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create,
        Append(usize, usize),
        Remove(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Create),
            (0usize..32, 0usize..32).prop_map(|(p, c)| Op::Append(p, c)),
            (0usize..32).prop_map(Op::Remove),
        ]
    }

    fn pick(doc: &Document, index: usize) -> NodeId {
        NodeId((index % doc.len()) as u32)
    }

    proptest! {
        #[test]
        fn arena_ops_keep_tree_consistent(
            ops in prop::collection::vec(op_strategy(), 1..120),
            // The stock page with one social button already holds 10 nodes.
            limit in 10usize..40,
        ) {
            let mut doc = canonical(1).with_node_limit(limit);
            let mut issued = std::collections::HashSet::new();
            for op in ops {
                match op {
                    Op::Create => {
                        if let Some(id) = doc.create_element(Tag::Paragraph) {
                            prop_assert!(issued.insert(id), "id {id:?} issued twice");
                        }
                    }
                    Op::Append(p, c) => {
                        let (parent, child) = (pick(&doc, p), pick(&doc, c));
                        if doc.append_child(parent, child) {
                            prop_assert_eq!(doc.node(child).unwrap().parent(), Some(parent));
                        }
                    }
                    Op::Remove(i) => {
                        let id = pick(&doc, i);
                        doc.remove(id);
                        prop_assert_eq!(doc.node(id).unwrap().parent(), None);
                        prop_assert!(id == doc.root() || !doc.is_connected(id));
                    }
                }
                prop_assert!(doc.len() <= limit);
                prop_assert!(doc.is_connected(doc.root()));
                // Parent and child links agree, and each child appears once.
                for (id, node) in doc.nodes() {
                    if let Some(parent) = node.parent() {
                        let siblings = doc.node(parent).unwrap().children();
                        prop_assert_eq!(siblings.iter().filter(|&&c| c == id).count(), 1);
                    }
                    for &child in node.children() {
                        prop_assert_eq!(doc.node(child).unwrap().parent(), Some(id));
                    }
                }
            }
        }
    }
}
