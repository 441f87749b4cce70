#![forbid(unsafe_code)]

//! The form interaction controller.
//!
//! [`FormController::bind`] is the ready step: it resolves every element
//! once into [`FormBindings`], registers the listeners, and applies the
//! initial terms evaluation. After that, [`FormController::dispatch`] routes
//! each [`FormEvent`] to its listeners. Handlers mutate the document's
//! view-state and report side effects (alerts, deferred tasks) through
//! [`Effects`]; the program decides how to deliver them.
//!
//! Handlers follow last-event-wins: a blur resets border and background even
//! if a validator colored them, and nothing merges concurrent visual states.

use core::time::Duration;

use regform_core::document::{Document, InputType, NodeId, Tag, create_success_message};
use regform_core::element::{FieldId, HoverTarget};
use regform_core::error::BindError;
use regform_core::event::{EventKind, FormEvent};
use regform_core::palette;
use regform_core::style::Shadow;

use crate::config::FormConfig;
use crate::listeners::{Handler, ListenerTable};
use crate::tasks::Deferred;
use crate::validation::{
    EmailValidity, PasswordStrength, classify_email, classify_password, is_blank,
};

/// Handles to every bound element, resolved once at bind time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBindings {
    pub form: NodeId,
    fields: [NodeId; 4],
    pub terms: NodeId,
    pub submit: NodeId,
    pub password_toggle: NodeId,
    /// Social-login buttons in document order; may be empty.
    pub social: Vec<NodeId>,
}

fn lookup(doc: &Document, id: &str) -> Result<NodeId, BindError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| BindError::MissingElement { id: id.to_owned() })
}

fn expect_tag(
    doc: &Document,
    id: &str,
    node: NodeId,
    expected: &'static str,
    ok: impl FnOnce(Tag, Option<InputType>) -> bool,
) -> Result<NodeId, BindError> {
    let (tag, input_type) = doc
        .node(node)
        .map(|n| (n.tag, n.input_type))
        .ok_or_else(|| BindError::MissingElement { id: id.to_owned() })?;
    if ok(tag, input_type) {
        Ok(node)
    } else {
        Err(BindError::WrongKind {
            id: id.to_owned(),
            expected,
            found: tag,
        })
    }
}

impl FormBindings {
    /// Resolve every element named by `config`.
    pub fn resolve(doc: &Document, config: &FormConfig) -> Result<Self, BindError> {
        let ids = &config.ids;

        let form_id = &ids.form;
        let form = expect_tag(doc, form_id, lookup(doc, form_id)?, "<form>", |tag, _| {
            tag == Tag::Form
        })?;

        let mut fields = [form; 4];
        for (slot, field) in fields.iter_mut().zip(FieldId::ALL) {
            let id = ids.field(field);
            *slot = expect_tag(doc, id, lookup(doc, id)?, "text <input>", |tag, ty| {
                tag == Tag::Input && ty.is_some_and(|t| t != InputType::Checkbox)
            })?;
        }

        let terms = expect_tag(
            doc,
            &ids.terms,
            lookup(doc, &ids.terms)?,
            "checkbox <input>",
            |tag, ty| tag == Tag::Input && ty == Some(InputType::Checkbox),
        )?;
        let submit = expect_tag(
            doc,
            &ids.submit,
            lookup(doc, &ids.submit)?,
            "<button>",
            |tag, _| tag == Tag::Button,
        )?;
        let password_toggle = lookup(doc, &ids.password_toggle)?;
        let social = doc.query_class_any(&config.marker_refs());

        Ok(Self {
            form,
            fields,
            terms,
            submit,
            password_toggle,
            social,
        })
    }

    #[must_use]
    pub const fn field(&self, field: FieldId) -> NodeId {
        self.fields[field as usize]
    }

    /// The element an event is aimed at, if it exists.
    #[must_use]
    pub fn target_of(&self, event: &FormEvent) -> Option<NodeId> {
        match event {
            FormEvent::Submit => Some(self.form),
            FormEvent::Focus(field) | FormEvent::Blur(field) => Some(self.field(*field)),
            FormEvent::Input { field, .. } => Some(self.field(*field)),
            FormEvent::TermsChanged { .. } => Some(self.terms),
            FormEvent::TogglePassword => Some(self.password_toggle),
            FormEvent::PointerEnter(target) | FormEvent::PointerLeave(target) => match target {
                HoverTarget::SubmitButton => Some(self.submit),
                HoverTarget::Social(index) => self.social.get(*index).copied(),
            },
        }
    }
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one required field was blank.
    Rejected { missing: Vec<FieldId> },
    /// All fields were filled; `message` is the confirmation element.
    Accepted { message: NodeId },
    /// All fields were filled and the form was reset, but the document's
    /// node limit left no room for a confirmation element.
    Unconfirmed,
}

/// Side effects requested by handlers during one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    pub alerts: Vec<String>,
    pub deferred: Vec<(Duration, Deferred)>,
    pub default_prevented: bool,
    pub submit: Option<SubmitOutcome>,
}

impl Effects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn defer(&mut self, delay: Duration, task: Deferred) {
        self.deferred.push((delay, task));
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Bound controller for one registration form.
#[derive(Debug, Clone)]
pub struct FormController {
    bindings: FormBindings,
    listeners: ListenerTable,
    config: FormConfig,
}

impl FormController {
    /// Resolve elements, register listeners, and apply the initial terms
    /// evaluation. Fails on the first missing or mismatched element.
    pub fn bind(doc: &mut Document, config: FormConfig) -> Result<Self, BindError> {
        let bindings = match FormBindings::resolve(doc, &config) {
            Ok(bindings) => bindings,
            Err(err) => {
                tracing::error!(target: "regform.bind", error = %err, "form binding failed");
                return Err(err);
            }
        };
        let listeners = Self::register(&bindings);
        let controller = Self {
            bindings,
            listeners,
            config,
        };
        // No change event fires for the initial checkbox state.
        controller.apply_terms_state(doc);
        tracing::debug!(
            target: "regform.bind",
            listeners = controller.listeners.len(),
            social_buttons = controller.bindings.social.len(),
            submit_enabled = controller.submit_enabled(doc),
            "form bound"
        );
        Ok(controller)
    }

    fn register(b: &FormBindings) -> ListenerTable {
        let mut table = ListenerTable::new();
        table.register(b.form, EventKind::Submit, Handler::Submit);
        for field in FieldId::ALL {
            table.register(b.field(field), EventKind::Focus, Handler::FocusHighlight);
            table.register(b.field(field), EventKind::Blur, Handler::BlurReset);
        }
        table.register(b.password_toggle, EventKind::Click, Handler::TogglePassword);
        table.register(b.terms, EventKind::Change, Handler::TermsGate);
        // Field-specific validators before the generic clearer.
        table.register(b.field(FieldId::Email), EventKind::Input, Handler::EmailLive);
        table.register(
            b.field(FieldId::Password),
            EventKind::Input,
            Handler::PasswordStrength,
        );
        for field in FieldId::ALL {
            table.register(b.field(field), EventKind::Input, Handler::ClearSubmitError);
        }
        table.register(b.submit, EventKind::PointerEnter, Handler::SubmitHoverEnter);
        table.register(b.submit, EventKind::PointerLeave, Handler::SubmitHoverLeave);
        for &button in &b.social {
            table.register(button, EventKind::PointerEnter, Handler::SocialHoverEnter);
            table.register(button, EventKind::PointerLeave, Handler::SocialHoverLeave);
        }
        table
    }

    #[must_use]
    pub const fn bindings(&self) -> &FormBindings {
        &self.bindings
    }

    #[must_use]
    pub const fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }

    #[must_use]
    pub const fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Whether the submit button is currently enabled.
    #[must_use]
    pub fn submit_enabled(&self, doc: &Document) -> bool {
        doc.node(self.bindings.submit).is_some_and(|n| !n.disabled)
    }

    /// Apply the event's default action, then run its listeners in
    /// registration order. Returns the number of handlers run.
    pub fn dispatch(&self, doc: &mut Document, event: &FormEvent, fx: &mut Effects) -> usize {
        let Some(target) = self.bindings.target_of(event) else {
            tracing::trace!(target: "regform.dispatch", ?event, "event has no bound target");
            return 0;
        };
        Self::apply_default_action(doc, target, event);

        let handlers: Vec<Handler> = self.listeners.matching(target, event.kind()).collect();
        for &handler in &handlers {
            self.run(handler, target, doc, fx);
        }
        tracing::trace!(
            target: "regform.dispatch",
            kind = event.kind().as_str(),
            node = target.get(),
            handlers = handlers.len(),
            "dispatched"
        );
        handlers.len()
    }

    fn apply_default_action(doc: &mut Document, target: NodeId, event: &FormEvent) {
        match event {
            FormEvent::Input { value, .. } => {
                if let Some(node) = doc.node_mut(target) {
                    node.value.clone_from(value);
                }
            }
            FormEvent::TermsChanged { checked } => {
                if let Some(node) = doc.node_mut(target) {
                    node.checked = *checked;
                }
            }
            _ => {}
        }
    }

    fn run(&self, handler: Handler, target: NodeId, doc: &mut Document, fx: &mut Effects) {
        match handler {
            Handler::Submit => {
                let outcome = self.on_submit(doc, fx);
                fx.submit = Some(outcome);
            }
            Handler::FocusHighlight => doc.update_view(target, |v| {
                v.background_color = Some(palette::ACTIVE_BACKGROUND);
                v.border_color = Some(palette::ACTIVE_BORDER);
            }),
            Handler::BlurReset => doc.update_view(target, |v| {
                v.background_color = Some(palette::DEFAULT_BACKGROUND);
                v.border_color = Some(palette::DEFAULT_BORDER);
            }),
            Handler::TogglePassword => self.toggle_password(doc),
            Handler::TermsGate => self.apply_terms_state(doc),
            Handler::EmailLive => Self::on_email_input(doc, target),
            Handler::PasswordStrength => {
                let strength =
                    classify_password(doc.value(target), self.config.strong_password_len);
                let border = match strength {
                    PasswordStrength::Strong => palette::VALID,
                    PasswordStrength::Weak => palette::WEAK,
                    PasswordStrength::Empty => palette::DEFAULT_BORDER,
                };
                doc.update_view(target, |v| v.border_color = Some(border));
            }
            Handler::ClearSubmitError => {
                let showing_error = doc.view(target).border_color == Some(palette::SUBMIT_ERROR);
                if showing_error && !is_blank(doc.value(target)) {
                    doc.update_view(target, |v| v.border_color = Some(palette::DEFAULT_BORDER));
                }
            }
            Handler::SubmitHoverEnter => {
                if self.submit_enabled(doc) {
                    doc.update_view(target, |v| {
                        v.transform = Some(palette::SUBMIT_HOVER_TRANSFORM);
                        v.transition = Some(palette::HOVER_TRANSITION);
                        v.box_shadow = Some(palette::SUBMIT_HOVER_SHADOW);
                    });
                }
            }
            Handler::SubmitHoverLeave => doc.update_view(target, |v| {
                v.transform = Some(palette::SUBMIT_REST_TRANSFORM);
                v.box_shadow = Some(Shadow::None);
            }),
            Handler::SocialHoverEnter => doc.update_view(target, |v| {
                v.transform = Some(palette::SOCIAL_HOVER_TRANSFORM);
                v.transition = Some(palette::HOVER_TRANSITION);
                v.box_shadow = Some(palette::SOCIAL_HOVER_SHADOW);
            }),
            Handler::SocialHoverLeave => doc.update_view(target, |v| {
                v.transform = Some(palette::SOCIAL_REST_TRANSFORM);
                v.box_shadow = Some(Shadow::None);
            }),
        }
    }

    fn on_submit(&self, doc: &mut Document, fx: &mut Effects) -> SubmitOutcome {
        fx.prevent_default();

        let mut missing = Vec::new();
        for field in FieldId::ALL {
            let node = self.bindings.field(field);
            let border = if is_blank(doc.value(node)) {
                missing.push(field);
                palette::SUBMIT_ERROR
            } else {
                palette::DEFAULT_BORDER
            };
            doc.update_view(node, |v| v.border_color = Some(border));
        }

        if !missing.is_empty() {
            tracing::info!(target: "regform.submit", ?missing, "submit rejected");
            fx.alert(self.config.failure_message.clone());
            return SubmitOutcome::Rejected { missing };
        }

        let message = match doc.query_class_any(&[palette::SUCCESS_CLASS]).first() {
            Some(&existing) => Some(existing),
            None => create_success_message(doc).inspect(|&created| {
                doc.append_child(self.bindings.form, created);
            }),
        };
        if let Some(message) = message {
            doc.set_text(message, &self.config.success_text);
        }

        doc.reset_form(self.bindings.form);
        // Reset may have unchecked the box; read it again.
        self.apply_terms_state(doc);

        let Some(message) = message else {
            tracing::error!(
                target: "regform.submit",
                nodes = doc.len(),
                "node limit reached; confirmation not shown"
            );
            return SubmitOutcome::Unconfirmed;
        };
        fx.defer(self.config.dismiss_delay(), Deferred::RemoveNode(message));

        tracing::info!(
            target: "regform.submit",
            message = message.get(),
            dismiss_after_ms = self.config.dismiss_after_ms,
            "submit accepted"
        );
        SubmitOutcome::Accepted { message }
    }

    fn toggle_password(&self, doc: &mut Document) {
        let password = self.bindings.field(FieldId::Password);
        if let Some(node) = doc.node_mut(password) {
            node.input_type = Some(if node.input_type == Some(InputType::Password) {
                InputType::Text
            } else {
                InputType::Password
            });
        }
        doc.toggle_class(self.bindings.password_toggle, palette::EYE_SLASH_CLASS);
    }

    fn apply_terms_state(&self, doc: &mut Document) {
        let checked = doc.node(self.bindings.terms).is_some_and(|n| n.checked);
        if let Some(node) = doc.node_mut(self.bindings.submit) {
            node.disabled = !checked;
            if checked {
                node.view.opacity = Some(palette::ENABLED_OPACITY);
                node.view.cursor = Some(palette::ENABLED_CURSOR);
            } else {
                node.view.opacity = Some(palette::DISABLED_OPACITY);
                node.view.cursor = Some(palette::DISABLED_CURSOR);
            }
        }
    }

    fn on_email_input(doc: &mut Document, target: NodeId) {
        let (border, text) = match classify_email(doc.value(target)) {
            EmailValidity::Valid => (palette::VALID, palette::VALID),
            EmailValidity::Invalid => (palette::INVALID, palette::INVALID),
            EmailValidity::Empty => (palette::DEFAULT_BORDER, palette::NEUTRAL_TEXT),
        };
        doc.update_view(target, |v| {
            v.border_color = Some(border);
            v.color = Some(text);
        });
    }

    /// Run one deferred task. Returns whether it changed the document.
    pub fn run_deferred(doc: &mut Document, task: Deferred) -> bool {
        match task {
            Deferred::RemoveNode(node) => {
                let removed = doc.remove(node);
                tracing::debug!(
                    target: "regform.task",
                    node = node.get(),
                    removed,
                    "deferred removal ran"
                );
                removed
            }
        }
    }
}
