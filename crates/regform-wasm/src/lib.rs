#![forbid(unsafe_code)]

//! WASM runner for the registration form.
//!
//! This crate provides `RegistrationFormRunner`, a `wasm-bindgen`-exported
//! struct that wraps `regform_runtime::FormProgram<regform_web::WebBackend>`
//! and exposes it to the page script for host-driven execution. At `init`
//! the runner snapshots the live page and binds against that mirror, so a
//! page missing a required element fails there rather than at some later
//! patch.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::RegistrationFormRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

#[cfg(test)]
mod tests {
    use crate::runner_core::RunnerCore;
    use pretty_assertions::assert_eq;
    use regform_core::document::{InputType, PageElement, PageSnapshot};
    use regform_core::element::ElementIds;
    use regform_core::{BindError, palette};
    use regform_runtime::{FormConfig, ProgramError, SubmitOutcome};
    use regform_web::{DomPatch, Locator};

    fn stock(social: usize) -> PageSnapshot {
        PageSnapshot::stock(&ElementIds::default(), social)
    }

    fn ready(social: usize) -> RunnerCore {
        let mut core = RunnerCore::new();
        core.init(&stock(social)).unwrap();
        core
    }

    fn fill_all(core: &mut RunnerCore) {
        for (target, value) in [
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.com"),
            ("password", "analytical"),
        ] {
            let json = format!(r#"{{"kind":"input","target":"{target}","value":"{value}"}}"#);
            assert!(core.push_encoded_input(&json));
        }
    }

    #[test]
    fn runner_core_creates_and_inits() {
        let mut core = RunnerCore::new();
        assert!(!core.is_ready());
        core.init(&stock(2)).unwrap();
        assert!(core.is_ready());
        // Second init is refused.
        assert!(matches!(
            core.init(&stock(2)),
            Err(ProgramError::AlreadyInitialized)
        ));
    }

    #[test]
    fn init_fails_fast_when_page_lacks_an_element() {
        let ids = ElementIds::default();
        let mut core = RunnerCore::new();
        let err = core.init(&stock(1).without(&ids.submit)).unwrap_err();
        assert!(matches!(
            err,
            ProgramError::Bind(BindError::MissingElement { ref id }) if id == "submitBtn"
        ));
        assert!(!core.is_ready());
        assert!(core.take_patches().is_empty());
        let logs = core.take_logs();
        assert_eq!(
            logs,
            vec!["runner_init_error: bind failed: required element #submitBtn not found"]
        );

        // A wrong kind is refused too, and a corrected page can still bind.
        let text_terms = stock(1).with(&ids.terms, PageElement::input(InputType::Text));
        assert!(matches!(
            core.init(&text_terms),
            Err(ProgramError::Bind(BindError::WrongKind { .. }))
        ));
        core.init(&stock(1)).unwrap();
        assert!(core.is_ready());
    }

    #[test]
    fn init_reads_page_state() {
        let ids = ElementIds::default();
        let mut email = PageElement::input(InputType::Email);
        email.value = "kept@page.io".into();
        let page = stock(0)
            .with(&ids.terms, PageElement::input(InputType::Checkbox).checked(true))
            .with(&ids.email, email);
        let mut core = RunnerCore::new();
        core.init(&page).unwrap();

        let doc = core.document();
        let submit = doc.get_element_by_id(&ids.submit).unwrap();
        let email = doc.get_element_by_id(&ids.email).unwrap();
        let patches = core.take_patches();
        assert!(patches.contains(&DomPatch::SetDisabled {
            node: submit.get(),
            disabled: false
        }));
        assert!(patches.contains(&DomPatch::SetValue {
            node: email.get(),
            value: "kept@page.io".into()
        }));
    }

    #[test]
    fn social_buttons_follow_page_markers() {
        let config = FormConfig::default().social_markers(["fb-btn"]);
        let mut core = RunnerCore::with_config(config);
        let page = PageSnapshot {
            social_markers: vec!["fb-btn".into(), "fb-btn".into()],
            ..stock(0)
        };
        core.init(&page).unwrap();
        let patches = core.take_patches();
        assert!(patches.iter().any(|p| matches!(
            p,
            DomPatch::Adopt { locator: Locator::Class { class, nth: 1 }, .. } if class == "fb-btn"
        )));

        assert!(core.push_encoded_input(r#"{"kind":"pointerenter","target":"social","index":1}"#));
        assert!(core.step().rendered);
        assert!(!core.take_patches().is_empty());
    }

    #[test]
    fn init_emits_adoption_patches() {
        let mut core = ready(2);
        let patches = core.take_patches();
        assert!(matches!(
            patches.first(),
            Some(DomPatch::Adopt {
                locator: Locator::Body,
                ..
            })
        ));
        let submit = core.document().get_element_by_id("submitBtn").unwrap();
        assert!(patches.contains(&DomPatch::SetDisabled {
            node: submit.get(),
            disabled: true
        }));
        assert!(patches.contains(&DomPatch::SetStyle {
            node: submit.get(),
            property: "opacity",
            value: "0.5".into()
        }));
        // Drained.
        assert!(core.take_patches().is_empty());
    }

    #[test]
    fn step_without_events_renders_nothing() {
        let mut core = ready(0);
        let _ = core.take_patches();
        let result = core.step();
        assert_eq!(result.events_processed, 0);
        assert!(!result.rendered);
        assert!(core.take_patches().is_empty());
    }

    #[test]
    fn step_before_init_is_logged() {
        let mut core = RunnerCore::new();
        let result = core.step();
        assert_eq!(result.events_processed, 0);
        let logs = core.take_logs();
        assert!(
            logs.iter().any(|l| l.starts_with("runner_step_error")),
            "{logs:?}"
        );
    }

    #[test]
    fn unknown_and_malformed_input_are_refused() {
        let mut core = ready(0);
        assert!(!core.push_encoded_input(r#"{"kind":"keydown"}"#));
        assert!(!core.push_encoded_input("not json"));
        assert!(!core.push_encoded_input(r#"{"kind":"focus","target":"nope"}"#));
        let logs = core.take_logs();
        assert_eq!(
            logs.iter()
                .filter(|l| l.starts_with("runner_input_error"))
                .count(),
            2
        );
    }

    #[test]
    fn empty_submit_raises_alert() {
        let mut core = ready(0);
        assert!(core.push_encoded_input(r#"{"kind":"submit"}"#));
        let result = core.step();
        assert!(result.default_prevented);
        assert!(matches!(
            result.last_submit,
            Some(SubmitOutcome::Rejected { .. })
        ));
        assert_eq!(core.take_alerts(), vec!["Please fill out all fields."]);
        assert!(core.take_alerts().is_empty());
    }

    #[test]
    fn successful_submit_inserts_then_removes_message() {
        let mut core = ready(0);
        let _ = core.take_patches();
        fill_all(&mut core);
        assert!(core.push_encoded_input(r#"{"kind":"change","target":"terms","checked":true}"#));
        assert!(core.push_encoded_input(r#"{"kind":"submit"}"#));
        let result = core.step();
        let Some(SubmitOutcome::Accepted { message }) = result.last_submit else {
            panic!("expected accepted submit, got {:?}", result.last_submit);
        };
        let patches = core.take_patches();
        assert!(patches.iter().any(|p| matches!(
            p,
            DomPatch::Insert { node, classes, .. }
                if *node == message.get() && classes == &[palette::SUCCESS_CLASS.to_owned()]
        )));
        assert_eq!(core.pending_tasks(), 1);

        core.advance_time_ms(2999.0);
        assert_eq!(core.step().tasks_run, 0);
        core.advance_time_ms(1.0);
        let result = core.step();
        assert_eq!(result.tasks_run, 1);
        assert_eq!(
            core.take_patches(),
            vec![DomPatch::Remove {
                node: message.get()
            }]
        );
    }

    #[test]
    fn advance_time_ignores_invalid_inputs() {
        let mut core = ready(0);
        fill_all(&mut core);
        assert!(core.push_encoded_input(r#"{"kind":"change","target":"terms","checked":true}"#));
        assert!(core.push_encoded_input(r#"{"kind":"submit"}"#));
        let _ = core.step();
        core.advance_time_ms(f64::NAN);
        core.advance_time_ms(f64::INFINITY);
        core.advance_time_ms(-5000.0);
        assert_eq!(core.step().tasks_run, 0);
        core.set_time_ms(f64::NAN);
        assert_eq!(core.step().tasks_run, 0);
        core.set_time_ms(3000.0);
        assert_eq!(core.step().tasks_run, 1);
    }

    #[test]
    fn patches_encode_as_json() {
        let mut core = ready(1);
        let json = core.take_patches_json();
        let value: serde_json::Value =
            serde_json::from_str(&json).expect("patch json should parse");
        let first = &value.as_array().expect("array")[0];
        assert_eq!(first["op"], "adopt");
        assert_eq!(first["locator"]["by"], "body");
        assert_eq!(core.take_patches_json(), "[]");
    }

    #[test]
    fn custom_ids_drive_parsing() {
        let mut ids = regform_core::element::ElementIds::default();
        ids.email = "mail".into();
        let page = PageSnapshot::stock(&ids, 0);
        let mut core = RunnerCore::with_config(FormConfig::default().ids(ids));
        core.init(&page).unwrap();
        assert!(core.push_encoded_input(r#"{"kind":"focus","target":"mail"}"#));
        assert!(!core.push_encoded_input(r#"{"kind":"focus","target":"email"}"#));
    }
}
