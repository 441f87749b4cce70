#![forbid(unsafe_code)]

//! Identifiers for the elements the controller binds to.

/// One of the four required text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    FirstName,
    LastName,
    Email,
    Password,
}

impl FieldId {
    /// All required fields in document order.
    pub const ALL: [Self; 4] = [Self::FirstName, Self::LastName, Self::Email, Self::Password];

    /// Stable short name, used in logs and encoded input.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

impl core::fmt::Display for FieldId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elements that carry a hover affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverTarget {
    /// The form's submit button.
    SubmitButton,
    /// The n-th social-login button in document order.
    Social(usize),
}

/// DOM identifiers of every element bound at startup.
///
/// Social-login buttons are not listed here: they are matched by class
/// marker, and there may be none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ElementIds {
    pub form: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub terms: String,
    pub submit: String,
    pub password_toggle: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            form: "registrationForm".to_owned(),
            first_name: "firstName".to_owned(),
            last_name: "lastName".to_owned(),
            email: "email".to_owned(),
            password: "password".to_owned(),
            terms: "terms".to_owned(),
            submit: "submitBtn".to_owned(),
            password_toggle: "togglePassword".to_owned(),
        }
    }
}

impl ElementIds {
    /// DOM id of a required field.
    #[must_use]
    pub fn field(&self, field: FieldId) -> &str {
        match field {
            FieldId::FirstName => &self.first_name,
            FieldId::LastName => &self.last_name,
            FieldId::Email => &self.email,
            FieldId::Password => &self.password,
        }
    }

    /// Every bound id, form first.
    #[must_use]
    pub fn all(&self) -> [&str; 8] {
        [
            &self.form,
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.password,
            &self.password_toggle,
            &self.terms,
            &self.submit,
        ]
    }

    /// Reverse lookup: which required field, if any, has this DOM id.
    #[must_use]
    pub fn field_for(&self, id: &str) -> Option<FieldId> {
        FieldId::ALL.into_iter().find(|&f| self.field(f) == id)
    }
}
