// Form helpers: required-field validation, loading buttons and confirm-then-act
use crate::notify::Notifier;

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    /// Text of the field's label, used in validation messages
    pub label: String,
    pub value: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Form {
    pub id: String,
    pub fields: Vec<FormField>,
    focused: Option<usize>,
}

impl Form {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: &str, label: &str, required: bool) -> Self {
        self.fields.push(FormField {
            name: name.to_string(),
            label: label.to_string(),
            value: String::new(),
            required,
        });
        self
    }

    /// Returns false if the form has no field called `name`.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }

    pub fn focus(&mut self, name: &str) {
        self.focused = self.fields.iter().position(|f| f.name == name);
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.focused.and_then(|i| self.fields.get(i))
    }

    /// First required field whose value is blank, in declaration order.
    pub fn first_missing(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.required && f.value.trim().is_empty())
    }
}

/// Checks required fields. On the first blank one, focuses it, shows an error
/// notification and returns false.
pub fn validate_form(form: &mut Form, notifier: &Notifier) -> bool {
    let Some(index) = form.first_missing() else {
        return true;
    };
    form.focused = Some(index);
    let field = &form.fields[index];
    let label = if field.label.trim().is_empty() {
        field.name.as_str()
    } else {
        field.label.trim()
    };
    tracing::debug!(form = %form.id, field = %field.name, "Required field is empty");
    notifier.error(&format!("Please fill in the {} field", label));
    false
}

pub const LOADING_TEXT: &str = "Loading...";
const FALLBACK_TEXT: &str = "Submit";

/// Submit button that shows a spinner label while a request is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingButton {
    pub text: String,
    pub disabled: bool,
    original_text: Option<String>,
}

impl LoadingButton {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            disabled: false,
            original_text: None,
        }
    }

    /// Text restored after loading; without it the button falls back to "Submit".
    pub fn with_original_text(mut self, text: &str) -> Self {
        self.original_text = Some(text.to_string());
        self
    }

    pub fn set_loading(&mut self, loading: bool) {
        if loading {
            self.disabled = true;
            self.text = LOADING_TEXT.to_string();
        } else {
            self.disabled = false;
            self.text = self
                .original_text
                .clone()
                .unwrap_or_else(|| FALLBACK_TEXT.to_string());
        }
    }
}

pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Runs `action` only when the user accepts `message`. Returns whether it ran.
pub fn confirm_action<C, F>(confirm: &C, message: &str, action: F) -> bool
where
    C: Confirm + ?Sized,
    F: FnOnce(),
{
    if confirm.confirm(message) {
        action();
        true
    } else {
        false
    }
}
