//! Required-field guard for form submission.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing required fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

impl FormError {
    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        match self {
            Self::Missing(fields) => fields,
        }
    }
}

/// A form that declares which of its fields must be filled in.
pub trait RequiredFields {
    /// Names of required fields that are currently blank.
    fn missing_fields(&self) -> Vec<&'static str>;
}

/// Run `action` only when every required field of `form` is present.
///
/// When any field is missing, `action` is never called.
pub fn submit<F, R>(form: &F, action: impl FnOnce(&F) -> R) -> Result<R, FormError>
where
    F: RequiredFields + ?Sized,
{
    let missing = form.missing_fields();
    if !missing.is_empty() {
        return Err(FormError::Missing(missing));
    }
    Ok(action(form))
}

/// Collect the names whose values are blank after trimming.
#[must_use]
pub fn blank_fields(fields: &[(&'static str, &str)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Login {
        username: String,
        password: String,
    }

    impl RequiredFields for Login {
        fn missing_fields(&self) -> Vec<&'static str> {
            blank_fields(&[("username", &self.username), ("password", &self.password)])
        }
    }

    #[test]
    fn missing_field_never_invokes_action() {
        let calls = Cell::new(0);
        let form = Login {
            username: "asha".into(),
            password: "   ".into(),
        };

        let result = submit(&form, |_| calls.set(calls.get() + 1));

        assert_eq!(result, Err(FormError::Missing(vec!["password"])));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn complete_form_invokes_action_once() {
        let calls = Cell::new(0);
        let form = Login {
            username: "asha".into(),
            password: "hunter22".into(),
        };

        let result = submit(&form, |f| {
            calls.set(calls.get() + 1);
            f.username.clone()
        });

        assert_eq!(result.unwrap(), "asha");
        assert_eq!(calls.get(), 1);
    }
}
