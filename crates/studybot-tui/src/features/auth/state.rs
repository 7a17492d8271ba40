//! Auth form state.

use studybot_core::auth::{AuthMode, Credentials, Field};

use crate::input::LineInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Message shown under the form after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthFormState {
    name: LineInput,
    email: LineInput,
    password: LineInput,
    confirm_password: LineInput,
    code: LineInput,
    /// Index into `AuthMode::fields()`.
    pub focus: usize,
    pub notice: Option<Notice>,
}

impl AuthFormState {
    pub fn input(&self, field: Field) -> &LineInput {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
            Field::Code => &self.code,
        }
    }

    pub fn input_mut(&mut self, field: Field) -> &mut LineInput {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
            Field::Code => &mut self.code,
        }
    }

    /// The focused field for `mode`, clamped to its field list.
    pub fn focused_field(&self, mode: AuthMode) -> Field {
        let fields = mode.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self, mode: AuthMode) {
        self.focus = (self.focus + 1) % mode.fields().len();
    }

    pub fn focus_prev(&mut self, mode: AuthMode) {
        let len = mode.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    /// Resets focus when the form switches mode. Typed values are kept.
    pub fn switch_mode(&mut self) {
        self.focus = 0;
        self.notice = None;
    }

    pub fn set_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            name: self.name.text().to_string(),
            email: self.email.text().to_string(),
            password: self.password.text().to_string(),
            confirm_password: self.confirm_password.text().to_string(),
            code: self.code.text().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_wraps_within_mode_fields() {
        let mut form = AuthFormState::default();

        form.focus_prev(AuthMode::Login);
        assert_eq!(form.focused_field(AuthMode::Login), Field::Password);
        form.focus_next(AuthMode::Login);
        assert_eq!(form.focused_field(AuthMode::Login), Field::Email);
    }

    #[test]
    fn test_focus_is_clamped_for_shorter_forms() {
        let form = AuthFormState {
            focus: 3,
            ..AuthFormState::default()
        };
        assert_eq!(form.focused_field(AuthMode::Forgot), Field::Email);
    }
}
