//! Login/register form state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
    Confirm,
}

/// State for the auth view.
#[derive(Debug)]
pub struct AuthState {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub focus: AuthField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            focus: AuthField::Username,
            error: None,
            submitting: false,
        }
    }
}

impl AuthState {
    /// Fields shown for the current mode, in focus order.
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Username, AuthField::Password],
            AuthMode::Register => &[
                AuthField::Username,
                AuthField::Email,
                AuthField::Password,
                AuthField::Confirm,
            ],
        }
    }

    pub fn field_value_mut(&mut self, field: AuthField) -> &mut String {
        match field {
            AuthField::Username => &mut self.username,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::Confirm => &mut self.confirm,
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + fields.len() - 1) % fields.len()];
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.focus = AuthField::Username;
        self.error = None;
    }

    /// Validates the form; returns an error message when not submittable.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        if self.mode == AuthMode::Register {
            if self.email.trim().is_empty() {
                return Err("Email is required".to_string());
            }
            if self.password != self.confirm {
                return Err("Passwords do not match".to_string());
            }
        }
        Ok(())
    }

    /// Resets after a successful login (credentials are not kept around).
    pub fn reset(&mut self) {
        *self = AuthState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_through_mode_fields() {
        let mut state = AuthState::default();
        state.focus_next();
        assert_eq!(state.focus, AuthField::Password);
        state.focus_next();
        assert_eq!(state.focus, AuthField::Username);

        state.toggle_mode();
        state.focus_next();
        assert_eq!(state.focus, AuthField::Email);
        state.focus_prev();
        assert_eq!(state.focus, AuthField::Username);
    }

    #[test]
    fn test_register_requires_matching_passwords() {
        let mut state = AuthState::default();
        state.toggle_mode();
        state.username = "trader".to_string();
        state.email = "t@example.com".to_string();
        state.password = "one".to_string();
        state.confirm = "two".to_string();
        assert!(state.validate().is_err());
        state.confirm = "one".to_string();
        assert!(state.validate().is_ok());
    }
}
