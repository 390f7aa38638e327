//! In-memory user store backing the sample application.

/// Errors from the user store.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("{0} cannot be null or whitespace.")]
    Blank(&'static str),

    #[error("Cannot delete the currently logged in user.")]
    DeleteCurrentUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub fullname: String,
}

impl User {
    /// Build a user; every field must contain non-whitespace text.
    pub fn new(username: &str, password: &str, fullname: &str) -> Result<Self, UserError> {
        for (field, value) in [
            ("Username", username),
            ("Password", password),
            ("Full Name", fullname),
        ] {
            if value.trim().is_empty() {
                return Err(UserError::Blank(field));
            }
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            fullname: fullname.to_string(),
        })
    }
}

/// Account list plus the logged-in user, seeded with a default account.
pub struct UserService {
    users: Vec<User>,
    current: Option<String>,
}

impl UserService {
    pub fn new() -> Self {
        Self {
            users: vec![User {
                username: "me".to_string(),
                password: "123".to_string(),
                fullname: "Default User".to_string(),
            }],
            current: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        let name = self.current.as_deref()?;
        self.users.iter().find(|u| u.username == name)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Log in when the credentials match; a failed attempt logs out.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let ok = self
            .users
            .iter()
            .any(|u| u.username == username && u.password == password);
        self.current = ok.then(|| username.to_string());
        ok
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    /// Add a user, replacing any account with the same username.
    pub fn add_user(&mut self, user: User) {
        match self.users.iter_mut().find(|u| u.username == user.username) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    /// Delete a user. Returns whether the account existed.
    pub fn delete_user(&mut self, username: &str) -> Result<bool, UserError> {
        if username.trim().is_empty() {
            return Err(UserError::Blank("Username"));
        }
        if self.current.as_deref() == Some(username) {
            return Err(UserError::DeleteCurrentUser);
        }
        let before = self.users.len();
        self.users.retain(|u| u.username != username);
        Ok(self.users.len() != before)
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new()
    }
}
