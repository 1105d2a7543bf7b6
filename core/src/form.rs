#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Image,
    Title,
    Category,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddProjectDraft {
    pub title: String,
    pub category: String,
    pub has_image: bool,
}

impl AddProjectDraft {
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if !self.has_image {
            missing.push(DraftField::Image);
        }
        if self.title.trim().is_empty() {
            missing.push(DraftField::Title);
        }
        if self.category.trim().is_empty() {
            missing.push(DraftField::Category);
        }
        missing
    }

    pub fn is_ready(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Fields left blank, in form order.
    pub fn empty_fields(&self) -> Vec<LoginField> {
        let mut empty = Vec::new();
        if self.email.trim().is_empty() {
            empty.push(LoginField::Email);
        }
        if self.password.trim().is_empty() {
            empty.push(LoginField::Password);
        }
        empty
    }
}
