//! Create/edit form state and validation.
//!
//! A form is either bound to an existing record (`target = Some(id)`) and
//! submits an update, or unbound and submits a create.
//!
use crate::model::{Address, Company, User, UserDraft, default_username};
use crate::store::Ticket;

/// Editable fields, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Username,
    Street,
    City,
    Company,
    Website,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Username,
        FormField::Street,
        FormField::City,
        FormField::Company,
        FormField::Website,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::Username => "Username",
            FormField::Street => "Street",
            FormField::City => "City",
            FormField::Company => "Company",
            FormField::Website => "Website",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Validation failures, one message per offending field at most.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors(pub Vec<(FormField, &'static str)>);

impl FormErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, m)| *m)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserForm {
    pub target: Option<u64>,
    pub values: [String; 8],
    pub focus: usize,
    pub errors: FormErrors,
    /// Save request still in flight.
    pub pending: Option<Ticket>,
}

impl UserForm {
    /// Blank create form. The username is pre-filled with the default heuristic.
    pub fn blank() -> Self {
        let mut form = Self::default();
        *form.value_mut(FormField::Username) = default_username(None);
        form
    }

    /// Edit form pre-filled from `user`.
    pub fn for_user(user: &User) -> Self {
        let username = if user.username.is_empty() {
            default_username(Some(&user.name))
        } else {
            user.username.clone()
        };
        Self {
            target: Some(user.id),
            values: [
                user.name.clone(),
                user.email.clone(),
                user.phone.clone(),
                username,
                user.address.street.clone(),
                user.address.city.clone(),
                user.company.name.clone(),
                user.website.clone(),
            ],
            ..Self::default()
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        &mut self.values[field.index()]
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus.min(FormField::ALL.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    pub fn insert_char(&mut self, c: char) {
        let field = self.focused();
        self.value_mut(field).push(c);
    }

    pub fn backspace(&mut self) {
        let field = self.focused();
        self.value_mut(field).pop();
    }

    pub fn submit_label(&self) -> &'static str {
        if self.target.is_some() { "Update User" } else { "Create User" }
    }

    /// Check every field and build a draft from the trimmed values.
    pub fn validate(&self) -> Result<UserDraft, FormErrors> {
        let get = |f: FormField| self.value(f).trim().to_string();
        let mut errors = Vec::new();

        let name = get(FormField::Name);
        if name.is_empty() {
            errors.push((FormField::Name, "Name is required"));
        } else if name.chars().count() < 3 {
            errors.push((FormField::Name, "Minimum length is 3"));
        }

        let email = get(FormField::Email);
        if email.is_empty() {
            errors.push((FormField::Email, "Email is required"));
        } else if !is_valid_email(&email) {
            errors.push((FormField::Email, "Invalid email address"));
        }

        let phone = get(FormField::Phone);
        if phone.is_empty() {
            errors.push((FormField::Phone, "Phone is required"));
        }

        let username = get(FormField::Username);
        if username.is_empty() {
            errors.push((FormField::Username, "Username is required"));
        }

        let website = get(FormField::Website);
        if !website.is_empty() && !is_valid_website(&website) {
            errors.push((FormField::Website, "Invalid website URL"));
        }

        if !errors.is_empty() {
            return Err(FormErrors(errors));
        }
        Ok(UserDraft {
            name,
            email,
            phone,
            username,
            address: Address {
                street: get(FormField::Street),
                city: get(FormField::City),
            },
            company: Company { name: get(FormField::Company) },
            website,
        })
    }
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

/// Accepts `example.org` as well as `http(s)://example.org/path`.
pub fn is_valid_website(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let candidate = if s.contains("://") { s.to_string() } else { format!("http://{s}") };
    match reqwest::Url::parse(&candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url
                    .host_str()
                    .map(|h| h.contains('.') && !h.starts_with('.') && !h.ends_with('.'))
                    .unwrap_or(false)
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> UserForm {
        let mut f = UserForm::blank();
        *f.value_mut(FormField::Name) = "Jane Doe".into();
        *f.value_mut(FormField::Email) = "jane@example.com".into();
        *f.value_mut(FormField::Phone) = "555-0101".into();
        f
    }

    #[test]
    fn blank_form_has_default_username() {
        let f = UserForm::blank();
        assert_eq!(f.value(FormField::Username), "USER-");
        assert_eq!(f.submit_label(), "Create User");
    }

    #[test]
    fn edit_form_fills_missing_username_from_name() {
        let user = User { id: 3, name: "Jane Doe".into(), ..Default::default() };
        let f = UserForm::for_user(&user);
        assert_eq!(f.target, Some(3));
        assert_eq!(f.value(FormField::Username), "USER-Jane");
        assert_eq!(f.submit_label(), "Update User");
    }

    #[test]
    fn name_rules() {
        let mut f = filled();
        *f.value_mut(FormField::Name) = "  ".into();
        assert_eq!(f.validate().unwrap_err().get(FormField::Name), Some("Name is required"));
        *f.value_mut(FormField::Name) = "Jo".into();
        assert_eq!(f.validate().unwrap_err().get(FormField::Name), Some("Minimum length is 3"));
    }

    #[test]
    fn valid_form_builds_trimmed_draft() {
        let mut f = filled();
        *f.value_mut(FormField::City) = " Metropolis ".into();
        let draft = f.validate().expect("valid");
        assert_eq!(draft.name, "Jane Doe");
        assert_eq!(draft.username, "USER-");
        assert_eq!(draft.address.city, "Metropolis");
    }

    #[test]
    fn email_patterns() {
        assert!(is_valid_email("Sincere@april.biz"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn website_patterns() {
        assert!(is_valid_website("hildegard.org"));
        assert!(is_valid_website("https://example.com/about"));
        assert!(!is_valid_website("localhost"));
        assert!(!is_valid_website("ftp://example.com"));
        assert!(!is_valid_website("not a url"));
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut f = UserForm::blank();
        f.focus_prev();
        assert_eq!(f.focused(), FormField::Website);
        f.focus_next();
        assert_eq!(f.focused(), FormField::Name);
        f.insert_char('A');
        f.insert_char('l');
        f.backspace();
        assert_eq!(f.value(FormField::Name), "A");
    }
}
