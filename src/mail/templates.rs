//! Email templates, compiled into the binary and rendered with Handlebars.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

pub const PASSWORD_RESET_SUBJECT: &str = "password_reset_subject.txt";
pub const PASSWORD_RESET_EMAIL: &str = "password_reset_email.html";

const EMBEDDED: &[(&str, &str)] = &[
    (
        PASSWORD_RESET_SUBJECT,
        include_str!("../../templates/password_reset_subject.txt"),
    ),
    (
        PASSWORD_RESET_EMAIL,
        include_str!("../../templates/password_reset_email.html"),
    ),
];

pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Registry with every embedded template
    pub fn embedded() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        // Missing variables are errors, not empty strings
        registry.set_strict_mode(true);

        for (name, source) in EMBEDDED {
            registry.register_template_string(name, *source)?;
        }

        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, RenderError> {
        self.registry.render(name, context)
    }

    /// Render a template meant for a mail subject, which must be a single line
    pub fn render_subject<T: Serialize>(
        &self,
        name: &str,
        context: &T,
    ) -> Result<String, RenderError> {
        let rendered = self.render(name, context)?;
        Ok(rendered.lines().collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> serde_json::Value {
        json!({
            "email": "a@b.com",
            "domain": "example.com",
            "site_name": "Example",
            "uid": "u-1",
            "username": "alice",
            "token": "tok",
            "protocol": "https",
        })
    }

    #[test]
    fn subject_is_single_line() {
        let templates = Templates::embedded().unwrap();
        let subject = templates
            .render_subject(PASSWORD_RESET_SUBJECT, &context())
            .unwrap();
        assert_eq!(subject, "Password reset on Example");
    }

    #[test]
    fn body_contains_reset_link() {
        let templates = Templates::embedded().unwrap();
        let body = templates.render(PASSWORD_RESET_EMAIL, &context()).unwrap();
        assert!(body.contains("https://example.com/reset/u-1/tok/"));
        assert!(body.contains("alice"));
    }

    #[test]
    fn missing_variable_fails() {
        let templates = Templates::embedded().unwrap();
        assert!(templates
            .render(PASSWORD_RESET_EMAIL, &json!({ "site_name": "x" }))
            .is_err());
    }
}
