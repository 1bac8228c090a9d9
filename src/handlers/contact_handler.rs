use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::contact_model::ContactForm,
    utils::validation,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

/// Contact page form. Messages are checked locally; nothing is sent anywhere.
#[derive(Default)]
pub struct ContactHandler {
    form: ContactForm,
    status: SubmitStatus,
}

impl ContactHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn submit(&mut self) -> AppResult<()> {
        self.status = SubmitStatus::Submitting;

        if let Err(e) = self.form.validate() {
            let message = validation::messages(&e).join("; ");
            self.status = SubmitStatus::Error(message.clone());
            return Err(AppError::Validation(message));
        }

        tracing::info!(email = %self.form.email, subject = %self.form.subject, "Contact message received");
        self.form = ContactForm::default();
        self.status = SubmitStatus::Success;
        Ok(())
    }

    /// Dismiss the success or error banner.
    pub fn acknowledge(&mut self) {
        self.status = SubmitStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_message_clears_the_form() {
        let mut handler = ContactHandler::new();
        *handler.form_mut() = ContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Schedules".into(),
            message: "When does the next batch start?".into(),
        };

        handler.submit().unwrap();
        assert_eq!(handler.status(), &SubmitStatus::Success);
        assert_eq!(handler.form(), &ContactForm::default());

        handler.acknowledge();
        assert_eq!(handler.status(), &SubmitStatus::Idle);
    }

    #[test]
    fn missing_fields_keep_the_input() {
        let mut handler = ContactHandler::new();
        handler.form_mut().name = "Ada".into();

        let err = handler.submit().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(matches!(handler.status(), SubmitStatus::Error(m) if m.contains("Subject is required")));
        assert_eq!(handler.form().name, "Ada");
    }
}
