//! # Forms
//!
//! Per-field validation plus the aggregate gate that decides whether a
//! form may be submitted. Submission outcomes are reported through the
//! notification queue.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use log::{debug, info};

use crate::core::error::{ClientError, CommonError};
use crate::core::notice::{Notice, NoticeKind};
use crate::core::queue::NotificationQueue;

pub type Validation = Arc<dyn Fn(&str) -> Result<(), CommonError> + Send + Sync>;

/// Built-in field validations.
pub mod validation {
    use super::*;

    pub fn any_value(_value: &str) -> Result<(), CommonError> {
        Ok(())
    }

    pub fn not_empty(value: &str) -> Result<(), CommonError> {
        if value.is_empty() {
            return Err(ClientError::RequiredFields.into());
        }
        Ok(())
    }

    pub fn integer_value(value: &str) -> Result<(), CommonError> {
        not_empty(value)?;
        value
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| ClientError::RequiredFieldInteger.into())
    }

    pub fn integer_in_range(min: i64, max: i64) -> Validation {
        Arc::new(move |value: &str| {
            let Ok(n) = value.parse::<i64>() else {
                return integer_value(value);
            };
            if n < min {
                return Err(CommonError::custom(format!("Value must be no less than {min}")));
            }
            if n > max {
                return Err(CommonError::custom(format!("Value must be no greater than {max}")));
            }
            Ok(())
        })
    }
}

pub struct FormItem {
    pub title: String,
    value: String,
    validation: Validation,
    error: Option<CommonError>,
}

impl FormItem {
    /// A required field (`not_empty`).
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_validation(title, Arc::new(validation::not_empty))
    }

    pub fn with_validation(title: impl Into<String>, validation: Validation) -> Self {
        Self {
            title: title.into(),
            value: String::new(),
            validation,
            error: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Updates the value. A previously shown error is cleared until the next validation.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.error = None;
    }

    /// Checks the current value without touching the error state.
    pub fn check(&self) -> Result<(), CommonError> {
        (self.validation)(&self.value)
    }

    /// Re-validates and records the error for display. Returns true if valid.
    pub fn validate(&mut self) -> bool {
        self.error = self.check().err();
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&CommonError> {
        self.error.as_ref()
    }
}

impl fmt::Debug for FormItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormItem")
            .field("title", &self.title)
            .field("value", &self.value)
            .field("error", &self.error)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// At least one field failed validation; nothing was submitted.
    Blocked,
    /// The submit callback itself failed.
    Failed(CommonError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Blocked => write!(f, "form has invalid fields"),
            SubmitError::Failed(e) => write!(f, "submit failed: {e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

#[derive(Debug)]
pub struct FormModel {
    pub title: String,
    pub items: Vec<FormItem>,
}

impl FormModel {
    pub fn new(title: impl Into<String>, items: Vec<FormItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// True iff every field passes its validation.
    pub fn is_valid(&self) -> bool {
        self.items.iter().all(|item| item.check().is_ok())
    }

    /// Refreshes every field's error state so they can all be shown at once.
    pub fn validate_all(&mut self) -> bool {
        self.items
            .iter_mut()
            .fold(true, |valid, item| item.validate() && valid)
    }

    /// Runs `submit_fn` if the form is valid and reports the outcome as a notice.
    ///
    /// An invalid form only refreshes field errors and returns `Blocked`.
    pub async fn submit<F, Fut>(
        &mut self,
        queue: &mut NotificationQueue,
        submit_fn: F,
    ) -> Result<(), SubmitError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), CommonError>>,
    {
        if !self.is_valid() {
            self.validate_all();
            debug!("form '{}' blocked by validation", self.title);
            return Err(SubmitError::Blocked);
        }

        match submit_fn().await {
            Ok(()) => {
                info!("form '{}' submitted", self.title);
                queue.enqueue(Notice::new(
                    self.title.clone(),
                    "Data submitted successfully",
                    NoticeKind::Success,
                ));
                Ok(())
            }
            Err(e) => {
                queue.enqueue_error(&e, NoticeKind::Error);
                Err(SubmitError::Failed(e))
            }
        }
    }
}
