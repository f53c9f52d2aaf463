//! Domain services for template resources.
//!
//! Services contain the request-filtering, state-transition and
//! field-whitelisting logic that operates on domain models.

pub mod deletion;
pub mod filter;
pub mod mutation;
pub mod projection;
pub mod update_request;
pub mod whitelist;

use thiserror::Error;

pub use deletion::{Deletion, DeletionPolicy, TenancyMode};
pub use filter::{Predicate, TemplateFilter};
pub use mutation::{plan_update, TemplateAttributes, TemplateChangeset};
pub use projection::{project_page, project_template, DocumentUrlError, DocumentUrls};
pub use update_request::{normalize_update, ArchiveIntent, UpdateTemplateCommand};
pub use whitelist::{permit_template_attributes, Permit, TEMPLATE_PERMITTED};

/// Client-input errors raised while reading an update payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("param is missing or the value is empty: {0}")]
    MissingWrapper(&'static str),

    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// One rejected attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

/// Attribute data the store would reject.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", join_violations(.violations))]
pub struct InvalidAttributes {
    pub violations: Vec<Violation>,
}

impl InvalidAttributes {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.path, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}
