//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod api_key;
pub mod template;
pub mod template_document;
pub mod template_folder;
pub mod user;

pub use api_key::ApiKeyEntity;
pub use template::{TemplateArchivalEntity, TemplateEntity, TemplateStampEntity};
pub use template_document::TemplateDocumentEntity;
pub use template_folder::TemplateFolderEntity;
pub use user::UserEntity;
