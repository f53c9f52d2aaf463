//! Repository implementations for database operations.

pub mod api_key;
pub mod template;
pub mod template_document;
pub mod template_folder;
pub mod user;

pub use api_key::ApiKeyRepository;
pub use template::TemplateRepository;
pub use template_document::TemplateDocumentRepository;
pub use template_folder::TemplateFolderRepository;
pub use user::UserRepository;
