//! Domain models for templates.

pub mod field;
pub mod folder;
pub mod template;

pub use field::{Field, FieldArea, FieldType};
pub use folder::{FolderTarget, DEFAULT_FOLDER_NAME};
pub use template::{
    AuthorResponse, DeleteTemplateQuery, DestroyTemplateResponse, DocumentResponse,
    ListTemplatesQuery, ListTemplatesResponse, Template, TemplateAuthor, TemplateDocument,
    TemplateResponse, UpdateTemplateResponse,
};
