//! Projection of templates into their client-facing representation.

use thiserror::Error;
use url::Url;

use shared::pagination::Pagination;

use crate::models::template::{
    DocumentResponse, ListTemplatesResponse, Template, TemplateDocument, TemplateResponse,
};

#[derive(Debug, Error)]
pub enum DocumentUrlError {
    #[error("invalid storage base url: {0}")]
    Parse(#[from] url::ParseError),

    #[error("storage base url cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// Builds public URLs for stored document files.
#[derive(Debug, Clone)]
pub struct DocumentUrls {
    base: Url,
}

impl DocumentUrls {
    pub fn new(base: &str) -> Result<Self, DocumentUrlError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(DocumentUrlError::CannotBeABase(base.to_string()));
        }
        Ok(Self { base })
    }

    fn with_segments(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    /// `{base}/file/{blob_key}/{filename}`
    pub fn file_url(&self, document: &TemplateDocument) -> String {
        self.with_segments(&["file", &document.blob_key, &document.filename])
    }

    /// `{base}/file/{uuid}/preview/0.jpg`, the first-page preview.
    pub fn preview_url(&self, document: &TemplateDocument) -> String {
        let uuid = document.uuid.to_string();
        self.with_segments(&["file", &uuid, "preview", "0.jpg"])
    }

    pub fn document(&self, document: TemplateDocument) -> DocumentResponse {
        DocumentResponse {
            url: self.file_url(&document),
            preview_image_url: self.preview_url(&document),
            id: document.id,
            uuid: document.uuid,
            filename: document.filename,
        }
    }
}

pub fn project_template(template: Template, urls: &DocumentUrls) -> TemplateResponse {
    let application_key = template.application_key().map(str::to_string);
    TemplateResponse {
        id: template.id,
        slug: template.slug,
        name: template.name,
        schema: template.schema,
        fields: template.fields,
        submitters: template.submitters,
        author_id: template.author_id,
        folder_id: template.folder_id,
        folder_name: template.folder_name,
        external_id: template.external_id,
        archived_at: template.archived_at,
        created_at: template.created_at,
        updated_at: template.updated_at,
        application_key,
        author: template.author.map(Into::into),
        documents: template
            .documents
            .into_iter()
            .map(|d| urls.document(d))
            .collect(),
    }
}

/// Projects one page of templates, in page order.
pub fn project_page(templates: Vec<Template>, urls: &DocumentUrls) -> ListTemplatesResponse {
    let pagination = Pagination::for_page(&templates, |t| t.id);
    ListTemplatesResponse {
        data: templates
            .into_iter()
            .map(|t| project_template(t, urls))
            .collect(),
        pagination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::TemplateAuthor;
    use chrono::Utc;
    use uuid::Uuid;

    fn document() -> TemplateDocument {
        TemplateDocument {
            id: 9,
            uuid: Uuid::parse_str("6f9619ff-8b86-d011-b42d-00cf4fc964ff").unwrap(),
            filename: "Mutual NDA.pdf".into(),
            blob_key: "k3y".into(),
        }
    }

    fn template(id: i64) -> Template {
        let now = Utc::now();
        Template {
            id,
            slug: "s".into(),
            name: "NDA".into(),
            account_id: 1,
            author_id: 2,
            folder_id: Some(3),
            folder_name: Some("Contracts".into()),
            external_id: Some("crm-1".into()),
            schema: vec![],
            submitters: vec![],
            fields: vec![],
            archived_at: None,
            created_at: now,
            updated_at: now,
            author: Some(TemplateAuthor {
                id: 2,
                email: "a@example.com".into(),
                first_name: Some("Ada".into()),
                last_name: None,
            }),
            documents: vec![document()],
        }
    }

    #[test]
    fn test_document_urls() {
        let urls = DocumentUrls::new("https://docs.example.com").unwrap();
        assert_eq!(
            urls.file_url(&document()),
            "https://docs.example.com/file/k3y/Mutual%20NDA.pdf"
        );
        assert_eq!(
            urls.preview_url(&document()),
            "https://docs.example.com/file/6f9619ff-8b86-d011-b42d-00cf4fc964ff/preview/0.jpg"
        );
    }

    #[test]
    fn test_document_urls_keep_base_path() {
        let urls = DocumentUrls::new("https://cdn.example.com/app/").unwrap();
        assert_eq!(
            urls.file_url(&document()),
            "https://cdn.example.com/app/file/k3y/Mutual%20NDA.pdf"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(DocumentUrls::new("not a url").is_err());
        assert!(matches!(
            DocumentUrls::new("mailto:ops@example.com"),
            Err(DocumentUrlError::CannotBeABase(_))
        ));
    }

    #[test]
    fn test_project_template_mirrors_external_id() {
        let urls = DocumentUrls::new("http://localhost:3000").unwrap();
        let response = project_template(template(1), &urls);
        assert_eq!(response.application_key.as_deref(), Some("crm-1"));
        assert_eq!(response.author.as_ref().unwrap().email, "a@example.com");
        assert_eq!(response.documents.len(), 1);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["application_key"], json["external_id"]);
        assert!(json["author"].get("last_name").is_some());
        assert!(json["documents"][0].get("blob_key").is_none());
    }

    #[test]
    fn test_project_page_pagination() {
        let urls = DocumentUrls::new("http://localhost:3000").unwrap();
        let page = project_page(vec![template(9), template(7), template(4)], &urls);
        assert_eq!(page.pagination.count, 3);
        assert_eq!(page.pagination.next, Some(4));
        assert_eq!(page.pagination.prev, Some(9));
        assert_eq!(page.data[0].id, 9);

        let empty = project_page(vec![], &urls);
        assert_eq!(empty.pagination.count, 0);
        assert!(empty.pagination.next.is_none());
        assert!(empty.pagination.prev.is_none());
    }
}
