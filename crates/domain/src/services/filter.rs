//! Request-driven filtering of template collections.
//!
//! A [`TemplateFilter`] is built once per list request and expanded into an
//! ordered set of [`Predicate`]s. The same predicates drive the in-memory
//! [`TemplateFilter::apply`] and the SQL rendering in the persistence layer,
//! so both paths agree on what a filter means.

use crate::models::template::{ListTemplatesQuery, Template};

/// A single narrowing condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate<'a> {
    /// Case-insensitive substring match on template name or folder name.
    Search(&'a str),
    Archived,
    Active,
    /// Exact match on `external_id`. Both `application_key` and
    /// `external_id` criteria resolve to this.
    ExternalId(&'a str),
    /// Exact match on the assigned folder's name.
    FolderName(&'a str),
}

impl Predicate<'_> {
    pub fn matches(&self, template: &Template) -> bool {
        match self {
            Predicate::Search(term) => {
                contains_ignore_case(&template.name, term)
                    || template
                        .folder_name
                        .as_deref()
                        .is_some_and(|folder| contains_ignore_case(folder, term))
            }
            Predicate::Archived => template.is_archived(),
            Predicate::Active => template.is_active(),
            Predicate::ExternalId(id) => template.external_id.as_deref() == Some(*id),
            Predicate::FolderName(name) => template.folder_name.as_deref() == Some(*name),
        }
    }
}

/// Filter criteria for a list request. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub search: Option<String>,
    pub archived: bool,
    pub application_key: Option<String>,
    pub external_id: Option<String>,
    pub folder: Option<String>,
}

impl TemplateFilter {
    pub fn from_query(query: &ListTemplatesQuery) -> Self {
        Self {
            search: present(query.q.as_deref()),
            archived: query.wants_archived(),
            application_key: present(query.application_key.as_deref()),
            external_id: present(query.external_id.as_deref()),
            folder: present(query.folder.as_deref()),
        }
    }

    /// Predicates in application order: search, archival state,
    /// application key, external id, folder.
    ///
    /// Archival state is always constrained.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates = Vec::with_capacity(5);
        if let Some(term) = &self.search {
            predicates.push(Predicate::Search(term));
        }
        predicates.push(if self.archived {
            Predicate::Archived
        } else {
            Predicate::Active
        });
        if let Some(key) = &self.application_key {
            predicates.push(Predicate::ExternalId(key));
        }
        if let Some(id) = &self.external_id {
            predicates.push(Predicate::ExternalId(id));
        }
        if let Some(folder) = &self.folder {
            predicates.push(Predicate::FolderName(folder));
        }
        predicates
    }

    pub fn matches(&self, template: &Template) -> bool {
        self.predicates().iter().all(|p| p.matches(template))
    }

    /// Narrows a collection, keeping the input order.
    pub fn apply(&self, templates: Vec<Template>) -> Vec<Template> {
        let predicates = self.predicates();
        templates
            .into_iter()
            .filter(|t| predicates.iter().all(|p| p.matches(t)))
            .collect()
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Escapes a search term for use inside an `ILIKE '%...%'` pattern.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
