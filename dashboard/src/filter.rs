// Category tab strips and the list filters the pages apply with them.

use crate::models::fixtures::{CatalogModel, CategoryTab, PlaygroundModel, PromptCollection, RagModel};
use thiserror::Error;

/// Tab id that matches every record.
pub const ALL_CATEGORY: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("A tab strip needs at least one tab")]
    NoTabs,

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}

pub trait Categorized {
    fn category(&self) -> &str;
}

impl Categorized for RagModel {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Categorized for CatalogModel {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Categorized for PlaygroundModel {
    fn category(&self) -> &str {
        &self.category
    }
}

/// Case-insensitive match on the tab id or label.
pub fn category_matches(tab: &CategoryTab, category: &str) -> bool {
    tab.id.eq_ignore_ascii_case(ALL_CATEGORY)
        || category.eq_ignore_ascii_case(&tab.id)
        || category.eq_ignore_ascii_case(&tab.label)
}

/// Records in `tab`, original order kept.
pub fn filter_by_category<'a, T: Categorized>(items: &'a [T], tab: &CategoryTab) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| category_matches(tab, item.category()))
        .collect()
}

/// Prompt collections whose title or description contains `query`.
pub fn search_prompts<'a>(items: &'a [PromptCollection], query: &str) -> Vec<&'a PromptCollection> {
    let q = query.trim().to_lowercase();
    items
        .iter()
        .filter(|c| {
            q.is_empty()
                || c.title.to_lowercase().contains(&q)
                || c.description.to_lowercase().contains(&q)
        })
        .collect()
}

/// One active tab out of a fixed strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTabs {
    tabs: Vec<CategoryTab>,
    active: usize,
}

impl CategoryTabs {
    /// The first tab starts active.
    pub fn new(tabs: Vec<CategoryTab>) -> Result<Self, CatalogError> {
        if tabs.is_empty() {
            return Err(CatalogError::NoTabs);
        }
        Ok(Self { tabs, active: 0 })
    }

    pub fn tabs(&self) -> &[CategoryTab] {
        &self.tabs
    }

    pub fn active(&self) -> &CategoryTab {
        &self.tabs[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Activate by id. Unknown ids leave the active tab unchanged.
    pub fn select(&mut self, id: &str) -> Result<&CategoryTab, CatalogError> {
        let id = id.trim();
        let idx = self
            .tabs
            .iter()
            .position(|t| t.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| CatalogError::UnknownCategory(id.to_string()))?;
        self.active = idx;
        Ok(&self.tabs[idx])
    }

    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.tabs.len();
    }

    pub fn select_prev(&mut self) {
        self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
    }

    pub fn filter<'a, T: Categorized>(&self, items: &'a [T]) -> Vec<&'a T> {
        filter_by_category(items, self.active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::Fixtures;

    fn rag(id: u32, title: &str, category: &str) -> RagModel {
        RagModel {
            id,
            title: title.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn embeddings_tab_keeps_only_embeddings_in_order() {
        let items = vec![
            rag(1, "a", "Text-to-text"),
            rag(2, "b", "Embeddings"),
            rag(3, "c", "Text-to-text"),
            rag(4, "d", "Embeddings"),
        ];
        let tab = CategoryTab::new("embeddings", "Embeddings");
        let ids: Vec<u32> = filter_by_category(&items, &tab).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn llm_tab_matches_through_label() {
        let fixtures = Fixtures::builtin();
        let mut tabs = CategoryTabs::new(fixtures.model_categories.clone()).unwrap();
        assert_eq!(tabs.filter(&fixtures.models).len(), 9);

        tabs.select("llm").unwrap();
        let titles: Vec<&str> = tabs
            .filter(&fixtures.models)
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(titles.len(), 5);
        assert_eq!(titles[0], "Meta-Llama-3.1-Nemotrn-70B-Instruct-HF");
    }

    #[test]
    fn unknown_tab_is_rejected_and_keeps_selection() {
        let fixtures = Fixtures::builtin();
        let mut tabs = CategoryTabs::new(fixtures.rag_categories.clone()).unwrap();
        tabs.select("Embeddings").unwrap();

        assert_eq!(
            tabs.select("audio"),
            Err(CatalogError::UnknownCategory("audio".to_string()))
        );
        assert_eq!(tabs.active().id, "embeddings");
    }

    #[test]
    fn tab_cycling_wraps() {
        let fixtures = Fixtures::builtin();
        let mut tabs = CategoryTabs::new(fixtures.rag_categories.clone()).unwrap();
        tabs.select_prev();
        assert_eq!(tabs.active().id, "text-to-image");
        tabs.select_next();
        assert_eq!(tabs.active().id, "text-to-text");
    }

    #[test]
    fn empty_strip_is_an_error() {
        assert_eq!(CategoryTabs::new(Vec::new()), Err(CatalogError::NoTabs));
    }

    #[test]
    fn prompt_search_matches_title_or_description() {
        let fixtures = Fixtures::builtin();
        let hits = search_prompts(&fixtures.prompt_collections, "CODE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Code Generation");

        let hits = search_prompts(&fixtures.prompt_collections, "reminders");
        assert_eq!(hits[0].title, "Personal Assistant");

        assert_eq!(search_prompts(&fixtures.prompt_collections, " ").len(), 6);
    }
}
