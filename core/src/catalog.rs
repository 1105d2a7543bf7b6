use std::collections::HashSet;

use crate::work::{Category, Work};

pub const ALL_LABEL: &str = "Tous";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterChoice {
    #[default]
    All,
    Category(String),
}

impl FilterChoice {
    pub fn label(&self) -> &str {
        match self {
            FilterChoice::All => ALL_LABEL,
            FilterChoice::Category(name) => name,
        }
    }

    pub fn matches(&self, work: &Work) -> bool {
        match self {
            FilterChoice::All => true,
            FilterChoice::Category(name) => work.category_name() == name,
        }
    }
}

/// Distinct categories keyed by name, in order of first appearance.
pub fn distinct_categories(works: &[Work]) -> Vec<Category> {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();
    for work in works {
        if seen.insert(work.category.name.as_str()) {
            categories.push(work.category.clone());
        }
    }
    categories
}

pub fn filter_choices(works: &[Work]) -> Vec<FilterChoice> {
    let mut choices = vec![FilterChoice::All];
    choices.extend(
        distinct_categories(works)
            .into_iter()
            .map(|category| FilterChoice::Category(category.name)),
    );
    choices
}

pub fn filter_works(works: &[Work], choice: &FilterChoice) -> Vec<Work> {
    works
        .iter()
        .filter(|work| choice.matches(work))
        .cloned()
        .collect()
}
