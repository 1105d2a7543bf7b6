use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// A portfolio item as served by `GET /works`.
///
/// Every field falls back to its default when absent or `null` so a
/// partial record still renders (as a broken image or an empty caption).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Work {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub category: Category,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Work {
    pub fn category_name(&self) -> &str {
        &self.category.name
    }
}

pub fn parse_works(body: &str) -> Result<Vec<Work>, serde_json::Error> {
    serde_json::from_str(body)
}

pub fn parse_work(body: &str) -> Result<Work, serde_json::Error> {
    serde_json::from_str(body)
}
