use serde::{Deserialize, Serialize};

/// A conversation topic grouping sentence questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub icon: String,
    /// Styling hint carried by the dataset, e.g. `bg-pink-50 text-pink-700`.
    #[serde(rename = "color")]
    pub color_classes: String,
}
