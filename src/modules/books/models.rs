use serde::{Deserialize, Serialize};

/// A catalogued book. `name` is unique across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Title of the book
    pub name: String,
    /// Display name of the author
    pub author: String,
    /// Year of first publication
    pub published_year: i32,
    /// Genre names the book is filed under
    #[serde(default)]
    pub genres: Vec<String>,
}
