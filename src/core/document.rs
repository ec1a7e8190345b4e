//! Document model for the viewer

use serde::{Deserialize, Serialize};

/// A markdown document served by the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, the filename without its extension
    pub id: String,
    /// Display title derived from the filename
    pub title: String,
    /// Source filename
    pub filename: String,
    /// Markdown content, already normalized
    pub content: String,
}

impl Document {
    /// Build a document from a source filename and its normalized content.
    pub fn from_file_content(filename: &str, content: String) -> Self {
        let id = id_from_filename(filename);
        let title = title_from_id(&id);
        Self {
            id,
            title,
            filename: filename.to_string(),
            content,
        }
    }
}

/// Identifier: the filename without its markdown extension.
pub fn id_from_filename(filename: &str) -> String {
    filename
        .strip_suffix(".md")
        .or_else(|| filename.strip_suffix(".markdown"))
        .unwrap_or(filename)
        .to_string()
}

/// Title: underscores become spaces, each word gets a capital first letter.
pub fn title_from_id(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
