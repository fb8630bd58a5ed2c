//! Display labels used by the detail formatter.

use std::collections::HashMap;

/// Identifiers of the labels the formatter needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringId {
    AlbumSelected,
    AlbumsSelected,
    ItemSelected,
    ItemsSelected,
    Start,
    End,
    DateUnknown,
    TakenOn,
    Album,
    Location,
    Title,
    Type,
}

impl StringId {
    pub const ALL: [StringId; 12] = [
        Self::AlbumSelected,
        Self::AlbumsSelected,
        Self::ItemSelected,
        Self::ItemsSelected,
        Self::Start,
        Self::End,
        Self::DateUnknown,
        Self::TakenOn,
        Self::Album,
        Self::Location,
        Self::Title,
        Self::Type,
    ];

    /// Resource key, e.g. `album_selected`.
    pub fn key(self) -> &'static str {
        match self {
            Self::AlbumSelected => "album_selected",
            Self::AlbumsSelected => "albums_selected",
            Self::ItemSelected => "item_selected",
            Self::ItemsSelected => "items_selected",
            Self::Start => "start",
            Self::End => "end",
            Self::DateUnknown => "date_unknown",
            Self::TakenOn => "taken_on",
            Self::Album => "album",
            Self::Location => "location",
            Self::Title => "title",
            Self::Type => "type",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

/// Resolves label text by identifier.
pub trait StringLookup: Send + Sync {
    fn lookup(&self, id: StringId) -> String;
}

/// Built-in English labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishStrings;

impl StringLookup for EnglishStrings {
    fn lookup(&self, id: StringId) -> String {
        let text = match id {
            StringId::AlbumSelected => "album selected",
            StringId::AlbumsSelected => "albums selected",
            StringId::ItemSelected => "item selected",
            StringId::ItemsSelected => "items selected",
            StringId::Start => "Start",
            StringId::End => "End",
            StringId::DateUnknown => "Unknown",
            StringId::TakenOn => "Taken on",
            StringId::Album => "Album",
            StringId::Location => "Location",
            StringId::Title => "Title",
            StringId::Type => "Type",
        };
        text.to_string()
    }
}

/// Labels from a key → text table, falling back to English for missing keys.
#[derive(Debug, Clone, Default)]
pub struct TableStrings {
    table: HashMap<StringId, String>,
}

impl TableStrings {
    /// Build from resource keys. Unknown keys are ignored.
    pub fn from_keys<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = HashMap::new();
        for (key, text) in entries {
            match StringId::from_key(key.as_ref()) {
                Some(id) => {
                    table.insert(id, text.into());
                }
                None => tracing::debug!("Ignoring unknown label key '{}'", key.as_ref()),
            }
        }
        Self { table }
    }
}

impl StringLookup for TableStrings {
    fn lookup(&self, id: StringId) -> String {
        self.table
            .get(&id)
            .cloned()
            .unwrap_or_else(|| EnglishStrings.lookup(id))
    }
}
