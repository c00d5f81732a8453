//! BibTeX data model.
//!
//! An [`Entry`] is one citation record; a [`Database`] is the ordered
//! collection of entries loaded from a single file, together with the
//! `@string` macros and `@preamble` blocks that appeared alongside them.

/// A single field of an entry (`name = {value}`).
///
/// Field names are stored lower-cased; BibTeX treats them case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// One bibliographic record: `@type{key, field = value, ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    entry_type: String,
    key: String,
    fields: Vec<Field>,
}

impl Entry {
    /// Creates an entry with no fields. The type is lower-cased, the key kept verbatim.
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into().to_lowercase(),
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style variant of [`Entry::set`].
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// The entry type, e.g. `article`, `misc`, `online`.
    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    /// The citation key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Sets a field, replacing an existing value in place or appending a new field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field { name, value }),
        }
    }

    /// Removes a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        let pos = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(pos).value)
    }

    /// Drops every field.
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }
}

/// A `@string{name = value}` macro definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringDef {
    pub name: String,
    pub value: String,
}

/// An ordered collection of entries loaded from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    pub strings: Vec<StringDef>,
    pub preambles: Vec<String>,
    pub entries: Vec<Entry>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds an entry by citation key.
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
