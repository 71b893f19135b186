/// Id carried by records that have not been written to the store yet.
pub const UNSAVED_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: i64,
    pub name: String,
}

impl Album {
    /// Create an unsaved album; the store assigns the id on insert.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            name: name.into(),
        }
    }
}
