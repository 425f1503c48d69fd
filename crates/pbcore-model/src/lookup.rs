use crate::relation::RelationEntry;

/// Secondary lookups keyed by record identifier.
///
/// The cinema-ad source carries its one-to-many associations in separate
/// tables; the mapping layer only sees this interface. All data is in
/// memory before a batch starts, so lookups are infallible.
pub trait RelationLookup {
    /// Creator/contributor rows for the record, in source order.
    fn agents(&self, id: i64) -> Vec<RelationEntry>;

    /// Genre subject as a (child, parent group) pair.
    fn genre_subject(&self, id: i64) -> Option<(String, String)>;

    /// Subject keyword.
    fn keyword(&self, id: i64) -> Option<String>;

    /// Decade coverage label.
    fn decade(&self, id: i64) -> Option<String>;

    /// Language abbreviations, zero or more.
    fn languages(&self, id: i64) -> Vec<String>;
}
