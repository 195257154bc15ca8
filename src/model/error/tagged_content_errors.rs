#[derive(PartialEq, Debug)]
pub enum TaggedContentError {
    /// the database could not be opened, or a statement against it failed
    StoreUnavailable,
    /// the excerpt references a tag or expression that doesn't exist, or its character range is backwards
    DataIntegrityError(String),
}
