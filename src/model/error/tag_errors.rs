#[derive(PartialEq, Debug)]
pub enum TagTreeError {
    /// the database could not be opened, or a statement against it failed
    StoreUnavailable,
    /// the land or the submitted tree doesn't line up with what is stored. Nothing was changed
    DataIntegrityError(String),
}
