#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchIr {
    pub statements: Vec<StatementIr>,
}

/// A statement as submitted, optionally with a pre-rendered dump. When
/// `dump` is non-empty it is used instead of fetching one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementIr {
    pub query: String,
    pub dump: Vec<String>,
}
