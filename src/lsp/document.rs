/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    /// Language id reported by the host on open; only "edl" documents are
    /// linted.
    pub language_id: String,
}

impl DocumentState {
    pub fn is_edl(&self) -> bool {
        self.language_id == "edl"
    }
}
