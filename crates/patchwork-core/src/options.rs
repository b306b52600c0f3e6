/// Where a node with no previous counterpart lands in its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertionMode {
    /// Insert at the requested index, appending only past the end.
    #[default]
    Positional,
    /// Always append, whatever the index.
    Append,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOptions {
    pub insertion: InsertionMode,
}

impl PatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insertion(mut self, mode: InsertionMode) -> Self {
        self.insertion = mode;
        self
    }
}
