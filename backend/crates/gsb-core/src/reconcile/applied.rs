/// Whether an engine operation changed the presented list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Unchanged,
}

impl Applied {
    pub fn is_changed(self) -> bool {
        self == Applied::Changed
    }
}
