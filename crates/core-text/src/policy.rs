/// How a motion's destination bounds the range an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderPolicy {
    /// Half-open: the destination character is excluded.
    Exclusive,
    /// Closed: the destination character is included.
    Inclusive,
    /// Both endpoints snap to whole lines.
    LineWise,
}

/// Whether the remembered column for vertical motion is updated after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickyColumnPolicy {
    Never,
    OnChange,
    /// Stick to the end of whatever line vertical motion lands on (`$`).
    ToEndOfLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Lines,
}

impl ContentType {
    pub const fn from_border_policy(policy: BorderPolicy) -> Self {
        match policy {
            BorderPolicy::Exclusive | BorderPolicy::Inclusive => ContentType::Text,
            BorderPolicy::LineWise => ContentType::Lines,
        }
    }
}
