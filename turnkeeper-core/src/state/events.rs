//! Button edge events

/// Which physical button produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Use up one of the holder's turns
    Take,
    /// Grant the holder one more turn
    Defer,
}

/// Direction of a debounced level change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeKind {
    Pressed,
    Released,
}

/// A debounced button edge, consumed once by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEdge {
    pub source: Source,
    pub kind: EdgeKind,
}

impl InputEdge {
    pub const fn pressed(source: Source) -> Self {
        Self {
            source,
            kind: EdgeKind::Pressed,
        }
    }

    pub const fn released(source: Source) -> Self {
        Self {
            source,
            kind: EdgeKind::Released,
        }
    }

    /// Only release edges commit an action
    pub fn is_release(&self) -> bool {
        self.kind == EdgeKind::Released
    }
}
