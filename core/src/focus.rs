#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDirection {
    Forward,
    Backward,
}

impl TabDirection {
    pub fn from_shift(shift: bool) -> Self {
        if shift {
            TabDirection::Backward
        } else {
            TabDirection::Forward
        }
    }
}

/// Index to focus after a Tab press inside a ring of `len` elements.
///
/// `current` is `None` when focus sits outside the ring: forward then lands
/// on the first element, backward on the last. Returns `None` for an empty
/// ring.
pub fn next_focus_index(current: Option<usize>, len: usize, direction: TabDirection) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match (current, direction) {
        (None, TabDirection::Forward) => 0,
        (None, TabDirection::Backward) => len - 1,
        (Some(index), TabDirection::Forward) => {
            if index + 1 >= len {
                0
            } else {
                index + 1
            }
        }
        (Some(index), TabDirection::Backward) => {
            if index == 0 || index >= len {
                len - 1
            } else {
                index - 1
            }
        }
    };
    Some(next)
}

pub const FOCUSABLE_SELECTOR: &str = "button, a, input, select, textarea";
