//! Gestures reported by the classifier.

use core::fmt;

/// The three gestures a button cycle can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    SinglePress,
    DoublePress,
    LongPress,
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePress => write!(f, "single press"),
            Self::DoublePress => write!(f, "double press"),
            Self::LongPress => write!(f, "long press"),
        }
    }
}
