//! Page signals delivered by the hosting environment

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw signals from the page. Visibility and focus are redundant sources for
/// the same physical event (the user leaving or returning to the page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSignal {
    VisibilityHidden,
    VisibilityVisible,
    FocusLost,
    FocusGained,
}

impl PageSignal {
    /// The activity level this signal reports
    pub fn activity(self) -> Activity {
        match self {
            PageSignal::VisibilityHidden | PageSignal::FocusLost => Activity::Inactive,
            PageSignal::VisibilityVisible | PageSignal::FocusGained => Activity::Active,
        }
    }
}

impl fmt::Display for PageSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageSignal::VisibilityHidden => "hidden",
            PageSignal::VisibilityVisible => "visible",
            PageSignal::FocusLost => "blur",
            PageSignal::FocusGained => "focus",
        };
        f.write_str(name)
    }
}

impl FromStr for PageSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hidden" => Ok(PageSignal::VisibilityHidden),
            "visible" => Ok(PageSignal::VisibilityVisible),
            "blur" => Ok(PageSignal::FocusLost),
            "focus" => Ok(PageSignal::FocusGained),
            other => Err(format!(
                "unknown page signal '{}' (expected hidden, visible, blur or focus)",
                other
            )),
        }
    }
}

/// Unified "is the user on this page" notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Active,
    Inactive,
}
