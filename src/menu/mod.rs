//! Parsing of the tool's numbered menus
//!
//! Menus arrive as free-form text with one option per line:
//!
//! ```text
//! 1) Configure Host Port
//! 2) Configure SOC Port
//! b) Back/Previous Menu
//! ```
//!
//! Everything before the first `)` on a line is the selector, everything
//! after it is the label. Both are trimmed.

use indexmap::IndexMap;
use std::fmt;

/// Fragment the tool prints when it rejected the previous selection.
pub const REJECTED_CHOICE_MARKER: &str = "Not a Valid Choice Try again";

/// Mapping from menu label to the selector that activates it.
///
/// Built fresh from every capture. Labels are unique; when a label repeats,
/// the last selector wins but the label keeps its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    entries: IndexMap<String, String>,
    rejected_choice: bool,
}

impl Menu {
    /// Parse a block of tool output.
    ///
    /// Lines without `)` are ignored, so text with no options yields an
    /// empty menu.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::Menu;
    ///
    /// let menu = Menu::parse("1) Configure Host Port\n2) Configure SOC Port\nb) Back/Previous Menu\n");
    /// assert_eq!(menu.selector("Configure Host Port"), Some("1"));
    /// assert_eq!(menu.selector("Back/Previous Menu"), Some("b"));
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut entries = IndexMap::new();
        for line in text.split('\n') {
            if let Some((selector, label)) = line.split_once(')') {
                entries.insert(label.trim().to_string(), selector.trim().to_string());
            }
        }

        let menu = Self {
            entries,
            rejected_choice: text.contains(REJECTED_CHOICE_MARKER),
        };

        log::debug!("parsed menu:\n{}", menu);
        if menu.rejected_choice {
            log::warn!("tool reported an invalid choice");
        }

        menu
    }

    /// Selector for `label`, if the label is present.
    pub fn selector(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Whether the parsed text reported a rejected selection.
    pub fn rejected_choice(&self) -> bool {
        self.rejected_choice
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no line carried an option
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(label, selector)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), s.as_str()))
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, selector) in self.iter() {
            writeln!(f, "  {:>3} -> {:?}", selector, label)?;
        }
        Ok(())
    }
}
