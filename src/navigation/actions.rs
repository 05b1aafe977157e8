//! Transition table of the catalog UI
//!
//! Every control the walker "clicks" is listed here, keyed by the level it
//! acts on and the event it represents. Codes that depend on the row being
//! clicked (a course, an offering, a section) come from the page itself.

use std::fmt;

/// Query parameter carrying the selected term on the term listing
pub const TERM_PARAM: &str = "DERIVED_SAA_CRS_TERM_ALT";

/// Opaque action code sent with a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionCode(String);

impl ActionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Levels of the catalog hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Letter,
    Department,
    Course,
    Offering,
    Term,
    Section,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Letter => "letter",
            Self::Department => "department",
            Self::Course => "course",
            Self::Offering => "offering",
            Self::Term => "term",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Things the walker can do at a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Open the node
    Enter,
    /// Expand a collapsed list on the node's page
    Expand,
    /// Go back to the parent page
    Return,
    /// Go back from a multi-offering course page to the course listing
    LeaveBranch,
    /// Open the term/section listing of a course
    ViewSections,
}

/// How the action code for a transition is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Always the same code
    Fixed(&'static str),
    /// Prefix followed by the partition letter
    PerLetter(&'static str),
    /// The id of the clicked element on the current page
    FromDocument,
}

/// Looks up how to perform `event` at `level`
///
/// Returns `None` for combinations the catalog UI does not offer.
/// Departments have no transitions of their own: they are groups on the
/// expanded letter listing.
pub fn transition(level: Level, event: Event) -> Option<Transition> {
    use Event::*;
    use Level::*;

    match (level, event) {
        (Letter, Enter) => Some(Transition::PerLetter("DERIVED_SSS_BCC_SSR_ALPHANUM_")),
        (Letter, Expand) => Some(Transition::Fixed("DERIVED_SSS_BCC_SSS_EXPAND_ALL$97$")),

        (Course, Enter) => Some(Transition::FromDocument),
        (Course, Return) => Some(Transition::Fixed("DERIVED_SAA_CRS_RETURN_PB$163$")),
        (Course, LeaveBranch) => Some(Transition::Fixed("DERIVED_SSS_SEL_RETURN_PB$181$")),
        (Course, ViewSections) => Some(Transition::Fixed("DERIVED_SAA_CRS_SSR_PB_GO")),

        (Offering, Enter) => Some(Transition::FromDocument),
        (Offering, Return) => Some(Transition::Fixed("DERIVED_SAA_CRS_RETURN_PB$163$")),
        (Offering, ViewSections) => Some(Transition::Fixed("DERIVED_SAA_CRS_SSR_PB_GO")),

        (Term, Enter) => Some(Transition::Fixed("DERIVED_SAA_CRS_SSR_PB_GO$3$")),
        (Term, Expand) => Some(Transition::Fixed("CLASS_TBL_VW5$hviewall$0")),

        (Section, Enter) => Some(Transition::FromDocument),
        (Section, Return) => Some(Transition::Fixed("CLASS_SRCH_WRK2_SSR_PB_CLOSE")),

        _ => None,
    }
}

/// Resolves a fixed transition to its action code
pub fn fixed_action(level: Level, event: Event) -> Option<ActionCode> {
    match transition(level, event)? {
        Transition::Fixed(code) => Some(ActionCode::new(code)),
        Transition::PerLetter(_) | Transition::FromDocument => None,
    }
}

/// Action code that opens the listing of one letter
pub fn letter_action(letter: char) -> Option<ActionCode> {
    match transition(Level::Letter, Event::Enter)? {
        Transition::PerLetter(prefix) => Some(ActionCode::new(format!("{}{}", prefix, letter))),
        Transition::Fixed(_) | Transition::FromDocument => None,
    }
}
