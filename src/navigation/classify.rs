use crate::navigation::actions::ActionCode;
use crate::navigation::listing;
use crate::transport::Document;
use scraper::Html;
use std::fmt;

/// Shape of a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A list of children (letters, courses, terms or sections)
    Listing,
    /// A course page that splits into several academic-level offerings
    Branch,
    /// A course detail page that leads to a term/section listing
    Leaf,
    /// A terminal detail page (course without sections, or a section)
    Detail,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Branch => "branch",
            Self::Leaf => "leaf",
            Self::Detail => "detail",
        }
    }

    /// Leaf and Detail pages both carry record data
    pub fn is_detail_like(&self) -> bool {
        matches!(self, Self::Leaf | Self::Detail)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Markers checked in order; the first kind with a matching marker wins.
const RULES: &[(NodeKind, &[&str])] = &[
    (NodeKind::Branch, &[r#"table[id="CRSE_OFFERINGS$scroll$0"]"#]),
    (NodeKind::Leaf, &[r#"input[id="DERIVED_SAA_CRS_SSR_PB_GO"]"#]),
    (
        NodeKind::Detail,
        &[
            r#"span[id="DERIVED_CRSECAT_DESCR200"]"#,
            r#"span[id="DERIVED_CLSRCH_DESCR200"]"#,
        ],
    ),
    (
        NodeKind::Listing,
        &[
            r#"a[id^="DERIVED_SSS_BCC_SSR_ALPHANUM_"]"#,
            r#"table[id^="ACE_DERIVED_SSS_BCC_GROUP_BOX_1"]"#,
            r#"select[id="DERIVED_SAA_CRS_TERM_ALT"]"#,
            r#"a[id^="CLASS_SECTION$"]"#,
        ],
    ),
];

/// Classifies a document, or `None` when it matches no known shape
pub fn classify(document: &Document) -> Option<NodeKind> {
    classify_html(&document.html())
}

pub fn classify_html(html: &Html) -> Option<NodeKind> {
    RULES.iter().find_map(|(kind, markers)| {
        markers
            .iter()
            .any(|css| {
                listing::selector(css).is_some_and(|sel| html.select(&sel).next().is_some())
            })
            .then_some(*kind)
    })
}

/// A child the walker may enter from the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildAction {
    pub action: ActionCode,
    pub label: String,
}

/// A classified page and the children reachable from it
#[derive(Debug, Clone)]
pub struct NavigationResult {
    kind: NodeKind,
    document: Document,
    child_actions: Vec<ChildAction>,
}

impl NavigationResult {
    pub fn new(kind: NodeKind, document: Document, child_actions: Vec<ChildAction>) -> Self {
        Self {
            kind,
            document,
            child_actions,
        }
    }

    /// Classifies `document` and collects its children in one parse
    pub fn from_document(document: Document) -> Option<Self> {
        let html = document.html();
        let kind = classify_html(&html)?;
        let child_actions = children(kind, &html);
        drop(html);
        Some(Self::new(kind, document, child_actions))
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn child_actions(&self) -> &[ChildAction] {
        &self.child_actions
    }
}

/// Children reachable from a page of the given kind
///
/// Listings expose course or section links, branches their offerings.
/// Leaf and Detail pages have no clickable children; the term listing of
/// a leaf is reached through a fixed action.
pub(crate) fn children(kind: NodeKind, html: &Html) -> Vec<ChildAction> {
    match kind {
        NodeKind::Branch => listing::offerings(html),
        NodeKind::Listing => {
            let mut children = listing::course_links(html);
            children.extend(listing::sections(html).into_iter().map(|s| ChildAction {
                action: s.action,
                label: s.name,
            }));
            children
        }
        NodeKind::Leaf | NodeKind::Detail => Vec::new(),
    }
}
