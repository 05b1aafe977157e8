//! Parsers for the listing pages of the catalog
//!
//! Listings are where the walker finds the next action codes: course rows
//! grouped by department, offerings on a branch page, term options and
//! section links.

use crate::navigation::actions::ActionCode;
use crate::navigation::classify::ChildAction;
use crate::transport::Document;
use scraper::{ElementRef, Html, Selector};

const DEPARTMENT_GROUP: &str = r#"table[id^="ACE_DERIVED_SSS_BCC_GROUP_BOX_1"]"#;
const DEPARTMENT_TITLE: &str = r#"span[id^="DERIVED_SSS_BCC_GROUP_BOX_1$147$$span$"]"#;
const COURSE_ROW: &str = r#"tr[id^="trCOURSE_LIST"]"#;
const COURSE_LINK: &str = r#"a[id^="CRSE_NBR$"]"#;
const COURSE_TITLE: &str = r#"span[id^="CRSE_TITLE$"]"#;
const OFFERING_LINK: &str = r#"a[id^="CAREER$"]"#;
const TERM_OPTION: &str = r#"select[id="DERIVED_SAA_CRS_TERM_ALT"] option[value]"#;
const SECTION_LINK: &str = r#"a[id^="CLASS_SECTION$"]"#;
const VIEW_ALL_TOGGLE: &str = r#"a[id="CLASS_TBL_VW5$hviewall$0"]"#;

/// A course row on the expanded letter listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseEntry {
    pub action: ActionCode,
    pub number: String,
    pub title: String,
}

/// A department group on the expanded letter listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentEntry {
    pub code: String,
    pub name: String,
    pub courses: Vec<CourseEntry>,
}

/// One option of the term selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermOption {
    pub value: String,
    pub label: String,
}

/// A section link on a term listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    pub action: ActionCode,
    pub name: String,
}

pub fn departments_in(document: &Document) -> Vec<DepartmentEntry> {
    departments(&document.html())
}

pub fn terms_in(document: &Document) -> Vec<TermOption> {
    terms(&document.html())
}

pub fn sections_in(document: &Document) -> Vec<SectionEntry> {
    sections(&document.html())
}

pub fn sections_collapsed_in(document: &Document) -> bool {
    sections_collapsed(&document.html())
}

/// Department groups and their course rows
///
/// Groups whose title does not split into `CODE - Name` are dropped.
///
/// # Arguments
///
/// * `html` - An expanded letter listing
///
/// # Returns
///
/// One entry per department group, in page order, with its course links
pub fn departments(html: &Html) -> Vec<DepartmentEntry> {
    let (Some(group_sel), Some(title_sel), Some(row_sel), Some(link_sel), Some(course_title_sel)) = (
        selector(DEPARTMENT_GROUP),
        selector(DEPARTMENT_TITLE),
        selector(COURSE_ROW),
        selector(COURSE_LINK),
        selector(COURSE_TITLE),
    ) else {
        return Vec::new();
    };

    let mut departments = Vec::new();

    for group in html.select(&group_sel) {
        let Some(title) = group.select(&title_sel).next().map(element_text) else {
            continue;
        };
        let Some((code, name)) = split_code_name(&title) else {
            tracing::debug!("Skipping department group with title {:?}", title);
            continue;
        };

        let courses = group
            .select(&row_sel)
            .filter_map(|row| {
                let link = row.select(&link_sel).next()?;
                let action = ActionCode::new(link.value().id()?);
                let title = row
                    .select(&course_title_sel)
                    .next()
                    .map(element_text)
                    .unwrap_or_default();
                Some(CourseEntry {
                    action,
                    number: element_text(link),
                    title,
                })
            })
            .collect();

        departments.push(DepartmentEntry {
            code,
            name,
            courses,
        });
    }

    departments
}

/// Offering links of a branch page
pub fn offerings(html: &Html) -> Vec<ChildAction> {
    id_links(html, OFFERING_LINK)
}

/// Course links of a letter listing, across all departments
pub fn course_links(html: &Html) -> Vec<ChildAction> {
    id_links(html, COURSE_LINK)
}

/// Options of the term selector, in page order
pub fn terms(html: &Html) -> Vec<TermOption> {
    let Some(option_sel) = selector(TERM_OPTION) else {
        return Vec::new();
    };

    html.select(&option_sel)
        .filter_map(|option| {
            let value = option.value().attr("value")?.trim();
            if value.is_empty() {
                return None;
            }
            Some(TermOption {
                value: value.to_string(),
                label: element_text(option),
            })
        })
        .collect()
}

/// Section links of a term listing
///
/// The section name is the first word of the link text (`"001-LEC"` for
/// `"001-LEC Regular"`).
pub fn sections(html: &Html) -> Vec<SectionEntry> {
    id_links(html, SECTION_LINK)
        .into_iter()
        .map(|link| SectionEntry {
            name: link
                .label
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
            action: link.action,
        })
        .collect()
}

/// True when the section list shows the "View All" toggle
pub fn sections_collapsed(html: &Html) -> bool {
    let Some(toggle_sel) = selector(VIEW_ALL_TOGGLE) else {
        return false;
    };

    html.select(&toggle_sel)
        .any(|toggle| element_text(toggle).contains("View All"))
}

/// Splits `"ANAT - Anatomy"` at the first hyphen
pub fn split_code_name(title: &str) -> Option<(String, String)> {
    let (code, name) = title.split_once('-')?;
    let code = code.trim();
    let name = name.trim();
    if code.is_empty() {
        return None;
    }
    Some((code.to_string(), name.to_string()))
}

fn id_links(html: &Html, css: &str) -> Vec<ChildAction> {
    let Some(link_sel) = selector(css) else {
        return Vec::new();
    };

    html.select(&link_sel)
        .filter_map(|link| {
            let id = link.value().id()?;
            Some(ChildAction {
                action: ActionCode::new(id),
                label: element_text(link),
            })
        })
        .collect()
}

pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::error!("Invalid selector {}: {:?}", css, e);
            None
        }
    }
}

/// Collapsed text content of an element
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
