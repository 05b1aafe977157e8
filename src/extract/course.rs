use crate::extract::records::CourseRecord;
use crate::extract::{first_text, AmbientContext};
use crate::navigation::listing::{element_text, selector};
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

const TITLE: &str = r#"span[id="DERIVED_CRSECAT_DESCR200"]"#;
const CAMPUS: &str = r#"span[id*="CAMPUS_TBL_DESCR"]"#;
const DESCRIPTION: &str = r#"span[id*="SSR_CRSE_OFF_VW_DESCRLONG"]"#;
const UNITS: &str = r#"span[id*="DERIVED_CRSECAT_UNITS_RANGE"]"#;
const GRADING_BASIS: &str = r#"span[id*="SSR_CRSE_OFF_VW_GRADING_BASIS"]"#;
const ACADEMIC_LEVEL: &str = r#"span[id*="SSR_CRSE_OFF_VW_ACAD_CAREER"]"#;
const ACADEMIC_GROUP: &str = r#"span[id*="ACAD_GROUP_TBL_DESCR"]"#;
const ACADEMIC_ORG: &str = r#"span[id*="ACAD_ORG_TBL_DESCR"]"#;
const COMPONENT_ROWS: &str = r#"table[id*="ACE_SSR_DUMMY_RECVW"] tr"#;
const ENROLLMENT_ROWS: &str = r#"table[id*="ACE_DERIVED_CRSECAT_SSR_GROUP2"] tr"#;
const ENROLLMENT_CELL: &str = r#"div[id*="win0div"]"#;
const CEAB_ROWS: &str = r#"table[id*="ACE_DERIVED_CLSRCH"] tr"#;

const CEAB_CATEGORIES: [(&str, &str); 5] = [
    ("Basic Sci", "basic_sci"),
    ("Comp St", "comp_st"),
    ("End Des", "end_des"),
    ("Eng Sci", "eng_sci"),
    ("Math", "math"),
];

/// Parses a course detail page
///
/// The title and academic level are required; every other field falls back
/// to an empty value (campus to `"None"`, units to the listing's value or 0).
///
/// # Arguments
///
/// * `html` - Parsed course detail page
/// * `ctx` - Context from the listing, used for fallbacks
///
/// # Returns
///
/// * `Some(CourseRecord)` - The course at the page's academic level
/// * `None` - The title or academic level is missing
pub fn parse_course(html: &Html, ctx: &AmbientContext) -> Option<CourseRecord> {
    let title = first_text(html, TITLE)?;
    let (department, course_code, course_name) = split_course_title(&title)?;
    let academic_level = first_text(html, ACADEMIC_LEVEL).filter(|l| !l.is_empty())?;

    let units = first_text(html, UNITS)
        .and_then(|raw| parse_units(&raw))
        .or(ctx.units)
        .unwrap_or(0.0);

    let enrollment = enrollment_info(html);
    let take = |name: &str| enrollment.get(name).cloned().unwrap_or_default();

    Some(CourseRecord {
        id: format!("{}-{}", department, course_code),
        department,
        course_code,
        course_name,
        campus: first_text(html, CAMPUS).unwrap_or_else(|| "None".to_string()),
        description: description(html),
        grading_basis: first_text(html, GRADING_BASIS).unwrap_or_default(),
        course_components: course_components(html),
        requirements: take("requirements"),
        add_consent: take("add_consent"),
        drop_consent: take("drop_consent"),
        academic_level,
        academic_group: first_text(html, ACADEMIC_GROUP).unwrap_or_default(),
        academic_org: first_text(html, ACADEMIC_ORG).unwrap_or_default(),
        units,
        ceab: ceab_units(html),
    })
}

/// Splits `"ANAT 100 - Intro to Anatomy"` into department, code and name
pub fn split_course_title(title: &str) -> Option<(String, String, String)> {
    let (head, name) = title.split_once('-')?;
    let mut parts = head.split_whitespace();
    let department = parts.next()?.to_string();
    let code = parts.next()?.to_string();
    Some((department, code, name.trim().to_string()))
}

/// A range such as `"2.00 - 8.00"` yields its upper bound
fn parse_units(raw: &str) -> Option<f64> {
    raw.split(" - ").last()?.trim().parse().ok()
}

/// Text before the first line break, or the whole text when there is none
fn description(html: &Html) -> String {
    let (Some(span_sel), Some(br_sel)) = (selector(DESCRIPTION), selector("br")) else {
        return String::new();
    };
    let Some(span) = html.select(&span_sel).next() else {
        return String::new();
    };

    if span.select(&br_sel).next().is_some() {
        span.text()
            .map(str::trim)
            .find(|chunk| !chunk.is_empty())
            .unwrap_or_default()
            .to_string()
    } else {
        element_text(span)
    }
}

/// Component name to requirement; names are lower-cased with `" / "` as `_`
fn course_components(html: &Html) -> BTreeMap<String, String> {
    let (Some(row_sel), Some(cell_sel)) = (selector(COMPONENT_ROWS), selector("td")) else {
        return BTreeMap::new();
    };

    html.select(&row_sel)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).skip(1).collect();
            let [name, desc] = cells.as_slice() else {
                return None;
            };
            let name = element_text(*name).to_lowercase().replace(" / ", "_");
            Some((name, element_text(*desc)))
        })
        .collect()
}

/// CEAB units from the second row of the CEAB table, laid out as
/// alternating name and unit cells after a leading label cell. An empty unit
/// cell counts as 0.
fn ceab_units(html: &Html) -> BTreeMap<String, f64> {
    let (Some(row_sel), Some(cell_sel)) = (selector(CEAB_ROWS), selector("td")) else {
        return BTreeMap::new();
    };
    let Some(row) = html.select(&row_sel).nth(1) else {
        return BTreeMap::new();
    };

    let cells: Vec<String> = row
        .select(&cell_sel)
        .skip(1)
        .map(|cell| element_text(cell).trim_matches(':').trim().to_string())
        .collect();

    cells
        .chunks_exact(2)
        .filter_map(|pair| {
            let (_, key) = CEAB_CATEGORIES
                .iter()
                .find(|(name, _)| *name == pair[0])?;
            let units = if pair[1].is_empty() {
                0.0
            } else {
                pair[1].parse().ok()?
            };
            Some((key.to_string(), units))
        })
        .collect()
}

fn enrollment_info(html: &Html) -> BTreeMap<String, String> {
    let (Some(row_sel), Some(cell_sel)) = (selector(ENROLLMENT_ROWS), selector(ENROLLMENT_CELL))
    else {
        return BTreeMap::new();
    };

    html.select(&row_sel)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
            let [name, desc] = cells.as_slice() else {
                return None;
            };
            let key = match element_text(*name).as_str() {
                "Enrollment Requirement" => "requirements",
                "Add Consent" => "add_consent",
                "Drop Consent" => "drop_consent",
                _ => return None,
            };
            Some((key.to_string(), element_text(*desc)))
        })
        .collect()
}
