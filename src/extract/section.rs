use crate::extract::records::{LogicalKey, Meeting, SectionCourse, SectionDetail, SectionRecord};
use crate::extract::{first_text, AmbientContext};
use crate::navigation::listing::{element_text, selector};
use chrono::{NaiveDate, NaiveTime, Utc};
use scraper::{ElementRef, Html};

const KEY_DESCRIPTION: &str = r#"span[id="DERIVED_CLSRCH_SSS_PAGE_KEYDESCR"]"#;
const SECTION_TITLE: &str = r#"span[id="DERIVED_CLSRCH_DESCR200"]"#;
const CLASS_NUMBER: &str = r#"span[id="SSR_CLS_DTL_WRK_CLASS_NBR"]"#;
const MEETING_ROW: &str = r#"tr[id^="trSSR_CLSRCH_MTG$"]"#;
const MEETING_SCHEDULE: &str = r#"span[id^="MTG_SCHED$"]"#;
const MEETING_LOCATION: &str = r#"span[id^="MTG_LOC$"]"#;
const MEETING_INSTRUCTORS: &str = r#"span[id^="MTG_INSTR$"]"#;
const MEETING_DATES: &str = r#"span[id^="MTG_DATE$"]"#;
const ENROLLMENT_CAPACITY: &str = r#"div[id="win0divSSR_CLS_DTL_WRK_ENRL_CAP"]"#;
const ENROLLMENT_TOTAL: &str = r#"div[id="win0divSSR_CLS_DTL_WRK_ENRL_TOT"]"#;
const WAITLIST_CAPACITY: &str = r#"div[id="win0divSSR_CLS_DTL_WRK_WAIT_CAP"]"#;
const WAITLIST_TOTAL: &str = r#"div[id="win0divSSR_CLS_DTL_WRK_WAIT_TOT"]"#;
const COMBINED_ROW: &str = r#"tr[id^="trSCTN_CMBND$"]"#;
const COMBINED_NAME: &str = r#"span[id^="CLASS_NAME$"]"#;

const TBA: &str = "TBA";

const DAYS: [(&str, &str); 7] = [
    ("Mo", "Monday"),
    ("Tu", "Tuesday"),
    ("We", "Wednesday"),
    ("Th", "Thursday"),
    ("Fr", "Friday"),
    ("Sa", "Saturday"),
    ("Su", "Sunday"),
];

/// Parses a section detail page
///
/// Course-level fields (department, code, campus, level, units) come from
/// the ambient context; the page only knows the term and the section.
///
/// # Arguments
///
/// * `html` - Parsed section detail page
/// * `ctx` - Context collected on the way down to the section
///
/// # Returns
///
/// * `Some(SectionRecord)` - The section under its course/term key
/// * `None` - The page lacks its key description or class number
pub fn parse_section(html: &Html, ctx: &AmbientContext) -> Option<SectionRecord> {
    let key_description = first_text(html, KEY_DESCRIPTION)?;
    let (year, term, section_type) = split_key_description(&key_description)?;
    let class_number = first_text(html, CLASS_NUMBER).filter(|n| !n.is_empty())?;

    let section_number = first_text(html, SECTION_TITLE)
        .and_then(|title| {
            title
                .split(" - ")
                .nth(1)
                .map(|part| part.chars().take(3).collect::<String>())
        })
        .unwrap_or_default();

    let key = LogicalKey {
        course_code: ctx.course_number.clone().unwrap_or_default(),
        department: ctx.department_code.clone().unwrap_or_default(),
        campus: ctx.campus.clone().unwrap_or_else(|| "None".to_string()),
        academic_level: ctx.academic_level.clone().unwrap_or_default(),
        year,
        term,
    };

    let combined_with = combined_with(html)
        .into_iter()
        .filter(|number| *number != class_number)
        .collect();

    let count = |css: &str| first_text(html, css).and_then(|text| text.parse::<u32>().ok());

    Some(SectionRecord {
        course: SectionCourse {
            id: key.compact_id(),
            year: key.year.clone(),
            term: key.term.clone(),
            department: key.department.clone(),
            course_code: key.course_code.clone(),
            course_name: ctx.course_name.clone().unwrap_or_default(),
            units: ctx.units,
            campus: key.campus.clone(),
            academic_level: key.academic_level.clone(),
        },
        section: SectionDetail {
            section_name: ctx.section_name.clone().unwrap_or_default(),
            section_type,
            section_number,
            class_number,
            dates: meetings(html),
            combined_with,
            enrollment_capacity: count(ENROLLMENT_CAPACITY),
            enrollment_total: count(ENROLLMENT_TOTAL),
            waitlist_capacity: count(WAITLIST_CAPACITY),
            waitlist_total: count(WAITLIST_TOTAL),
            last_updated: Utc::now().to_rfc3339(),
        },
    })
}

/// `"Undergraduate | 2018 Fall | Lecture / Discussion"` into year, term and a
/// space-free section type
fn split_key_description(raw: &str) -> Option<(String, String, String)> {
    let parts: Vec<&str> = raw.split(" | ").collect();
    let [_, year_term, section_type] = parts.as_slice() else {
        return None;
    };
    let mut year_term = year_term.split_whitespace();
    let year = year_term.next()?.to_string();
    let term = year_term.next()?.to_string();
    Some((year, term, section_type.replace(' ', "")))
}

fn meetings(html: &Html) -> Vec<Meeting> {
    let Some(row_sel) = selector(MEETING_ROW) else {
        return Vec::new();
    };

    html.select(&row_sel)
        .filter(|row| row.value().id().is_some_and(is_meeting_row))
        .flat_map(meeting_row)
        .collect()
}

/// `trSSR_CLSRCH_MTG$<n>_row<m>`; the bare `trSSR_CLSRCH_MTG$<n>` wrappers
/// hold no schedule of their own
fn is_meeting_row(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("trSSR_CLSRCH_MTG$") else {
        return false;
    };
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && rest[digits..].starts_with("_row")
}

/// One schedule row, expanded to one meeting per listed day
fn meeting_row(row: ElementRef<'_>) -> Vec<Meeting> {
    let schedule = row_text(row, MEETING_SCHEDULE).unwrap_or_default();
    let location = row_text(row, MEETING_LOCATION).unwrap_or_default();
    let instructors = row_instructors(row);
    let (start_date, end_date) = meeting_dates(row_text(row, MEETING_DATES).as_deref());

    let tokens: Vec<String> = schedule
        .replace(" - ", " ")
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let meeting = |day: &str, start_time: String, end_time: String| Meeting {
        day: day.to_string(),
        start_time,
        end_time,
        start_date: start_date.clone(),
        end_date: end_date.clone(),
        location: location.clone(),
        instructors: instructors.clone(),
    };

    if tokens.is_empty() || tokens.iter().any(|t| t == TBA) {
        return vec![meeting(TBA, TBA.to_string(), TBA.to_string())];
    }

    // A row may lack its day ("12:00AM - 12:00AM")
    let day_str = if tokens.len() > 2 { tokens[0].as_str() } else { "" };
    let start_time = parse_time(&tokens[tokens.len().saturating_sub(2)]);
    let end_time = parse_time(&tokens[tokens.len() - 1]);

    let days: Vec<&str> = DAYS
        .iter()
        .filter(|(short, _)| day_str.contains(short))
        .map(|(_, long)| *long)
        .collect();

    if days.is_empty() {
        return vec![meeting("", start_time, end_time)];
    }

    days.into_iter()
        .map(|day| meeting(day, start_time.clone(), end_time.clone()))
        .collect()
}

/// `"9:30AM"` → `"09:30"`; unparseable values are kept as-is
fn parse_time(raw: &str) -> String {
    NaiveTime::parse_from_str(raw, "%I:%M%p")
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// `"2018/09/06 - 2018/11/30"` → ISO dates, or TBA for both
fn meeting_dates(raw: Option<&str>) -> (String, String) {
    let Some(raw) = raw.filter(|r| !r.contains(TBA)) else {
        return (TBA.to_string(), TBA.to_string());
    };

    match raw.split_once(" - ") {
        Some((start, end)) => (parse_date(start), parse_date(end)),
        None => (parse_date(raw), parse_date(raw)),
    }
}

fn parse_date(raw: &str) -> String {
    let raw = raw.trim();
    ["%Y/%m/%d", "%m/%d/%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Instructors are listed one per line as `Last,First`
fn row_instructors(row: ElementRef<'_>) -> Vec<String> {
    let Some(sel) = selector(MEETING_INSTRUCTORS) else {
        return Vec::new();
    };
    let Some(span) = row.select(&sel).next() else {
        return Vec::new();
    };

    span.text()
        .flat_map(|chunk| chunk.split(['\r', '\n']))
        .map(|line| line.trim().trim_end_matches(',').trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect()
}

fn row_text(row: ElementRef<'_>, css: &str) -> Option<String> {
    let sel = selector(css)?;
    row.select(&sel).next().map(element_text)
}

/// Class numbers of the combined-section rows: `"ANAT 100-001 (1234)"` → `"1234"`
fn combined_with(html: &Html) -> Vec<String> {
    let (Some(row_sel), Some(name_sel)) = (selector(COMBINED_ROW), selector(COMBINED_NAME)) else {
        return Vec::new();
    };

    html.select(&row_sel)
        .filter_map(|row| {
            let name = element_text(row.select(&name_sel).next()?);
            let (_, rest) = name.split_once('(')?;
            let (number, _) = rest.split_once(')')?;
            Some(number.trim().to_string())
        })
        .collect()
}
