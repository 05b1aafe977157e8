//! Record extraction from catalog pages
//!
//! The walker hands every detail page to an `Extractor` together with the
//! context it has accumulated on the way down (letter, department, course,
//! academic level). The default `CatalogExtractor` understands the course
//! and section detail pages of the catalog.

mod course;
mod records;
mod section;

pub use course::{parse_course, split_course_title};
pub use records::{
    CourseRecord, DepartmentRecord, LogicalKey, Meeting, Record, SectionCourse, SectionDetail,
    SectionRecord,
};
pub use section::parse_section;

use crate::navigation::listing::{element_text, selector, CourseEntry, DepartmentEntry};
use crate::navigation::{Level, NodeKind};
use crate::transport::Document;
use scraper::Html;

/// Turns a classified page into a record
///
/// Returning `None` means the page did not carry the expected data; the
/// walker logs it and carries on.
pub trait Extractor: Send + Sync {
    fn extract(&self, document: &Document, kind: NodeKind, ctx: &AmbientContext)
        -> Option<Record>;
}

/// What the walker knows about the node being extracted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmbientContext {
    /// Level of the page handed to the extractor
    pub level: Level,
    pub letter: Option<char>,
    pub department_code: Option<String>,
    pub department_name: Option<String>,
    pub course_number: Option<String>,
    pub course_name: Option<String>,
    pub academic_level: Option<String>,
    pub campus: Option<String>,
    pub units: Option<f64>,
    pub section_name: Option<String>,
}

impl AmbientContext {
    pub fn for_letter(letter: char) -> Self {
        Self {
            letter: Some(letter),
            ..Self::default()
        }
    }

    pub fn at(&self, level: Level) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    pub fn with_department(&self, department: &DepartmentEntry) -> Self {
        Self {
            level: Level::Department,
            department_code: Some(department.code.clone()),
            department_name: Some(department.name.clone()),
            ..self.clone()
        }
    }

    pub fn with_course(&self, course: &CourseEntry) -> Self {
        Self {
            level: Level::Course,
            course_number: Some(course.number.clone()),
            course_name: Some(course.title.clone()),
            ..self.clone()
        }
    }

    pub fn with_academic_level(&self, academic_level: &str) -> Self {
        Self {
            level: Level::Offering,
            academic_level: Some(academic_level.to_string()),
            ..self.clone()
        }
    }

    pub fn with_section(&self, section_name: &str) -> Self {
        Self {
            level: Level::Section,
            section_name: Some(section_name.to_string()),
            ..self.clone()
        }
    }

    /// Takes the authoritative course fields from an extracted course
    pub fn absorb_course(&mut self, course: &CourseRecord) {
        self.department_code = Some(course.department.clone());
        self.course_number = Some(course.course_code.clone());
        self.course_name = Some(course.course_name.clone());
        self.academic_level = Some(course.academic_level.clone());
        self.campus = Some(course.campus.clone());
        self.units = Some(course.units);
    }

    /// Short path used in log lines: `A/ANAT/100/Graduate/001-LEC`
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(letter) = self.letter {
            parts.push(letter.to_string());
        }
        parts.extend(
            [
                &self.department_code,
                &self.course_number,
                &self.academic_level,
                &self.section_name,
            ]
            .into_iter()
            .flatten()
            .cloned(),
        );
        parts.join("/")
    }
}

/// Extractor for the course and section detail pages of the catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogExtractor;

impl Extractor for CatalogExtractor {
    fn extract(
        &self,
        document: &Document,
        kind: NodeKind,
        ctx: &AmbientContext,
    ) -> Option<Record> {
        if !kind.is_detail_like() {
            return None;
        }

        let html = document.html();
        match ctx.level {
            Level::Course | Level::Offering => parse_course(&html, ctx).map(Record::Course),
            Level::Section => parse_section(&html, ctx).map(Record::Section),
            Level::Letter | Level::Department | Level::Term => None,
        }
    }
}

/// Collapsed text of the first element matching `css`
pub(crate) fn first_text(html: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    html.select(&sel).next().map(element_text)
}
