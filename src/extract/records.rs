//! Records produced by the walker
//!
//! Every record knows the key it is stored under. Department and course
//! keys overwrite; section keys group all sections of one course offering
//! in one term.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A department group from the expanded letter listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub code: String,
    pub name: String,
    pub letter: String,
}

/// Catalog data of one course at one academic level and campus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: String,
    pub department: String,
    pub course_code: String,
    pub course_name: String,
    pub campus: String,
    pub description: String,
    pub grading_basis: String,
    pub course_components: BTreeMap<String, String>,
    pub requirements: String,
    pub add_consent: String,
    pub drop_consent: String,
    pub academic_level: String,
    pub academic_group: String,
    pub academic_org: String,
    pub units: f64,
    /// CEAB accreditation units by category (`basic_sci`, `comp_st`, `end_des`,
    /// `eng_sci`, `math`)
    #[serde(rename = "CEAB", default)]
    pub ceab: BTreeMap<String, f64>,
}

impl CourseRecord {
    /// Key of the course file: `ANAT_100_Undergraduate_Main`
    pub fn storage_name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.department,
            self.course_code,
            join_level(&self.academic_level, "_"),
            first_word(&self.campus)
        )
    }
}

/// One scheduled meeting of a section on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub instructors: Vec<String>,
}

/// Course offering in a given term, shared by all of its sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCourse {
    pub id: String,
    pub year: String,
    pub term: String,
    pub department: String,
    pub course_code: String,
    pub course_name: String,
    pub units: Option<f64>,
    pub campus: String,
    pub academic_level: String,
}

/// Schedule and enrollment of one class section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDetail {
    pub section_name: String,
    pub section_type: String,
    pub section_number: String,
    pub class_number: String,
    pub dates: Vec<Meeting>,
    pub combined_with: Vec<String>,
    pub enrollment_capacity: Option<u32>,
    pub enrollment_total: Option<u32>,
    pub waitlist_capacity: Option<u32>,
    pub waitlist_total: Option<u32>,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub course: SectionCourse,
    pub section: SectionDetail,
}

impl SectionRecord {
    pub fn logical_key(&self) -> LogicalKey {
        LogicalKey {
            course_code: self.course.course_code.clone(),
            department: self.course.department.clone(),
            campus: self.course.campus.clone(),
            academic_level: self.course.academic_level.clone(),
            year: self.course.year.clone(),
            term: self.course.term.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Department(DepartmentRecord),
    Course(CourseRecord),
    Section(SectionRecord),
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Department(_) => "department",
            Self::Course(_) => "course",
            Self::Section(_) => "section",
        }
    }
}

/// The six fields that make a course offering unique
///
/// The same course code exists on several campuses, at several academic
/// levels and in every term, so all six are needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalKey {
    pub course_code: String,
    pub department: String,
    pub campus: String,
    pub academic_level: String,
    pub year: String,
    pub term: String,
}

impl LogicalKey {
    /// File form: `2018_Fall_Undergraduate_Main_ANAT_100`
    pub fn file_stem(&self) -> String {
        let d = "_";
        [
            self.year.clone(),
            self.term.clone(),
            join_level(&self.academic_level, d),
            first_word(&self.campus).to_string(),
            self.department.clone(),
            self.course_code.clone(),
        ]
        .join(d)
    }

    /// Compact form: `2018-FA-U-M-ANAT-100`
    pub fn compact_id(&self) -> String {
        let term: String = self.term.to_uppercase().chars().take(2).collect();
        let campus: String = first_word(&self.campus).chars().take(1).collect();
        let level: String = level_words(&self.academic_level)
            .filter_map(|word| word.chars().next())
            .collect();

        [
            self.year.clone(),
            term,
            level,
            campus,
            self.department.clone(),
            self.course_code.clone(),
        ]
        .join("-")
    }
}

/// `"Non-Credit"` becomes `["Non", "Credit"]`
fn level_words(level: &str) -> impl Iterator<Item = &str> {
    level.split(|c: char| c == '-' || c.is_whitespace()).filter(|w| !w.is_empty())
}

fn join_level(level: &str, delim: &str) -> String {
    level_words(level).collect::<Vec<_>>().join(delim)
}

fn first_word(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or_default()
}
