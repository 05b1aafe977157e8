//! JSON documents stored per key and their merge rules

use crate::extract::Record;
use crate::storage::traits::{RecordKey, SinkError, SinkResult};
use serde_json::Value;

/// Array holding the sections of one course offering
pub const SECTIONS_FIELD: &str = "course_sections";

/// Merges `record` into the document currently stored under `key`
///
/// Departments and courses replace the stored document. A section refreshes
/// the course header and replaces the entry with the same class number, or
/// appends a new one.
pub fn merge_document(
    key: &RecordKey,
    existing: Option<Value>,
    record: &Record,
) -> SinkResult<Value> {
    match record {
        Record::Department(department) => Ok(serde_json::to_value(department)?),
        Record::Course(course) => Ok(serde_json::to_value(course)?),
        Record::Section(section) => {
            let mut sections = match existing {
                Some(doc) => existing_sections(key, doc)?,
                None => Vec::new(),
            };

            let detail = serde_json::to_value(&section.section)?;
            let class_number = &section.section.class_number;
            match sections
                .iter_mut()
                .find(|entry| entry.get("class_number").and_then(Value::as_str) == Some(class_number))
            {
                Some(entry) => *entry = detail,
                None => sections.push(detail),
            }

            let Value::Object(mut doc) = serde_json::to_value(&section.course)? else {
                return Err(malformed(key, "course header is not an object"));
            };
            doc.insert(SECTIONS_FIELD.to_string(), Value::Array(sections));
            Ok(Value::Object(doc))
        }
    }
}

fn existing_sections(key: &RecordKey, doc: Value) -> SinkResult<Vec<Value>> {
    let Value::Object(mut doc) = doc else {
        return Err(malformed(key, "document is not an object"));
    };
    match doc.remove(SECTIONS_FIELD) {
        Some(Value::Array(sections)) => Ok(sections),
        None => Ok(Vec::new()),
        Some(_) => Err(malformed(key, "course_sections is not an array")),
    }
}

/// Number of section entries in a stored section document
pub fn section_count(doc: &Value) -> usize {
    doc.get(SECTIONS_FIELD)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn malformed(key: &RecordKey, reason: &str) -> SinkError {
    SinkError::Malformed {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Section record of ANAT 100, Fall 2018, used by the sink tests
#[cfg(test)]
pub(crate) fn sample_section(class_number: &str, enrolled: u32) -> Record {
    use crate::extract::{SectionCourse, SectionDetail, SectionRecord};

    Record::Section(SectionRecord {
        course: SectionCourse {
            id: "2018-FA-U-M-ANAT-100".into(),
            year: "2018".into(),
            term: "Fall".into(),
            department: "ANAT".into(),
            course_code: "100".into(),
            course_name: "Intro".into(),
            units: Some(3.0),
            campus: "Main".into(),
            academic_level: "Undergraduate".into(),
        },
        section: SectionDetail {
            section_name: format!("{}-LEC", class_number),
            section_type: "Lecture".into(),
            section_number: "001".into(),
            class_number: class_number.into(),
            dates: vec![],
            combined_with: vec![],
            enrollment_capacity: Some(100),
            enrollment_total: Some(enrolled),
            waitlist_capacity: None,
            waitlist_total: None,
            last_updated: "2018-09-01T00:00:00+00:00".into(),
        },
    })
}
