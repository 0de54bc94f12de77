use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::CourseLevel;
use crate::entities::target_course;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCourseRequest {
    pub university_id: Uuid,

    #[schema(example = "CS101")]
    pub course_code: String,

    #[schema(example = "Introduction to Computer Science")]
    pub course_name: String,

    pub department: Option<String>,

    #[serde(default = "default_credits")]
    #[schema(example = 3.0)]
    pub credits: f64,

    #[serde(default)]
    pub course_level: Option<CourseLevel>,

    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub prerequisites: Option<String>,
}

fn default_credits() -> f64 {
    3.0
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub department: Option<String>,
    pub credits: Option<f64>,
    pub course_level: Option<CourseLevel>,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub prerequisites: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub course_id: Uuid,
    pub university_id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub department: Option<String>,
    pub credits: f64,
    pub course_level: CourseLevel,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub prerequisites: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl From<target_course::Model> for CourseResponse {
    fn from(course: target_course::Model) -> Self {
        Self {
            course_id: course.course_id,
            university_id: course.university_id,
            course_code: course.course_code,
            course_name: course.course_name,
            department: course.department,
            credits: course.credits,
            course_level: course.course_level,
            description: course.description,
            learning_outcomes: course.learning_outcomes,
            prerequisites: course.prerequisites,
            is_active: course.is_active,
            created_at: course.created_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CatalogImportParams {
    /// Defaults to the caller's own university when omitted
    pub university_id: Option<Uuid>,
    /// When true, rows whose course_code already exists update the entry;
    /// otherwise they are counted as skipped
    #[serde(default)]
    pub replace: bool,
}

/// Result of a bulk catalog import. Malformed rows land in `errors` keyed by
/// their spreadsheet row number and never abort the rest of the batch.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogImportResponse {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteCourseResponse {
    pub message: String,
}

// --- catalog file parsing -------------------------------------------------

pub const CATALOG_HEADER: [&str; 8] = [
    "course_code",
    "course_name",
    "department",
    "credits",
    "description",
    "prerequisites",
    "learning_outcomes",
    "course_level",
];

/// One validated catalog row ready for upsert
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub course_code: String,
    pub course_name: String,
    pub department: Option<String>,
    pub credits: f64,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
    pub learning_outcomes: Option<String>,
    pub course_level: CourseLevel,
}

/// Rows paired with their 1-based spreadsheet row number (the header is row
/// 1, the first data row is row 2), plus the per-row errors collected along
/// the way.
#[derive(Debug, Default)]
pub struct CatalogParseOutcome {
    pub rows: Vec<(u64, CatalogRow)>,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCatalogRow {
    #[serde(default)]
    course_code: String,
    #[serde(default)]
    course_name: String,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    credits: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    prerequisites: Option<String>,
    #[serde(default)]
    learning_outcomes: Option<String>,
    #[serde(default)]
    course_level: Option<String>,
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_course_level(value: Option<&str>) -> CourseLevel {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("graduate") => CourseLevel::Graduate,
        Some("doctoral") | Some("phd") => CourseLevel::Doctoral,
        _ => CourseLevel::Undergraduate,
    }
}

impl RawCatalogRow {
    fn validate(self) -> Result<CatalogRow, String> {
        let course_code = self.course_code.trim().to_string();
        if course_code.is_empty() {
            return Err("missing course_code".to_string());
        }

        let course_name = self.course_name.trim().to_string();
        if course_name.is_empty() {
            return Err("missing course_name".to_string());
        }

        let credits = match none_if_blank(self.credits) {
            None => 3.0,
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| format!("non-numeric credits '{}'", raw))?,
        };

        Ok(CatalogRow {
            course_code,
            course_name,
            department: none_if_blank(self.department),
            credits,
            description: none_if_blank(self.description),
            prerequisites: none_if_blank(self.prerequisites),
            learning_outcomes: none_if_blank(self.learning_outcomes),
            course_level: parse_course_level(self.course_level.as_deref()),
        })
    }
}

/// CSV catalog parser. Header row:
/// `course_code,course_name,department,credits,description,prerequisites,learning_outcomes,course_level`
pub fn parse_catalog_csv(data: &[u8]) -> Result<CatalogParseOutcome, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| format!("Error reading CSV header: {}", e))?
        .clone();
    for required in ["course_code", "course_name"] {
        if !headers.iter().any(|h| h == required) {
            return Err(format!("Missing required column: {}", required));
        }
    }

    let mut outcome = CatalogParseOutcome::default();
    for (index, record) in reader.deserialize::<RawCatalogRow>().enumerate() {
        let row_number = index as u64 + 2;
        match record {
            Err(error) => outcome
                .errors
                .push(format!("Row {}: {}", row_number, error)),
            Ok(raw) => match raw.validate() {
                Ok(row) => outcome.rows.push((row_number, row)),
                Err(error) => outcome
                    .errors
                    .push(format!("Row {}: {}", row_number, error)),
            },
        }
    }

    Ok(outcome)
}

/// XLSX catalog parser; same header contract as the CSV form, first sheet
pub fn parse_catalog_xlsx(data: &[u8]) -> Result<CatalogParseOutcome, String> {
    use calamine::{Reader, Xlsx, open_workbook_from_rs};
    use std::io::Cursor;

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data.to_vec()))
        .map_err(|e| format!("Error reading XLSX file: {}", e))?;

    let (_, range) = workbook
        .worksheets()
        .into_iter()
        .next()
        .ok_or_else(|| "XLSX file has no sheets".to_string())?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| "XLSX file is empty".to_string())?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_lowercase())
        .collect();
    for required in ["course_code", "course_name"] {
        if !headers.iter().any(|h| h == required) {
            return Err(format!("Missing required column: {}", required));
        }
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let cell_at = |row: &[calamine::Data], index: Option<usize>| -> Option<String> {
        index
            .and_then(|i| row.get(i))
            .map(|cell| cell.to_string())
            .filter(|value| !value.trim().is_empty())
    };

    let code_col = column("course_code");
    let name_col = column("course_name");
    let department_col = column("department");
    let credits_col = column("credits");
    let description_col = column("description");
    let prerequisites_col = column("prerequisites");
    let outcomes_col = column("learning_outcomes");
    let level_col = column("course_level");

    let mut outcome = CatalogParseOutcome::default();
    for (index, row) in rows.enumerate() {
        let row_number = index as u64 + 2;
        let raw = RawCatalogRow {
            course_code: cell_at(row, code_col).unwrap_or_default(),
            course_name: cell_at(row, name_col).unwrap_or_default(),
            department: cell_at(row, department_col),
            credits: cell_at(row, credits_col),
            description: cell_at(row, description_col),
            prerequisites: cell_at(row, prerequisites_col),
            learning_outcomes: cell_at(row, outcomes_col),
            course_level: cell_at(row, level_col),
        };

        match raw.validate() {
            Ok(row) => outcome.rows.push((row_number, row)),
            Err(error) => outcome
                .errors
                .push(format!("Row {}: {}", row_number, error)),
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_parse_with_defaults() {
        let csv = b"course_code,course_name,department,credits,description,prerequisites,learning_outcomes,course_level\n\
CS101,Intro to CS,Computer Science,4,Basics,,Think in code,undergraduate\n\
CS501,Advanced Algorithms,,,,,,graduate\n";

        let outcome = parse_catalog_csv(csv).unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.rows.len(), 2);

        let (row_number, first) = &outcome.rows[0];
        assert_eq!(*row_number, 2);
        assert_eq!(first.course_code, "CS101");
        assert_eq!(first.credits, 4.0);
        assert_eq!(first.course_level, CourseLevel::Undergraduate);

        let (_, second) = &outcome.rows[1];
        assert_eq!(second.credits, 3.0);
        assert_eq!(second.department, None);
        assert_eq!(second.course_level, CourseLevel::Graduate);
    }

    #[test]
    fn malformed_rows_become_errors_without_aborting_the_batch() {
        // 10 data rows, 2 missing course_name
        let mut csv = String::from(
            "course_code,course_name,department,credits,description,prerequisites,learning_outcomes,course_level\n",
        );
        for i in 0..10 {
            if i == 3 || i == 7 {
                csv.push_str(&format!("CS{i:03},,,,,,,\n"));
            } else {
                csv.push_str(&format!("CS{i:03},Course {i},,,,,,\n"));
            }
        }

        let outcome = parse_catalog_csv(csv.as_bytes()).unwrap();
        assert_eq!(outcome.rows.len(), 8);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].starts_with("Row 5:"));
        assert!(outcome.errors[1].starts_with("Row 9:"));
    }

    #[test]
    fn non_numeric_credits_is_a_row_error() {
        let csv = b"course_code,course_name,credits\nCS101,Intro,abc\nCS102,Data,3.5\n";

        let outcome = parse_catalog_csv(csv).unwrap();
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].1.credits, 3.5);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("non-numeric credits"));
    }

    #[test]
    fn missing_required_column_rejects_the_file() {
        let csv = b"code,name\nCS101,Intro\n";
        let error = parse_catalog_csv(csv).unwrap_err();
        assert!(error.contains("course_code"));
    }

    #[test]
    fn course_levels_parse_case_insensitively() {
        assert_eq!(parse_course_level(Some("Graduate")), CourseLevel::Graduate);
        assert_eq!(parse_course_level(Some("PhD")), CourseLevel::Doctoral);
        assert_eq!(parse_course_level(Some("doctoral")), CourseLevel::Doctoral);
        assert_eq!(
            parse_course_level(Some("undergraduate")),
            CourseLevel::Undergraduate
        );
        assert_eq!(parse_course_level(None), CourseLevel::Undergraduate);
        assert_eq!(parse_course_level(Some("")), CourseLevel::Undergraduate);
    }
}
