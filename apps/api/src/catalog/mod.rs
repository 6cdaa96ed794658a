// Course catalog and domain requirements. Both are loaded once at startup
// and are read-only for the lifetime of the process.

pub mod domains;
pub mod ingest;

use crate::models::course::CourseRecord;

/// Read-only course catalog. Titles are unique.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    courses: Vec<CourseRecord>,
}

impl CatalogStore {
    /// Titles must already be unique; `read_catalog` drops repeats.
    pub(crate) fn from_courses(courses: Vec<CourseRecord>) -> Self {
        CatalogStore { courses }
    }

    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
