use db::models::course::{CourseStatus, CourseType, DayOfWeek, NewCourse};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddCourseRequest {
    #[validate(length(min = 1, message = "Course code is required."))]
    pub code: String,
    #[serde(rename = "type")]
    pub course_type: String,
    #[validate(length(min = 1, message = "Course name is required."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, message = "Credit must be positive."))]
    pub credit: i32,
    #[validate(range(min = 1, max = 6, message = "Period must be between 1 and 6."))]
    pub period: i32,
    pub day_of_week: String,
    #[serde(default)]
    pub keywords: String,
}

impl AddCourseRequest {
    /// Resolves the enum fields, naming the first one that does not parse.
    pub fn into_new_course(self) -> Result<NewCourse, &'static str> {
        let course_type = CourseType::from_str(&self.course_type).map_err(|_| "Invalid course type.")?;
        let day_of_week = DayOfWeek::from_str(&self.day_of_week).map_err(|_| "Invalid day of week.")?;
        Ok(NewCourse {
            code: self.code,
            course_type,
            name: self.name,
            description: self.description,
            credit: self.credit,
            period: self.period,
            day_of_week,
            keywords: self.keywords,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AddCourseResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetCourseStatusRequest {
    pub status: String,
}

impl SetCourseStatusRequest {
    pub fn status(&self) -> Option<CourseStatus> {
        CourseStatus::from_str(&self.status).ok()
    }
}

/// Catalogue query string. Everything arrives as text so that a malformed
/// filter is dropped instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub credit: Option<String>,
    pub teacher: Option<String>,
    pub period: Option<String>,
    pub day_of_week: Option<String>,
    pub keywords: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}
