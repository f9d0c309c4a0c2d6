use thiserror::Error;

use crate::models::{CourseId, LessonId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    #[error("lesson {lesson_id} not found in course {course_id}")]
    LessonNotFound {
        course_id: CourseId,
        lesson_id: LessonId,
    },

    #[error("duplicate course id {0} in catalog")]
    DuplicateCourse(CourseId),

    #[error("duplicate lesson id {lesson_id} in course {course_id}")]
    DuplicateLesson {
        course_id: CourseId,
        lesson_id: LessonId,
    },

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
