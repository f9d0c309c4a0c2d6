use std::time::Duration;

use serde::{Deserialize, Serialize};

pub type CourseId = u32;
pub type LessonId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub instructor: String,
    pub rating: f32,
    pub students: u32,
    pub duration: String,
    pub price: String,
    pub image: String,
    pub description: String,
    pub category: String,
    pub last_updated: String,
    pub lessons: Vec<Lesson>,
}

impl Course {
    pub fn lesson(&self, lesson_id: LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    // Whole stars shown next to the rating
    pub fn star_count(&self) -> usize {
        if self.rating.is_nan() {
            return 0;
        }
        self.rating.floor().clamp(0.0, 5.0) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub duration: String,
    pub video_id: String,
    pub description: String,
}

impl Lesson {
    /// Parses the `mm:ss` or `h:mm:ss` duration label.
    pub fn duration(&self) -> Option<Duration> {
        parse_duration_label(&self.duration)
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    pub fn embed_url(&self) -> String {
        format!(
            "https://www.youtube.com/embed/{}?rel=0&modestbranding=1",
            self.video_id
        )
    }
}

fn parse_duration_label(label: &str) -> Option<Duration> {
    let parts = label
        .trim()
        .split(':')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] if *m < 60 => (*h, *m, *s),
        _ => return None,
    };
    if seconds >= 60 {
        return None;
    }

    Some(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

// Aggregates shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub enrolled_courses: usize,
    pub completed_lessons: usize,
    pub learning_hours: f64,
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_lesson(duration: &str) -> Lesson {
        Lesson {
            id: 1,
            title: "Intro".to_string(),
            duration: duration.to_string(),
            video_id: "abc123".to_string(),
            description: String::new(),
        }
    }

    fn make_course(rating: f32) -> Course {
        Course {
            id: 1,
            title: "Course".to_string(),
            instructor: "Someone".to_string(),
            rating,
            students: 10,
            duration: "1 hour".to_string(),
            price: "$1.00".to_string(),
            image: String::new(),
            description: String::new(),
            category: "Test".to_string(),
            last_updated: "Today".to_string(),
            lessons: vec![make_lesson("01:00")],
        }
    }

    mod lesson_tests {
        use super::*;

        #[test]
        fn duration_minutes_seconds() {
            let lesson = make_lesson("12:30");
            assert_eq!(lesson.duration(), Some(Duration::from_secs(750)));
        }

        #[test]
        fn duration_with_hours() {
            let lesson = make_lesson("1:02:03");
            assert_eq!(lesson.duration(), Some(Duration::from_secs(3723)));
        }

        #[test]
        fn duration_rejects_garbage() {
            assert_eq!(make_lesson("soon").duration(), None);
            assert_eq!(make_lesson("12").duration(), None);
            assert_eq!(make_lesson("12:75").duration(), None);
            assert_eq!(make_lesson("1:75:00").duration(), None);
            assert_eq!(make_lesson("").duration(), None);
        }

        #[test]
        fn watch_url_uses_video_id() {
            let lesson = make_lesson("01:00");
            assert_eq!(lesson.watch_url(), "https://www.youtube.com/watch?v=abc123");
            assert!(lesson.embed_url().contains("/embed/abc123"));
        }
    }

    mod course_tests {
        use super::*;

        #[test]
        fn star_count_floors_rating() {
            assert_eq!(make_course(4.8).star_count(), 4);
            assert_eq!(make_course(5.0).star_count(), 5);
            assert_eq!(make_course(0.4).star_count(), 0);
        }

        #[test]
        fn star_count_clamps() {
            assert_eq!(make_course(7.5).star_count(), 5);
            assert_eq!(make_course(-1.0).star_count(), 0);
            assert_eq!(make_course(f32::NAN).star_count(), 0);
        }

        #[test]
        fn lesson_lookup() {
            let course = make_course(4.0);
            assert!(course.lesson(1).is_some());
            assert!(course.lesson(2).is_none());
            assert_eq!(course.lesson_count(), 1);
        }
    }

    mod json_output_tests {
        use super::*;

        #[test]
        fn ok_wraps_data() {
            let out = JsonOutput::ok(42);
            let json = serde_json::to_value(&out).unwrap();
            assert_eq!(json["success"], true);
            assert_eq!(json["data"], 42);
            assert!(json["error"].is_null());
        }

        #[test]
        fn err_carries_message() {
            let out = JsonOutput::<()>::err("Course not found");
            let json = serde_json::to_value(&out).unwrap();
            assert_eq!(json["success"], false);
            assert!(json["data"].is_null());
            assert_eq!(json["error"], "Course not found");
        }
    }
}
