use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{Course, CourseId, Lesson, LessonId};

/// Immutable registry of enrolled courses, kept in insertion order.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Result<Self> {
        let mut course_ids = HashSet::new();
        for course in &courses {
            if !course_ids.insert(course.id) {
                return Err(Error::DuplicateCourse(course.id));
            }

            let mut lesson_ids = HashSet::new();
            for lesson in &course.lessons {
                if !lesson_ids.insert(lesson.id) {
                    return Err(Error::DuplicateLesson {
                        course_id: course.id,
                        lesson_id: lesson.id,
                    });
                }
            }
        }

        Ok(Self { courses })
    }

    pub fn list_courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get_course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn lesson(&self, course_id: CourseId, lesson_id: LessonId) -> Option<&Lesson> {
        self.get_course(course_id)?.lesson(lesson_id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// The courses shipped with the application.
    pub fn builtin() -> Result<Self> {
        Self::new(vec![
            Course {
                id: 1,
                title: "Complete Business Leadership Mastery".to_string(),
                instructor: "Sarah Johnson".to_string(),
                rating: 4.8,
                students: 12843,
                duration: "8 hours".to_string(),
                price: "$89.99".to_string(),
                image: "https://images.pexels.com/photos/7616608/pexels-photo-7616608.jpeg"
                    .to_string(),
                description: "Master the art of leadership and transform your business with proven strategies used by top executives worldwide.".to_string(),
                category: "Business Leadership".to_string(),
                last_updated: "December 2024".to_string(),
                lessons: vec![
                    lesson(
                        1,
                        "Introduction to Modern Leadership",
                        "12:30",
                        "qp0HIF3SfI4",
                        "Understanding the fundamentals of leadership in today's business world",
                    ),
                    lesson(
                        2,
                        "Building High-Performance Teams",
                        "18:45",
                        "fxbCHn6gE3U",
                        "Learn how to create and manage teams that deliver exceptional results",
                    ),
                    lesson(
                        3,
                        "Strategic Decision Making",
                        "15:20",
                        "ReRcHdeUG9Y",
                        "Master the art of making crucial business decisions under pressure",
                    ),
                    lesson(
                        4,
                        "Leading Through Change",
                        "22:15",
                        "iG9CE55wbtY",
                        "Navigate organizational change and lead your team through transitions",
                    ),
                ],
            },
            Course {
                id: 2,
                title: "Entrepreneurship Excellence: From Idea to Success".to_string(),
                instructor: "Michael Rodriguez".to_string(),
                rating: 4.9,
                students: 8967,
                duration: "10 hours".to_string(),
                price: "$79.99".to_string(),
                image: "https://images.pexels.com/photos/8532850/pexels-photo-8532850.jpeg"
                    .to_string(),
                description: "Transform your business ideas into successful ventures with this comprehensive entrepreneurship course.".to_string(),
                category: "Entrepreneurship".to_string(),
                last_updated: "January 2025".to_string(),
                lessons: vec![
                    lesson(
                        1,
                        "The Entrepreneurial Mindset",
                        "16:30",
                        "bEusrD8g-dM",
                        "Develop the mindset and characteristics of successful entrepreneurs",
                    ),
                    lesson(
                        2,
                        "Validating Your Business Idea",
                        "19:45",
                        "xPJoq_QVsY4",
                        "Learn proven methods to validate your business concept before investing",
                    ),
                    lesson(
                        3,
                        "Building a Sustainable Business Model",
                        "24:20",
                        "IP0cUBWTgpY",
                        "Create a robust business model that ensures long-term success",
                    ),
                    lesson(
                        4,
                        "Scaling Your Startup",
                        "20:15",
                        "ZoqgAy3h4OM",
                        "Strategies for growing and scaling your startup effectively",
                    ),
                ],
            },
        ])
    }
}

fn lesson(id: LessonId, title: &str, duration: &str, video_id: &str, description: &str) -> Lesson {
    Lesson {
        id,
        title: title.to_string(),
        duration: duration.to_string(),
        video_id: video_id.to_string(),
        description: description.to_string(),
    }
}
