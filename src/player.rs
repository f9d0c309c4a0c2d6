use crate::error::Result;
use crate::models::{Course, Lesson, LessonId};
use crate::progress::PlaybackObserver;

/// Cursor over a course's lessons. Movement is bounded and never wraps.
#[derive(Debug, Clone)]
pub struct Player {
    course: Course,
    current: usize,
}

impl Player {
    /// `None` when the course has no lessons to play.
    pub fn new(course: Course) -> Option<Self> {
        if course.lessons.is_empty() {
            return None;
        }
        Some(Self { course, current: 0 })
    }

    /// Starts at the lesson with `lesson_id`, if the course has one.
    pub fn starting_at(course: Course, lesson_id: LessonId) -> Option<Self> {
        let index = course.lessons.iter().position(|l| l.id == lesson_id)?;
        let mut player = Self::new(course)?;
        player.current = index;
        Some(player)
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn current_lesson(&self) -> &Lesson {
        &self.course.lessons[self.current]
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.course.lessons.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.course.lessons.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Reports the current lesson as watched to end.
    pub fn finish_current(&self, observer: &mut impl PlaybackObserver) -> Result<()> {
        observer.on_video_ended(self.course.id, self.current_lesson().id)
    }
}
