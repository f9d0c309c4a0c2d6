use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{CourseId, DashboardStats, LessonId};
use crate::persistence::ProgressAdapter;
use crate::store::KeyValueStore;

/// Completion flags per course, per lesson. Flags only ever go from absent to
/// `true`; nothing removes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore(BTreeMap<CourseId, BTreeMap<LessonId, bool>>);

impl ProgressStore {
    /// Returns `true` if the flag was not already set.
    pub fn set_complete(&mut self, course_id: CourseId, lesson_id: LessonId) -> bool {
        let flag = self
            .0
            .entry(course_id)
            .or_default()
            .entry(lesson_id)
            .or_insert(false);
        let newly = !*flag;
        *flag = true;
        newly
    }

    // Drops a flag that never reached storage.
    fn revert(&mut self, course_id: CourseId, lesson_id: LessonId) {
        if let Some(lessons) = self.0.get_mut(&course_id) {
            lessons.remove(&lesson_id);
            if lessons.is_empty() {
                self.0.remove(&course_id);
            }
        }
    }

    pub fn is_complete(&self, course_id: CourseId, lesson_id: LessonId) -> bool {
        self.0
            .get(&course_id)
            .and_then(|lessons| lessons.get(&lesson_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn completed_in(&self, course_id: CourseId) -> usize {
        self.0
            .get(&course_id)
            .map(|lessons| lessons.values().filter(|done| **done).count())
            .unwrap_or(0)
    }

    pub fn total_completed(&self) -> usize {
        self.0
            .values()
            .map(|lessons| lessons.values().filter(|done| **done).count())
            .sum()
    }

    pub fn completed_lessons(&self) -> impl Iterator<Item = (CourseId, LessonId)> + '_ {
        self.0.iter().flat_map(|(course_id, lessons)| {
            lessons
                .iter()
                .filter(|(_, done)| **done)
                .map(move |(lesson_id, _)| (*course_id, *lesson_id))
        })
    }

    pub fn course_count(&self) -> usize {
        self.0.len()
    }
}

/// `round(100 * completed / total)` with halves rounded up, capped at 100.
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed as u64;
    let total = total as u64;
    let percent = (200 * completed + total) / (2 * total);
    percent.min(100) as u8
}

/// Receives playback notifications from a video player.
pub trait PlaybackObserver {
    fn on_video_ended(&mut self, course_id: CourseId, lesson_id: LessonId) -> Result<()>;
}

/// Session-scoped owner of completion state.
pub struct ProgressTracker<S: KeyValueStore> {
    catalog: Catalog,
    progress: ProgressStore,
    adapter: ProgressAdapter<S>,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    /// Restores saved progress from `store`.
    pub fn open(catalog: Catalog, store: S) -> Result<Self> {
        let adapter = ProgressAdapter::new(store);
        let progress = adapter.load()?;
        Ok(Self {
            catalog,
            progress,
            adapter,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn store(&self) -> &S {
        self.adapter.store()
    }

    /// Marks a lesson complete and saves the whole record. Lesson ids are not
    /// checked against the catalog.
    ///
    /// If the save fails, a flag set by this call is removed again so memory
    /// never runs ahead of storage.
    pub fn mark_complete(&mut self, course_id: CourseId, lesson_id: LessonId) -> Result<()> {
        let newly = self.progress.set_complete(course_id, lesson_id);
        debug!(course_id, lesson_id, newly, "lesson marked complete");

        if let Err(e) = self.adapter.save(&self.progress) {
            if newly {
                self.progress.revert(course_id, lesson_id);
            }
            return Err(e);
        }
        Ok(())
    }

    pub fn course_progress_percent(&self, course_id: CourseId) -> u8 {
        let Some(course) = self.catalog.get_course(course_id) else {
            return 0;
        };
        completion_percent(self.progress.completed_in(course_id), course.lesson_count())
    }

    pub fn is_lesson_complete(&self, course_id: CourseId, lesson_id: LessonId) -> bool {
        self.progress.is_complete(course_id, lesson_id)
    }

    pub fn total_completed_lessons(&self) -> usize {
        self.progress.total_completed()
    }

    // Completed lessons missing from the catalog or with unparseable labels add nothing.
    pub fn learning_time(&self) -> Duration {
        self.progress
            .completed_lessons()
            .filter_map(|(course_id, lesson_id)| self.catalog.lesson(course_id, lesson_id))
            .filter_map(|lesson| lesson.duration())
            .sum()
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            enrolled_courses: self.catalog.len(),
            completed_lessons: self.total_completed_lessons(),
            learning_hours: self.learning_time().as_secs_f64() / 3600.0,
        }
    }
}

impl<S: KeyValueStore> PlaybackObserver for ProgressTracker<S> {
    fn on_video_ended(&mut self, course_id: CourseId, lesson_id: LessonId) -> Result<()> {
        self.mark_complete(course_id, lesson_id)
    }
}
