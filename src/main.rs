mod catalog;
mod config;
mod error;
mod models;
mod persistence;
mod player;
mod progress;
mod store;
mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*};

use catalog::Catalog;
use config::Config;
use error::Error;
use models::{CourseId, JsonOutput, LessonId};
use persistence::PROGRESS_KEY;
use player::Player;
use progress::ProgressTracker;
use store::{KeyValueStore, MemoryStore, SqliteStore};

#[derive(Parser)]
#[command(name = "bizcoach")]
#[command(about = "Course viewer that tracks per-lesson completion progress")]
#[command(version)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to the progress database
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep progress in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the progress database
    Init,

    /// List enrolled courses with progress
    Courses,

    /// Show course details and lessons
    Course {
        /// Course ID
        id: CourseId,
    },

    /// Show the lesson to watch next
    Play {
        /// Course ID
        course_id: CourseId,

        /// Lesson ID (defaults to the first unfinished lesson)
        #[arg(long, short)]
        lesson: Option<LessonId>,
    },

    /// Mark a lesson as complete
    Complete {
        /// Course ID
        course_id: CourseId,

        /// Lesson ID
        lesson_id: LessonId,
    },

    /// Show learning statistics
    Stats,

    /// Launch interactive terminal UI
    Tui,
}

fn init_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(config.log_filter())
        .init();
}

fn open_tracker(config: &Config) -> Result<ProgressTracker<SqliteStore>, Error> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SqliteStore::open(&config.db_path)?;
    store.init()?;
    debug!(path = %config.db_path.display(), "progress database opened");
    ProgressTracker::open(Catalog::builtin()?, store)
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load(cli.db.clone(), cli.json, cli.verbose, cli.ephemeral);

    init_logging(&config);

    if let Err(e) = run(cli.command, &config) {
        if config.json {
            if let Ok(out) = serde_json::to_string(&JsonOutput::<()>::err(e.to_string())) {
                println!("{}", out);
            }
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.ephemeral {
        debug!("progress kept in memory for this run");
        let tracker = ProgressTracker::open(Catalog::builtin()?, MemoryStore::new())?;
        return execute(command, tracker, config);
    }
    execute(command, open_tracker(config)?, config)
}

fn execute<S: KeyValueStore>(
    command: Commands,
    mut tracker: ProgressTracker<S>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Init => {
            if config.json {
                println!("{}", serde_json::to_string(&JsonOutput::<()>::ok(()))?);
            } else if config.ephemeral {
                println!("Using in-memory store; progress will not be saved.");
            } else {
                println!("Database initialized at: {}", config.db_path.display());
            }
        }

        Commands::Courses => {
            let courses: Vec<_> = tracker
                .catalog()
                .list_courses()
                .iter()
                .map(|c| (c, tracker.course_progress_percent(c.id)))
                .collect();

            if config.json {
                let data: Vec<_> = courses
                    .iter()
                    .map(|(c, percent)| {
                        serde_json::json!({
                            "id": c.id,
                            "title": c.title,
                            "instructor": c.instructor,
                            "price": c.price,
                            "progress": percent,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string(&JsonOutput::ok(data))?);
            } else if tracker.catalog().is_empty() {
                println!("No courses found.");
            } else {
                println!("{:<5} {:<45} {:<20} PROGRESS", "ID", "TITLE", "INSTRUCTOR");
                println!("{}", "-".repeat(90));
                for (course, percent) in courses {
                    println!(
                        "{:<5} {:<45} {:<20} {} {:>3}%",
                        course.id,
                        truncate(&course.title, 43),
                        truncate(&course.instructor, 18),
                        progress_bar(percent, 10),
                        percent
                    );
                }
            }
        }

        Commands::Course { id } => {
            if let Some(course) = tracker.catalog().get_course(id) {
                let percent = tracker.course_progress_percent(id);

                if config.json {
                    let lessons: Vec<_> = course
                        .lessons
                        .iter()
                        .map(|l| {
                            serde_json::json!({
                                "lesson": l,
                                "completed": tracker.is_lesson_complete(id, l.id),
                            })
                        })
                        .collect();
                    println!(
                        "{}",
                        serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                            "course": course,
                            "progress": percent,
                            "lessons": lessons
                        })))?
                    );
                } else {
                    println!("Course: {}", course.title);
                    println!("ID: {}", course.id);
                    println!("Description: {}", course.description);
                    println!(
                        "Rating: {} {} ({} students)",
                        course.rating,
                        stars(course.star_count()),
                        format_count(course.students)
                    );
                    println!("Created by: {}", course.instructor);
                    println!("Category: {}", course.category);
                    println!("Total duration: {}", course.duration);
                    println!("Price: {}", course.price);
                    println!("Last updated: {}", course.last_updated);
                    println!();
                    println!("--- Progress ---");
                    println!("{} {}%", progress_bar(percent, 20), percent);
                    println!();
                    println!("--- Course Content ---");
                    for lesson in &course.lessons {
                        let mark = if tracker.is_lesson_complete(id, lesson.id) {
                            "[x]"
                        } else {
                            "[ ]"
                        };
                        println!(
                            "{} {:>2}. {:<45} {}",
                            mark,
                            lesson.id,
                            truncate(&lesson.title, 43),
                            lesson.duration
                        );
                    }
                }
            } else {
                return Err(Error::CourseNotFound(id).into());
            }
        }

        Commands::Play { course_id, lesson } => {
            let course = tracker
                .catalog()
                .get_course(course_id)
                .ok_or(Error::CourseNotFound(course_id))?
                .clone();

            let lesson_id = match lesson {
                Some(lesson_id) => lesson_id,
                None => first_unfinished(&tracker, course_id)
                    .or_else(|| course.lessons.first().map(|l| l.id))
                    .ok_or(Error::LessonNotFound {
                        course_id,
                        lesson_id: 0,
                    })?,
            };

            let player = Player::starting_at(course, lesson_id).ok_or(Error::LessonNotFound {
                course_id,
                lesson_id,
            })?;
            let current = player.current_lesson();
            let completed = tracker.is_lesson_complete(course_id, current.id);

            if config.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "course_id": course_id,
                        "lesson": current,
                        "position": player.position() + 1,
                        "total": player.course().lesson_count(),
                        "completed": completed,
                        "watch_url": current.watch_url(),
                    })))?
                );
            } else {
                println!("=== Now Playing ===");
                println!();
                println!("Course: {}", player.course().title);
                println!(
                    "Lesson {}/{}: {} ({})",
                    player.position() + 1,
                    player.course().lesson_count(),
                    current.title,
                    current.duration
                );
                println!("About this video: {}", current.description);
                println!("Watch: {}", current.watch_url());
                println!();
                if completed {
                    println!("Already completed.");
                } else {
                    println!("After watching, record completion with:");
                    println!("  bizcoach complete {} {}", course_id, current.id);
                }
            }
        }

        Commands::Complete {
            course_id,
            lesson_id,
        } => {
            let course = tracker
                .catalog()
                .get_course(course_id)
                .ok_or(Error::CourseNotFound(course_id))?
                .clone();
            let player = Player::starting_at(course, lesson_id).ok_or(Error::LessonNotFound {
                course_id,
                lesson_id,
            })?;

            player.finish_current(&mut tracker)?;
            let percent = tracker.course_progress_percent(course_id);

            if config.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "course_id": course_id,
                        "lesson_id": lesson_id,
                        "progress": percent,
                    })))?
                );
            } else {
                println!(
                    "Lesson {} of course {} marked complete.",
                    lesson_id, course_id
                );
                println!("Course progress: {} {}%", progress_bar(percent, 20), percent);
                if player.has_next() {
                    let mut next = player.clone();
                    next.next();
                    println!("Up next: {}", next.current_lesson().title);
                }
            }
        }

        Commands::Stats => {
            let stats = tracker.dashboard_stats();
            let last_saved = tracker.store().updated_at(PROGRESS_KEY)?;

            if config.json {
                println!(
                    "{}",
                    serde_json::to_string(&JsonOutput::ok(serde_json::json!({
                        "enrolled_courses": stats.enrolled_courses,
                        "completed_lessons": stats.completed_lessons,
                        "learning_hours": stats.learning_hours,
                        "courses_started": tracker.progress().course_count(),
                        "last_saved": last_saved,
                    })))?
                );
            } else {
                println!("=== Learning Statistics ===");
                println!("Enrolled courses: {}", stats.enrolled_courses);
                println!("Completed videos: {}", stats.completed_lessons);
                println!("Learning hours: {:.1}", stats.learning_hours);
                println!("Courses started: {}", tracker.progress().course_count());
                if let Some(ts) = last_saved {
                    println!("Last saved: {}", ts);
                }
            }
        }

        Commands::Tui => {
            tui::run(tracker)?;
        }
    }

    Ok(())
}

fn first_unfinished<S: KeyValueStore>(
    tracker: &ProgressTracker<S>,
    course_id: CourseId,
) -> Option<LessonId> {
    tracker
        .catalog()
        .get_course(course_id)?
        .lessons
        .iter()
        .find(|l| !tracker.is_lesson_complete(course_id, l.id))
        .map(|l| l.id)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn stars(count: usize) -> String {
    let count = count.min(5);
    format!("{}{}", "★".repeat(count), "☆".repeat(5 - count))
}

// 12843 -> "12,843"
fn format_count(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    mod format_tests {
        use super::*;

        #[test]
        fn truncate_short_string() {
            assert_eq!(truncate("hello", 10), "hello");
        }

        #[test]
        fn truncate_exact_length() {
            assert_eq!(truncate("hello", 5), "hello");
        }

        #[test]
        fn truncate_long_string() {
            assert_eq!(truncate("hello world", 8), "hello...");
        }

        #[test]
        fn truncate_multibyte() {
            assert_eq!(truncate("héllo wörld", 8), "héllo...");
        }

        #[test]
        fn progress_bar_widths() {
            assert_eq!(progress_bar(0, 4), "░░░░");
            assert_eq!(progress_bar(50, 4), "██░░");
            assert_eq!(progress_bar(100, 4), "████");
            assert_eq!(progress_bar(255, 4), "████");
        }

        #[test]
        fn stars_fill() {
            assert_eq!(stars(4), "★★★★☆");
            assert_eq!(stars(9), "★★★★★");
        }

        #[test]
        fn format_count_groups_thousands() {
            assert_eq!(format_count(0), "0");
            assert_eq!(format_count(999), "999");
            assert_eq!(format_count(8967), "8,967");
            assert_eq!(format_count(12843), "12,843");
            assert_eq!(format_count(1234567), "1,234,567");
        }
    }

    mod cli_parsing_tests {
        use super::*;

        #[test]
        fn parse_init_command() {
            let cli = Cli::try_parse_from(["bizcoach", "init"]).unwrap();
            assert!(!cli.json);
            assert!(!cli.verbose);
            assert!(cli.db.is_none());
            assert!(!cli.ephemeral);
            assert!(matches!(cli.command, Commands::Init));
        }

        #[test]
        fn parse_global_flags() {
            let cli = Cli::try_parse_from([
                "bizcoach",
                "courses",
                "--json",
                "-v",
                "--db",
                "/tmp/p.db",
            ])
            .unwrap();
            assert!(cli.json);
            assert!(cli.verbose);
            assert_eq!(cli.db, Some(PathBuf::from("/tmp/p.db")));
            assert!(matches!(cli.command, Commands::Courses));
        }

        #[test]
        fn parse_course_show() {
            let cli = Cli::try_parse_from(["bizcoach", "course", "2"]).unwrap();
            match cli.command {
                Commands::Course { id } => assert_eq!(id, 2),
                _ => panic!("Expected Course command"),
            }
        }

        #[test]
        fn parse_play_default_lesson() {
            let cli = Cli::try_parse_from(["bizcoach", "play", "1"]).unwrap();
            match cli.command {
                Commands::Play { course_id, lesson } => {
                    assert_eq!(course_id, 1);
                    assert!(lesson.is_none());
                }
                _ => panic!("Expected Play command"),
            }
        }

        #[test]
        fn parse_play_with_lesson() {
            let cli = Cli::try_parse_from(["bizcoach", "play", "1", "-l", "3"]).unwrap();
            match cli.command {
                Commands::Play { course_id, lesson } => {
                    assert_eq!(course_id, 1);
                    assert_eq!(lesson, Some(3));
                }
                _ => panic!("Expected Play command"),
            }
        }

        #[test]
        fn parse_complete() {
            let cli = Cli::try_parse_from(["bizcoach", "complete", "2", "4"]).unwrap();
            match cli.command {
                Commands::Complete {
                    course_id,
                    lesson_id,
                } => {
                    assert_eq!(course_id, 2);
                    assert_eq!(lesson_id, 4);
                }
                _ => panic!("Expected Complete command"),
            }
        }

        #[test]
        fn parse_stats_and_tui() {
            let cli = Cli::try_parse_from(["bizcoach", "stats"]).unwrap();
            assert!(matches!(cli.command, Commands::Stats));

            let cli = Cli::try_parse_from(["bizcoach", "tui"]).unwrap();
            assert!(matches!(cli.command, Commands::Tui));
        }

        #[test]
        fn parse_invalid_input_fails() {
            assert!(Cli::try_parse_from(["bizcoach", "invalid"]).is_err());
            assert!(Cli::try_parse_from(["bizcoach", "complete", "1"]).is_err());
            assert!(Cli::try_parse_from(["bizcoach", "course", "abc"]).is_err());
            assert!(Cli::try_parse_from(["bizcoach", "course", "-1"]).is_err());
        }
    }

    mod command_tests {
        use super::*;

        fn test_config(name: &str) -> Config {
            let path = std::env::temp_dir().join(format!(
                "bizcoach_cmd_{}_{}.db",
                name,
                std::process::id()
            ));
            let _ = std::fs::remove_file(&path);
            Config::load(Some(path), true, false, false)
        }

        #[test]
        fn complete_persists_across_runs() {
            let config = test_config("complete");
            run(
                Commands::Complete {
                    course_id: 1,
                    lesson_id: 1,
                },
                &config,
            )
            .unwrap();
            run(
                Commands::Complete {
                    course_id: 1,
                    lesson_id: 3,
                },
                &config,
            )
            .unwrap();

            let tracker = open_tracker(&config).unwrap();
            assert_eq!(tracker.course_progress_percent(1), 50);
            assert_eq!(first_unfinished(&tracker, 1), Some(2));

            let _ = std::fs::remove_file(&config.db_path);
        }

        #[test]
        fn ephemeral_run_writes_nothing() {
            let mut config = test_config("ephemeral");
            config.ephemeral = true;
            run(
                Commands::Complete {
                    course_id: 2,
                    lesson_id: 1,
                },
                &config,
            )
            .unwrap();

            assert!(!config.db_path.exists());
        }

        #[test]
        fn ephemeral_run_leaves_config_dir_absent() {
            let dir = std::env::temp_dir().join(format!(
                "bizcoach_cmd_ephemeral_dir_{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            let config = Config::load(Some(dir.join("bizcoach").join("bizcoach.db")), false, false, true);

            run(Commands::Stats, &config).unwrap();
            run(
                Commands::Complete {
                    course_id: 1,
                    lesson_id: 2,
                },
                &config,
            )
            .unwrap();

            assert!(!dir.exists());
        }

        #[test]
        fn open_tracker_creates_missing_parent_dir() {
            let dir = std::env::temp_dir().join(format!(
                "bizcoach_cmd_parent_dir_{}",
                std::process::id()
            ));
            let _ = std::fs::remove_dir_all(&dir);
            let config = Config::load(Some(dir.join("nested").join("bizcoach.db")), false, false, false);

            run(Commands::Init, &config).unwrap();
            assert!(config.db_path.is_file());

            std::fs::remove_dir_all(&dir).ok();
        }

        #[test]
        fn unknown_course_is_an_error() {
            let mut config = test_config("unknown_course");
            config.ephemeral = true;

            let result = run(Commands::Course { id: 99 }, &config);
            assert!(result.is_err());
            assert_eq!(result.unwrap_err().to_string(), Error::CourseNotFound(99).to_string());

            assert!(run(Commands::Course { id: 1 }, &config).is_ok());
        }

        #[test]
        fn complete_rejects_unknown_lesson() {
            let config = test_config("unknown_lesson");
            let result = run(
                Commands::Complete {
                    course_id: 1,
                    lesson_id: 9,
                },
                &config,
            );
            assert!(result.is_err());

            let result = run(
                Commands::Complete {
                    course_id: 9,
                    lesson_id: 1,
                },
                &config,
            );
            assert!(result.is_err());

            let tracker = open_tracker(&config).unwrap();
            assert_eq!(tracker.total_completed_lessons(), 0);

            let _ = std::fs::remove_file(&config.db_path);
        }
    }
}
