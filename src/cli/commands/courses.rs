//! Courses command implementation
//!
//! This module implements the `courses` command: the course table with the
//! number of successful (paid) purchases per course, plus `update` and
//! `delete` for administering a single course.

use super::{exit_code_for, load_valid_config, open_console};
use crate::core::stats::CoursePurchases;
use crate::core::view::OrderConsole;
use crate::domain::{Course, CourseId, CourseUpdate};
use clap::{Args, Subcommand};
use tokio::sync::watch;

/// Arguments for the courses command
#[derive(Args, Debug)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub action: Option<CourseAction>,

    /// Print as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,
}

/// Course administration; without one the course table is listed
#[derive(Subcommand, Debug)]
pub enum CourseAction {
    /// Change fields of a course; fields not given stay as they are
    Update {
        /// Id of the course
        course_id: String,

        #[arg(long)]
        title: Option<String>,

        /// Invoice number prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Price in minor units
        #[arg(long)]
        price: Option<i64>,

        #[arg(long)]
        route: Option<String>,
    },

    /// Delete a course
    Delete {
        /// Id of the course
        course_id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl CourseAction {
    fn course_id(&self) -> &str {
        match self {
            CourseAction::Update { course_id, .. } | CourseAction::Delete { course_id, .. } => {
                course_id
            }
        }
    }
}

impl CoursesArgs {
    /// Execute the courses command
    pub async fn execute(
        &self,
        config_path: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting courses command");

        let course_id = match self.action.as_ref().map(|a| CourseId::new(a.course_id())) {
            Some(Ok(id)) => Some(id),
            Some(Err(e)) => {
                eprintln!("❌ Invalid course id: {e}");
                return Ok(1);
            }
            None => None,
        };
        if let Some(CourseAction::Delete { yes: false, .. }) = &self.action {
            eprintln!("❌ Deleting a course cannot be undone; pass --yes to confirm");
            return Ok(1);
        }

        let config = match load_valid_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let console = match open_console(&config, &mut cancel).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        match (&self.action, course_id) {
            (Some(action), Some(course_id)) => self.administer(&console, action, &course_id).await,
            _ => self.list(&console),
        }
    }

    async fn administer(
        &self,
        console: &OrderConsole,
        action: &CourseAction,
        course_id: &CourseId,
    ) -> anyhow::Result<i32> {
        let (verb, result) = match action {
            CourseAction::Update {
                title,
                prefix,
                price,
                route,
                ..
            } => {
                let update = CourseUpdate {
                    title: title.clone(),
                    prefix: prefix.clone(),
                    price: *price,
                    route: route.clone(),
                };
                ("updated", console.update_course(course_id, &update).await)
            }
            CourseAction::Delete { .. } => ("deleted", console.delete_course(course_id).await),
        };

        let course = match result {
            Ok(course) => course,
            Err(e) => {
                eprintln!("❌ {e}");
                if e.is_unauthorized() {
                    eprintln!("   Store a fresh token with: orderdesk session store");
                }
                return Ok(exit_code_for(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&course)?);
        } else {
            println!("✅ Course {verb}: {}", describe(&course));
        }
        Ok(0)
    }

    fn list(&self, console: &OrderConsole) -> anyhow::Result<i32> {
        let stats = console.course_statistics();
        if self.json {
            let rows: Vec<serde_json::Value> = stats
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "course": s.course,
                        "successfulPurchases": s.successful,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(0);
        }

        if stats.is_empty() {
            println!("No courses found.");
            return Ok(0);
        }

        println!("{:<26} {:<32} {:<8} {:<12} {:<10}", "ID", "Title", "Prefix", "Price", "Paid");
        println!("{}", "-".repeat(92));
        for row in &stats {
            println!("{}", format_row(row));
        }
        println!();
        Ok(0)
    }
}

fn describe(course: &Course) -> String {
    format!(
        "{} \"{}\" (prefix {}, price {}, route {})",
        course.id, course.title, course.prefix, course.price, course.route
    )
}

fn format_row(row: &CoursePurchases) -> String {
    format!(
        "{:<26} {:<32} {:<8} {:<12} {:<10}",
        row.course.id.as_str(),
        row.course.title,
        row.course.prefix,
        row.course.price,
        row.successful
    )
}
