//! Subcommands of the `weekhours` binary.
//!
//! Each command runs against a [`ScheduleEditor`] and returns the text to
//! print plus whether the state needs saving.

use std::fmt::Write as _;

use anyhow::bail;
use clap::{Subcommand, ValueEnum};
use weekhours_core::{
    normalize_time, opening_status_now, to_minutes, MembershipOutcome, NextOpening,
    OpeningStatus, Pattern, PatternKey, RangeField, ScheduleEditor, TimeRange, Weekday,
};

use crate::config::AppConfig;

/// Requested membership for `toggle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Membership {
    On,
    Off,
}

/// Operations on unassigned patterns.
#[derive(Debug, Clone, Subcommand)]
pub enum OrphanCommand {
    /// Create a pattern with no days (defaults to 09:00-17:00)
    Add {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a pattern that has no days
    Delete {
        /// Pattern key, e.g. 09:00|17:00
        key: String,
    },
}

/// Top-level subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List patterns in display order
    Show,
    /// Add a day to a pattern or remove it
    Toggle {
        /// Pattern number from `show`, or its key
        pattern: String,
        /// Day of week (monday, tue, ...)
        day: Weekday,
        /// on or off
        #[arg(value_enum)]
        membership: Membership,
        /// Replace overlapping ranges instead of stopping at the conflict
        #[arg(long)]
        replace: bool,
    },
    /// Change a pattern's times on every day that uses it
    Edit {
        /// Pattern number from `show`, or its key
        pattern: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Manage patterns that have no days
    #[command(subcommand)]
    Orphan(OrphanCommand),
    /// Check every open range before publishing
    Validate,
    /// Report whether the establishment is open
    Status {
        /// Day to evaluate (defaults to now)
        #[arg(long, requires = "time")]
        day: Option<Weekday>,
        /// Time to evaluate, HH:MM
        #[arg(long, requires = "day")]
        time: Option<String>,
    },
    /// Close every day and forget all patterns
    Reset,
}

/// Result of running a command.
#[derive(Debug, Default)]
pub struct Report {
    /// Text for stdout.
    pub output: String,
    /// Whether the state changed and must be saved.
    pub changed: bool,
}

impl Report {
    fn unchanged(output: String) -> Self {
        Self {
            output,
            changed: false,
        }
    }

    fn changed(output: String) -> Self {
        Self {
            output,
            changed: true,
        }
    }
}

/// Runs one command.
pub fn run(
    command: &Command,
    editor: &mut ScheduleEditor,
    config: &AppConfig,
) -> anyhow::Result<Report> {
    match command {
        Command::Show => Ok(Report::unchanged(render_patterns(editor))),
        Command::Toggle {
            pattern,
            day,
            membership,
            replace,
        } => toggle(editor, pattern, *day, *membership, *replace),
        Command::Edit {
            pattern,
            start,
            end,
        } => edit(editor, pattern, start.as_deref(), end.as_deref()),
        Command::Orphan(OrphanCommand::Add { start, end }) => {
            let initial = match (start, end) {
                (None, None) => None,
                _ => {
                    let default = TimeRange::default();
                    Some(TimeRange::new(
                        start.clone().unwrap_or(default.start_time),
                        end.clone().unwrap_or(default.end_time),
                    ))
                }
            };
            if let Some(range) = &initial {
                check_range(editor, range)?;
            }
            if editor.create_orphan(initial) {
                Ok(Report::changed(render_patterns(editor)))
            } else {
                Ok(Report::unchanged(
                    "A pattern with those times already exists.\n".to_string(),
                ))
            }
        }
        Command::Orphan(OrphanCommand::Delete { key }) => {
            if editor.delete_orphan(&PatternKey::from(key.trim())) {
                Ok(Report::changed(render_patterns(editor)))
            } else {
                Ok(Report::unchanged(format!(
                    "{} is not an unassigned pattern; remove its days first.\n",
                    key
                )))
            }
        }
        Command::Validate => Ok(Report::unchanged(render_validation(editor))),
        Command::Status { day, time } => {
            let status = match (day, time) {
                (Some(day), Some(time)) => {
                    if !editor.validator().is_valid_time(time) {
                        bail!("invalid --time {:?}: expected HH:MM (00:00 - 23:59)", time);
                    }
                    editor.status(*day, to_minutes(time), config.thresholds())
                }
                _ => opening_status_now(editor.schedule(), config.thresholds()),
            };
            Ok(Report::unchanged(render_status(&status)))
        }
        Command::Reset => {
            *editor = ScheduleEditor::new(Default::default())?;
            Ok(Report::changed("All days closed.\n".to_string()))
        }
    }
}

fn toggle(
    editor: &mut ScheduleEditor,
    pattern: &str,
    day: Weekday,
    membership: Membership,
    replace: bool,
) -> anyhow::Result<Report> {
    let outcome = editor.set_day_membership(pattern, day, membership == Membership::On)?;
    match outcome {
        MembershipOutcome::Applied => Ok(Report::changed(render_patterns(editor))),
        MembershipOutcome::NeedsConfirmation(conflict) if replace => {
            editor.apply_replacement(&conflict);
            let mut output = format!("Replaced: {}\n", conflict.summary());
            output.push_str(&render_patterns(editor));
            Ok(Report::changed(output))
        }
        MembershipOutcome::NeedsConfirmation(conflict) => {
            let mut output = String::new();
            let _ = writeln!(output, "Conflict on {}:", conflict.target_day);
            for range in &conflict.overlapping_ranges {
                let _ = writeln!(output, "  existing  {}", range);
            }
            let _ = writeln!(output, "  incoming  {}", conflict.incoming_range());
            let _ = writeln!(output, "Nothing changed. Re-run with --replace to replace them.");
            Ok(Report::unchanged(output))
        }
    }
}

fn edit(
    editor: &mut ScheduleEditor,
    pattern: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<Report> {
    if start.is_none() && end.is_none() {
        return Ok(Report::unchanged(
            "Nothing to edit: pass --start and/or --end.\n".to_string(),
        ));
    }

    let mut range = editor.pattern(pattern)?.range;

    let mut proposed = range.clone();
    for (field, value) in [(RangeField::StartTime, start), (RangeField::EndTime, end)] {
        if let Some(value) = value {
            proposed.set_field(field, normalize_time(value));
        }
    }
    check_range(editor, &proposed)?;

    for (field, value) in [(RangeField::StartTime, start), (RangeField::EndTime, end)] {
        let Some(value) = value else { continue };
        editor.update_range(range.key().as_str(), field, value)?;
        range.set_field(field, value);
        if editor.normalize_on_blur(range.key().as_str(), field)? {
            range.set_field(field, normalize_time(value));
        }
    }
    Ok(Report::changed(render_patterns(editor)))
}

/// Rejects a range that would fail validation once saved.
fn check_range(editor: &ScheduleEditor, range: &TimeRange) -> anyhow::Result<()> {
    let errors = editor.validator().validate_range(range);
    if errors.is_empty() {
        return Ok(());
    }
    let issues: Vec<String> = [RangeField::StartTime, RangeField::EndTime]
        .into_iter()
        .filter_map(|field| errors.get(field))
        .map(|issue| issue.to_string())
        .collect();
    bail!("invalid range {}: {}", range, issues.join("; "))
}

fn day_list(pattern: &Pattern) -> String {
    Weekday::all()
        .iter()
        .map(|day| {
            if pattern.has_day(*day) {
                day.short_name().to_string()
            } else {
                "---".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Patterns in display order, then the closed days.
pub fn render_patterns(editor: &mut ScheduleEditor) -> String {
    let patterns = editor.patterns();
    let mut output = String::new();
    if patterns.is_empty() {
        output.push_str("No patterns. Closed all week.\n");
        return output;
    }

    for (i, pattern) in patterns.iter().enumerate() {
        let days = if pattern.is_orphan {
            "(no days)".to_string()
        } else {
            day_list(pattern)
        };
        let _ = writeln!(
            output,
            "Pattern {:<2} {:<13} {}",
            i + 1,
            pattern.range.to_string(),
            days
        );
    }

    let closed: Vec<&str> = editor
        .schedule()
        .days()
        .iter()
        .filter(|d| !d.is_open)
        .map(|d| d.day_of_week.short_name())
        .collect();
    if !closed.is_empty() {
        let _ = writeln!(output, "Closed: {}", closed.join(" "));
    }
    output
}

fn render_validation(editor: &ScheduleEditor) -> String {
    let report = editor.validate();
    if report.is_valid() {
        return "All ranges are valid.\n".to_string();
    }
    let mut output = String::new();
    for (day, index, errors) in report.entries() {
        for field in [RangeField::StartTime, RangeField::EndTime] {
            if let Some(issue) = errors.get(field) {
                let _ = writeln!(output, "{} range {}: {}", day, index + 1, issue);
            }
        }
    }
    let _ = writeln!(output, "{} invalid range(s).", report.error_count());
    output
}

fn render_status(status: &OpeningStatus) -> String {
    let next = |next: &Option<NextOpening>| match next {
        Some(n) if n.today => format!(" Opens today at {}.", n.start_time),
        Some(n) => format!(" Opens {} at {}.", n.day, n.start_time),
        None => String::new(),
    };
    match status {
        OpeningStatus::Open => "Open.\n".to_string(),
        OpeningStatus::ClosingSoon { minutes_left } => {
            format!("Open, closing in {} min.\n", minutes_left)
        }
        OpeningStatus::OpeningSoon { at } => format!("Closed, opening soon at {}.\n", at),
        OpeningStatus::ClosedToday { next: n } => format!("Closed today.{}\n", next(n)),
        OpeningStatus::Closed { next: n } => format!("Closed.{}\n", next(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekhours_core::{EditorState, WeeklySchedule};

    fn editor() -> ScheduleEditor {
        let mut schedule = WeeklySchedule::closed();
        schedule.set_ranges(Weekday::Monday, vec![TimeRange::new("09:00", "13:00")]);
        schedule.set_ranges(Weekday::Tuesday, vec![TimeRange::new("09:00", "13:00")]);
        schedule.set_ranges(Weekday::Thursday, vec![TimeRange::new("12:00", "16:00")]);
        ScheduleEditor::new(EditorState::new(schedule)).unwrap()
    }

    fn run_cmd(editor: &mut ScheduleEditor, command: Command) -> Report {
        run(&command, editor, &AppConfig::default()).unwrap()
    }

    #[test]
    fn show_lists_patterns_and_closed_days() {
        let report = run_cmd(&mut editor(), Command::Show);
        assert!(!report.changed);
        assert!(report.output.contains("Pattern 1  09:00-13:00"));
        assert!(report.output.contains("Mon Tue --- ---"));
        assert!(report.output.contains("Closed: Wed Fri Sat Sun"));
    }

    #[test]
    fn toggle_on_free_day_applies() {
        let mut ed = editor();
        let report = run_cmd(
            &mut ed,
            Command::Toggle {
                pattern: "1".to_string(),
                day: Weekday::Wednesday,
                membership: Membership::On,
                replace: false,
            },
        );
        assert!(report.changed);
        assert!(ed.schedule().day(Weekday::Wednesday).is_open);
    }

    #[test]
    fn toggle_conflict_without_replace_writes_nothing() {
        let mut ed = editor();
        let before = ed.state().clone();
        let report = run_cmd(
            &mut ed,
            Command::Toggle {
                pattern: "1".to_string(),
                day: Weekday::Thursday,
                membership: Membership::On,
                replace: false,
            },
        );
        assert!(!report.changed);
        assert!(report.output.contains("existing  12:00-16:00"));
        assert!(report.output.contains("incoming  09:00-13:00"));
        assert_eq!(ed.schedule(), &before.schedule);
    }

    #[test]
    fn toggle_conflict_with_replace_applies() {
        let mut ed = editor();
        let report = run_cmd(
            &mut ed,
            Command::Toggle {
                pattern: "1".to_string(),
                day: Weekday::Thursday,
                membership: Membership::On,
                replace: true,
            },
        );
        assert!(report.changed);
        assert_eq!(
            ed.schedule().day(Weekday::Thursday).ranges,
            vec![TimeRange::new("09:00", "13:00")]
        );
    }

    #[test]
    fn edit_normalizes_loose_input() {
        let mut ed = editor();
        let report = run_cmd(
            &mut ed,
            Command::Edit {
                pattern: "1".to_string(),
                start: Some("8".to_string()),
                end: Some("14:00".to_string()),
            },
        );
        assert!(report.changed);
        assert_eq!(
            ed.schedule().day(Weekday::Tuesday).ranges,
            vec![TimeRange::new("08:00", "14:00")]
        );
    }

    #[test]
    fn edit_rejects_invalid_range_and_keeps_state() {
        let mut ed = editor();
        let before = ed.state().clone();
        let command = Command::Edit {
            pattern: "1".to_string(),
            start: Some("25:99".to_string()),
            end: Some("07:00".to_string()),
        };

        let err = run(&command, &mut ed, &AppConfig::default()).unwrap_err();

        assert!(err.to_string().contains("HH:MM format"));
        assert_eq!(ed.state(), &before);
    }

    #[test]
    fn edit_rejects_end_before_start() {
        let mut ed = editor();
        let command = Command::Edit {
            pattern: "1".to_string(),
            start: None,
            end: Some("08:00".to_string()),
        };

        let err = run(&command, &mut ed, &AppConfig::default()).unwrap_err();

        assert!(err.to_string().contains("end time must be after start time"));
        assert_eq!(
            ed.schedule().day(Weekday::Monday).ranges,
            vec![TimeRange::new("09:00", "13:00")]
        );
    }

    #[test]
    fn orphan_add_rejects_invalid_range() {
        let mut ed = editor();
        let command = Command::Orphan(OrphanCommand::Add {
            start: Some("18:00".to_string()),
            end: Some("17:00".to_string()),
        });

        assert!(run(&command, &mut ed, &AppConfig::default()).is_err());
        assert_eq!(ed.patterns().len(), 2);
    }

    #[test]
    fn orphan_add_and_delete() {
        let mut ed = editor();
        let add = Command::Orphan(OrphanCommand::Add {
            start: Some("18:00".to_string()),
            end: Some("22:00".to_string()),
        });
        assert!(run_cmd(&mut ed, add.clone()).changed);
        assert!(!run_cmd(&mut ed, add).changed);

        let report = run_cmd(
            &mut ed,
            Command::Orphan(OrphanCommand::Delete {
                key: "18:00|22:00".to_string(),
            }),
        );
        assert!(report.changed);
        assert_eq!(ed.patterns().len(), 2);
    }

    #[test]
    fn validate_reports_bad_ranges() {
        let mut ed = editor();
        ed.update_range("1", RangeField::EndTime, "08:00").unwrap();
        let report = run_cmd(&mut ed, Command::Validate);
        assert!(report.output.contains("monday range 1: end time must be after start time"));
        assert!(report.output.contains("2 invalid range(s)."));
    }

    #[test]
    fn status_at_given_time() {
        let report = run_cmd(
            &mut editor(),
            Command::Status {
                day: Some(Weekday::Monday),
                time: Some("12:45".to_string()),
            },
        );
        assert_eq!(report.output, "Open, closing in 15 min.\n");
    }

    #[test]
    fn status_rejects_malformed_time() {
        let command = Command::Status {
            day: Some(Weekday::Monday),
            time: Some("abc".to_string()),
        };
        let err = run(&command, &mut editor(), &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("invalid --time"));
    }

    #[test]
    fn reset_closes_everything() {
        let mut ed = editor();
        assert!(run_cmd(&mut ed, Command::Reset).changed);
        assert!(ed.patterns().is_empty());
    }
}
