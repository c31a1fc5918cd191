use std::io::{BufRead, Write};

use services::{LessonView, PresentationSink, ResetGate};
use tutor_core::model::{LESSON_LOW_BOUND, MatchSet};

/// Prints lessons and verdicts to stdout.
pub struct TerminalSink;

/// Render the lesson screen: group intro on its first lesson, then the
/// lesson text, help and reference markup.
pub fn write_lesson(out: &mut impl Write, view: &LessonView<'_>) -> std::io::Result<()> {
    let lesson = view.lesson;
    if let (LESSON_LOW_BOUND, Some(intro)) = (view.pointer.lesson(), view.group.intro()) {
        writeln!(out, "{}: {intro}", view.group.name())?;
        writeln!(out)?;
    }
    let mark = if view.completed { " (done)" } else { "" };
    writeln!(
        out,
        "Lesson {} of {}: {} / {}{mark}",
        view.ordinal,
        view.total,
        view.group.name(),
        lesson.name()
    )?;
    if let Some(instruction) = lesson.instruction() {
        writeln!(out, "  {instruction}")?;
    }
    if let Some(title) = lesson.help_title() {
        writeln!(out)?;
        writeln!(out, "  {title}")?;
    }
    if let Some(syntax) = lesson.syntax() {
        writeln!(out, "  syntax: {syntax}")?;
    }
    if let Some(help) = lesson.help() {
        writeln!(out, "  {help}")?;
    }
    for example in lesson.examples() {
        writeln!(out, "  e.g. {example}")?;
    }
    if !lesson.reference_markup().is_empty() {
        writeln!(out)?;
        for line in lesson.reference_markup().lines() {
            writeln!(out, "    {line}")?;
        }
    }
    if view.group_finished {
        writeln!(out)?;
        writeln!(out, "  Every lesson of \"{}\" is complete.", view.group.name())?;
    }
    Ok(())
}

fn hint_line(solution: &MatchSet) -> String {
    let nodes: Vec<String> = solution.iter().map(|node| node.to_string()).collect();
    format!("Hint: the answer selects {}", nodes.join(", "))
}

impl PresentationSink for TerminalSink {
    fn on_lesson_changed(&self, view: &LessonView<'_>) {
        if let Err(err) = write_lesson(&mut std::io::stdout().lock(), view) {
            tracing::warn!(error = %err, "could not print lesson");
        }
    }

    fn on_accepted(&self, matches: &MatchSet) {
        println!("Correct! {} element(s) selected.", matches.len());
    }

    fn on_rejected(&self, candidate: &MatchSet, solution: &MatchSet) {
        println!(
            "Not quite: selected {} element(s), expected {}.",
            candidate.len(),
            solution.len()
        );
    }

    fn on_hint(&self, solution: &MatchSet) {
        println!("{}", hint_line(solution));
    }

    fn clear_input(&self) {}
}

/// Asks on stdin; anything but `y`/`yes` declines.
pub struct StdinGate;

impl ResetGate for StdinGate {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
