use std::fmt::{self, Write};

use learn_core::interaction::DIAGRAM_HINT;
use learn_core::model::{ContentBlock, Diagram, DiagramRegion, ElementKind, ElementSpec};
use services::{AppServices, FlowError, LessonFlow, ProgressSummary};
use tracing::debug;

use crate::command::{Command, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Quit,
}

/// Terminal front end over the progress store and the current lesson page.
pub struct Player {
    services: AppServices,
    flow: LessonFlow,
}

impl Player {
    #[must_use]
    pub fn new(services: AppServices) -> Self {
        let flow = services.lesson_flow();
        Self { services, flow }
    }

    #[must_use]
    pub fn services(&self) -> &AppServices {
        &self.services
    }

    /// Run one command and write its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns `fmt::Error` only if writing to `out` fails.
    pub async fn execute(
        &mut self,
        command: Command,
        out: &mut String,
    ) -> Result<Step, fmt::Error> {
        debug!(?command, "player command");
        match command {
            Command::Status => self.render_status(out)?,
            Command::Show => self.render_lesson(out)?,
            Command::Read => {
                self.flow.mark_read();
                writeln!(out, "Marked as read.")?;
            }
            Command::Pick(number) => match self.flow.select_option(number.saturating_sub(1)) {
                Ok(()) => writeln!(out, "Selected option {number}.")?,
                Err(err) => report(out, &err)?,
            },
            Command::Submit => match self.flow.element_kind() {
                ElementKind::Quiz => match self.flow.submit_quiz(self.services.store_mut()).await
                {
                    Ok(feedback) => {
                        if feedback.outcome.is_correct {
                            writeln!(out, "Correct!")?;
                        } else {
                            writeln!(
                                out,
                                "Not quite. The correct answer is option {}.",
                                feedback.outcome.correct_answer + 1
                            )?;
                        }
                        writeln!(out, "{}", feedback.explanation)?;
                        Self::announce(feedback.coins_awarded, out)?;
                    }
                    Err(err) => report(out, &err)?,
                },
                ElementKind::Diagram => {
                    match self.flow.submit_diagram(self.services.store_mut()).await {
                        Ok(feedback) => {
                            for region in &feedback.outcome.regions {
                                let mark = if region.is_target { "+" } else { "-" };
                                writeln!(out, "  {mark} {}", region.region.label())?;
                            }
                            writeln!(
                                out,
                                "Found {} of {} key areas.",
                                feedback.outcome.targets_found(),
                                Diagram::target_count()
                            )?;
                            writeln!(out, "{}", feedback.explanation)?;
                            Self::announce(feedback.coins_awarded, out)?;
                        }
                        Err(err) => report(out, &err)?,
                    }
                }
            },
            Command::Toggle(region) => match self.flow.toggle_region(region) {
                Ok(selected) => {
                    let verb = if selected { "Selected" } else { "Deselected" };
                    writeln!(out, "{verb} {}.", region.label())?;
                    self.render_selection_count(out)?;
                }
                Err(err) => report(out, &err)?,
            },
            Command::Hint => match self.flow.toggle_hints() {
                Ok(true) => writeln!(out, "Hint: {DIAGRAM_HINT}")?,
                Ok(false) => writeln!(out, "Hint hidden.")?,
                Err(err) => report(out, &err)?,
            },
            Command::Complete => {
                match self.flow.complete_lesson(self.services.store_mut()).await {
                    Ok(done) => {
                        writeln!(out, "Lesson complete.")?;
                        Self::announce(done.coins_awarded, out)?;
                        if done.module_completed {
                            let module = self.services.store().current_module();
                            writeln!(out, "Module \"{}\" finished!", module.title())?;
                        }
                    }
                    Err(err) => report(out, &err)?,
                }
            }
            Command::Next => {
                if self.flow.next_lesson(self.services.store_mut()).await {
                    self.render_lesson(out)?;
                } else {
                    writeln!(out, "This is the last lesson.")?;
                }
            }
            Command::Prev => {
                if self.flow.previous_lesson(self.services.store_mut()).await {
                    self.render_lesson(out)?;
                } else {
                    writeln!(out, "This is the first lesson.")?;
                }
            }
            Command::Reset => {
                self.flow.reset(self.services.store_mut()).await;
                writeln!(out, "Progress erased.")?;
                self.render_status(out)?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Step::Quit),
        }
        Ok(Step::Continue)
    }

    fn announce(awarded: u64, out: &mut String) -> fmt::Result {
        if awarded > 0 {
            writeln!(out, "+{awarded} coins!")?;
        }
        Ok(())
    }

    /// Module header: title, position, progress, time and balance.
    pub fn render_status(&self, out: &mut String) -> fmt::Result {
        let store = self.services.store();
        let summary = ProgressSummary::from_snapshot(store.snapshot());
        writeln!(out, "{}", store.current_module().title())?;
        writeln!(
            out,
            "{} | {}% complete ({}/{} lessons) | {} left | {} coins ({})",
            summary.position,
            summary.percent_rounded(),
            summary.completed_lessons,
            summary.total_lessons,
            summary.time_remaining,
            summary.coins,
            store.user().name()
        )?;
        if let Some(amount) = store.coin_award() {
            writeln!(out, "+{amount} coins!")?;
        }
        Ok(())
    }

    /// The current lesson's text and its interactive element.
    pub fn render_lesson(&self, out: &mut String) -> fmt::Result {
        let store = self.services.store();
        let lesson = store.current_lesson();
        let total = store.current_module().lesson_count();
        let done = if lesson.is_completed() { " (completed)" } else { "" };
        writeln!(
            out,
            "== Lesson {} of {total}: {}{done} ==",
            store.current_lesson_index() + 1,
            lesson.title()
        )?;

        for block in lesson.blocks() {
            writeln!(out)?;
            match block {
                ContentBlock::Prose(text) => writeln!(out, "{text}")?,
                ContentBlock::Heading(text) => writeln!(out, "## {text}")?,
                ContentBlock::List { lead, items } => {
                    for line in lead {
                        writeln!(out, "{line}")?;
                    }
                    for item in items {
                        writeln!(out, "  • {item}")?;
                    }
                }
            }
        }

        writeln!(out)?;
        let element = lesson.element();
        let status = if element.is_completed() { " (done)" } else { "" };
        match element.spec() {
            ElementSpec::Quiz(quiz) => {
                writeln!(out, "-- Knowledge check{status}: {}", quiz.question())?;
                let selected = self.flow.quiz().and_then(|attempt| attempt.selected());
                for (index, option) in quiz.options().iter().enumerate() {
                    let mark = if selected == Some(index) { '*' } else { ' ' };
                    writeln!(out, " {mark}{}) {option}", index + 1)?;
                }
            }
            ElementSpec::Diagram(diagram) => {
                writeln!(out, "-- Diagram{status}: {}", diagram.question())?;
                let attempt = self.flow.diagram();
                for region in DiagramRegion::ALL {
                    let picked = attempt.is_some_and(|a| a.is_selected(region));
                    let mark = if picked { 'x' } else { ' ' };
                    writeln!(out, "  [{mark}] {:<11} {}", region.as_str(), region.label())?;
                }
                self.render_selection_count(out)?;
                if attempt.is_some_and(|a| a.hints_visible()) {
                    writeln!(out, "Hint: {DIAGRAM_HINT}")?;
                }
            }
        }
        Ok(())
    }

    fn render_selection_count(&self, out: &mut String) -> fmt::Result {
        if let Some(attempt) = self.flow.diagram() {
            writeln!(
                out,
                "Areas selected: {}/{} (need {})",
                attempt.selected_count(),
                Diagram::target_count(),
                Diagram::SELECTION_THRESHOLD
            )?;
        }
        Ok(())
    }
}

fn report(out: &mut String, err: &FlowError) -> fmt::Result {
    writeln!(out, "! {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::time::fixed_now;
    use services::{Clock, load_module};

    async fn player() -> Player {
        let module = load_module(None).unwrap();
        Player::new(AppServices::new_in_memory(Clock::fixed(fixed_now()), module).await)
    }

    async fn run(player: &mut Player, line: &str) -> String {
        let mut out = String::new();
        let step = player.execute(line.parse().unwrap(), &mut out).await.unwrap();
        assert_eq!(step, Step::Continue);
        out
    }

    #[tokio::test]
    async fn first_lesson_is_shown_with_quiz() {
        let mut player = player().await;
        let out = run(&mut player, "show").await;
        assert!(out.starts_with("== Lesson 1 of 3:"));
        assert!(out.contains("-- Knowledge check"));
        assert!(out.contains(" 1) "));
    }

    #[tokio::test]
    async fn quiz_submission_announces_coins() {
        let mut player = player().await;
        run(&mut player, "pick 2").await;
        let out = run(&mut player, "submit").await;
        assert!(out.contains("Correct!"));
        assert!(out.contains("+5 coins!"));

        let out = run(&mut player, "complete").await;
        assert!(out.contains("! read the lesson content"));
        run(&mut player, "read").await;
        let out = run(&mut player, "complete").await;
        assert!(out.contains("+10 coins!"));
        assert_eq!(player.services().store().user().coins(), 40);
    }

    #[tokio::test]
    async fn diagram_commands_track_selection() {
        let mut player = player().await;
        let out = run(&mut player, "toggle roof").await;
        assert!(out.contains("! current lesson has a Quiz element"));

        run(&mut player, "next").await;
        run(&mut player, "toggle roof").await;
        let out = run(&mut player, "toggle hvac").await;
        assert!(out.contains("Areas selected: 2/4"));
        let out = run(&mut player, "submit").await;
        assert!(out.contains("! select at least 3 areas"));

        run(&mut player, "toggle foundation").await;
        let out = run(&mut player, "submit").await;
        assert!(out.contains("Found 2 of 4 key areas."));
        assert!(out.contains("+8 coins!"));
    }

    #[tokio::test]
    async fn final_lesson_announces_total_and_status_shows_bonus() {
        let mut player = player().await;
        for line in ["read", "pick 2", "submit", "complete", "next", "read"] {
            run(&mut player, line).await;
        }
        for line in ["toggle roof", "toggle hvac", "toggle plumbing", "submit", "complete"] {
            run(&mut player, line).await;
        }
        for line in ["next", "read", "pick 2", "submit"] {
            run(&mut player, line).await;
        }
        let out = run(&mut player, "complete").await;
        assert!(out.contains("+60 coins!"));
        assert!(out.contains("Module \"Home Inspection Basics\" finished!"));

        let out = run(&mut player, "status").await;
        assert!(out.contains("100% complete (3/3 lessons)"));
        assert!(out.contains("+50 coins!"));
    }

    #[tokio::test]
    async fn reset_and_quit() {
        let mut player = player().await;
        run(&mut player, "pick 1").await;
        run(&mut player, "submit").await;
        let out = run(&mut player, "reset").await;
        assert!(out.contains("Progress erased."));
        assert!(out.contains("25 coins"));

        let mut out = String::new();
        let step = player.execute(Command::Quit, &mut out).await.unwrap();
        assert_eq!(step, Step::Quit);
    }
}
