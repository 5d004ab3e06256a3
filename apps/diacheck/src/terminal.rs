//! # Terminal Wizard
//!
//! Line-oriented front end for the assessment wizard.
//!
//! Each step prints its title and a progress bar, then asks for every field
//! of the step in schema order. Pressing Enter keeps the current answer.
//! After the fields come the step actions:
//!
//! ```text
//! steps 1-2:  [n]ext  [b]ack  [q]uit      (Enter = next)
//! step 3:     [p]redict  [b]ack  [q]uit   (Enter = predict)
//! ```
//!
//! Reader and writer are generic so the whole dialogue can be scripted.

use crate::gateway::PredictionGateway;
use crate::session;
use diacheck_core::{
    FieldKind, FieldSpec, PredictionResult, SubmissionState, SubmitBlocked, Wizard,
};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Width of the progress bar, in cells.
const PROGRESS_WIDTH: usize = 30;

/// How a terminal session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user asked to quit.
    Quit,
    /// Input ran out.
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAction {
    Next,
    Back,
    Predict,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureAction {
    Retry,
    Edit,
    Quit,
}

/// Interactive wizard over a reader / writer pair.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect a scripted session.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Drive `wizard` until the user quits or input ends.
    pub async fn run<G: PredictionGateway>(
        &mut self,
        wizard: &mut Wizard,
        gateway: &G,
    ) -> io::Result<Exit> {
        writeln!(self.output, "Diabetes Prediction")?;
        writeln!(
            self.output,
            "Fill out the form below to assess your diabetes risk using our AI-powered prediction model."
        )?;

        loop {
            self.render_step(wizard)?;

            let fields: Vec<&'static FieldSpec> = wizard.current_fields().collect();
            for spec in fields {
                if !self.ask_field(wizard, spec)? {
                    return Ok(Exit::EndOfInput);
                }
            }

            let Some(action) = self.ask_step_action(wizard)? else {
                return Ok(Exit::EndOfInput);
            };
            debug!(step = wizard.step().number(), ?action, "step action");

            match action {
                StepAction::Quit => return Ok(Exit::Quit),
                StepAction::Back => wizard.retreat(),
                StepAction::Next => {
                    if !wizard.advance() {
                        writeln!(self.output, "Please answer every question on this step.")?;
                    }
                }
                StepAction::Predict => match self.predict(wizard, gateway).await? {
                    Some(exit) => return Ok(exit),
                    None => continue,
                },
            }
        }
    }

    /// Submit and handle the result screen. `None` means back to the form.
    async fn predict<G: PredictionGateway>(
        &mut self,
        wizard: &mut Wizard,
        gateway: &G,
    ) -> io::Result<Option<Exit>> {
        loop {
            writeln!(self.output, "\nAnalyzing Your Profile...")?;
            let outcome = session::submit(wizard, gateway)
                .await
                .map(SubmissionState::clone);
            let state = match outcome {
                Ok(state) => state,
                Err(SubmitBlocked::Invalid { step }) => {
                    writeln!(self.output, "Some answers are missing (step {step}).")?;
                    return Ok(None);
                }
                Err(SubmitBlocked::InFlight) => return Ok(None),
            };

            match state {
                SubmissionState::Succeeded(result) => {
                    self.render_result(&result)?;
                    return match self.ask("Start over? [y/N]: ")? {
                        None => Ok(Some(Exit::EndOfInput)),
                        Some(answer) if answer.eq_ignore_ascii_case("y") => {
                            wizard.reset();
                            Ok(None)
                        }
                        Some(_) => Ok(Some(Exit::Quit)),
                    };
                }
                SubmissionState::Failed(message) => {
                    writeln!(self.output, "Error: {message}")?;
                    match self.ask_failure_action()? {
                        None => return Ok(Some(Exit::EndOfInput)),
                        Some(FailureAction::Retry) => continue,
                        Some(FailureAction::Edit) => {
                            wizard.dismiss_error();
                            return Ok(None);
                        }
                        Some(FailureAction::Quit) => return Ok(Some(Exit::Quit)),
                    }
                }
                SubmissionState::Idle | SubmissionState::Loading => return Ok(None),
            }
        }
    }

    fn render_step(&mut self, wizard: &Wizard) -> io::Result<()> {
        let step = wizard.step();
        let percent = wizard.progress_percent();
        let filled = PROGRESS_WIDTH * usize::from(percent) / 100;
        writeln!(self.output)?;
        writeln!(
            self.output,
            "Step {} of 3: {}  [{}{}] {}%",
            step,
            step.title(),
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled),
            percent
        )
    }

    fn render_result(&mut self, result: &PredictionResult) -> io::Result<()> {
        writeln!(self.output, "\nYour Result")?;
        writeln!(self.output, "  {}", result.percent_label())?;
        writeln!(self.output, "  {}", result.headline())?;
        writeln!(self.output, "  {}", result.advice())
    }

    /// Ask for one field until the input is accepted. Returns `false` on end
    /// of input.
    fn ask_field(&mut self, wizard: &mut Wizard, spec: &FieldSpec) -> io::Result<bool> {
        loop {
            if let Some(message) = wizard.errors().get(spec.field) {
                writeln!(self.output, "  ! {message}")?;
            }
            let current = wizard.profile().value(spec.field);
            let prompt = format!(
                "{} {}{}: ",
                spec.prompt,
                choices(spec.kind),
                if current.is_empty() {
                    String::new()
                } else {
                    format!(" ({current})")
                }
            );

            let Some(line) = self.ask(&prompt)? else {
                return Ok(false);
            };
            if line.is_empty() && !current.is_empty() {
                return Ok(true);
            }
            match wizard.update_field(spec.field, &line) {
                Ok(()) => return Ok(true),
                Err(err) => writeln!(self.output, "  ! {err}")?,
            }
        }
    }

    fn ask_step_action(&mut self, wizard: &Wizard) -> io::Result<Option<StepAction>> {
        let last = wizard.step().is_last();
        let prompt = if last {
            "[p]redict  [b]ack  [q]uit: "
        } else {
            "[n]ext  [b]ack  [q]uit: "
        };
        loop {
            let Some(line) = self.ask(prompt)? else {
                return Ok(None);
            };
            let action = match line.to_ascii_lowercase().as_str() {
                "" if last => StepAction::Predict,
                "" => StepAction::Next,
                "p" | "predict" if last => StepAction::Predict,
                "n" | "next" if !last => StepAction::Next,
                "b" | "back" => StepAction::Back,
                "q" | "quit" => StepAction::Quit,
                _ => continue,
            };
            return Ok(Some(action));
        }
    }

    fn ask_failure_action(&mut self) -> io::Result<Option<FailureAction>> {
        loop {
            let Some(line) = self.ask("[r]etry  [e]dit  [q]uit: ")? else {
                return Ok(None);
            };
            let action = match line.to_ascii_lowercase().as_str() {
                "" | "r" | "retry" => FailureAction::Retry,
                "e" | "edit" => FailureAction::Edit,
                "q" | "quit" => FailureAction::Quit,
                _ => continue,
            };
            return Ok(Some(action));
        }
    }

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn choices(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Digits => "[years]",
        FieldKind::Gender => "[Male/Female]",
        FieldKind::YesNo => "[Yes/No]",
    }
}
