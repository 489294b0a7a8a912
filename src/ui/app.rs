use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::engine::engine::SupportEngine;
use crate::engine::llm_client::ChatModel;
use crate::engine::protocol::RequestOutcome;
use crate::ui::screens::{help_text, BANNER, MENU};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Submit,
    ViewLatest,
    Help,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Submit),
            "2" => Some(MenuChoice::ViewLatest),
            "3" => Some(MenuChoice::Help),
            "4" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive text menu. End of input is treated like choosing Exit.
pub struct Shell<'a, M: ChatModel, R: BufRead, W: Write> {
    engine: &'a SupportEngine<M>,
    input: R,
    out: W,
}

impl<'a, M: ChatModel, R: BufRead, W: Write> Shell<'a, M, R, W> {
    pub fn new(engine: &'a SupportEngine<M>, input: R, out: W) -> Self {
        Self { engine, input, out }
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BANNER)?;
        writeln!(
            self.out,
            "\n🌟 Welcome to Google Workspace Support Assistant!"
        )?;

        loop {
            writeln!(self.out, "{}", MENU)?;
            let Some(choice) = self.prompt("\n👉 Enter your choice (1-4): ")? else {
                break;
            };

            let flow = match MenuChoice::parse(&choice) {
                Some(MenuChoice::Submit) => self.submit()?,
                Some(MenuChoice::ViewLatest) => self.view_latest()?,
                Some(MenuChoice::Help) => {
                    writeln!(self.out, "{}", help_text(self.engine.store().dir()))?;
                    self.pause("    Press Enter to return to main menu...")?
                }
                Some(MenuChoice::Exit) => Flow::Exit,
                None => {
                    writeln!(
                        self.out,
                        "\n{}",
                        "❌ Invalid option. Please choose 1-4.".red()
                    )?;
                    self.pause("Press Enter to continue...")?
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        writeln!(
            self.out,
            "\n👋 Thank you for using Google Workspace Support Assistant!"
        )?;
        writeln!(self.out, "Have a great day! 🌟\n")?;
        self.out.flush()
    }

    fn submit(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "\n📝 Submit your support request")?;
        writeln!(self.out, "--------------------------------")?;
        writeln!(self.out, "Tip: Be specific and include relevant details")?;

        let Some(text) = self.prompt("\n🔍 Describe your issue: ")? else {
            return Ok(Flow::Exit);
        };
        if text.trim().is_empty() {
            writeln!(self.out, "\nNothing to submit.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.out, "\n🔄 Processing your request...")?;
        self.out.flush()?;

        match self.engine.process_request(&text) {
            Ok(processed) => {
                let saved_label = match processed.outcome {
                    RequestOutcome::Answered => "Resposta salva em",
                    RequestOutcome::Failed => "Log de erro salvo em",
                };
                writeln!(self.out, "\n{}", "✨ Support Response:".green())?;
                writeln!(self.out, "------------------")?;
                writeln!(self.out, "{}", processed.response_text)?;
                writeln!(
                    self.out,
                    "\n{}: {}",
                    saved_label,
                    processed.path.display()
                )?;
            }
            Err(e) => {
                log::error!("Could not persist response: {}", e);
                writeln!(
                    self.out,
                    "\n{}",
                    format!("❌ Could not save the response: {}", e).red()
                )?;
            }
        }

        self.pause("\nPress Enter to continue...")
    }

    fn view_latest(&mut self) -> io::Result<Flow> {
        match self.engine.latest_response() {
            Ok(Some(record)) => {
                writeln!(self.out, "\n📄 Latest Response ({}):", record.file_name())?;
                writeln!(self.out, "{}", "-".repeat(50))?;
                writeln!(self.out, "{}", record.content)?;
            }
            Ok(None) => {
                writeln!(self.out, "\n{}", "❌ No previous responses found.".yellow())?;
            }
            Err(e) => {
                log::error!("Could not read latest response: {}", e);
                writeln!(
                    self.out,
                    "\n{}",
                    format!("❌ Error reading response file: {}", e).red()
                )?;
            }
        }

        self.pause("\nPress Enter to continue...")
    }

    fn pause(&mut self, message: &str) -> io::Result<Flow> {
        Ok(match self.prompt(message)? {
            Some(_) => Flow::Continue,
            None => Flow::Exit,
        })
    }

    /// Prints `message` and reads one line; `None` on end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    use super::*;
    use crate::engine::pipeline::testing::ScriptedModel;
    use crate::engine::pipeline::PipelineRunner;
    use crate::model::prompt_spec::Pipeline;
    use crate::storage::request_store::RequestStore;

    fn fixed_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn engine(model: ScriptedModel, tmp: &TempDir) -> SupportEngine<ScriptedModel> {
        let store = RequestStore::new(tmp.path()).with_clock(fixed_noon);
        SupportEngine::new(PipelineRunner::new(model, Pipeline::default()), store)
    }

    fn run_shell(engine: &SupportEngine<ScriptedModel>, script: &str) -> String {
        let mut out = Vec::new();
        Shell::new(engine, Cursor::new(script.as_bytes()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_menu_choices() {
        assert_eq!(MenuChoice::parse(" 1 "), Some(MenuChoice::Submit));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("5"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
    }

    #[test]
    fn invalid_option_reprompts_then_exits() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(ScriptedModel::default(), &tmp);

        let output = run_shell(&engine, "9\n\n4\n");

        assert!(output.contains("Invalid option. Please choose 1-4."));
        assert_eq!(output.matches("Enter your choice (1-4)").count(), 2);
        assert!(output.contains("Thank you for using Google Workspace Support Assistant!"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(ScriptedModel::default(), &tmp);

        let output = run_shell(&engine, "");

        assert!(output.contains("Welcome to Google Workspace Support Assistant!"));
        assert!(output.contains("Have a great day!"));
    }

    #[test]
    fn submit_then_view_latest() {
        let tmp = TempDir::new().unwrap();
        let model = ScriptedModel::new(["a", "b", "c", "...final translated response..."]);
        let engine = engine(model, &tmp);

        let output = run_shell(&engine, "1\nCannot access shared drive\n\n2\n\n4\n");

        assert!(output.contains("...final translated response..."));
        assert!(output.contains("Resposta salva em: "));
        assert!(output.contains(
            "📄 Latest Response (20240101_120000_Cannot_access_shared_drive.txt):"
        ));
        assert!(output.contains("Solicitação: Cannot access shared drive"));
    }

    #[test]
    fn failed_request_reports_error_log_location() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(ScriptedModel::default(), &tmp);

        let output = run_shell(&engine, "1\nMeet recordings missing\n\n4\n");

        assert!(output.contains("Erro ao processar solicitação:"));
        assert!(output.contains("Log de erro salvo em: "));
    }

    #[test]
    fn blank_request_is_not_sent() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(ScriptedModel::default(), &tmp);

        let output = run_shell(&engine, "1\n   \n4\n");

        assert!(output.contains("Nothing to submit."));
        assert_eq!(engine.latest_response().unwrap(), None);
    }

    #[test]
    fn request_text_is_saved_exactly_as_typed() {
        let tmp = TempDir::new().unwrap();
        let model = ScriptedModel::new(["a", "b", "c", "d"]);
        let engine = engine(model, &tmp);

        run_shell(&engine, "1\n  Drive  sync broken  \n\n4\n");

        let latest = engine.latest_response().unwrap().unwrap();
        assert!(latest
            .content
            .contains("Solicitação:   Drive  sync broken  \n"));
        assert!(latest.file_name().ends_with("_Drive__sync_broken.txt"));
    }

    #[test]
    fn view_latest_without_records() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(ScriptedModel::default(), &tmp);

        let output = run_shell(&engine, "2\n\n4\n");

        assert!(output.contains("No previous responses found."));
    }

    #[test]
    fn help_names_the_output_directory() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(ScriptedModel::default(), &tmp);

        let output = run_shell(&engine, "3\n\n4\n");

        assert!(output.contains("Help Guide"));
        assert!(output.contains(&format!("'{}' directory", tmp.path().display())));
    }
}
