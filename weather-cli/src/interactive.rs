use anyhow::{Context, Result};
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{App, Changed};

use crate::render;

/// One line of user input in the interactive session.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// Anything that is not a command replaces the search text.
    Text(String),
    /// `/N` picks suggestion N (1-based).
    Select(usize),
    Submit,
    Quit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let Some(cmd) = line.trim().strip_prefix('/') else {
            return Input::Text(line.trim_end_matches(['\r', '\n']).to_string());
        };

        match cmd {
            "q" | "quit" => Input::Quit,
            "" | "submit" => Input::Submit,
            n => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Input::Select(n),
                _ => Input::Unknown(cmd.to_string()),
            },
        }
    }
}

const HELP: &str = "Type a city name to search. /N picks suggestion N, / or /submit uses the top one, /quit exits.";

/// What the session loop should do after one line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue(Option<String>),
    Quit,
}

/// Apply one line of input to the session; returns any text to print right away.
pub fn dispatch(app: &mut App, input: Input) -> Step {
    let message = match input {
        Input::Quit => return Step::Quit,
        Input::Text(text) => {
            app.on_input_change(text);
            None
        }
        Input::Submit => {
            if app.submit() {
                Some(render::weather_state(app.weather()))
            } else {
                debug!("submit ignored: no suggestions");
                Some("No suggestions to submit yet.".to_string())
            }
        }
        Input::Select(n) => {
            if app.select_suggestion(n - 1) {
                Some(render::weather_state(app.weather()))
            } else {
                debug!("select #{n} ignored: {} suggestion(s)", app.search().candidates.len());
                Some(format!("No suggestion #{n}."))
            }
        }
        Input::Unknown(cmd) => {
            debug!("unknown command /{cmd}");
            Some(format!("Unknown command /{cmd}. {HELP}"))
        }
    };

    Step::Continue(message)
}

pub async fn run(mut app: App) -> Result<()> {
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match dispatch(&mut app, Input::parse(&line)) {
                    Step::Quit => break,
                    Step::Continue(Some(message)) => println!("{message}"),
                    Step::Continue(None) => {}
                }
            }
            Some(changed) = app.next_update() => match changed {
                Changed::Suggestions => println!("{}", render::suggestions(app.search())),
                Changed::Weather => println!("{}", render::weather_state(app.weather())),
            },
        }
    }

    Ok(())
}
