use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use crossterm::cursor;
use crossterm::queue;
use crossterm::event;
use crossterm::style::Print;
use crate::numbertool::State;
use log::warn;
use std::io::Write;
use std::io::stdout;
use std::time::Duration;

const PROMPT: &str = "> ";

pub fn crossterm_main(mut state: State) {
    if terminal::enable_raw_mode().is_err() {println!("terminal does not support raw mode, cant run term frontend"); return};

    let mut input = String::new();
    _ = queue!(stdout(),
        Print("numbertool, type help for commands\r\n"),
        cursor::EnableBlinking,
        Print(PROMPT),
    );
    _ = stdout().flush();

    while !state.exiting {
        if !event::poll(Duration::from_millis(1000)).unwrap_or(false) {continue}
        let key = match event::read() {
            Ok(event::Event::Key(key)) if key.kind != KeyEventKind::Release => key,
            _ => continue,
        };

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.exiting = true;
            },
            KeyCode::Char(char) => input.push(char),
            KeyCode::Backspace => {input.pop();},
            KeyCode::Esc => input.clear(),
            KeyCode::Enter => {
                let output = state.execute_command(&input);
                _ = queue!(stdout(), Print("\r\n"));
                for line in output.lines() {
                    _ = queue!(stdout(), Print(line), Print("\r\n"));
                }
                if state.config.copy_results && state.new_result {
                    if let Err(e) = state.copy_last() {
                        warn!("could not copy result: {e}");
                    }
                }
                input.clear();
            },
            _ => {}
        }

        _ = queue!(stdout(),
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(PROMPT),
            Print(&input),
        );
        _ = stdout().flush();
    }

    _ = queue!(stdout(), Print("\r\n"));
    _ = stdout().flush();
    _ = terminal::disable_raw_mode();
}
