//! Interactive questions: yes/no confirmation and hidden password entry.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Ask until the answer is yes/y or no/n (any case). End of input means no.
pub fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    loop {
        write!(output, "{question} (yes/y/no/n): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match line.trim().to_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => writeln!(output, "Please answer 'yes', 'y', 'no' or 'n'.")?,
        }
    }
}

/// What a key press does to a password being typed.
#[derive(Debug, PartialEq, Eq)]
enum PasswordKey {
    Continue,
    Done,
    Cancelled,
}

fn apply_password_key(password: &mut String, key: KeyEvent) -> PasswordKey {
    if key.kind != KeyEventKind::Press {
        return PasswordKey::Continue;
    }
    match key.code {
        KeyCode::Enter => PasswordKey::Done,
        KeyCode::Esc => PasswordKey::Cancelled,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            PasswordKey::Cancelled
        }
        KeyCode::Char(c) => {
            password.push(c);
            PasswordKey::Continue
        }
        KeyCode::Backspace => {
            password.pop();
            PasswordKey::Continue
        }
        _ => PasswordKey::Continue,
    }
}

fn read_hidden_line() -> io::Result<String> {
    let mut password = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            match apply_password_key(&mut password, key) {
                PasswordKey::Continue => {}
                PasswordKey::Done => return Ok(password),
                PasswordKey::Cancelled => {
                    return Err(io::Error::new(
                        io::ErrorKind::Interrupted,
                        "password entry cancelled",
                    ));
                }
            }
        }
    }
}

/// Read a password from the terminal without echoing it.
pub fn read_password(prompt: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;

    enable_raw_mode()?;
    let result = read_hidden_line();
    // Restore the terminal before reporting any read error.
    disable_raw_mode()?;
    writeln!(stderr)?;
    result
}
