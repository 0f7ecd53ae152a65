use std::io::{prelude::*, stdin, stdout};

/// Prompts the moderator and reads one line. Returns `None` once stdin is closed or unreadable.
pub fn input(msg: &str) -> Option<String> {
    print!("[ ?? ] {}: ", msg);
    stdout().flush().ok()?;
    let mut result = String::new();
    match stdin().read_line(&mut result) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(result.trim_end_matches(&['\r', '\n'][..]).to_owned())
    }
}
