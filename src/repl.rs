use anyhow::{Context, Result};
use std::io::{self, Write};

use crate::model::Message;
use crate::session::Session;

pub fn run_repl(session: &mut Session) -> Result<()> {
    println!("quill model session");
    println!("model: {}", session.config().model);
    println!(
        "type a prompt, '/pull' to download the model, '/file <path>' to add a file to the \
         context, '/history' to inspect turns, '/reset' to clear turns, '/forget-files' to drop \
         added files, or 'exit' to quit"
    );

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read stdin")?;
        if read == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.eq_ignore_ascii_case("/reset") {
            session.clear_context();
            println!("history cleared\n");
            continue;
        }
        if line.eq_ignore_ascii_case("/forget-files") {
            session.clear_session_files();
            println!("session files cleared\n");
            continue;
        }
        if line.eq_ignore_ascii_case("/history") {
            print_history(session.history());
            continue;
        }
        if line.eq_ignore_ascii_case("/pull") {
            match session.pull_model() {
                Ok(body) => println!("{}\n", body.trim()),
                Err(err) => println!("pull failed: {err:#}\n"),
            }
            continue;
        }
        if let Some(path) = line.strip_prefix("/file ") {
            match session.add_file_to_context(path.trim()) {
                Ok(contents) => println!("added {} bytes to session context\n", contents.len()),
                Err(err) => println!("could not add file: {err:#}\n"),
            }
            continue;
        }

        let answer = session.prompt(line)?;
        println!("{}\n", answer.trim());
    }

    Ok(())
}

fn print_history(history: &[Message]) {
    if history.is_empty() {
        println!("(history is empty)\n");
        return;
    }

    for (idx, msg) in history.iter().enumerate() {
        println!("[{}] {}: {}", idx, msg.role.as_str(), msg.content);
    }
    println!();
}
