use crate::messages::ScreenCommand;

use std::io::BufRead;

use tokio::sync::mpsc;

/// Maps a line typed at the terminal to a screen command.
pub fn parse_command(input: &str) -> Option<ScreenCommand> {
    match input.trim().to_lowercase().as_str() {
        "t" | "take" | "photo" => Some(ScreenCommand::TakePhoto),
        "p" | "pick" | "library" => Some(ScreenCommand::PickImage),
        "s" | "sound" | "play" | "pause" => Some(ScreenCommand::ToggleSound),
        "i" | "status" => Some(ScreenCommand::Status),
        "q" | "quit" | "exit" => Some(ScreenCommand::Quit),
        _ => None,
    }
}

/// Reads commands from stdin and forwards them to the screen.
///
/// Stdin reads block, so the monitor lives on a plain detached thread:
/// runtime shutdown must not wait on a read still in flight. The thread
/// ends when stdin closes or the receiving side goes away.
pub fn spawn_stdin_monitor(tx: mpsc::Sender<ScreenCommand>) {
    std::thread::spawn(move || {
        forward_commands(std::io::stdin().lock(), &tx);
        tracing::debug!("Stdin monitor stopped");
    });
}

fn forward_commands(input: impl BufRead, tx: &mpsc::Sender<ScreenCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read from stdin: {}", e);
                break;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_command(trimmed) {
            Some(command) => {
                if tx.blocking_send(command).is_err() {
                    break;
                }
            }
            None => tracing::warn!(
                "Unknown command {:?}. Try: t = take photo, p = pick image, s = play/pause sound, i = status, q = quit",
                trimmed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn test_parse_single_letter_commands() {
        assert_eq!(parse_command("t"), Some(ScreenCommand::TakePhoto));
        assert_eq!(parse_command("p"), Some(ScreenCommand::PickImage));
        assert_eq!(parse_command("s"), Some(ScreenCommand::ToggleSound));
        assert_eq!(parse_command("i"), Some(ScreenCommand::Status));
        assert_eq!(parse_command("q"), Some(ScreenCommand::Quit));
    }

    #[test]
    fn test_parse_word_aliases() {
        assert_eq!(parse_command("take"), Some(ScreenCommand::TakePhoto));
        assert_eq!(parse_command("library"), Some(ScreenCommand::PickImage));
        assert_eq!(parse_command("pause"), Some(ScreenCommand::ToggleSound));
        assert_eq!(parse_command("exit"), Some(ScreenCommand::Quit));
    }

    #[test]
    fn test_parse_ignores_case_and_whitespace() {
        assert_eq!(parse_command("  Photo  "), Some(ScreenCommand::TakePhoto));
        assert_eq!(parse_command("QUIT"), Some(ScreenCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("take photo now"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_forwarding_parses_lines_until_eof() {
        let (tx, mut rx) = mpsc::channel(10);

        forward_commands(Cursor::new("t\n\nbogus\n Q \n"), &tx);
        drop(tx);

        assert_eq!(rx.blocking_recv(), Some(ScreenCommand::TakePhoto));
        assert_eq!(rx.blocking_recv(), Some(ScreenCommand::Quit));
        assert_eq!(rx.blocking_recv(), None);
    }

    #[test]
    fn test_forwarding_returns_when_receiver_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        // Must return rather than sit on input nobody will read.
        forward_commands(Cursor::new("t\np\ns\n"), &tx);
    }
}
