// Console input loop - forwards parsed commands to the session
use crate::application::session::{ControlEvent, SessionEvent};
use crate::presentation::commands::{Command, HELP, parse_command};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

/// Read commands line by line until `quit`, end of input, or the session goes away.
pub async fn read_commands<R>(input: R, events: UnboundedSender<SessionEvent>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        let Some(line) = lines.next_line().await? else {
            tracing::debug!("Input closed, ending session");
            let _ = events.send(SessionEvent::Control(ControlEvent::Quit));
            return Ok(());
        };

        match parse_command(&line) {
            Ok(Command::Empty) => {}
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Control(control)) => {
                let quit = control == ControlEvent::Quit;
                if events.send(SessionEvent::Control(control)).is_err() || quit {
                    return Ok(());
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }
}
