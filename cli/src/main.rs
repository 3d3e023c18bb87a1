use std::borrow::Cow;
use rand::Rng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::CliError;
use crate::session::{Reply, Session};

mod commands;
mod config;
mod error;
mod logging;
mod session;

const BANNER: &str = "Spin the wheel! Type 'help' for commands.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(".env").ok();
    logging::setup()?;

    let config = Config::from_env().map_err(CliError::from)?;
    info!(
        "Starting with {}..={} options in play, resolving after {:?}",
        config.spin.min_selectable(),
        config.spin.max_selectable(),
        config.resolve_delay
    );

    let mut session = Session::from_config(&config);
    info!("Loaded {} options", session.list().len());
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    if let Err(e) = run(&mut session, stdin, &mut stdout).await {
        error!("Session ended with an error: {}", e);
        return Err(e.into());
    }
    Ok(())
}

/// Drives one session: reads commands from `input`, writes replies to
/// `output`, and owns the resolution timers. Each spin schedules its own
/// delayed resolution; only the newest ticket is ever applied.
///
/// When input ends while a spin is in flight the loop waits for it to land.
async fn run<R, I, W>(session: &mut Session<R>, mut input: I, output: &mut W) -> Result<(), CliError>
where
    R: Rng,
    I: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (resolved_tx, mut resolved_rx) = mpsc::unbounded_channel::<u64>();
    // read_until keeps partial bytes here if the other branch wins the select
    let mut buf = Vec::new();
    let mut input_open = true;

    write_line(output, BANNER).await?;
    write_line(output, &session.render()).await?;

    loop {
        if !input_open && !session.spin_state().is_spinning() {
            break;
        }

        tokio::select! {
            read = input.read_until(b'\n', &mut buf), if input_open => {
                if read? == 0 {
                    input_open = false;
                    if buf.is_empty() {
                        continue;
                    }
                }
                let line = decode_line(&buf);
                buf.clear();
                if line.trim().is_empty() {
                    continue;
                }
                match session.execute(&line) {
                    Ok(Reply::Text(text)) => write_line(output, &text).await?,
                    Ok(Reply::Spinning(ticket)) => {
                        write_line(output, "Spinning...").await?;
                        let resolved_tx = resolved_tx.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(ticket.resolve_after).await;
                            // receiver is gone once the session has ended
                            let _ = resolved_tx.send(ticket.generation);
                        });
                    }
                    Ok(Reply::Quit) => break,
                    Err(e) if e.is_recoverable() => write_line(output, &e.to_string()).await?,
                    Err(e) => return Err(e),
                }
            }
            Some(generation) = resolved_rx.recv() => {
                if let Some(message) = session.finish_spin(generation)? {
                    write_line(output, &message).await?;
                }
            }
        }
    }

    output.flush().await?;
    Ok(())
}

/// Invalid UTF-8 is replaced rather than ending the session.
fn decode_line(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(line) => line.to_string(),
        Cow::Owned(line) => {
            warn!("Input line was not valid UTF-8, replaced the bad bytes");
            line
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), CliError> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
