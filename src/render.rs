use crossterm::cursor::MoveToColumn;
use crossterm::style::Stylize;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{QueueableCommand, queue};
use serde_json::json;
use std::io::{self, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

use crate::matcher::Progress;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FALLBACK_WIDTH: usize = 80;

#[derive(Clone, Debug)]
pub enum UiEvent {
    Heard(String),
    Progress(Progress),
    Phrase {
        index: usize,
        total: usize,
        progress: Progress,
    },
    Completed {
        phrase: String,
        elapsed: Duration,
    },
    Finished(String),
    Tick,
}

#[derive(Clone)]
pub struct Ui {
    tx: flume::Sender<UiEvent>,
}

impl Ui {
    pub fn new() -> (Self, flume::Receiver<UiEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, rx)
    }

    pub fn show_heard(&self, text: &str) {
        let _ = self.tx.send(UiEvent::Heard(text.to_string()));
    }

    pub fn show_progress(&self, progress: Progress) {
        let _ = self.tx.send(UiEvent::Progress(progress));
    }

    pub fn start_phrase(&self, index: usize, total: usize, progress: Progress) {
        let _ = self.tx.send(UiEvent::Phrase {
            index,
            total,
            progress,
        });
    }

    pub fn completed(&self, phrase: &str, elapsed: Duration) {
        let _ = self.tx.send(UiEvent::Completed {
            phrase: phrase.to_string(),
            elapsed,
        });
    }

    pub fn finished(&self, summary: String) {
        let _ = self.tx.send(UiEvent::Finished(summary));
    }

    pub fn tick(&self) {
        let _ = self.tx.send(UiEvent::Tick);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: bool,
    pub show_heard: bool,
    pub json: bool,
}

pub struct Renderer<W: Write> {
    out: W,
    options: RenderOptions,
    current: Option<Progress>,
    frame: usize,
}

impl Renderer<io::Stdout> {
    pub fn stdout(options: RenderOptions) -> Self {
        Self::new(io::stdout(), options)
    }
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self {
            out,
            options,
            current: None,
            frame: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn handle(&mut self, event: UiEvent) -> io::Result<()> {
        if self.options.json {
            return self.handle_json(event);
        }
        match event {
            UiEvent::Heard(text) => {
                if !self.options.show_heard {
                    return Ok(());
                }
                self.clear_line()?;
                let line = truncate_to_width(&format!("  heard: {}", text), terminal_width());
                if self.options.color {
                    writeln!(self.out, "{}", line.dark_grey())?;
                } else {
                    writeln!(self.out, "{}", line)?;
                }
                self.draw_progress()?;
            }
            UiEvent::Progress(progress) => {
                self.current = Some(progress);
                self.draw_progress()?;
            }
            UiEvent::Phrase {
                index,
                total,
                progress,
            } => {
                self.clear_line()?;
                writeln!(self.out, "\nAffirmation {} of {}:", index, total)?;
                self.current = Some(progress);
                self.draw_progress()?;
            }
            UiEvent::Completed { phrase, elapsed } => {
                self.clear_line()?;
                let line = format!("✓ {} ({:.1}s)", phrase, elapsed.as_secs_f64());
                if self.options.color {
                    writeln!(self.out, "{}", line.green().bold())?;
                } else {
                    writeln!(self.out, "{}", line)?;
                }
                self.current = None;
            }
            UiEvent::Finished(summary) => {
                self.clear_line()?;
                write!(self.out, "\n{}", summary)?;
                self.current = None;
            }
            UiEvent::Tick => {
                self.frame += 1;
                if self.current.is_none() {
                    return Ok(());
                }
                self.draw_progress()?;
            }
        }
        self.out.flush()
    }

    fn handle_json(&mut self, event: UiEvent) -> io::Result<()> {
        let value = match event {
            UiEvent::Progress(progress) => json!({ "event": "progress", "progress": progress }),
            UiEvent::Phrase {
                index,
                total,
                progress,
            } => json!({
                "event": "phrase",
                "index": index,
                "total": total,
                "progress": progress,
            }),
            UiEvent::Completed { phrase, elapsed } => json!({
                "event": "completed",
                "phrase": phrase,
                "elapsed_ms": u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            }),
            UiEvent::Finished(summary) => json!({ "event": "finished", "summary": summary }),
            UiEvent::Heard(_) | UiEvent::Tick => return Ok(()),
        };
        writeln!(self.out, "{}", value)?;
        self.out.flush()
    }

    fn clear_line(&mut self) -> io::Result<()> {
        if self.options.color {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }
        Ok(())
    }

    fn draw_progress(&mut self) -> io::Result<()> {
        let Some(progress) = &self.current else {
            return Ok(());
        };
        let spoken = progress.spoken.join(" ");
        let pending = progress.pending.join(" ");
        let counter = format!("({}/{})", progress.active, progress.total);

        if !self.options.color {
            // plain output is line-oriented; no redraw in place
            writeln!(self.out, "{} {} | {}", counter, spoken, pending)?;
            return Ok(());
        }

        let spinner = SPINNER[self.frame % SPINNER.len()];
        let counter = format!("{} {:.0}%", counter, progress.fraction() * 100.0);
        self.out
            .queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?;
        write!(
            self.out,
            "{} {} {}",
            spinner.yellow(),
            counter.dark_grey(),
            spoken.as_str().green().bold()
        )?;
        if !pending.is_empty() {
            let sep = if spoken.is_empty() { "" } else { " " };
            write!(self.out, "{}{}", sep, pending.dim())?;
        }
        Ok(())
    }
}

fn terminal_width() -> usize {
    terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            // make room for the ellipsis
            while used + 1 > width {
                match out.pop() {
                    Some(p) => used -= p.width().unwrap_or(0),
                    None => return out,
                }
            }
            out.push('…');
            return out;
        }
        used += w;
        out.push(c);
    }
    out
}
