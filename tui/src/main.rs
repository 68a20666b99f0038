//! Interactive terminal front-end: the display owner of the pipeline

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode};
use crossterm::execute;
use ratatui::{
	layout::{Constraint, Direction, Layout},
	style::{Color, Modifier, Style},
	text::{Line, Span},
	widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
	Frame,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use filecab::{
	EngineEvent, EngineHandles, Granularity, Organizer, OrganizerEngine, RenderSnapshot, RunState,
};

#[derive(Parser)]
#[command(version, about = "Organize files by timestamp into dated directories")]
struct Opts {
	/// Directory containing files to organize
	#[arg(short, long)]
	dir: PathBuf,
	/// Organize files by year
	#[arg(short = 'y', long)]
	year: bool,
	/// Organize files by month within each year
	#[arg(short = 'm', long)]
	month: bool,
}

fn main() -> ExitCode {
	let opts = Opts::parse();

	// Tracing goes to a file (non-blocking); the terminal belongs to ratatui.
	let log_dir = filecab::paths::default_log_dir()
		.unwrap_or_else(|| std::env::temp_dir().join("filecab"));
	let _ = std::fs::create_dir_all(&log_dir);
	let log_path = log_dir.join("tui.log");
	let file = std::fs::File::create(&log_path).expect("open log file");
	let (nb, guard) = tracing_appender::non_blocking(file);

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(nb))
		.with(env_filter)
		.init();

	info!("starting filecab TUI");

	if !opts.dir.is_dir() {
		eprintln!("error: {} is not a directory", opts.dir.display());
		return ExitCode::FAILURE;
	}
	let granularity = Granularity::from_flags(opts.year, opts.month);

	// The display must come up before the producer starts mutating the tree;
	// without it there is nowhere to show progress.
	let mut terminal = match ratatui::try_init() {
		Ok(t) => t,
		Err(e) => {
			eprintln!("error: failed to start display: {e}");
			return ExitCode::FAILURE;
		}
	};
	let _ = execute!(std::io::stdout(), crossterm::event::EnableMouseCapture);

	let handles = OrganizerEngine::start(Organizer::new(&opts.dir, granularity));
	let outcome = run(&mut terminal, &handles, &opts.dir, granularity);

	let _ = execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
	ratatui::restore();

	// Flush the appender before printing the closing lines.
	drop(guard);

	match outcome {
		Ok(Outcome::Completed(view)) => {
			println!(
				"Files have been organized: {} moved, {} failed, {} total under {}",
				view.processed_files,
				view.failed_moves,
				view.total_files,
				opts.dir.display()
			);
			println!("Log file: {}", log_path.display());
			ExitCode::SUCCESS
		}
		Ok(Outcome::Quit) => {
			println!("Interrupted; files already moved stay in place.");
			ExitCode::SUCCESS
		}
		Ok(Outcome::Failed(msg)) => {
			eprintln!("error: {msg}");
			ExitCode::FAILURE
		}
		Err(e) => {
			eprintln!("error: {e}");
			ExitCode::FAILURE
		}
	}
}

enum Outcome {
	/// Run drained to completion; the final view is fully up to date.
	Completed(RenderSnapshot),
	/// The walk aborted on a structural error.
	Failed(String),
	/// User quit before the run finished.
	Quit,
}

fn run(
	terminal: &mut ratatui::DefaultTerminal,
	handles: &EngineHandles,
	root: &Path,
	granularity: Granularity,
) -> std::io::Result<Outcome> {
	debug!("TUI loop start");

	let mut view = RenderSnapshot::default().with_status("Counting files...");
	let mut table_state = TableState::default();
	let mut selected: usize = 0;
	let mut fatal: Option<String> = None;

	loop {
		for action in handle_events()? {
			match action {
				Action::Quit => {
					info!("quit requested");
					return Ok(Outcome::Quit);
				}
				Action::Up => {
					selected = selected.saturating_sub(1);
					table_state.select(Some(selected));
				}
				Action::Down => {
					if selected + 1 < view.rows.len() {
						selected += 1;
					}
					table_state.select(Some(selected));
				}
			}
		}

		// Execute queued render jobs strictly in submission order. Each job
		// fully replaces the view before the next one is taken, and nothing
		// else ever touches the display.
		while let Ok(job) = handles.jobs.try_recv() {
			view = job.into_snapshot();
			handles.sync.job_completed();
		}

		while let Ok(evt) = handles.events.try_recv() {
			match evt {
				EngineEvent::Started => debug!("engine started"),
				EngineEvent::Completed => debug!("engine completed"),
				EngineEvent::Error(msg) => {
					debug!("engine error: {msg}");
					fatal = Some(msg);
				}
			}
		}

		terminal.draw(|f| draw(f, &view, root, granularity, &mut table_state))?;

		// Only stop once every job submitted before the producer finished has
		// executed; the drawn frame above already includes the last of them.
		if handles.sync.state() == RunState::Stopped {
			return Ok(match fatal.take() {
				Some(msg) => Outcome::Failed(msg),
				None => Outcome::Completed(view),
			});
		}
	}
}

#[derive(Debug, Clone, Copy)]
enum Action {
	Quit,
	Up,
	Down,
}

fn handle_events() -> std::io::Result<Vec<Action>> {
	let mut actions = Vec::new();
	// Wait briefly for at least one event, then drain the rest without
	// waiting.
	if event::poll(Duration::from_millis(10))? {
		loop {
			match event::read()? {
				Event::Key(key) => {
					let action = match key.code {
						KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
						KeyCode::Up => Some(Action::Up),
						KeyCode::Down => Some(Action::Down),
						_ => None,
					};
					if let Some(a) = action {
						actions.push(a);
					}
				}
				Event::Mouse(me) => {
					use crossterm::event::MouseEventKind;
					match me.kind {
						MouseEventKind::ScrollUp => actions.push(Action::Up),
						MouseEventKind::ScrollDown => actions.push(Action::Down),
						_ => {}
					}
				}
				Event::Resize(_, _) => {
					// ignore
				}
				_ => {}
			}
			// drain without blocking
			if !event::poll(Duration::from_millis(0))? {
				break;
			}
		}
	}
	Ok(actions)
}

fn draw(
	frame: &mut Frame,
	view: &RenderSnapshot,
	root: &Path,
	granularity: Granularity,
	table_state: &mut TableState,
) {
	let chunks = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Length(3), // header
			Constraint::Min(5),    // bucket table
			Constraint::Length(4), // status footer
			Constraint::Length(1), // keybinding hints
		])
		.split(frame.area());

	let header = Paragraph::new(Line::from(vec![
		Span::styled("filecab", Style::default().fg(Color::Cyan)),
		Span::raw("  |  "),
		Span::raw(root.display().to_string()),
		Span::raw("  |  "),
		Span::raw(granularity.to_string()),
		Span::raw("  |  Total: "),
		Span::raw(view.total_files.to_string()),
	]))
	.block(Block::default().borders(Borders::ALL).title("Summary"));
	frame.render_widget(header, chunks[0]);

	let header_row = Row::new(vec![Cell::from("Directory"), Cell::from("Files")])
		.style(Style::default().add_modifier(Modifier::BOLD));
	let rows: Vec<Row> = view
		.rows
		.iter()
		.map(|row| {
			let (label, style) = if row.indent {
				(format!("  {}", row.label), Style::default().fg(Color::Blue))
			} else {
				(row.label.clone(), Style::default().fg(Color::Green))
			};
			Row::new(vec![
				Cell::from(label).style(style),
				Cell::from(row.count.to_string()),
			])
		})
		.collect();
	let table = Table::new(rows, [Constraint::Percentage(75), Constraint::Percentage(25)])
		.header(header_row)
		.row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
		.block(Block::default().borders(Borders::ALL).title("Buckets"));
	frame.render_stateful_widget(table, chunks[1], table_state);

	let mut status_lines = vec![Line::from(vec![
		Span::styled("Processed: ", Style::default().fg(Color::Green)),
		Span::raw(view.processed_files.to_string()),
		Span::styled("  Failed: ", Style::default().fg(Color::Red)),
		Span::raw(view.failed_moves.to_string()),
		Span::raw(format!("  Pending: {}", view.pending_files)),
	])];
	if !view.status.is_empty() {
		status_lines.push(Line::from(Span::raw(view.status.clone())));
	}
	let footer =
		Paragraph::new(status_lines).block(Block::default().borders(Borders::ALL).title("Status"));
	frame.render_widget(footer, chunks[2]);

	let hints = Paragraph::new(Line::from(vec![
		Span::styled(
			"Keys: ",
			Style::default()
				.fg(Color::Yellow)
				.add_modifier(Modifier::BOLD),
		),
		Span::styled(
			"q",
			Style::default()
				.fg(Color::Green)
				.add_modifier(Modifier::BOLD),
		),
		Span::raw(" quit  "),
		Span::styled(
			"↑/↓",
			Style::default()
				.fg(Color::Green)
				.add_modifier(Modifier::BOLD),
		),
		Span::raw(" scroll"),
	]))
	.style(Style::default().bg(Color::Black).fg(Color::White));
	frame.render_widget(hints, chunks[3]);
}
