use anyhow::{anyhow, Result};
use crossterm::style::Stylize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tracing::warn;

use column_customizer::config::Config;
use column_customizer::logging::{init_tracing, LogRingBuffer};
use column_customizer::utils::app_paths::AppPaths;
use column_customizer::{
    ColumnCustomizer, ColumnOperationResult, DragOutcome, NoticeLog, StoredColumns,
};

mod leads;
mod table_display;

use leads::{lead_catalog, lead_defaults, sample_leads, Lead, LeadColumn, LEADS_TABLE};
use table_display::{display_leads, display_panel, highlight_matches, print_notice};

struct Session {
    engine: ColumnCustomizer<LeadColumn>,
    notices: NoticeLog,
    leads: Vec<Lead>,
    config: Config,
    logs: LogRingBuffer,
}

fn print_help() {
    println!("Column customizer - lead table");
    println!();
    println!("  show                 render the lead table");
    println!("  cols                 list columns with visibility and position");
    println!("  toggle <col>         show or hide a column");
    println!("  drag <col>           start dragging a visible column");
    println!("  hover <col>          hover the dragged column over a target");
    println!("  leave                leave the current target");
    println!("  drop <col>           drop the dragged column onto a target");
    println!("  cancel               cancel the drag");
    println!("  move <col> <target>  drag and drop in one step");
    println!("  left <col>           move a column one slot left");
    println!("  right <col>          move a column one slot right");
    println!("  reset                restore the default columns");
    println!("  only                 hide every column except the first");
    println!("  all                  show every column");
    println!("  find <text>          fuzzy search the column catalog");
    println!("  saved                print the stored column state as JSON");
    println!("  logs [n]             show recent log lines");
    println!("  help                 this help");
    println!("  quit                 exit");
    println!();
    println!("Columns can be named by key, header or a fuzzy fragment.");
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--generate-config") {
        let path = Config::get_config_path()?;
        Config::write_default_with_comments(&path)?;
        println!("Configuration file created at: {:?}", path);
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Could not load config ({:#}), using defaults", e);
        Config::default()
    });
    let logs = init_tracing(&config.logging.level);

    let storage = config.open_storage()?;
    let notices = NoticeLog::new();
    let engine = ColumnCustomizer::builder(LEADS_TABLE)
        .catalog(lead_catalog()?)
        .defaults(lead_defaults())
        .storage(storage)
        .subscriber(Box::new(notices.clone()))
        .build()?;

    let mut session = Session {
        engine,
        notices,
        leads: sample_leads(),
        config,
        logs,
    };

    print_help();
    println!();
    session.show();

    let history = match AppPaths::history_file() {
        Ok(path) => Some(
            FileBackedHistory::with_file(100, path)
                .map_err(|e| anyhow!("Error configuring history: {}", e))?,
        ),
        Err(e) => {
            warn!(target: "system", "No history file: {:#}", e);
            None
        }
    };

    let mut line_editor = Reedline::create();
    if let Some(history) = history {
        line_editor = line_editor.with_history(Box::new(history));
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("columns".to_string()),
        DefaultPromptSegment::Empty,
    );

    loop {
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if matches!(trimmed, "quit" | "exit" | "\\q") {
                    break;
                }
                if let Err(e) = session.execute(trimmed) {
                    eprintln!("{}", format!("Error: {:#}", e).red());
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nGoodbye!");
                break;
            }
        }
    }

    Ok(())
}

impl Session {
    fn execute(&mut self, line: &str) -> Result<()> {
        let mut parts = line.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or_default().trim();

        match command {
            "help" | "?" => print_help(),
            "show" => self.show(),
            "cols" => display_panel(&self.engine, self.config.display.use_color),
            "toggle" => {
                let key = self.column(arg)?;
                let result = self.engine.toggle_column(&key);
                self.report(result);
            }
            "reset" => {
                let result = self.engine.reset_to_default();
                self.report(result);
            }
            "only" => {
                let result = self.engine.hide_all_but_one();
                self.report(result);
            }
            "all" => {
                let result = self.engine.show_all();
                self.report(result);
            }
            "left" => {
                let key = self.column(arg)?;
                let result = self.engine.move_column_left(&key);
                self.report(result);
            }
            "right" => {
                let key = self.column(arg)?;
                let result = self.engine.move_column_right(&key);
                self.report(result);
            }
            "drag" => {
                let key = self.column(arg)?;
                let outcome = self.engine.begin_drag(&key);
                self.report_drag(outcome);
            }
            "hover" => {
                let key = self.column(arg)?;
                let outcome = self.engine.hover_target(&key);
                self.report_drag(outcome);
            }
            "leave" => {
                let outcome = self.engine.leave_target();
                self.report_drag(outcome);
            }
            "drop" => {
                let key = self.column(arg)?;
                let outcome = self.engine.drop_on(&key);
                self.report_drag(outcome);
            }
            "cancel" => {
                let outcome = self.engine.end_drag();
                self.report_drag(outcome);
            }
            "move" => {
                let mut names = arg.split_whitespace();
                let (from, to) = match (names.next(), names.next()) {
                    (Some(from), Some(to)) => (self.column(from)?, self.column(to)?),
                    _ => return Err(anyhow!("Usage: move <col> <target>")),
                };
                let started = self.engine.begin_drag(&from);
                if started == DragOutcome::Ignored {
                    self.report_drag(started);
                } else {
                    self.engine.hover_target(&to);
                    let outcome = self.engine.drop_on(&to);
                    self.report_drag(outcome);
                }
            }
            "find" => self.find(arg),
            "saved" => {
                let stored: StoredColumns = self.engine.state().to_stored();
                println!("{}", serde_json::to_string_pretty(&stored)?);
            }
            "logs" => {
                let count = if arg.is_empty() { 20 } else { arg.parse()? };
                for entry in self.logs.get_recent(count) {
                    println!("{}", entry.format_for_display());
                }
            }
            other => return Err(anyhow!("Unknown command '{}', try 'help'", other)),
        }

        Ok(())
    }

    fn column(&self, name: &str) -> Result<LeadColumn> {
        if name.is_empty() {
            return Err(anyhow!("Name a column"));
        }
        self.engine
            .catalog()
            .resolve(name)
            .copied()
            .ok_or_else(|| anyhow!("No column matches '{}'", name))
    }

    fn find(&self, pattern: &str) {
        let matches = self.engine.catalog().search(pattern);
        if matches.is_empty() {
            println!("No columns match '{}'", pattern);
            return;
        }
        for m in matches {
            let state = if self.engine.is_visible(&m.column.key) {
                "shown"
            } else {
                "hidden"
            };
            let header =
                highlight_matches(&m.column.header, &m.indices, self.config.display.use_color);
            println!("{:<14} {:>4}  {:<6}  {}", m.column.key, m.score, state, header);
        }
    }

    fn show(&self) {
        display_leads(
            &self.engine,
            &self.leads,
            self.config.display.show_row_numbers,
            self.config.display.max_rows,
            self.config.display.use_color,
        );
    }

    fn flush_notices(&self) {
        for notice in self.notices.drain() {
            print_notice(&notice, self.config.display.use_color);
        }
    }

    fn report(&self, result: ColumnOperationResult<LeadColumn>) {
        self.flush_notices();
        if result.event.is_none() {
            println!("{}", result.description);
        }
        if result.success {
            self.show();
        }
    }

    fn report_drag(&self, outcome: DragOutcome<LeadColumn>) {
        match outcome {
            DragOutcome::Reordered(result) => self.report(result),
            DragOutcome::Started(key) => println!("Dragging '{}'", key),
            DragOutcome::Hovering(key) => println!("Over '{}'", key),
            DragOutcome::Left => println!("Left the drop target"),
            DragOutcome::Cancelled => println!("Drag cancelled"),
            DragOutcome::Absorbed => println!("Drop ignored, column not visible"),
            DragOutcome::Ignored => println!("Nothing to do"),
        }
    }
}
