use std::fs;
use std::io::{self, Write};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use compass_progress::calendar::{self, Quarter};
use compass_progress::week;
use compass_progress::{
    GoalSnapshot, ProgressConfig, ProgressReport, StatusThresholds, accept_plan, load_config,
    load_snapshot_from_json, load_todos_from_csv, parse_planning_reply, save_config,
    save_snapshot_to_json,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  today [YYYY-MM-DD]                 Show or pin the date used as 'now'\n  load json <path>                   Load a goal snapshot\n  load csv <path>                    Append todos to the loaded goal\n  show                               Show the loaded goal\n  progress                           Goal progress summary\n  milestones                         Milestone progress table\n  quarter <month>                    Quarter of a month (1-12)\n  quarter range <year> <1-4>         First and last day of a quarter\n  days <YYYY-MM-DD>                  Days until a date\n  week <YYYY-MM-DD>                  Check-in week containing a date\n  thresholds [<on> <risk>]           Show or set status tolerances\n  config show|load <path>|save <path>\n                                     Inspect or persist settings\n  plan <path>                        Accept suggestions from a planning reply\n  save json <path>                   Write the loaded goal snapshot\n  quit|exit                          Exit"
    );
}

fn parse_date_arg(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| calendar::parse_date(v).ok())
}

struct Session {
    config: ProgressConfig,
    snapshot: Option<GoalSnapshot>,
    today: Option<NaiveDate>,
}

impl Session {
    fn now(&self) -> DateTime<Utc> {
        match self.today {
            // pinned days are evaluated at noon UTC
            Some(day) => day
                .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
                .and_utc(),
            None => Utc::now(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn report(&self) -> Option<ProgressReport> {
        self.snapshot
            .as_ref()
            .map(|snapshot| ProgressReport::build(snapshot, self.now(), &self.config.thresholds))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut session = Session {
        config: ProgressConfig::default(),
        snapshot: None,
        today: None,
    };

    println!("Goal Progress (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "today" => match parts.next() {
                Some(raw) => match calendar::parse_date(raw) {
                    Ok(day) => {
                        session.today = Some(day);
                        println!("Today is {}", calendar::format_date(day));
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Today is {}", calendar::format_date(session.today())),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_snapshot_from_json(path) {
                    Ok(snapshot) => {
                        println!(
                            "Loaded goal '{}' ({} milestones, {} todos)",
                            snapshot.goal.title,
                            snapshot.milestones.len(),
                            snapshot.todos.len()
                        );
                        session.snapshot = Some(snapshot);
                    }
                    Err(e) => println!("Load error: {}", e),
                },
                (Some("csv"), Some(path)) => {
                    let now = session.now();
                    let Some(snapshot) = session.snapshot.as_mut() else {
                        println!("No goal loaded. Use 'load json <path>' first.");
                        continue;
                    };
                    match load_todos_from_csv(path, snapshot.goal.id, now) {
                        Ok(todos) => {
                            println!("Imported {} todos", todos.len());
                            snapshot.todos.extend(todos);
                        }
                        Err(e) => println!("Load error: {}", e),
                    }
                }
                _ => println!("Usage: load json|csv <path>"),
            },
            "show" => {
                let today = session.today();
                match session.snapshot.as_ref() {
                    Some(snapshot) => {
                        let goal = &snapshot.goal;
                        let done = snapshot.todos.iter().filter(|t| t.completed).count();
                        println!("Goal: {}", goal.title);
                        println!(
                            "Target: {} ({} days)",
                            calendar::format_date(goal.target_date),
                            calendar::days_until(goal.target_date, today)
                        );
                        println!("Stored status: {}", goal.status.label());
                        println!("Milestones: {}", snapshot.milestones.len());
                        println!("Todos: {}/{} completed", done, snapshot.todos.len());
                    }
                    None => println!("No goal loaded."),
                }
            }
            "progress" => match session.report() {
                Some(report) => println!("Progress ({})", report.to_cli_summary()),
                None => println!("No goal loaded."),
            },
            "milestones" => match session.report() {
                Some(report) if report.milestones.is_empty() => println!("No milestones."),
                Some(report) => println!("{}", report.render_table()),
                None => println!("No goal loaded."),
            },
            "quarter" => match parts.next() {
                Some("range") => {
                    let year = parts.next().and_then(|v| v.parse::<i32>().ok());
                    let quarter = parts.next().and_then(|v| v.parse::<u8>().ok());
                    match (year, quarter) {
                        (Some(year), Some(quarter)) => {
                            match (
                                calendar::quarter_start_date(year, quarter),
                                calendar::quarter_end_date(year, quarter),
                            ) {
                                (Ok(start), Ok(end)) => println!(
                                    "{} {}: {} .. {}",
                                    calendar::quarter_label(quarter),
                                    year,
                                    start,
                                    end
                                ),
                                (Err(e), _) | (_, Err(e)) => println!("Error: {}", e),
                            }
                        }
                        _ => println!("Usage: quarter range <year> <1-4>"),
                    }
                }
                Some(raw) => match raw.parse::<u32>().ok().and_then(Quarter::from_month) {
                    Some(quarter) => {
                        let months: Vec<&str> = quarter
                            .months()
                            .iter()
                            .filter_map(|m| calendar::month_name(*m))
                            .collect();
                        println!("{} ({})", quarter, months.join(", "));
                    }
                    None => println!("Invalid month (1-12)"),
                },
                None => println!("Usage: quarter <month> | quarter range <year> <1-4>"),
            },
            "days" => match parse_date_arg(parts.next()) {
                Some(target) => {
                    let days = calendar::days_until(target, session.today());
                    if calendar::is_overdue(target, session.today()) {
                        println!("{} days (overdue)", days);
                    } else {
                        println!("{} days", days);
                    }
                }
                None => println!("Usage: days <YYYY-MM-DD>"),
            },
            "week" => match parse_date_arg(parts.next()) {
                Some(date) => {
                    let start = week::week_start(date, session.config.week_starts_on);
                    let current =
                        week::is_current_week(start, session.today(), session.config.week_starts_on);
                    println!(
                        "{}{}",
                        week::format_week_range(start),
                        if current { " (current)" } else { "" }
                    );
                }
                None => println!("Usage: week <YYYY-MM-DD>"),
            },
            "thresholds" => match (parts.next(), parts.next()) {
                (None, _) => {
                    let t = session.config.thresholds;
                    println!(
                        "on_track_tolerance={} at_risk_tolerance={}",
                        t.on_track_tolerance, t.at_risk_tolerance
                    );
                }
                (Some(on_s), Some(risk_s)) => match (on_s.parse::<u8>(), risk_s.parse::<u8>()) {
                    (Ok(on), Ok(risk)) => match StatusThresholds::new(on, risk) {
                        Ok(thresholds) => {
                            session.config.thresholds = thresholds;
                            println!("Thresholds set.");
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                    _ => println!("Invalid tolerance (0-255)"),
                },
                _ => println!("Usage: thresholds [<on> <risk>]"),
            },
            "config" => match (parts.next(), parts.next()) {
                (Some("show"), _) => match serde_json::to_string_pretty(&session.config) {
                    Ok(json) => println!("{}", json),
                    Err(e) => println!("Error: {}", e),
                },
                (Some("load"), Some(path)) => match load_config(path) {
                    Ok(config) => {
                        session.config = config;
                        println!("Config loaded.");
                    }
                    Err(e) => println!("Config error: {}", e),
                },
                (Some("save"), Some(path)) => match save_config(&session.config, path) {
                    Ok(()) => println!("Config saved."),
                    Err(e) => println!("Config error: {}", e),
                },
                _ => println!("Usage: config show|load <path>|save <path>"),
            },
            "plan" => {
                let Some(path) = parts.next() else {
                    println!("Usage: plan <path>");
                    continue;
                };
                let now = session.now();
                let Some(snapshot) = session.snapshot.as_mut() else {
                    println!("No goal loaded. Use 'load json <path>' first.");
                    continue;
                };
                let text = match fs::read_to_string(path) {
                    Ok(text) => text,
                    Err(e) => {
                        println!("Plan error: {}", e);
                        continue;
                    }
                };
                let reply = parse_planning_reply(&text);
                println!("{}", reply.message);
                if reply.suggested_milestones.is_empty() && reply.suggested_todos.is_empty() {
                    println!("No suggestions to accept.");
                    continue;
                }
                match accept_plan(
                    snapshot.goal.id,
                    &reply.suggested_milestones,
                    &reply.suggested_todos,
                    now,
                ) {
                    Ok(plan) => {
                        println!(
                            "Accepted {} milestones and {} todos ({} unlinked)",
                            plan.milestones.len(),
                            plan.todos.len(),
                            plan.unlinked_todos
                        );
                        snapshot.milestones.extend(plan.milestones);
                        snapshot.todos.extend(plan.todos);
                    }
                    Err(e) => println!("Plan error: {}", e),
                }
            }
            "save" => match (parts.next(), parts.next(), session.snapshot.as_ref()) {
                (Some("json"), Some(_), None) => println!("No goal loaded."),
                (Some("json"), Some(path), Some(snapshot)) => {
                    match save_snapshot_to_json(snapshot, path) {
                        Ok(()) => println!("Saved goal snapshot."),
                        Err(e) => println!("Save error: {}", e),
                    }
                }
                _ => println!("Usage: save json <path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
