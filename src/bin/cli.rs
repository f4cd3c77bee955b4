use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use roster_tool::{
    Derivation, MonthKey, PersonId, Roster, Settings, ShiftType, TidySchedule, export_roster_to_csv,
    heatmap_path, load_roster_from_json, load_schedule_dir, save_roster_to_json, save_tidy_to_csv,
};

fn render_text_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, value) in row.iter().enumerate().take(columns) {
            widths[ci] = widths[ci].max(value.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, w) in widths.iter().enumerate() {
            let value = cells.get(ci).map(String::as_str).unwrap_or("");
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(w.saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_roster(roster: &Roster) -> String {
    let grid = roster.to_raw_grid();
    let Some((header, body)) = grid.rows().split_first() else {
        return String::new();
    };
    // padding rows carry no information on screen
    let body: Vec<Vec<String>> = body
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .cloned()
        .collect();
    format!("Roster {}\n{}", roster.month(), render_text_table(header, &body))
}

fn describe_derivation(derivation: &Derivation) -> String {
    match derivation {
        Derivation::Assigned { date, person } => format!("Assigned POST {date} to {person}."),
        Derivation::Cleared { date } => format!("Cleared POST {date}."),
        Derivation::Unchanged { date } => format!("POST {date} unchanged."),
        Derivation::OutOfRange => {
            "Next business day is outside this roster; POST not derived.".to_string()
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load [dir]                         Load schedule CSVs (default: schedules dir)\n  day <YYYY-MM-DD>                   Show who works which shift on a date\n  dates                              List dates present in the loaded schedule\n  tidy save <path>                   Write the tidy table as CSV\n  roster new <year> <month>          Start a blank roster for a month\n  roster show                        Show the roster grid\n  set <YYYY-MM-DD> <SHIFT> <PERSON>  Fill a roster cell (CALL also fills next POST)\n  clear <YYYY-MM-DD> <SHIFT>         Empty a roster cell\n  roster export <path>               Write the roster as a weekly-block CSV\n  roster save <path>                 Save the roster as JSON\n  roster load <path>                 Load a roster from JSON\n  heatmap <MMYY>                     Show the heatmap image path for a month\n  quit|exit                          Exit"
    );
}

fn load_into(schedule: &mut TidySchedule, dir: &Path) {
    match load_schedule_dir(dir) {
        Ok(report) => {
            for failure in &report.failures {
                println!("Skipped {}: {}", failure.path.display(), failure.error);
            }
            for (path, diagnostic) in &report.diagnostics {
                println!("Warning {}: {}", path.display(), diagnostic);
            }
            println!(
                "Loaded {} file(s), {} record(s) from {}.",
                report.loaded.len(),
                report.schedule.height(),
                dir.display()
            );
            *schedule = report.schedule;
        }
        Err(e) => println!("Error: cannot read {}: {}", dir.display(), e),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let mut schedule = TidySchedule::empty();
    let mut roster: Option<Roster> = None;

    println!("Roster Tool (CLI) - type 'help' for commands\n");

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
            "load" => {
                let dir = parts
                    .next()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| settings.schedules_dir.clone());
                load_into(&mut schedule, &dir);
            }
            "day" => {
                let Some(date) = parts.next().and_then(parse_date) else {
                    println!("Usage: day <YYYY-MM-DD>");
                    continue;
                };
                match schedule.for_date(date) {
                    Ok(entries) if entries.is_empty() => {
                        println!("No schedule found for {date}.")
                    }
                    Ok(entries) => {
                        let headers = ["shift", "person", "holiday"].map(String::from);
                        let rows: Vec<Vec<String>> = entries
                            .iter()
                            .map(|e| {
                                vec![
                                    e.shift.to_string(),
                                    e.person.to_string(),
                                    if e.is_holiday { "yes" } else { "" }.to_string(),
                                ]
                            })
                            .collect();
                        println!("{date}\n{}", render_text_table(&headers, &rows));
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "dates" => match schedule.dates() {
                Ok(dates) if dates.is_empty() => println!("No schedule loaded."),
                Ok(dates) => {
                    for date in dates {
                        println!("{date}");
                    }
                }
                Err(e) => println!("Error: {e}"),
            },
            "tidy" => match (parts.next(), parts.next()) {
                (Some("save"), Some(path)) => match save_tidy_to_csv(&schedule, path) {
                    Ok(()) => println!("Tidy table saved to {path}."),
                    Err(e) => println!("Error: {e}"),
                },
                _ => println!("Usage: tidy save <path>"),
            },
            "roster" => match (parts.next(), parts.next(), parts.next()) {
                (Some("new"), Some(year), Some(month)) => {
                    let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) else {
                        println!("Usage: roster new <year> <month>");
                        continue;
                    };
                    match MonthKey::new(year, month) {
                        Ok(key) => {
                            let fresh = Roster::new(key);
                            println!("{}", render_roster(&fresh));
                            roster = Some(fresh);
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                (Some("show"), _, _) => match &roster {
                    Some(r) => println!("{}", render_roster(r)),
                    None => println!("No roster. Use 'roster new <year> <month>'."),
                },
                (Some("load"), Some(path), _) => match load_roster_from_json(path) {
                    Ok(loaded) => {
                        println!("Roster loaded from {path}.\n{}", render_roster(&loaded));
                        roster = Some(loaded);
                    }
                    Err(e) => println!("Error: {e}"),
                },
                (Some(action @ ("save" | "export")), Some(path), _) => {
                    let Some(r) = &roster else {
                        println!("No roster. Use 'roster new <year> <month>'.");
                        continue;
                    };
                    let result = if action == "save" {
                        save_roster_to_json(r, path)
                    } else {
                        export_roster_to_csv(r, path)
                    };
                    match result {
                        Ok(()) if action == "save" => println!("Roster saved to {path}."),
                        Ok(()) => println!("Roster exported to {path}."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!(
                    "Usage: roster new <year> <month> | roster show | roster export|save|load <path>"
                ),
            },
            "set" | "clear" => {
                let date = parts.next().and_then(parse_date);
                let shift = parts.next().and_then(ShiftType::parse);
                // names may contain spaces: the rest of the line is the person
                let rest = parts.by_ref().collect::<Vec<_>>().join(" ");
                let person = if cmd == "set" {
                    if rest.is_empty() {
                        println!("Usage: set <YYYY-MM-DD> <SHIFT> <PERSON>");
                        continue;
                    }
                    match PersonId::new(&rest) {
                        Ok(person) => Some(person),
                        Err(e) => {
                            println!("Error: {e}");
                            continue;
                        }
                    }
                } else {
                    if !rest.is_empty() {
                        println!("Usage: clear <YYYY-MM-DD> <SHIFT>");
                        continue;
                    }
                    None
                };
                let (Some(date), Some(shift)) = (date, shift) else {
                    if cmd == "set" {
                        println!("Usage: set <YYYY-MM-DD> <SHIFT> <PERSON>");
                    } else {
                        println!("Usage: clear <YYYY-MM-DD> <SHIFT>");
                    }
                    continue;
                };
                let Some(r) = roster.as_mut() else {
                    println!("No roster. Use 'roster new <year> <month>'.");
                    continue;
                };
                match r.assign(date, &shift, person) {
                    Ok(derivation) => {
                        println!("{shift} {date} {cmd}.");
                        if let Some(derivation) = derivation {
                            println!("{}", describe_derivation(&derivation));
                        }
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "heatmap" => {
                let Some(key) = parts.next() else {
                    println!("Usage: heatmap <MMYY>");
                    continue;
                };
                match heatmap_path(&settings.heatmaps_dir, key) {
                    Ok(path) => println!("Heatmap: {}", path.display()),
                    Err(e) => println!("Error: {e}"),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
