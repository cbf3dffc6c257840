use std::{env, process};

use getopts::{Matches, Options};
use serde_json::Value;

use timetable_client::{
    input::parse_weeks,
    view::{render_course_table, render_grid, render_header},
    ApiClient, App, Error, Result,
};
use timetable_grid::{CourseInput, SettingsInput};

const DEFAULT_SERVER: &str = "http://127.0.0.1:7055";

const COMMANDS: &str = "\
Commands:
    show                Print the timetable of the current or given week
    courses             List all courses
    add                 Create a course from the course options
    edit ID             Change the given course options of course ID
    delete ID           Delete course ID
    settings            Print settings, or change them with the settings options
    current-week        Print the current week number
    export FILE         Write all data to FILE
    import FILE         Replace all data with the contents of FILE";

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "s",
        "server",
        "Base URL of the timetable server [Default: $TIMETABLE_SERVER or http://127.0.0.1:7055]",
        "URL",
    );
    opts.optopt("w", "week", "Week to show", "WEEK");

    opts.optopt("", "title", "Course title", "TEXT");
    opts.optopt("", "teacher", "Course teacher", "TEXT");
    opts.optopt("", "location", "Course location", "TEXT");
    opts.optopt("", "weekday", "Day of the week, Monday = 1", "1-7");
    opts.optopt("", "start", "Start time", "HH:MM");
    opts.optopt("", "end", "End time", "HH:MM");
    opts.optopt("", "weeks", "Comma separated week numbers", "LIST");
    opts.optopt("", "color", "Block color", "COLOR");
    opts.optopt("", "remark", "Free-form remark", "TEXT");

    opts.optopt("", "semester", "Semester name", "TEXT");
    opts.optopt("", "first-monday", "Monday of week 1", "YYYY-MM-DD");
    opts.optopt("", "day-start", "First slot of the day", "HH:MM");
    opts.optopt("", "day-end", "End of the day", "HH:MM");
    opts.optopt("", "interval", "Slot length in minutes", "MINUTES");
    opts
}

fn setup_logging() {
    if env::var("TIMETABLE_CLIENT_LOG").is_err() {
        env::set_var("TIMETABLE_CLIENT_LOG", "timetable_client=info");
    }

    pretty_env_logger::init_custom_env("TIMETABLE_CLIENT_LOG");
}

#[tokio::main]
async fn main() {
    setup_logging();

    let opts = opts();
    let matches = match opts.parse(env::args().skip(1)) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") || matches.free.is_empty() {
        let brief = opts.short_usage(env!("CARGO_PKG_NAME")) + " COMMAND [ARGS]";
        println!("{}\n{COMMANDS}", opts.usage(&brief));
        process::exit(0);
    }

    let server = matches
        .opt_str("server")
        .or_else(|| env::var("TIMETABLE_SERVER").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    if let Err(err) = run(ApiClient::new(server), &matches).await {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

async fn run(api: ApiClient, matches: &Matches) -> Result<()> {
    let command = matches.free[0].as_str();
    let argument = matches.free.get(1).map(String::as_str);

    match command {
        "show" => {
            let mut app = App::bootstrap(api).await?;
            if let Some(week) = matches.opt_str("week") {
                let week = week
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| Error::Input(format!("invalid week: {week}")))?;
                app.select_week(week).await?;
            }

            print!("{}", render_header(app.state()));
            print!("{}", render_grid(&app.state().grid()));
        }

        "courses" => print!("{}", render_course_table(&api.courses().await?)),

        "add" => {
            let mut app = App::bootstrap(api).await?;
            let input = course_input(CourseInput::default(), matches)?;
            let course = app.save_course(None, &input).await?;
            println!("Created course #{}", course.id);
            print!("{}", render_course_table(&app.state().courses));
        }

        "edit" => {
            let id = course_id(argument)?;
            let mut app = App::bootstrap(api).await?;
            let existing = app
                .state()
                .courses
                .iter()
                .find(|course| course.id == id)
                .ok_or_else(|| Error::Input(format!("no course with id {id}")))?;

            let input = course_input(CourseInput::from(existing), matches)?;
            app.save_course(Some(id), &input).await?;
            println!("Updated course #{id}");
            print!("{}", render_course_table(&app.state().courses));
        }

        "delete" => {
            let id = course_id(argument)?;
            let mut app = App::bootstrap(api).await?;
            app.delete_course(id).await?;
            println!("Deleted course #{id}");
            print!("{}", render_course_table(&app.state().courses));
        }

        "settings" => {
            let mut app = App::bootstrap(api).await?;
            let current = SettingsInput::from(&app.state().settings);
            let input = settings_input(current.clone(), matches)?;
            if input != current {
                app.save_settings(&input).await?;
            }
            println!("{}", serde_json::to_string_pretty(&app.state().settings)?);
        }

        "current-week" => println!("{}", api.current_week().await?),

        "export" => {
            let path = argument.ok_or_else(|| Error::Input("export needs a FILE".into()))?;
            let snapshot = api.export().await?;
            tokio::fs::write(path, serde_json::to_string_pretty(&snapshot)?).await?;
            println!(
                "Exported {} course(s) to {path}",
                snapshot.courses.len()
            );
        }

        "import" => {
            let path = argument.ok_or_else(|| Error::Input("import needs a FILE".into()))?;
            let raw = tokio::fs::read(path).await?;
            let snapshot: Value = serde_json::from_slice(&raw)?;
            let mut app = App::bootstrap(api).await?;
            let summary = app.import(&snapshot).await?;
            println!("Imported {} course(s)", summary.courses);
            print!("{}", render_header(app.state()));
        }

        other => return Err(Error::Input(format!("unknown command: {other}"))),
    }

    Ok(())
}

fn course_id(argument: Option<&str>) -> Result<u64> {
    let argument = argument.ok_or_else(|| Error::Input("missing course ID".into()))?;
    argument
        .parse()
        .map_err(|_| Error::Input(format!("invalid course ID: {argument}")))
}

/// Overlay the course options given on the command line onto `input`.
fn course_input(mut input: CourseInput, matches: &Matches) -> Result<CourseInput> {
    if let Some(title) = matches.opt_str("title") {
        input.title = Some(title);
    }
    if let Some(teacher) = matches.opt_str("teacher") {
        input.teacher = Some(teacher);
    }
    if let Some(location) = matches.opt_str("location") {
        input.location = Some(location);
    }
    if let Some(weekday) = matches.opt_str("weekday") {
        let weekday = weekday
            .trim()
            .parse()
            .map_err(|_| Error::Input(format!("invalid weekday: {weekday}")))?;
        input.weekday = Some(weekday);
    }
    if let Some(start) = matches.opt_str("start") {
        input.start_time = Some(start);
    }
    if let Some(end) = matches.opt_str("end") {
        input.end_time = Some(end);
    }
    if let Some(weeks) = matches.opt_str("weeks") {
        input.weeks = Some(parse_weeks(&weeks).into_iter().map(i64::from).collect());
    }
    if let Some(color) = matches.opt_str("color") {
        input.color = Some(color);
    }
    if let Some(remark) = matches.opt_str("remark") {
        input.remark = Some(remark);
    }

    Ok(input)
}

/// Overlay the settings options given on the command line onto `input`.
fn settings_input(mut input: SettingsInput, matches: &Matches) -> Result<SettingsInput> {
    if let Some(semester) = matches.opt_str("semester") {
        input.semester_name = Some(semester);
    }
    if let Some(first_monday) = matches.opt_str("first-monday") {
        input.first_monday = Some(first_monday);
    }
    if let Some(day_start) = matches.opt_str("day-start") {
        input.day_start = Some(day_start);
    }
    if let Some(day_end) = matches.opt_str("day-end") {
        input.day_end = Some(day_end);
    }
    if let Some(interval) = matches.opt_str("interval") {
        let interval = interval
            .trim()
            .parse()
            .map_err(|_| Error::Input(format!("invalid interval: {interval}")))?;
        input.slot_interval = Some(interval);
    }

    Ok(input)
}
