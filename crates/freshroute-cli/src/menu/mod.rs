//! Interactive console: main menu and the four sub-menus

mod packages;
mod reports;
mod routes;
mod tracking;

use std::io::{BufRead, Write};

use tracing::debug;

use freshroute_app::LogisticsService;
use freshroute_types::Result;

use crate::prompt::Prompter;

const MAIN_OPTIONS: [&str; 5] = [
    "Package Management",
    "Route Management",
    "Delivery Tracking",
    "Reports",
    "Exit",
];

/// Run the main menu until the operator exits
pub fn run<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    loop {
        show_menu(p.out(), "FreshRoute Logistics System", &MAIN_OPTIONS)?;
        let choice = p.get_menu_choice(MAIN_OPTIONS.len() as u32)?;
        debug!(choice, "main menu");
        match choice {
            1 => packages::run(service, p)?,
            2 => routes::run(service, p)?,
            3 => tracking::run(service, p)?,
            4 => reports::run(service, p)?,
            _ => {
                writeln!(p.out(), "Exiting system...")?;
                return Ok(());
            }
        }
    }
}

fn show_menu<W: Write>(out: &mut W, title: &str, options: &[&str]) -> Result<()> {
    let bar = "=".repeat(title.chars().count() + 4);
    writeln!(out)?;
    writeln!(out, "{}", bar)?;
    writeln!(out, "  {}", title)?;
    writeln!(out, "{}", bar)?;
    for (i, option) in options.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, option)?;
    }
    writeln!(out)?;
    Ok(())
}

fn success<W: Write>(out: &mut W, message: &str) -> Result<()> {
    writeln!(out, "[OK] {}", message)?;
    Ok(())
}

/// Print errors the operator can recover from and keep the session going.
/// Anything else (closed input, storage failure) ends the session.
fn recover<W: Write>(out: &mut W, result: Result<()>) -> Result<()> {
    match result {
        Err(e) if e.is_user_facing() => {
            writeln!(out, "[ERROR] {}", e)?;
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    use freshroute_app::{Config, LogisticsService};
    use tempfile::TempDir;

    use crate::prompt::Prompter;

    pub fn service() -> (TempDir, LogisticsService) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().join("data")),
            export_dir: Some(dir.path().join("exports")),
            ..Config::default()
        };
        let service = LogisticsService::open(config).unwrap();
        (dir, service)
    }

    pub fn script(lines: &[&str]) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        let mut input = lines.join("\n");
        input.push('\n');
        Prompter::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    pub fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{output, script, service};
    use super::*;
    use freshroute_types::Error;

    #[test]
    fn test_exit_from_main_menu() {
        let (_dir, service) = service();
        let mut p = script(&["5"]);
        run(&service, &mut p).unwrap();
        let text = output(p);
        assert!(text.contains("1. Package Management"));
        assert!(text.contains("Exiting system..."));
    }

    #[test]
    fn test_invalid_choice_is_reasked() {
        let (_dir, service) = service();
        let mut p = script(&["0", "abc", "5"]);
        run(&service, &mut p).unwrap();
        assert!(output(p).contains("Please enter a number between 1 and 5."));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let (_dir, service) = service();
        let mut p = script(&["1"]);
        assert!(matches!(run(&service, &mut p), Err(Error::InputClosed)));
    }

    #[test]
    fn test_recover_keeps_user_errors_only() {
        let mut out = Vec::new();
        assert!(recover(&mut out, Err(Error::not_found("package", "PKG0404"))).is_ok());
        assert!(String::from_utf8(out).unwrap().contains("No package found with id PKG0404"));

        let mut out = Vec::new();
        assert!(recover(&mut out, Err(Error::InputClosed)).is_err());
    }
}
