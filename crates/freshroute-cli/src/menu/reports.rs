//! Reports menu

use std::io::{BufRead, Write};

use chrono::Local;

use freshroute_app::LogisticsService;
use freshroute_domain::service::ReportKind;
use freshroute_types::Result;

use super::{recover, show_menu, success};
use crate::output;
use crate::prompt::Prompter;

pub fn run<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let mut options: Vec<&str> = ReportKind::ALL.iter().map(|k| k.title()).collect();
    options.push("Back to Main Menu");

    loop {
        show_menu(p.out(), "Reports", &options)?;
        let choice = p.get_menu_choice(options.len() as u32)? as usize;
        let Some(&kind) = ReportKind::ALL.get(choice - 1) else {
            return Ok(());
        };
        let result = show_report(service, p, kind);
        recover(p.out(), result)?;
    }
}

fn show_report<R: BufRead, W: Write>(
    service: &LogisticsService,
    p: &mut Prompter<R, W>,
    kind: ReportKind,
) -> Result<()> {
    let date = match kind {
        ReportKind::Delivered => {
            Some(p.get_date("Date (YYYY-MM-DD)", Some(Local::now().date_naive()))?)
        }
        _ => None,
    };

    let table = service.report(kind, date)?;
    output::print_report(p.out(), &table)?;

    if p.confirm("Export to CSV?")? {
        let path = service.export_report(&table, None)?;
        success(p.out(), &format!("Report exported to {}", path.display()))?;
    }
    Ok(())
}
