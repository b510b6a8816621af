//! Output formatting module

use std::io::Write;

use serde::Serialize;

use freshroute_domain::service::{timeline, LinkIssue, ReportTable, TrackingInfo};
use freshroute_domain::validation::{format_phone, format_timestamp, format_weight, truncate};
use freshroute_domain::{Package, Route};
use freshroute_types::Result;

pub fn output_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_packages_table<W: Write>(out: &mut W, packages: &[Package]) -> Result<()> {
    if packages.is_empty() {
        writeln!(out, "No packages found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<10} {:<20} {:<30} {:>10} {:<16} {:<8}",
        "ID", "Recipient", "Address", "Weight", "Status", "Route"
    )?;
    writeln!(out, "{}", "-".repeat(99))?;
    for p in packages {
        writeln!(
            out,
            "{:<10} {:<20} {:<30} {:>10} {:<16} {:<8}",
            p.package_id,
            truncate(&p.recipient_name, 20),
            truncate(&p.recipient_address, 30),
            format_weight(p.weight),
            p.status.label(),
            p.route_id.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total: {} package(s)", packages.len())?;
    Ok(())
}

pub fn print_package_details<W: Write>(out: &mut W, p: &Package) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Package {}", p.package_id)?;
    writeln!(out, "{}", "=".repeat(8 + p.package_id.len()))?;
    writeln!(out, "Sender:        {}", p.sender)?;
    writeln!(out, "Recipient:     {}", p.recipient_name)?;
    writeln!(out, "Address:       {}", p.recipient_address)?;
    writeln!(out, "Phone:         {}", format_phone(&p.recipient_phone))?;
    writeln!(out, "Weight:        {}", format_weight(p.weight))?;
    writeln!(out, "Category:      {}", p.category)?;
    writeln!(out, "Status:        {}", p.status)?;
    writeln!(out, "Route:         {}", p.route_id.as_deref().unwrap_or("(unassigned)"))?;
    writeln!(out, "Registered:    {}", format_timestamp(Some(&p.created_at)))?;
    writeln!(out, "Updated:       {}", format_timestamp(Some(&p.updated_at)))?;
    writeln!(out, "Delivered:     {}", format_timestamp(p.delivered_at.as_ref()))?;
    if let Some(ref proof) = p.proof_of_delivery {
        writeln!(out, "Proof:         {}", proof)?;
    }
    Ok(())
}

pub fn print_routes_table<W: Write>(out: &mut W, routes: &[Route]) -> Result<()> {
    if routes.is_empty() {
        writeln!(out, "No routes found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8} {:<20} {:<20} {:<10} {:>8} {:>9} {:<10}",
        "ID", "Name", "Driver", "Date", "Packages", "Fuel (L)", "Status"
    )?;
    writeln!(out, "{}", "-".repeat(91))?;
    for r in routes {
        writeln!(
            out,
            "{:<8} {:<20} {:<20} {:<10} {:>8} {:>9.2} {:<10}",
            r.route_id,
            truncate(&r.route_name, 20),
            truncate(&r.driver_name, 20),
            r.date.format("%Y-%m-%d").to_string(),
            r.package_count(),
            r.estimated_fuel,
            r.status.label()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Total: {} route(s)", routes.len())?;
    Ok(())
}

/// Route header followed by its member packages
pub fn print_route_details<W: Write>(out: &mut W, r: &Route, members: &[Package]) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Route {} - {}", r.route_id, r.route_name)?;
    writeln!(out, "{}", "=".repeat(9 + r.route_id.len() + r.route_name.len()))?;
    writeln!(out, "Driver:        {}", r.driver_name)?;
    writeln!(out, "Driver phone:  {}", format_phone(&r.driver_phone))?;
    writeln!(out, "Date:          {}", r.date.format("%Y-%m-%d"))?;
    writeln!(out, "Status:        {}", r.status)?;
    writeln!(out, "Packages:      {}", r.package_count())?;
    writeln!(out, "Fuel estimate: {:.2} L", r.estimated_fuel)?;
    writeln!(out)?;
    print_packages_table(out, members)?;

    let missing = r.package_count().saturating_sub(members.len());
    if missing > 0 {
        writeln!(out, "({} listed package(s) no longer exist)", missing)?;
    }
    Ok(())
}

pub fn print_timeline<W: Write>(out: &mut W, p: &Package) -> Result<()> {
    writeln!(out, "Timeline for {}", p.package_id)?;
    for event in timeline(p) {
        writeln!(out, "  {:<14} {}", event.label, format_timestamp(Some(&event.at)))?;
    }
    Ok(())
}

pub fn print_tracking<W: Write>(out: &mut W, info: &TrackingInfo) -> Result<()> {
    print_package_details(out, &info.package)?;
    if let Some(ref route) = info.route {
        writeln!(out)?;
        writeln!(
            out,
            "On route {} ({}) with {} on {}",
            route.route_id,
            route.route_name,
            route.driver_name,
            route.date.format("%Y-%m-%d")
        )?;
    }
    writeln!(out)?;
    print_timeline(out, &info.package)
}

pub fn print_report<W: Write>(out: &mut W, table: &ReportTable) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", table.title)?;
    writeln!(out, "{}", "=".repeat(table.title.chars().count()))?;

    if table.is_empty() {
        writeln!(out, "No data.")?;
    } else {
        let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
        };
        writeln!(out, "{}", line(&table.headers).trim_end())?;
        writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)))?;
        for row in &table.rows {
            writeln!(out, "{}", line(row).trim_end())?;
        }
    }

    if !table.summary.is_empty() {
        writeln!(out)?;
        for (label, value) in &table.summary {
            writeln!(out, "{}: {}", label, value)?;
        }
    }
    Ok(())
}

pub fn print_link_issues<W: Write>(out: &mut W, issues: &[LinkIssue]) -> Result<()> {
    if issues.is_empty() {
        writeln!(out, "All package and route links are consistent.")?;
        return Ok(());
    }
    writeln!(out, "Found {} link issue(s):", issues.len())?;
    for issue in issues {
        writeln!(out, "  - {}", issue)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use freshroute_domain::service::reports;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample() -> Package {
        Package::new(
            "PKG0001",
            "FreshFarm Co",
            "Ana Cruz",
            "45 Mango Ave, Cebu",
            "09171234567",
            5.5,
            "Food",
        )
    }

    #[test]
    fn test_packages_table() {
        let text = render(|out| print_packages_table(out, &[sample()]));
        assert!(text.contains("PKG0001"));
        assert!(text.contains("5.50 kg"));
        assert!(text.contains("Pending"));
        assert!(text.contains("Total: 1 package(s)"));
        assert_eq!(render(|out| print_packages_table(out, &[])), "No packages found.\n");
    }

    #[test]
    fn test_package_details_formats_phone() {
        let text = render(|out| print_package_details(out, &sample()));
        assert!(text.contains("(091) 712-3456"));
        assert!(text.contains("(unassigned)"));
        assert!(text.contains("Delivered:     N/A"));
    }

    #[test]
    fn test_report_aligns_columns() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        let mut route = Route::new("RT0001", "Downtown", "Juan", "09181234567", date);
        route.add_package("PKG0001");
        route.recalculate_fuel(0.5);
        let table = reports::fuel_usage(&[route]);

        let text = render(|out| print_report(out, &table));
        assert!(text.contains("Fuel Usage Estimates"));
        assert!(text.contains("RT0001"));
        assert!(text.contains("Total fuel (L): 0.50"));
    }

    #[test]
    fn test_json_output() {
        let text = render(|out| output_json(out, &[sample()]));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["package_id"], "PKG0001");
        assert_eq!(parsed[0]["status"], "Pending");
    }
}
