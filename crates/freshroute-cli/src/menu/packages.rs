//! Package Management menu

use std::io::{BufRead, Write};

use freshroute_app::{LogisticsService, NewPackage, PackageEdit};
use freshroute_domain::validation::{validate_phone, validate_weight};
use freshroute_domain::PackageRepository;
use freshroute_types::Result;

use super::{recover, show_menu, success};
use crate::output;
use crate::prompt::Prompter;

const OPTIONS: [&str; 7] = [
    "Register New Package",
    "View All Packages",
    "Search Package",
    "Edit Package",
    "Delete Package",
    "View Unassigned Packages",
    "Back to Main Menu",
];

pub fn run<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    loop {
        show_menu(p.out(), "Package Management", &OPTIONS)?;
        let result = match p.get_menu_choice(OPTIONS.len() as u32)? {
            1 => register(service, p),
            2 => view_all(service, p),
            3 => search(service, p),
            4 => edit(service, p),
            5 => delete(service, p),
            6 => view_unassigned(service, p),
            _ => return Ok(()),
        };
        recover(p.out(), result)?;
    }
}

/// Ask until the phone number has at least ten digits
pub(super) fn ask_phone<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    prompt: &str,
    default: Option<&str>,
) -> Result<String> {
    loop {
        let phone = p.get_input(prompt, default)?;
        if validate_phone(&phone) {
            return Ok(phone);
        }
        writeln!(p.out(), "Phone number needs at least 10 digits.")?;
    }
}

/// `Some(new)` only when the answer differs from the stored value
fn changed(new: String, old: &str) -> Option<String> {
    (new != old).then_some(new)
}

/// Weight in kilograms; an empty answer skips
fn ask_weight<R: BufRead, W: Write>(p: &mut Prompter<R, W>, prompt: &str) -> Result<Option<f64>> {
    loop {
        let Some(weight) = p.get_number(prompt, Some(0.01), None)? else {
            return Ok(None);
        };
        match validate_weight(weight) {
            Ok(weight) => return Ok(Some(weight)),
            Err(_) => writeln!(p.out(), "Weight must be a finite positive number.")?,
        }
    }
}

fn ask_required_weight<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<f64> {
    loop {
        if let Some(weight) = ask_weight(p, "Weight (kg)")? {
            return Ok(weight);
        }
        writeln!(p.out(), "Weight is required.")?;
    }
}

fn register<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let next_id = service.packages().next_id()?;
    writeln!(p.out(), "Registering package {}", next_id)?;

    let new = NewPackage {
        sender: p.get_required("Sender name")?,
        recipient_name: p.get_required("Recipient name")?,
        recipient_address: p.get_required("Recipient address")?,
        recipient_phone: ask_phone(p, "Recipient phone", None)?,
        weight: ask_required_weight(p)?,
        category: p.get_input("Category", Some("Other"))?,
    };

    let package = service.register_package(new)?;
    success(p.out(), &format!("Package {} registered", package.package_id))
}

fn view_all<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let packages = service.packages().list_all()?;
    output::print_packages_table(p.out(), &packages)
}

fn search<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let package_id = p.get_required("Package ID")?;
    let package = service.find_package(&package_id)?;
    output::print_package_details(p.out(), &package)
}

fn edit<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let package_id = p.get_required("Package ID")?;
    let current = service.find_package(&package_id)?;
    output::print_package_details(p.out(), &current)?;
    writeln!(p.out(), "\nPress Enter to keep the current value.")?;

    let weight_prompt = format!("Weight (kg) [{}]", current.weight);

    let edit = PackageEdit {
        sender: changed(p.get_input("Sender name", Some(current.sender.as_str()))?, &current.sender),
        recipient_name: changed(
            p.get_input("Recipient name", Some(current.recipient_name.as_str()))?,
            &current.recipient_name,
        ),
        recipient_address: changed(
            p.get_input("Recipient address", Some(current.recipient_address.as_str()))?,
            &current.recipient_address,
        ),
        recipient_phone: changed(
            ask_phone(p, "Recipient phone", Some(current.recipient_phone.as_str()))?,
            &current.recipient_phone,
        ),
        weight: ask_weight(p, &weight_prompt)?,
        category: changed(p.get_input("Category", Some(current.category.as_str()))?, &current.category),
    };

    if edit.is_empty() {
        writeln!(p.out(), "No changes made.")?;
        return Ok(());
    }
    service.edit_package(&current.package_id, edit)?;
    success(p.out(), &format!("Package {} updated", current.package_id))
}

fn delete<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let package_id = p.get_required("Package ID")?;
    let package = service.find_package(&package_id)?;
    output::print_package_details(p.out(), &package)?;

    if !p.confirm(&format!("Delete package {}?", package.package_id))? {
        writeln!(p.out(), "Deletion cancelled.")?;
        return Ok(());
    }
    service.planner().delete_package(&package.package_id)?;
    success(p.out(), &format!("Package {} deleted", package.package_id))
}

fn view_unassigned<R: BufRead, W: Write>(
    service: &LogisticsService,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    let packages = service.packages().filter_unassigned()?;
    output::print_packages_table(p.out(), &packages)
}
