//! Line-oriented prompts for the interactive console
//!
//! Every prompt writes to the output, flushes, then reads one line. Invalid
//! answers are reported and asked again; end of input ends the session with
//! `Error::InputClosed` instead of looping.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDate;

use freshroute_domain::validation::parse_date;
use freshroute_types::{Error, Result};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(Error::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Free text; an empty answer yields `default` when one is given
    pub fn get_input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let answer = match default {
            Some(d) => self.ask(&format!("{} [{}]: ", prompt, d))?,
            None => self.ask(&format!("{}: ", prompt))?,
        };
        match (answer.is_empty(), default) {
            (true, Some(d)) => Ok(d.to_string()),
            _ => Ok(answer),
        }
    }

    /// Free text that must not be empty
    pub fn get_required(&mut self, prompt: &str) -> Result<String> {
        loop {
            let answer = self.get_input(prompt, None)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "This field is required.")?;
        }
    }

    /// Number within `[min, max]`; an empty answer skips and yields `None`
    pub fn get_number<T>(&mut self, prompt: &str, min: Option<T>, max: Option<T>) -> Result<Option<T>>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        loop {
            let answer = self.ask(&format!("{}: ", prompt))?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<T>() {
                Ok(value) if min.map_or(true, |m| value >= m) && max.map_or(true, |m| value <= m) => {
                    return Ok(Some(value));
                }
                Ok(_) => match (min, max) {
                    (Some(lo), Some(hi)) => {
                        writeln!(self.output, "Please enter a number between {} and {}.", lo, hi)?
                    }
                    (Some(lo), None) => writeln!(self.output, "Please enter a number of at least {}.", lo)?,
                    (None, Some(hi)) => writeln!(self.output, "Please enter a number of at most {}.", hi)?,
                    (None, None) => {}
                },
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    /// Numbered menu selection from 1 to `max`
    pub fn get_menu_choice(&mut self, max: u32) -> Result<u32> {
        loop {
            if let Some(choice) = self.get_number("Enter your choice", Some(1), Some(max))? {
                return Ok(choice);
            }
        }
    }

    /// Pick one of `options`; returns its index
    pub fn get_choice(&mut self, prompt: &str, options: &[&str]) -> Result<usize> {
        writeln!(self.output, "{}", prompt)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, option)?;
        }
        let choice = self.get_menu_choice(options.len() as u32)?;
        Ok(choice as usize - 1)
    }

    /// `YYYY-MM-DD`; an empty answer yields `default` when one is given
    pub fn get_date(&mut self, prompt: &str, default: Option<NaiveDate>) -> Result<NaiveDate> {
        let shown = default.map(|d| d.format("%Y-%m-%d").to_string());
        loop {
            let answer = self.get_input(prompt, shown.as_deref())?;
            match parse_date(&answer) {
                Ok(date) => return Ok(date),
                Err(_) => writeln!(self.output, "Please enter a date as YYYY-MM-DD.")?,
            }
        }
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{} (y/n): ", prompt))?.to_lowercase();
            match answer.as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}
