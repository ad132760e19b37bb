use crate::defines::EXIT_SENTINEL;
use crate::types::*;

use regex::Regex;
use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

/// What the operator typed at a prompt.
enum Answer<T> {
    Value(T),
    Exit,
}

/// Unwrap an `Answer`, leaving the current iteration on exit.
macro_rules! or_exit {
    ($answer:expr) => {
        match $answer? {
            Answer::Value(v) => v,
            Answer::Exit => return Ok(None),
        }
    };
}

/// Parse operator input as a strictly positive decimal.
/// Only plain notation is accepted: no sign, no exponent, no `inf`/`NaN`.
pub fn parse_positive_decimal(input: &str) -> Result<f64, AmountError> {
    static DECIMAL: OnceLock<Regex> = OnceLock::new();
    let pattern = DECIMAL.get_or_init(|| Regex::new(r"^(\d+(\.\d*)?|\.\d+)$").expect("decimal pattern is valid"));

    let input = input.trim();
    if !pattern.is_match(input) {
        return Err(AmountError::NotANumber);
    }
    let value: f64 = input.parse().map_err(|_| AmountError::NotANumber)?;
    // long digit strings overflow to inf
    if !value.is_finite() {
        return Err(AmountError::NotANumber);
    }
    if value <= 0.0 {
        return Err(AmountError::NotPositive);
    }
    Ok(value)
}

/// Line-oriented conversation with the operator.
/// Generic over input/output so it can be driven by scripted input.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask for api-key and api-secret. `None` if either is empty.
    pub fn read_credentials(&mut self) -> io::Result<Option<Credentials>> {
        let api_key = self.ask_raw("API Key: ")?.unwrap_or_default();
        let api_secret = self.ask_raw("API Secret: ")?.unwrap_or_default();

        if api_key.is_empty() || api_secret.is_empty() {
            return Ok(None);
        }
        Ok(Some(Credentials { api_key, api_secret }))
    }

    /// Collect orders until the operator exits, handing each complete one to `submit`.
    pub fn run<F>(&mut self, mut submit: F) -> io::Result<()>
    where
        F: FnMut(&OrderRequest),
    {
        while let Some(request) = self.next_order()? {
            submit(&request);
        }
        Ok(())
    }

    /// One iteration of the loop. `None` when the operator asked to exit.
    pub fn next_order(&mut self) -> io::Result<Option<OrderRequest>> {
        writeln!(self.output, "\n--- New Order ---")?;
        writeln!(self.output, "Type '{}' at any prompt to quit.", EXIT_SENTINEL)?;

        let symbol = or_exit!(self.ask_symbol());
        let side: Side = or_exit!(self.ask_choice("Side (BUY/SELL): "));
        let order_type: OrderType = or_exit!(self.ask_choice("Type (MARKET/LIMIT): "));
        let quantity = or_exit!(self.ask_amount(&format!("Enter Quantity for {}: ", symbol)));
        let price = match order_type {
            OrderType::Limit => Some(or_exit!(self.ask_amount("Enter Limit Price: "))),
            OrderType::Market => None,
        };

        Ok(Some(OrderRequest { symbol, side, order_type, quantity, price }))
    }

    fn ask_symbol(&mut self) -> io::Result<Answer<String>> {
        loop {
            match self.ask("Enter Symbol (e.g., BTCUSDT): ")? {
                Answer::Exit => return Ok(Answer::Exit),
                Answer::Value(s) if s.is_empty() => writeln!(self.output, "Input cannot be empty.")?,
                Answer::Value(s) => return Ok(Answer::Value(s.to_uppercase())),
            }
        }
    }

    fn ask_choice<T: Choice>(&mut self, prompt: &str) -> io::Result<Answer<T>> {
        loop {
            let input = match self.ask(prompt)? {
                Answer::Exit => return Ok(Answer::Exit),
                Answer::Value(s) => s.to_uppercase(),
            };
            if input.is_empty() {
                writeln!(self.output, "Input cannot be empty.")?;
                continue;
            }
            match input.parse::<T>() {
                Ok(choice) => return Ok(Answer::Value(choice)),
                Err(_) => writeln!(self.output, "Invalid input. Please choose from: {}", T::CHOICES.join(", "))?,
            }
        }
    }

    fn ask_amount(&mut self, prompt: &str) -> io::Result<Answer<f64>> {
        loop {
            let input = match self.ask(prompt)? {
                Answer::Exit => return Ok(Answer::Exit),
                Answer::Value(s) => s,
            };
            match parse_positive_decimal(&input) {
                Ok(value) => return Ok(Answer::Value(value)),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    /// Trimmed line, or `Exit` on the sentinel (any case) or end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Answer<String>> {
        match self.ask_raw(prompt)? {
            None => Ok(Answer::Exit),
            Some(line) if line.eq_ignore_ascii_case(EXIT_SENTINEL) => Ok(Answer::Exit),
            Some(line) => Ok(Answer::Value(line)),
        }
    }

    /// Trimmed line, `None` at end of input.
    fn ask_raw(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
