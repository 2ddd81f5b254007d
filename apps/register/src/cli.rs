//! Command-line surface of the register.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use torque_checkout::CheckoutMethod;
use torque_core::{Money, ProductRef};

/// Torque POS counter register.
#[derive(Debug, Parser)]
#[command(name = "torque", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(long, global = true, env = "TORQUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sell the given lines to a customer.
    Checkout(CheckoutArgs),

    /// List recorded sales.
    Sales {
        #[arg(long, value_enum, default_value_t = SalesView::All)]
        view: SalesView,
    },

    /// Record a cash payment against an open credit sale.
    Settle {
        /// Sale id as shown by `torque sales`.
        sale_id: String,

        /// Amount to pay (defaults to the outstanding balance).
        #[arg(long, value_parser = parse_money)]
        amount: Option<Money>,

        /// Email a receipt to this address.
        #[arg(long)]
        receipt_email: Option<String>,
    },
}

#[derive(Debug, clap::Args)]
pub struct CheckoutArgs {
    /// Cart line as `id:name:floor:price[:qty]`, amounts in major units.
    #[arg(long = "line", required = true)]
    pub lines: Vec<LineArg>,

    /// Customer phone number.
    #[arg(long)]
    pub phone: String,

    /// Customer name.
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, value_enum, default_value_t = Tender::Cash)]
    pub method: Tender,

    /// Email a receipt to this address.
    #[arg(long)]
    pub receipt_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tender {
    Cash,
    Credit,
}

impl From<Tender> for CheckoutMethod {
    fn from(tender: Tender) -> Self {
        match tender {
            Tender::Cash => CheckoutMethod::Cash,
            Tender::Credit => CheckoutMethod::Credit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SalesView {
    All,
    Paid,
    Credit,
}

/// One `--line` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineArg {
    pub product: ProductRef,
    pub floor_price: Money,
    pub unit_price: Money,
    pub quantity: i64,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if !(4..=5).contains(&parts.len()) {
            return Err(format!("expected id:name:floor:price[:qty], got '{s}'"));
        }
        if parts[0].is_empty() {
            return Err("product id must not be empty".to_string());
        }

        let quantity = match parts.get(4) {
            Some(qty) => qty
                .parse::<i64>()
                .map_err(|_| format!("invalid quantity '{qty}'"))?,
            None => 1,
        };

        Ok(LineArg {
            product: ProductRef::new(parts[0], parts[1]),
            floor_price: parse_money(parts[2])?,
            unit_price: parse_money(parts[3])?,
            quantity,
        })
    }
}

/// Parses a decimal amount such as `1000` or `99.99`.
pub fn parse_money(s: &str) -> Result<Money, String> {
    s.trim()
        .parse::<f64>()
        .ok()
        .and_then(Money::from_decimal)
        .ok_or_else(|| format!("invalid amount '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_arg() {
        let line: LineArg = "BRK-01:Brake pads:400:500:2".parse().unwrap();
        assert_eq!(line.product, ProductRef::new("BRK-01", "Brake pads"));
        assert_eq!(line.floor_price, Money::from_cents(40_000));
        assert_eq!(line.unit_price, Money::from_cents(50_000));
        assert_eq!(line.quantity, 2);

        let line: LineArg = "OIL-5W30:Engine oil 4L:32.50:35.99".parse().unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, Money::from_cents(3_599));
    }

    #[test]
    fn test_line_arg_errors() {
        assert!("A:pads:400".parse::<LineArg>().is_err());
        assert!(":pads:400:500".parse::<LineArg>().is_err());
        assert!("A:pads:four:500".parse::<LineArg>().is_err());
        assert!("A:pads:400:500:two".parse::<LineArg>().is_err());
    }

    #[test]
    fn test_cli_parses_checkout() {
        let cli = Cli::try_parse_from([
            "torque",
            "checkout",
            "--line",
            "A:Brake pads:400:500:2",
            "--phone",
            "0712345678",
            "--method",
            "credit",
        ])
        .unwrap();

        match cli.command {
            Command::Checkout(args) => {
                assert_eq!(args.lines.len(), 1);
                assert_eq!(args.method, Tender::Credit);
                assert_eq!(args.receipt_email, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_settle() {
        let cli = Cli::try_parse_from(["torque", "settle", "77", "--amount", "250.50"]).unwrap();
        match cli.command {
            Command::Settle { sale_id, amount, .. } => {
                assert_eq!(sale_id, "77");
                assert_eq!(amount, Some(Money::from_cents(25_050)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
