//! Receipt
//!
//! The downloadable proof of order handed to the buyer after a confirmed
//! checkout. A receipt is built from the snapshot taken before the cart is
//! cleared and stays re-renderable for as long as the confirmation is held;
//! it never reads the live cart.

use std::{io, num::TryFromIntError};

use jiff::Timestamp;
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Alignment, Style, Theme, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::CartLine, delivery::DeliveryInfo, orders::OrderNumber, payment::PaymentMethod,
};

/// Errors that can occur while rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount does not fit the money formatter.
    #[error("amount too large to format")]
    Amount(#[from] TryFromIntError),

    /// Writing the rendered receipt failed.
    #[error("receipt io error")]
    Io(#[from] io::Error),
}

/// Immutable order summary captured at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    order_number: OrderNumber,
    buyer: DeliveryInfo,
    payment: PaymentMethod,
    lines: Vec<CartLine>,
    total_items: u64,
    total_price: u64,
    issued_at: Timestamp,
}

impl Receipt {
    /// Builds a receipt from the pre-clear line snapshot.
    #[must_use]
    pub fn new(
        order_number: OrderNumber,
        buyer: DeliveryInfo,
        payment: PaymentMethod,
        lines: Vec<CartLine>,
        issued_at: Timestamp,
    ) -> Self {
        let total_items = lines
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum();

        let total_price = lines
            .iter()
            .fold(0u64, |total, line| total.saturating_add(line.line_total()));

        Self {
            order_number,
            buyer,
            payment,
            lines,
            total_items,
            total_price,
            issued_at,
        }
    }

    /// The confirmed order number.
    #[must_use]
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Buyer info as submitted.
    #[must_use]
    pub fn buyer(&self) -> &DeliveryInfo {
        &self.buyer
    }

    /// Payment method recorded on the order.
    #[must_use]
    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// The submitted lines, exactly as the cart held them.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total units across all lines at submission time.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Total amount in whole FCFA at submission time.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// When the order was confirmed.
    #[must_use]
    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    /// Renders the receipt document.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an amount cannot be formatted or the
    /// writer fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        writeln!(out, "AMAP TOGO")?;
        writeln!(out, "Reçu de commande {}", self.order_number)?;
        writeln!(out)?;
        writeln!(out, "Commande : {}", self.order_number)?;
        writeln!(out, "Date     : {}", self.issued_at)?;
        writeln!(
            out,
            "Client   : {} {}",
            self.buyer.surname(),
            self.buyer.name()
        )?;
        writeln!(out, "Tél      : {}", self.buyer.phone())?;
        writeln!(out, "Quartier : {}", self.buyer.neighborhood())?;

        if let Some(address) = self.buyer.address() {
            writeln!(out, "Adresse  : {address}")?;
        }

        if let Some(notes) = self.buyer.notes() {
            writeln!(out, "Note     : {notes}")?;
        }

        writeln!(out, "Paiement : {}", self.payment.label())?;

        let table = self.build_table()?;
        writeln!(out, "\n{table}")?;

        writeln!(out)?;
        writeln!(out, " Articles : {}", self.total_items)?;
        writeln!(out, " Total    : {}", fcfa(self.total_price)?)?;

        Ok(())
    }

    fn build_table(&self) -> Result<String, ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Article", "Qté", "Prix unitaire", "Montant"]);

        for line in &self.lines {
            builder.push_record([
                article_label(line),
                line.quantity().to_string(),
                fcfa(line.unit_price())?.to_string(),
                fcfa(line.line_total())?.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Columns::new(1..4), Alignment::right());

        Ok(table.to_string())
    }
}

fn article_label(line: &CartLine) -> String {
    match line.unit_label() {
        Some(unit) => format!("{} ({unit})", line.name()),
        None => line.name().to_string(),
    }
}

/// Formats a whole-FCFA amount. XOF has no minor subdivision, so the minor
/// units are the francs themselves.
fn fcfa(amount: u64) -> Result<Money<'static, iso::Currency>, TryFromIntError> {
    Ok(Money::from_minor(i64::try_from(amount)?, iso::XOF))
}
