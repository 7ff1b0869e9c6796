//! Interactive point-of-sale session
//!
//! The terminal stand-in for the storefront cart widget: browse the catalog,
//! edit the cart, fill the delivery form, pick a payment method, submit, and
//! keep the confirmation around to re-print the receipt. Command parsing is
//! pure; the session is generic over storage and takes a boxed gateway, so
//! the whole flow runs against mocks in tests.

use std::{fmt::Write as _, fs::File, path::PathBuf, str::FromStr};

use async_trait::async_trait;
use thiserror::Error;

use panier::{
    orders::{OrderGateway, OrderGatewayError, OrderNumber, OrderRequest},
    payment::UnknownPaymentMethod,
    prelude::{
        CartLine, CartStorage, CartStore, CatalogEntry, Checkout, Confirmation, DeliveryForm,
        ItemKind, PaymentMethod, Receipt, ReceiptError, check_gate,
    },
};

/// A delivery form field addressed by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyerField {
    /// Family name.
    Name,

    /// Given name.
    Surname,

    /// Phone number.
    Phone,

    /// Delivery neighborhood.
    Neighborhood,

    /// Street address or landmark.
    Address,

    /// Note for the deliverer.
    Notes,
}

/// One parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the catalog.
    Catalog,

    /// Show the cart.
    Cart,

    /// Add a catalog entry, merging by reference.
    Add {
        /// 1-based catalog entry number.
        entry: usize,

        /// Quantity to add, at least 1.
        quantity: u32,
    },

    /// Set a cart line's quantity; zero removes the line.
    Quantity {
        /// 1-based cart line number.
        line: usize,

        /// New quantity; zero removes.
        quantity: u32,
    },

    /// Remove a cart line.
    Remove {
        /// 1-based cart line number.
        line: usize,
    },

    /// Empty the cart.
    Clear,

    /// Set a delivery form field.
    Buyer(BuyerField, String),

    /// Choose the payment method.
    Pay(PaymentMethod),

    /// Show form, payment and gate state.
    Status,

    /// Submit the order.
    Checkout,

    /// Re-print the last receipt.
    Receipt,

    /// Show the command list.
    Help,

    /// Leave the terminal.
    Quit,
}

/// Command parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Blank input.
    #[error("empty command")]
    Empty,

    /// Unrecognized command word.
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    /// Recognized command with bad arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Unrecognized payment method.
    #[error(transparent)]
    Payment(#[from] UnknownPaymentMethod),
}

/// Parses one input line into a [`Command`].
///
/// # Errors
///
/// Returns a [`ParseError`] for blank, unknown or malformed input.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "catalog" | "cat" => Ok(Command::Catalog),
        "cart" => Ok(Command::Cart),
        "add" => parse_add(rest),
        "qty" => parse_qty(rest),
        "rm" | "remove" => {
            let line = rest
                .parse()
                .map_err(|_| ParseError::Usage("rm <line>"))?;

            Ok(Command::Remove { line })
        }
        "clear" => Ok(Command::Clear),
        "name" => Ok(Command::Buyer(BuyerField::Name, rest.to_string())),
        "surname" => Ok(Command::Buyer(BuyerField::Surname, rest.to_string())),
        "phone" => Ok(Command::Buyer(BuyerField::Phone, rest.to_string())),
        "neighborhood" | "hood" => {
            Ok(Command::Buyer(BuyerField::Neighborhood, rest.to_string()))
        }
        "address" => Ok(Command::Buyer(BuyerField::Address, rest.to_string())),
        "notes" | "note" => Ok(Command::Buyer(BuyerField::Notes, rest.to_string())),
        "pay" => Ok(Command::Pay(PaymentMethod::from_str(rest)?)),
        "status" => Ok(Command::Status),
        "checkout" => Ok(Command::Checkout),
        "receipt" => Ok(Command::Receipt),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn parse_add(rest: &str) -> Result<Command, ParseError> {
    const USAGE: &str = "add <entry> [quantity]";

    let mut args = rest.split_whitespace();

    let entry = args
        .next()
        .ok_or(ParseError::Usage(USAGE))?
        .parse()
        .map_err(|_| ParseError::Usage(USAGE))?;

    let quantity = match args.next() {
        Some(raw) => raw.parse().map_err(|_| ParseError::Usage(USAGE))?,
        None => 1,
    };

    if quantity == 0 || args.next().is_some() {
        return Err(ParseError::Usage(USAGE));
    }

    Ok(Command::Add { entry, quantity })
}

fn parse_qty(rest: &str) -> Result<Command, ParseError> {
    const USAGE: &str = "qty <line> <quantity>";

    let mut args = rest.split_whitespace();

    let line = args
        .next()
        .ok_or(ParseError::Usage(USAGE))?
        .parse()
        .map_err(|_| ParseError::Usage(USAGE))?;

    // Any non-positive quantity means removal, uniformly.
    let quantity: i64 = args
        .next()
        .ok_or(ParseError::Usage(USAGE))?
        .parse()
        .map_err(|_| ParseError::Usage(USAGE))?;

    let quantity = u32::try_from(quantity.max(0)).map_err(|_| ParseError::Usage(USAGE))?;

    if args.next().is_some() {
        return Err(ParseError::Usage(USAGE));
    }

    Ok(Command::Quantity { line, quantity })
}

/// The command list shown by `help`.
#[must_use]
pub fn help_text() -> &'static str {
    "Commands:\n\
     \x20 catalog              list products and baskets\n\
     \x20 add <n> [qty]        add catalog entry n to the cart\n\
     \x20 cart                 show the cart\n\
     \x20 qty <n> <qty>        set line n's quantity (0 removes)\n\
     \x20 rm <n>               remove line n\n\
     \x20 clear                empty the cart\n\
     \x20 name/surname/phone/neighborhood/address/notes <value>\n\
     \x20                      fill the delivery form\n\
     \x20 pay <cash|flooz|tmoney>\n\
     \x20 status               show form and gate state\n\
     \x20 checkout             submit the order\n\
     \x20 receipt              re-print the last receipt\n\
     \x20 quit"
}

/// Gateway used when no backend is configured: checkout is honest about
/// being offline instead of simulating an order.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGateway;

#[async_trait]
impl OrderGateway for OfflineGateway {
    async fn create_order(&self, _order: OrderRequest) -> Result<OrderNumber, OrderGatewayError> {
        Err(OrderGatewayError::Connection("no backend configured".into()))
    }
}

/// Session failures that are bugs or environment problems, not user input.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The receipt could not be rendered.
    #[error("failed to render receipt")]
    Receipt(#[from] ReceiptError),

    /// The receipt file could not be created.
    #[error("failed to write receipt file")]
    ReceiptFile(#[source] std::io::Error),
}

/// One buyer's interactive session at the terminal.
pub struct Session<S> {
    catalog: Vec<CatalogEntry>,
    store: CartStore<S>,
    form: DeliveryForm,
    payment: PaymentMethod,
    checkout: Checkout<Box<dyn OrderGateway>>,
    confirmation: Option<Confirmation>,
    receipt_dir: PathBuf,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("catalog", &self.catalog.len())
            .field("store", &self.store)
            .field("form", &self.form)
            .field("payment", &self.payment)
            .field("confirmation", &self.confirmation)
            .field("receipt_dir", &self.receipt_dir)
            .finish_non_exhaustive()
    }
}

impl<S: CartStorage> Session<S> {
    /// Creates a session over a catalog, a cart store and an order gateway.
    #[must_use]
    pub fn new(
        catalog: Vec<CatalogEntry>,
        store: CartStore<S>,
        gateway: Box<dyn OrderGateway>,
        receipt_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            store,
            form: DeliveryForm::default(),
            payment: PaymentMethod::default(),
            checkout: Checkout::new(gateway),
            confirmation: None,
            receipt_dir: receipt_dir.into(),
        }
    }

    /// Read access to the cart store.
    #[must_use]
    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Executes one command, returning the text to show the buyer.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] only for receipt rendering or file
    /// problems; everything user-facing comes back as the message.
    pub async fn handle(&mut self, command: Command) -> Result<String, SessionError> {
        match command {
            Command::Catalog => Ok(self.render_catalog()),
            Command::Cart => Ok(self.render_cart()),
            Command::Add { entry, quantity } => Ok(self.add(entry, quantity)),
            Command::Quantity { line, quantity } => Ok(self.set_quantity(line, quantity)),
            Command::Remove { line } => Ok(self.set_quantity(line, 0)),
            Command::Clear => {
                self.store.clear();

                Ok("Cart cleared.".to_string())
            }
            Command::Buyer(field, value) => Ok(self.set_buyer_field(field, value)),
            Command::Pay(method) => {
                self.payment = method;

                Ok(format!("Payment method: {}", method.label()))
            }
            Command::Status => Ok(self.render_status()),
            Command::Checkout => self.submit_order().await,
            Command::Receipt => self.render_receipt(),
            Command::Help => Ok(help_text().to_string()),
            Command::Quit => Ok("À bientôt.".to_string()),
        }
    }

    fn add(&mut self, entry: usize, quantity: u32) -> String {
        let quantity = quantity.max(1);

        let Some(entry) = entry.checked_sub(1).and_then(|i| self.catalog.get(i)) else {
            return format!("No catalog entry #{entry}.");
        };

        let mut line = CartLine::from_entry(entry);

        if let Some(quantity) = std::num::NonZeroU32::new(quantity) {
            line = line.with_quantity(quantity);
        }

        let name = entry.name.clone();
        self.store.add(line);

        format!(
            "Added {quantity} x {name}. Cart total: {}.",
            fcfa(self.store.cart().total_price())
        )
    }

    fn set_quantity(&mut self, line: usize, quantity: u32) -> String {
        let Some(reference) = line
            .checked_sub(1)
            .and_then(|i| self.store.cart().lines().get(i))
            .map(CartLine::reference)
        else {
            return format!("No cart line #{line}.");
        };

        self.store.update_quantity(reference, quantity);

        if quantity == 0 {
            format!(
                "Line removed. Cart total: {}.",
                fcfa(self.store.cart().total_price())
            )
        } else {
            format!(
                "Quantity set to {quantity}. Cart total: {}.",
                fcfa(self.store.cart().total_price())
            )
        }
    }

    fn set_buyer_field(&mut self, field: BuyerField, value: String) -> String {
        let slot = match field {
            BuyerField::Name => &mut self.form.name,
            BuyerField::Surname => &mut self.form.surname,
            BuyerField::Phone => &mut self.form.phone,
            BuyerField::Neighborhood => &mut self.form.neighborhood,
            BuyerField::Address => &mut self.form.address,
            BuyerField::Notes => &mut self.form.notes,
        };

        *slot = value;

        self.render_status()
    }

    async fn submit_order(&mut self) -> Result<String, SessionError> {
        // The gate doubles as the disabled submit control: a closed gate is
        // a status message, not a submission failure.
        if let Err(gate) = check_gate(self.store.cart(), &self.form) {
            return Ok(format!("Cannot submit yet: {gate}."));
        }

        match self
            .checkout
            .submit(&mut self.store, &self.form, self.payment)
            .await
        {
            Ok(confirmation) => {
                let path = self.write_receipt_file(confirmation.receipt())?;

                let message = format!(
                    "Order confirmed: {}\nReceipt saved to {}\nType 'receipt' to display it again.",
                    confirmation.order_number(),
                    path.display()
                );

                self.confirmation = Some(confirmation);

                Ok(message)
            }
            Err(error) => Ok(format!(
                "Order failed: {error}\nThe cart is untouched; you can submit again."
            )),
        }
    }

    fn write_receipt_file(&self, receipt: &Receipt) -> Result<PathBuf, SessionError> {
        let path = self
            .receipt_dir
            .join(format!("recu-{}.txt", receipt.order_number()));

        let file = File::create(&path).map_err(SessionError::ReceiptFile)?;

        receipt.write_to(file)?;

        Ok(path)
    }

    fn render_receipt(&self) -> Result<String, SessionError> {
        let Some(confirmation) = &self.confirmation else {
            return Ok("No confirmed order yet.".to_string());
        };

        let mut out = Vec::new();
        confirmation.receipt().write_to(&mut out)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn render_catalog(&self) -> String {
        if self.catalog.is_empty() {
            return "The catalog is empty.".to_string();
        }

        let mut out = String::from("Catalog:\n");

        for (idx, entry) in self.catalog.iter().enumerate() {
            let unit = entry
                .unit_label
                .as_deref()
                .map(|u| format!(" / {u}"))
                .unwrap_or_default();

            let kind = match entry.reference.kind() {
                ItemKind::Product => "",
                ItemKind::Basket => " [panier]",
            };

            _ = writeln!(
                out,
                " {:>2}. {}{kind}  {}{unit}",
                idx + 1,
                entry.name,
                fcfa(entry.unit_price)
            );
        }

        out.trim_end().to_string()
    }

    fn render_cart(&self) -> String {
        let cart = self.store.cart();

        if cart.is_empty() {
            return "Cart is empty.".to_string();
        }

        let mut out = String::from("Cart:\n");

        for (idx, line) in cart.iter().enumerate() {
            _ = writeln!(
                out,
                " {:>2}. {} x {}  ({} each) = {}",
                idx + 1,
                line.quantity(),
                line.name(),
                fcfa(line.unit_price()),
                fcfa(line.line_total())
            );
        }

        _ = writeln!(out, " Items: {}", cart.total_items());
        _ = write!(out, " Total: {}", fcfa(cart.total_price()));

        out
    }

    fn render_status(&self) -> String {
        let mut out = String::from("Delivery form:\n");

        _ = writeln!(out, "  name:         {}", display_or_dash(&self.form.name));
        _ = writeln!(out, "  surname:      {}", display_or_dash(&self.form.surname));
        _ = writeln!(out, "  phone:        {}", display_or_dash(&self.form.phone));
        _ = writeln!(
            out,
            "  neighborhood: {}",
            display_or_dash(&self.form.neighborhood)
        );
        _ = writeln!(out, "  address:      {}", display_or_dash(&self.form.address));
        _ = writeln!(out, "  notes:        {}", display_or_dash(&self.form.notes));
        _ = writeln!(out, "  payment:      {}", self.payment.label());

        match check_gate(self.store.cart(), &self.form) {
            Ok(_) => {
                _ = write!(out, "Ready to submit (type 'checkout').");
            }
            Err(gate) => {
                _ = write!(out, "Submit disabled: {gate}.");
            }
        }

        out
    }
}

fn display_or_dash(value: &str) -> &str {
    let trimmed = value.trim();

    if trimmed.is_empty() { "-" } else { trimmed }
}

fn fcfa(amount: u64) -> String {
    format!("{amount} F")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use panier::{
        catalog::{BasketUuid, CatalogRef, ProductUuid},
        orders::MockOrderGateway,
        prelude::MemoryStorage,
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry {
                reference: CatalogRef::Product(ProductUuid::new(Uuid::now_v7())),
                name: "Tomates bio".to_string(),
                unit_price: 500,
                unit_label: Some("kg".to_string()),
                image_ref: None,
            },
            CatalogEntry {
                reference: CatalogRef::Basket(BasketUuid::new(Uuid::now_v7())),
                name: "Panier familial".to_string(),
                unit_price: 12_500,
                unit_label: None,
                image_ref: None,
            },
        ]
    }

    fn session_with(gateway: Box<dyn OrderGateway>, receipt_dir: &Path) -> Session<MemoryStorage> {
        Session::new(
            catalog(),
            CartStore::new(MemoryStorage::new()),
            gateway,
            receipt_dir,
        )
    }

    async fn fill_form(session: &mut Session<MemoryStorage>) -> Result<(), SessionError> {
        for (field, value) in [
            (BuyerField::Name, "Abalo"),
            (BuyerField::Surname, "Essi"),
            (BuyerField::Phone, "90 11 22 33"),
            (BuyerField::Neighborhood, "Tokoin"),
        ] {
            _ = session
                .handle(Command::Buyer(field, value.to_string()))
                .await?;
        }

        Ok(())
    }

    #[test]
    fn parses_core_commands() -> TestResult {
        assert_eq!(parse_command("catalog")?, Command::Catalog);
        assert_eq!(parse_command("  cart  ")?, Command::Cart);
        assert_eq!(
            parse_command("add 2")?,
            Command::Add {
                entry: 2,
                quantity: 1
            }
        );
        assert_eq!(
            parse_command("add 2 3")?,
            Command::Add {
                entry: 2,
                quantity: 3
            }
        );
        assert_eq!(
            parse_command("qty 1 0")?,
            Command::Quantity {
                line: 1,
                quantity: 0
            }
        );
        assert_eq!(
            parse_command("qty 1 -1")?,
            Command::Quantity {
                line: 1,
                quantity: 0
            }
        );
        assert_eq!(parse_command("rm 1")?, Command::Remove { line: 1 });
        assert_eq!(parse_command("pay flooz")?, Command::Pay(PaymentMethod::Flooz));
        assert_eq!(
            parse_command("name Abalo")?,
            Command::Buyer(BuyerField::Name, "Abalo".to_string())
        );
        assert_eq!(
            parse_command("notes sonner au portail")?,
            Command::Buyer(BuyerField::Notes, "sonner au portail".to_string())
        );
        assert_eq!(parse_command("q")?, Command::Quit);

        Ok(())
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert!(matches!(
            parse_command("frobnicate"),
            Err(ParseError::Unknown(_))
        ));
        assert!(matches!(parse_command("add"), Err(ParseError::Usage(_))));
        assert!(matches!(parse_command("add 1 0"), Err(ParseError::Usage(_))));
        assert!(matches!(parse_command("qty 1"), Err(ParseError::Usage(_))));
        assert!(matches!(parse_command("pay cheque"), Err(ParseError::Payment(_))));
    }

    #[tokio::test]
    async fn browse_and_edit_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut session = session_with(Box::new(OfflineGateway), dir.path());

        let listing = session.handle(Command::Catalog).await?;
        assert!(listing.contains("Tomates bio"), "catalog listing incomplete");
        assert!(listing.contains("[panier]"), "basket marker missing");

        _ = session
            .handle(Command::Add {
                entry: 1,
                quantity: 2,
            })
            .await?;

        _ = session
            .handle(Command::Add {
                entry: 2,
                quantity: 1,
            })
            .await?;

        assert_eq!(session.store().cart().total_price(), 13_500);

        let removed = session
            .handle(Command::Quantity {
                line: 2,
                quantity: 0,
            })
            .await?;

        assert!(removed.contains("removed"), "expected removal message");
        assert_eq!(session.store().cart().len(), 1);

        let missing = session.handle(Command::Remove { line: 9 }).await?;
        assert!(missing.contains("No cart line"), "expected missing-line message");

        Ok(())
    }

    #[tokio::test]
    async fn status_reports_the_gate() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut session = session_with(Box::new(OfflineGateway), dir.path());

        let status = session.handle(Command::Status).await?;
        assert!(status.contains("Submit disabled"), "gate should be closed");

        _ = session
            .handle(Command::Add {
                entry: 1,
                quantity: 1,
            })
            .await?;
        fill_form(&mut session).await?;

        let status = session.handle(Command::Status).await?;
        assert!(status.contains("Ready to submit"), "gate should be open");

        Ok(())
    }

    #[tokio::test]
    async fn checkout_success_clears_cart_and_writes_receipt() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_create_order()
            .times(1)
            .returning(|_| Ok(OrderNumber::new("CMD-777").expect("valid number")));

        let mut session = session_with(Box::new(gateway), dir.path());

        _ = session
            .handle(Command::Add {
                entry: 1,
                quantity: 3,
            })
            .await?;
        fill_form(&mut session).await?;
        _ = session.handle(Command::Pay(PaymentMethod::TMoney)).await?;

        let message = session.handle(Command::Checkout).await?;

        assert!(message.contains("CMD-777"), "confirmation number missing");
        assert!(session.store().cart().is_empty(), "cart must be cleared");
        assert!(
            dir.path().join("recu-CMD-777.txt").exists(),
            "receipt file missing"
        );

        let reprint = session.handle(Command::Receipt).await?;
        assert!(reprint.contains("Tomates bio"), "reprint must show the snapshot");

        Ok(())
    }

    #[tokio::test]
    async fn checkout_rejection_keeps_cart_and_surfaces_message() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut gateway = MockOrderGateway::new();
        gateway
            .expect_create_order()
            .times(1)
            .returning(|_| Err(OrderGatewayError::Rejected("Stock insuffisant".to_string())));

        let mut session = session_with(Box::new(gateway), dir.path());

        _ = session
            .handle(Command::Add {
                entry: 1,
                quantity: 2,
            })
            .await?;
        fill_form(&mut session).await?;

        let message = session.handle(Command::Checkout).await?;

        assert!(
            message.contains("Stock insuffisant"),
            "rejection must surface verbatim"
        );
        assert_eq!(session.store().cart().len(), 1, "cart must be untouched");

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_closed_gate_never_submits() -> TestResult {
        let dir = tempfile::tempdir()?;

        // No expectations: any call would fail the test.
        let gateway = MockOrderGateway::new();
        let mut session = session_with(Box::new(gateway), dir.path());

        let message = session.handle(Command::Checkout).await?;

        assert!(
            message.contains("Cannot submit yet"),
            "expected gate message, got: {message}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn offline_gateway_reports_connection_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut session = session_with(Box::new(OfflineGateway), dir.path());

        _ = session
            .handle(Command::Add {
                entry: 1,
                quantity: 1,
            })
            .await?;
        fill_form(&mut session).await?;

        let message = session.handle(Command::Checkout).await?;

        assert!(
            message.contains("connection error"),
            "offline checkout must fail honestly, got: {message}"
        );
        assert_eq!(session.store().cart().len(), 1, "cart must be untouched");

        Ok(())
    }
}
