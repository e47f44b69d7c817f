//! Checkout Example
//!
//! Prices a cart against a fixture set and prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to pass the cart inline, e.g. `-c CAP:1,TSHIRT:4`
//! Use `--cart-file` to load a saved cart; combined with `-c` the inline cart is saved there instead

use std::io::{self, Write};

use anyhow::Result;

use clap::Parser;
use rusty_money::iso;
use storefront::{
    fixtures::Fixture,
    persistence::{CartStore, FileCartStore},
    receipt::Receipt,
    utils::{CheckoutArgs, init_logging},
};
use tracing::info;

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = CheckoutArgs::parse();

    init_logging(&args.logging)?;

    let fixture = Fixture::from_set(&args.fixture)?;
    let shop = fixture.shop()?;

    let cart = match (args.cart, args.cart_file) {
        (Some(cart), Some(path)) => {
            FileCartStore::new(path).save(&cart)?;
            cart
        }
        (Some(cart), None) => cart,
        (None, Some(path)) => FileCartStore::new(path).load()?,
        (None, None) => {
            println!("Cart is empty; pass --cart CODE:QTY,... or --cart-file PATH");
            return Ok(());
        }
    };

    info!(fixture = %args.fixture, products = cart.total_products(), "pricing cart");

    let receipt = Receipt::new(&shop, &cart)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle, iso::EUR)?;

    for hint in shop
        .offer_hints(&cart)?
        .into_iter()
        .filter(|hint| hint.more_needed > 0)
    {
        writeln!(
            handle,
            "Add {} more {} to unlock the {}",
            hint.more_needed,
            hint.product.name,
            hint.offer.name(hint.product)
        )?;
    }

    Ok(())
}
