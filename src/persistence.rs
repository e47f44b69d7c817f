//! Cart persistence
//!
//! Stores the contents of a single cart between sessions. The file store uses
//! the canonical `CODE: QUANTITY` encoding, so saved carts can be read and
//! edited by hand.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::cart::{Cart, CartError};

/// Cart store errors
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The backing file could not be read or written.
    #[error("Failed to access cart store: {0}")]
    Io(#[from] io::Error),

    /// The stored cart could not be decoded.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Somewhere a cart can be saved and restored.
pub trait CartStore {
    /// Restore the stored cart. An empty store yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails or holds an invalid cart.
    fn load(&self) -> Result<Cart, CartStoreError>;

    /// Replace the stored cart with `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn save(&mut self, cart: &Cart) -> Result<(), CartStoreError>;

    /// Forget the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn clear(&mut self) -> Result<(), CartStoreError>;
}

/// In-memory store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    cart: Option<Cart>,
}

impl MemoryCartStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Cart, CartStoreError> {
        Ok(self.cart.clone().unwrap_or_default())
    }

    fn save(&mut self, cart: &Cart) -> Result<(), CartStoreError> {
        self.cart = Some(cart.clone());

        Ok(())
    }

    fn clear(&mut self) -> Result<(), CartStoreError> {
        self.cart = None;

        Ok(())
    }
}

/// Stores a cart in a text file.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    /// Store backed by the file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for FileCartStore {
    fn load(&self) -> Result<Cart, CartStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved cart");

                return Ok(Cart::new());
            }
            Err(err) => return Err(err.into()),
        };

        let cart: Cart = contents.parse()?;

        debug!(path = %self.path.display(), products = cart.len(), "loaded cart");

        Ok(cart)
    }

    fn save(&mut self, cart: &Cart) -> Result<(), CartStoreError> {
        fs::write(&self.path, cart.to_string())?;

        debug!(path = %self.path.display(), products = cart.len(), "saved cart");

        Ok(())
    }

    fn clear(&mut self) -> Result<(), CartStoreError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
