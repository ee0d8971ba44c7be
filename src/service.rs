//! The store's event loop.
//!
//! [`CartStore`] is single-threaded (`Rc` cells), so it lives on one
//! dedicated thread. Async callers hold a [`StoreHandle`] and send commands
//! over a channel; the thread runs each command to completion before taking
//! the next, so every reply is taken from a state with no operation half
//! applied.
//!
//! A command that panics is logged and dropped; its caller gets
//! [`StoreError::CommandFailed`] and the thread keeps serving. Once the
//! thread has exited every call fails with [`StoreError::Stopped`].

use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::Utc;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::{
        cart::{CartLine, CartSnapshot, QuantityInput},
        checkout::CheckoutSummary,
        products::{ProductCard, ProductList, ProductPage},
    },
    error::{StoreError, StoreResult},
    models::ProductRecord,
    store::{CartEntry, CartStore, QuantityPolicy},
};

const COMMAND_BUFFER: usize = 64;

/// A `+`/`-` press on a cart row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

enum Command {
    Products {
        offset: usize,
        limit: usize,
        reply: oneshot::Sender<ProductPage>,
    },
    Product {
        id: u64,
        reply: oneshot::Sender<StoreResult<ProductCard>>,
    },
    Cart {
        reply: oneshot::Sender<CartSnapshot>,
    },
    Add {
        id: u64,
        reply: oneshot::Sender<StoreResult<CartLine>>,
    },
    Remove {
        id: u64,
        reply: oneshot::Sender<StoreResult<CartLine>>,
    },
    SetQuantity {
        id: u64,
        quantity: QuantityInput,
        reply: oneshot::Sender<StoreResult<CartLine>>,
    },
    Step {
        id: u64,
        step: Step,
        reply: oneshot::Sender<StoreResult<CartLine>>,
    },
    Checkout {
        reply: oneshot::Sender<StoreResult<CheckoutSummary>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
    #[cfg(test)]
    Crash {
        reply: oneshot::Sender<()>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Products { .. } => "products",
            Command::Product { .. } => "product",
            Command::Cart { .. } => "cart",
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::SetQuantity { .. } => "set_quantity",
            Command::Step { .. } => "step",
            Command::Checkout { .. } => "checkout",
            Command::Shutdown { .. } => "shutdown",
            #[cfg(test)]
            Command::Crash { .. } => "crash",
        }
    }
}

/// Cloneable, `Send` handle to the store thread.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<Command>,
}

impl StoreHandle {
    /// Build the store from `records` on a fresh thread and start serving.
    ///
    /// Construction errors are returned here; the thread exits on them.
    pub async fn spawn(records: Vec<ProductRecord>, policy: QuantityPolicy) -> StoreResult<Self> {
        let (tx, mut rx) = mpsc::channel::<Command>(COMMAND_BUFFER);
        let (ready_tx, ready_rx) = oneshot::channel::<StoreResult<()>>();

        std::thread::Builder::new()
            .name("cart-store".to_string())
            .spawn(move || {
                let store = match CartStore::new(records, policy) {
                    Ok(store) => {
                        let _ = ready_tx.send(Ok(()));
                        store
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                while let Some(command) = rx.blocking_recv() {
                    if let Command::Shutdown { reply } = command {
                        rx.close();
                        let _ = reply.send(());
                        break;
                    }
                    let name = command.name();
                    // A panic drops the command's reply sender; the caller
                    // sees that as `CommandFailed`.
                    if catch_unwind(AssertUnwindSafe(|| handle(&store, command))).is_err() {
                        tracing::error!(command = name, "cart store command panicked");
                    }
                }
                tracing::info!("cart store thread stopped");
            })
            .map_err(|err| {
                tracing::error!(error = %err, "failed to start cart store thread");
                StoreError::Unavailable
            })?;

        ready_rx.await.map_err(|_| StoreError::Unavailable)??;
        Ok(Self { tx })
    }

    /// Whether the store thread still accepts commands.
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Stop the store thread. Commands already queued are dropped and every
    /// handle reports [`StoreError::Stopped`] afterwards.
    pub async fn shutdown(&self) {
        let (reply, done) = oneshot::channel();
        if self.tx.send(Command::Shutdown { reply }).await.is_ok() {
            let _ = done.await;
        }
    }

    pub async fn products(&self, offset: usize, limit: usize) -> StoreResult<ProductPage> {
        self.request(|reply| Command::Products {
            offset,
            limit,
            reply,
        })
        .await
    }

    pub async fn product(&self, id: u64) -> StoreResult<ProductCard> {
        self.request(|reply| Command::Product { id, reply }).await?
    }

    pub async fn cart(&self) -> StoreResult<CartSnapshot> {
        self.request(|reply| Command::Cart { reply }).await
    }

    pub async fn add_to_cart(&self, id: u64) -> StoreResult<CartLine> {
        self.request(|reply| Command::Add { id, reply }).await?
    }

    pub async fn remove_item(&self, id: u64) -> StoreResult<CartLine> {
        self.request(|reply| Command::Remove { id, reply }).await?
    }

    pub async fn set_quantity(&self, id: u64, quantity: QuantityInput) -> StoreResult<CartLine> {
        self.request(|reply| Command::SetQuantity {
            id,
            quantity,
            reply,
        })
        .await?
    }

    pub async fn step(&self, id: u64, step: Step) -> StoreResult<CartLine> {
        self.request(|reply| Command::Step { id, step, reply })
            .await?
    }

    pub async fn checkout(&self) -> StoreResult<CheckoutSummary> {
        self.request(|reply| Command::Checkout { reply }).await?
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> StoreResult<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| StoreError::Stopped)?;
        response.await.map_err(|_| {
            if self.is_running() {
                StoreError::CommandFailed
            } else {
                StoreError::Stopped
            }
        })
    }
}

fn handle(store: &CartStore, command: Command) {
    match command {
        Command::Products {
            offset,
            limit,
            reply,
        } => {
            let items = store
                .entries()
                .iter()
                .skip(offset)
                .take(limit)
                .map(ProductCard::from)
                .collect();
            let _ = reply.send(ProductPage {
                items: ProductList { items },
                total: store.entries().len(),
            });
        }
        Command::Product { id, reply } => {
            let _ = reply.send(store.require(id).map(ProductCard::from));
        }
        Command::Cart { reply } => {
            let _ = reply.send(CartSnapshot::capture(store));
        }
        Command::Add { id, reply } => {
            let result = store.add_to_cart_by_id(id).map(CartLine::from);
            if let Ok(line) = &result {
                log_audit("cart_add", Some(id), Some(json!({ "quantity": line.quantity })));
            }
            let _ = reply.send(result);
        }
        Command::Remove { id, reply } => {
            let result = store.remove_item_by_id(id).map(CartLine::from);
            if result.is_ok() {
                log_audit("cart_remove", Some(id), None);
            }
            let _ = reply.send(result);
        }
        Command::SetQuantity {
            id,
            quantity,
            reply,
        } => {
            let result = store.require(id).and_then(|entry| {
                match &quantity {
                    QuantityInput::Number(value) => store.set_quantity(entry, *value)?,
                    QuantityInput::Text(text) => store.set_quantity_input(entry, text)?,
                };
                Ok(CartLine::from(entry))
            });
            if let Ok(line) = &result {
                log_audit(
                    "cart_set_quantity",
                    Some(id),
                    Some(json!({ "quantity": line.quantity })),
                );
            }
            let _ = reply.send(result);
        }
        Command::Step { id, step, reply } => {
            let result = store.require(id).and_then(|entry| {
                match step {
                    Step::Up => store.increment(entry)?,
                    Step::Down => store.decrement(entry)?,
                };
                Ok(CartLine::from(entry))
            });
            if let Ok(line) = &result {
                log_audit(
                    "cart_step",
                    Some(id),
                    Some(json!({ "step": format!("{step:?}"), "quantity": line.quantity })),
                );
            }
            let _ = reply.send(result);
        }
        Command::Checkout { reply } => {
            let _ = reply.send(checkout(store));
        }
        Command::Shutdown { reply } => {
            let _ = reply.send(());
        }
        #[cfg(test)]
        Command::Crash { reply } => {
            let _reply = reply;
            panic!("store command blew up");
        }
    }
}

fn checkout(store: &CartStore) -> StoreResult<CheckoutSummary> {
    let items: Vec<CartEntry> = store.cart_items();
    if items.is_empty() {
        return Err(StoreError::EmptyCart);
    }
    let summary = CheckoutSummary {
        order_ref: Uuid::new_v4(),
        placed_at: Utc::now(),
        items: items.iter().map(CartLine::from).collect(),
        total_quantity: store.total_quantity(),
        total_price: store.total_price_display(),
    };
    log_audit(
        "checkout",
        None,
        Some(json!({ "order_ref": summary.order_ref, "total_price": summary.total_price })),
    );
    Ok(summary)
}
