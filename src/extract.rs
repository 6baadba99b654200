//! Typed full-table reads from the relational source.
//!
//! Rows are decoded into typed records once, here at the boundary;
//! nothing downstream touches raw result rows. All four tables are
//! read in full with no pagination, a known limit for very large
//! sources.

use crate::error::PipelineError;
use tokio_postgres::{Client, NoTls};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: i32,
    pub customer_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRow {
    pub order_id: i32,
    pub product_id: i32,
    pub qty: Option<i32>,
}

/// Everything the loader needs, in source-row form.
#[derive(Debug, Default)]
pub struct SourceTables {
    pub customers: Vec<CustomerRow>,
    pub products: Vec<ProductRow>,
    pub orders: Vec<OrderRow>,
    pub order_items: Vec<OrderItemRow>,
}

/// Open a Postgres connection, driving its I/O on a background task.
pub async fn connect(conn_string: &str) -> Result<Client, PipelineError> {
    let (client, connection) = tokio_postgres::connect(conn_string, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            warn!("Postgres connection task ended: {}", e);
        }
    });
    Ok(client)
}

/// Issue the four read queries and decode every row.
pub async fn extract_all(client: &Client) -> Result<SourceTables, PipelineError> {
    let mut customers = Vec::new();
    for row in client.query("SELECT id, name FROM customers", &[]).await? {
        customers.push(CustomerRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        });
    }

    let mut products = Vec::new();
    for row in client
        .query("SELECT id, name, category FROM products", &[])
        .await?
    {
        products.push(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
        });
    }

    let mut orders = Vec::new();
    for row in client
        .query("SELECT id, customer_id FROM orders", &[])
        .await?
    {
        orders.push(OrderRow {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
        });
    }

    let mut order_items = Vec::new();
    for row in client
        .query("SELECT order_id, product_id, qty FROM order_items", &[])
        .await?
    {
        order_items.push(OrderItemRow {
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            qty: row.try_get("qty")?,
        });
    }

    info!(
        "Extracted {} customers, {} products, {} orders, {} order items",
        customers.len(),
        products.len(),
        orders.len(),
        order_items.len()
    );

    Ok(SourceTables {
        customers,
        products,
        orders,
        order_items,
    })
}
