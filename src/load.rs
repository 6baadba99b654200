//! Batched graph loading.
//!
//! Five upsert passes in a fixed order: Category, Product
//! (+IN_CATEGORY), Customer, Order (+PLACED), CONTAINS. Each pass
//! sends one parameterized UNWIND statement per batch and every batch
//! is its own unit of work: there is no transaction spanning passes,
//! a failing batch aborts the run, and batches already applied stay
//! applied.
//!
//! CONTAINS.qty is additive across runs: replaying the pipeline over
//! unchanged source data leaves the graph identical except for qty,
//! which grows by one run's worth of quantities.

use crate::chunker::chunk;
use crate::error::PipelineError;
use crate::extract::{CustomerRow, OrderItemRow, OrderRow, ProductRow, SourceTables};
use crate::transform::{normalized_category, CategoryRecord};
use neo4rs::{query, BoltType, Graph};
use std::collections::HashMap;
use tracing::info;

// ============================================================================
// Configuration
// ============================================================================

/// Per-entity batch sizes. These bound statement payload size; they
/// are not a correctness requirement.
#[derive(Debug, Clone, Copy)]
pub struct BatchSizes {
    pub categories: usize,
    pub products: usize,
    pub customers: usize,
    pub orders: usize,
    pub order_items: usize,
}

impl Default for BatchSizes {
    fn default() -> Self {
        Self {
            categories: 100,
            products: 100,
            customers: 200,
            orders: 200,
            order_items: 500,
        }
    }
}

// ============================================================================
// Pass summaries
// ============================================================================

/// Outcome of a single load pass. `written` counts the rows the
/// statement carried through to its RETURN, so rows dropped by a
/// MATCH (an order without its customer, an item without its order or
/// product) show up as skipped instead of disappearing silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub pass: &'static str,
    pub attempted: usize,
    pub written: usize,
}

impl PassSummary {
    pub fn skipped(&self) -> usize {
        self.attempted.saturating_sub(self.written)
    }
}

/// One summary per pass, in execution order.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub categories: PassSummary,
    pub products: PassSummary,
    pub customers: PassSummary,
    pub orders: PassSummary,
    pub order_items: PassSummary,
}

impl LoadReport {
    pub fn passes(&self) -> [PassSummary; 5] {
        [
            self.categories,
            self.products,
            self.customers,
            self.orders,
            self.order_items,
        ]
    }
}

// ============================================================================
// Row maps
// ============================================================================

type BoltRow = HashMap<String, BoltType>;

fn category_row(category: &CategoryRecord) -> BoltRow {
    let mut m = HashMap::new();
    m.insert("name".to_string(), category.name.clone().into());
    m
}

/// The trimmed category doubles as the Product property and the
/// Category merge key; an absent or empty-after-trim category is
/// omitted from the map so the statement sees null.
fn product_row(product: &ProductRow) -> BoltRow {
    let mut m: BoltRow = HashMap::new();
    m.insert("id".to_string(), i64::from(product.id).into());
    m.insert("name".to_string(), product.name.clone().into());
    if let Some(category) = normalized_category(product) {
        m.insert("category".to_string(), category.to_string().into());
    }
    m
}

fn customer_row(customer: &CustomerRow) -> BoltRow {
    let mut m: BoltRow = HashMap::new();
    m.insert("id".to_string(), i64::from(customer.id).into());
    m.insert("name".to_string(), customer.name.clone().into());
    m
}

fn order_row(order: &OrderRow) -> BoltRow {
    let mut m: BoltRow = HashMap::new();
    m.insert("id".to_string(), i64::from(order.id).into());
    m.insert(
        "customer_id".to_string(),
        i64::from(order.customer_id).into(),
    );
    m
}

fn order_item_row(item: &OrderItemRow) -> BoltRow {
    let mut m: BoltRow = HashMap::new();
    m.insert("order_id".to_string(), i64::from(item.order_id).into());
    m.insert("product_id".to_string(), i64::from(item.product_id).into());
    if let Some(qty) = item.qty {
        m.insert("qty".to_string(), i64::from(qty).into());
    }
    m
}

// ============================================================================
// Pass statements
// ============================================================================

const CATEGORY_PASS: &str = "
    UNWIND $rows AS row
    MERGE (:Category {name: row.name})
    RETURN count(*) AS written";

const PRODUCT_PASS: &str = "
    UNWIND $rows AS row
    MERGE (p:Product {id: row.id})
    SET p.name = row.name, p.category = row.category
    WITH p, row
    CALL {
        WITH p, row
        WITH p, row WHERE row.category IS NOT NULL AND row.category <> ''
        MERGE (c:Category {name: row.category})
        MERGE (p)-[:IN_CATEGORY]->(c)
    }
    RETURN count(*) AS written";

/// Identity is enforced on id alone; name is a property write, so a
/// renamed customer updates in place instead of widening the merge key.
const CUSTOMER_PASS: &str = "
    UNWIND $rows AS row
    MERGE (c:Customer {id: row.id})
    SET c.name = row.name
    RETURN count(*) AS written";

/// The Order node is merged before the customer MATCH, so an order row
/// whose customer_id has no match still produces an orphan Order node
/// with no PLACED edge.
const ORDER_PASS: &str = "
    UNWIND $rows AS row
    MERGE (o:Order {id: row.id})
    WITH o, row
    MATCH (c:Customer {id: row.customer_id})
    MERGE (c)-[:PLACED]->(o)
    RETURN count(*) AS written";

/// Items whose order or product is missing fall out at the MATCHes and
/// are reported as skipped. qty accumulates: every run adds its value
/// (default 1 per occurrence) to whatever the edge already carries.
const ORDER_ITEM_PASS: &str = "
    UNWIND $rows AS row
    MATCH (o:Order {id: row.order_id})
    MATCH (p:Product {id: row.product_id})
    MERGE (o)-[r:CONTAINS]->(p)
    SET r.qty = coalesce(r.qty, 0) + coalesce(row.qty, 1)
    RETURN count(*) AS written";

// ============================================================================
// Passes
// ============================================================================

/// Run the five passes in order against already-extracted tables.
pub async fn load_all(
    graph: &Graph,
    categories: &[CategoryRecord],
    tables: &SourceTables,
    sizes: BatchSizes,
) -> Result<LoadReport, PipelineError> {
    let report = LoadReport {
        categories: load_categories(graph, categories, sizes.categories).await?,
        products: load_products(graph, &tables.products, sizes.products).await?,
        customers: load_customers(graph, &tables.customers, sizes.customers).await?,
        orders: load_orders(graph, &tables.orders, sizes.orders).await?,
        order_items: load_order_items(graph, &tables.order_items, sizes.order_items).await?,
    };
    info!("✅ Load complete");
    Ok(report)
}

async fn load_categories(
    graph: &Graph,
    categories: &[CategoryRecord],
    batch_size: usize,
) -> Result<PassSummary, PipelineError> {
    let rows: Vec<BoltRow> = categories.iter().map(category_row).collect();
    run_pass(graph, "category", CATEGORY_PASS, rows, batch_size).await
}

async fn load_products(
    graph: &Graph,
    products: &[ProductRow],
    batch_size: usize,
) -> Result<PassSummary, PipelineError> {
    let rows: Vec<BoltRow> = products.iter().map(product_row).collect();
    run_pass(graph, "product", PRODUCT_PASS, rows, batch_size).await
}

async fn load_customers(
    graph: &Graph,
    customers: &[CustomerRow],
    batch_size: usize,
) -> Result<PassSummary, PipelineError> {
    let rows: Vec<BoltRow> = customers.iter().map(customer_row).collect();
    run_pass(graph, "customer", CUSTOMER_PASS, rows, batch_size).await
}

async fn load_orders(
    graph: &Graph,
    orders: &[OrderRow],
    batch_size: usize,
) -> Result<PassSummary, PipelineError> {
    let rows: Vec<BoltRow> = orders.iter().map(order_row).collect();
    run_pass(graph, "order", ORDER_PASS, rows, batch_size).await
}

async fn load_order_items(
    graph: &Graph,
    order_items: &[OrderItemRow],
    batch_size: usize,
) -> Result<PassSummary, PipelineError> {
    let rows: Vec<BoltRow> = order_items.iter().map(order_item_row).collect();
    run_pass(graph, "order_item", ORDER_ITEM_PASS, rows, batch_size).await
}

async fn run_pass(
    graph: &Graph,
    pass: &'static str,
    cypher: &str,
    rows: Vec<BoltRow>,
    batch_size: usize,
) -> Result<PassSummary, PipelineError> {
    let attempted = rows.len();
    let mut written: usize = 0;

    for batch in chunk(rows, batch_size) {
        let q = query(cypher).param("rows", batch);
        let mut result = graph
            .execute(q)
            .await
            .map_err(|e| PipelineError::load(pass, e))?;
        if let Some(row) = result
            .next()
            .await
            .map_err(|e| PipelineError::load(pass, e))?
        {
            let count: i64 = row.get("written").unwrap_or(0);
            written += count as usize;
        }
    }

    let summary = PassSummary {
        pass,
        attempted,
        written,
    };
    info!(
        "   {} pass: attempted={} written={} skipped={}",
        pass,
        summary.attempted,
        summary.written,
        summary.skipped()
    );
    Ok(summary)
}
