//! Orders and their line items: pending-order reads and order intake.

use std::collections::HashMap;

use foodcart_core::{NewOrder, Order, OrderLine, OrderStatus, PaymentMethod};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `orders` table. Status and payment method are stored as codes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub status: String,
    pub payment_method: String,
    pub comment: String,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderLineRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderRow {
    /// Converts the row into a domain [`Order`] carrying `lines`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidValue`] if the status or payment code is unknown.
    pub fn into_order(self, lines: Vec<OrderLine>) -> Result<Order, DbError> {
        let status = OrderStatus::from_code(&self.status).ok_or_else(|| DbError::InvalidValue {
            column: "orders.status",
            value: self.status.clone(),
            id: self.id,
        })?;
        let payment_method = PaymentMethod::from_code(&self.payment_method).ok_or_else(|| {
            DbError::InvalidValue {
                column: "orders.payment_method",
                value: self.payment_method.clone(),
                id: self.id,
            }
        })?;

        Ok(Order {
            id: self.id,
            firstname: self.firstname,
            lastname: self.lastname,
            phonenumber: self.phonenumber,
            address: self.address,
            status,
            payment_method,
            comment: self.comment,
            lines,
        })
    }
}

impl TryFrom<OrderLineRow> for OrderLine {
    type Error = DbError;

    fn try_from(row: OrderLineRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| DbError::InvalidValue {
            column: "order_items.quantity",
            value: row.quantity.to_string(),
            id: row.order_id,
        })?;
        Ok(Self {
            product_id: row.product_id,
            quantity,
            price: row.price,
        })
    }
}

/// Returns every order whose status is not `done`, ordered by id, with lines attached.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails, or [`DbError::InvalidValue`]
/// if a stored code cannot be mapped.
pub async fn list_pending_orders(pool: &PgPool) -> Result<Vec<Order>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT id, firstname, lastname, phonenumber, address, status, payment_method, comment \
         FROM orders \
         WHERE status <> 'done' \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let line_rows = sqlx::query_as::<_, OrderLineRow>(
        "SELECT order_id, product_id, quantity, price \
         FROM order_items \
         WHERE order_id = ANY($1) \
         ORDER BY order_id, id",
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let mut lines_by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for line in line_rows {
        let order_id = line.order_id;
        lines_by_order
            .entry(order_id)
            .or_default()
            .push(OrderLine::try_from(line)?);
    }

    rows.into_iter()
        .map(|row| {
            let lines = lines_by_order.remove(&row.id).unwrap_or_default();
            row.into_order(lines)
        })
        .collect()
}

/// Stores a validated order with status `not_processed` and payment `cash`.
///
/// Each line is priced at the product's current price. The order and its
/// lines are written in one transaction.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if a line names an unknown product (nothing
/// is written), [`DbError::InvalidValue`] if a quantity does not fit the
/// column, or [`DbError::Sqlx`] if a query fails.
pub async fn insert_order(pool: &PgPool, order: &NewOrder) -> Result<Order, DbError> {
    let mut tx = pool.begin().await?;

    let product_ids: Vec<i64> = order.lines.iter().map(|line| line.product_id).collect();
    let prices: HashMap<i64, Decimal> = sqlx::query_as::<_, (i64, Decimal)>(
        "SELECT id, price FROM products WHERE id = ANY($1)",
    )
    .bind(&product_ids)
    .fetch_all(&mut *tx)
    .await?
    .into_iter()
    .collect();

    let mut lines = Vec::with_capacity(order.lines.len());
    let mut quantities = Vec::with_capacity(order.lines.len());
    for line in &order.lines {
        let price = *prices.get(&line.product_id).ok_or(DbError::NotFound {
            entity: "product",
            id: line.product_id,
        })?;
        let quantity = i32::try_from(line.quantity).map_err(|_| DbError::InvalidValue {
            column: "order_items.quantity",
            value: line.quantity.to_string(),
            id: line.product_id,
        })?;
        quantities.push(quantity);
        lines.push(OrderLine {
            product_id: line.product_id,
            quantity: line.quantity,
            price,
        });
    }

    let status = OrderStatus::NotProcessed;
    let payment_method = PaymentMethod::Cash;
    let order_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (firstname, lastname, phonenumber, address, status, payment_method) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(&order.firstname)
    .bind(&order.lastname)
    .bind(&order.phonenumber)
    .bind(&order.address)
    .bind(status.code())
    .bind(payment_method.code())
    .fetch_one(&mut *tx)
    .await?;

    let line_prices: Vec<Decimal> = lines.iter().map(|line| line.price).collect();
    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, price) \
         SELECT $1, product_id, quantity, price \
         FROM UNNEST($2::bigint[], $3::int[], $4::numeric[]) AS t(product_id, quantity, price)",
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&line_prices)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(order_id, lines = lines.len(), "order registered");
    Ok(Order {
        id: order_id,
        firstname: order.firstname.clone(),
        lastname: order.lastname.clone(),
        phonenumber: order.phonenumber.clone(),
        address: order.address.clone(),
        status,
        payment_method,
        comment: String::new(),
        lines,
    })
}
