// ==========================================
// 物流管理系统 - 订单跟踪仓储
// ==========================================
// 说明: 订单由订单子系统维护；发运服务只通过 OrderTracking
//       接口批量回写 “是否履约 + 发运文件 id”
// ==========================================

use crate::domain::shipment::Order;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

// ==========================================
// Trait: OrderTracking - 订单跟踪协作方
// ==========================================
pub trait OrderTracking: Send + Sync {
    /// 批量回写履约标记与发运文件 id
    ///
    /// # 契约
    /// - order_ids 为空: 不做任何修改，返回 Ok(0)
    /// - 返回去重后的订单数（重复 id 只更新并计数一次）
    /// - 整批在同一事务内生效；任一 id 不存在则整批回滚并返回错误
    fn update_fulfilled_and_shipment_id_for_orders(
        &self,
        order_ids: &[i64],
        fulfilled: bool,
        shipment_id: i64,
    ) -> RepositoryResult<usize>;
}

// ==========================================
// OrderRepository - 订单仓储
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, order: &Order) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO orders (id, status, fulfilled, shipmentId) VALUES (?1, ?2, ?3, ?4)",
            params![order.id, order.status, order.fulfilled, order.shipment_id],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Order>> {
        let conn = self.get_conn()?;
        let order = conn
            .query_row(
                "SELECT id, status, fulfilled, shipmentId FROM orders WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Order {
                        id: row.get(0)?,
                        status: row.get(1)?,
                        fulfilled: row.get(2)?,
                        shipment_id: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(order)
    }
}

impl OrderTracking for OrderRepository {
    fn update_fulfilled_and_shipment_id_for_orders(
        &self,
        order_ids: &[i64],
        fulfilled: bool,
        shipment_id: i64,
    ) -> RepositoryResult<usize> {
        if order_ids.is_empty() {
            return Ok(0);
        }

        let distinct: BTreeSet<i64> = order_ids.iter().copied().collect();

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut updated = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                UPDATE orders
                SET fulfilled = ?1, shipmentId = ?2, modifiedDate = datetime('now')
                WHERE id = ?3
                "#,
            )?;
            for order_id in &distinct {
                let affected = stmt.execute(params![fulfilled, shipment_id, order_id])?;
                if affected == 0 {
                    // tx 未提交，drop 时回滚整批
                    return Err(RepositoryError::not_found("Order", order_id));
                }
                updated += affected;
            }
        }

        tx.commit()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shipment::ShipmentFileInfo;
    use crate::repository::shipment_repo::ShipmentRepository;

    fn setup_test_db() -> (Arc<Mutex<Connection>>, i64) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let repo = OrderRepository::new(conn.clone());
        for id in 1..=3 {
            repo.insert(&Order::new(id, "RELEASED")).unwrap();
        }
        let shipment_id = ShipmentRepository::new(conn.clone())
            .insert_shipment_file_info(&ShipmentFileInfo::new("ship.csv", false))
            .unwrap();
        (conn, shipment_id)
    }

    #[test]
    fn test_bulk_update_stamps_every_order() {
        let (conn, shipment_id) = setup_test_db();
        let repo = OrderRepository::new(conn);

        let updated = repo
            .update_fulfilled_and_shipment_id_for_orders(&[1, 3], true, shipment_id)
            .unwrap();
        assert_eq!(updated, 2);

        for id in [1, 3] {
            let order = repo.find_by_id(id).unwrap().unwrap();
            assert_eq!(order.fulfilled, Some(true));
            assert_eq!(order.shipment_id, Some(shipment_id));
        }
        let untouched = repo.find_by_id(2).unwrap().unwrap();
        assert_eq!(untouched.fulfilled, None);
        assert_eq!(untouched.shipment_id, None);
    }

    #[test]
    fn test_empty_order_list_is_noop() {
        let (conn, shipment_id) = setup_test_db();
        let repo = OrderRepository::new(conn);

        let updated = repo
            .update_fulfilled_and_shipment_id_for_orders(&[], true, shipment_id)
            .unwrap();
        assert_eq!(updated, 0);
        assert_eq!(repo.find_by_id(1).unwrap().unwrap().fulfilled, None);
    }

    #[test]
    fn test_repeated_ids_count_once() {
        let (conn, shipment_id) = setup_test_db();
        let repo = OrderRepository::new(conn);

        let updated = repo
            .update_fulfilled_and_shipment_id_for_orders(&[2, 2, 2], true, shipment_id)
            .unwrap();
        assert_eq!(updated, 1);
        assert_eq!(repo.find_by_id(2).unwrap().unwrap().fulfilled, Some(true));
    }

    #[test]
    fn test_unknown_order_rolls_back_whole_batch() {
        let (conn, shipment_id) = setup_test_db();
        let repo = OrderRepository::new(conn);

        let err = repo
            .update_fulfilled_and_shipment_id_for_orders(&[1, 2, 404], false, shipment_id)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        for id in [1, 2] {
            let order = repo.find_by_id(id).unwrap().unwrap();
            assert_eq!(order.fulfilled, None);
            assert_eq!(order.shipment_id, None);
        }
    }

    #[test]
    fn test_unknown_shipment_is_storage_error() {
        let (conn, shipment_id) = setup_test_db();
        let repo = OrderRepository::new(conn);

        let err = repo
            .update_fulfilled_and_shipment_id_for_orders(&[1], true, shipment_id + 100)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
        assert_eq!(repo.find_by_id(1).unwrap().unwrap().shipment_id, None);
    }
}
