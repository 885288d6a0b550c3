// ==========================================
// 物流管理系统 - 发运数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::shipment::{ShipmentFileInfo, ShippedLineItem};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// ShipmentRepository - 发运仓储
// ==========================================
/// 发运仓储
/// 职责: 管理 shipped_line_items / shipment_file_info 表
pub struct ShipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShipmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入发运行
    ///
    /// # 错误
    /// - ForeignKeyViolation: 订单不存在
    /// - UniqueConstraintViolation: 同一订单同一产品已有发运行
    pub fn insert_shipped_line_item(&self, item: &ShippedLineItem) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO shipped_line_items (
                orderId, productCode, quantityShipped, cost, packedDate, shippedDate
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                item.order_id,
                item.product_code,
                item.quantity_shipped,
                item.cost,
                item.packed_date,
                item.shipped_date,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 全量更新发运行（按 id）
    ///
    /// # 错误
    /// - ValidationError: 发运行缺少 id
    /// - NotFound: id 不存在
    pub fn update_shipped_line_item(&self, item: &ShippedLineItem) -> RepositoryResult<()> {
        let id = item.id.ok_or_else(|| {
            RepositoryError::ValidationError("发运行缺少 id，无法更新".to_string())
        })?;

        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE shipped_line_items SET
                orderId = ?1,
                productCode = ?2,
                quantityShipped = ?3,
                cost = ?4,
                packedDate = ?5,
                shippedDate = ?6,
                modifiedDate = datetime('now')
            WHERE id = ?7
            "#,
            params![
                item.order_id,
                item.product_code,
                item.quantity_shipped,
                item.cost,
                item.packed_date,
                item.shipped_date,
                id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("ShippedLineItem", id));
        }
        Ok(())
    }

    /// 按订单 id 查询发运行（至多一条，取最早写入的）
    pub fn get_shipped_line_item_by_order_id(
        &self,
        order_id: i64,
    ) -> RepositoryResult<Option<ShippedLineItem>> {
        let conn = self.get_conn()?;
        let item = conn
            .query_row(
                r#"
                SELECT id, orderId, productCode, quantityShipped, cost,
                       packedDate, shippedDate, modifiedDate
                FROM shipped_line_items
                WHERE orderId = ?1
                ORDER BY id
                LIMIT 1
                "#,
                params![order_id],
                |row| {
                    Ok(ShippedLineItem {
                        id: Some(row.get(0)?),
                        order_id: row.get(1)?,
                        product_code: row.get(2)?,
                        quantity_shipped: row.get(3)?,
                        cost: row.get(4)?,
                        packed_date: row.get(5)?,
                        shipped_date: row.get(6)?,
                        modified_date: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(item)
    }

    /// 写入发运文件处理结果
    pub fn insert_shipment_file_info(&self, info: &ShipmentFileInfo) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO shipment_file_info (fileName, processingError) VALUES (?1, ?2)",
            params![info.file_name, info.processing_error],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_shipment_file_info_by_id(&self, id: i64) -> RepositoryResult<Option<ShipmentFileInfo>> {
        let conn = self.get_conn()?;
        let info = conn
            .query_row(
                "SELECT id, fileName, processingError, modifiedDate FROM shipment_file_info WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ShipmentFileInfo {
                        id: Some(row.get(0)?),
                        file_name: row.get(1)?,
                        processing_error: row.get(2)?,
                        modified_date: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shipment::Order;
    use crate::repository::order_repo::OrderRepository;
    use chrono::NaiveDate;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let orders = OrderRepository::new(conn.clone());
        orders.insert(&Order::new(1, "RELEASED")).unwrap();
        orders.insert(&Order::new(2, "RELEASED")).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_get_shipped_line_item() {
        let repo = ShipmentRepository::new(setup_test_db());
        let packed = NaiveDate::from_ymd_opt(2013, 9, 12)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        let id = repo
            .insert_shipped_line_item(
                &ShippedLineItem::new(1, "P10", 20).cost(12.5).packed_date(packed),
            )
            .unwrap();

        let item = repo.get_shipped_line_item_by_order_id(1).unwrap().unwrap();
        assert_eq!(item.id, Some(id));
        assert_eq!(item.product_code, "P10");
        assert_eq!(item.quantity_shipped, 20);
        assert_eq!(item.cost, Some(12.5));
        assert_eq!(item.packed_date, Some(packed));
        assert_eq!(item.shipped_date, None);

        assert!(repo.get_shipped_line_item_by_order_id(2).unwrap().is_none());
    }

    #[test]
    fn test_update_shipped_line_item() {
        let repo = ShipmentRepository::new(setup_test_db());
        let id = repo
            .insert_shipped_line_item(&ShippedLineItem::new(1, "P10", 20))
            .unwrap();

        repo.update_shipped_line_item(&ShippedLineItem::new(2, "P11", 7).with_id(id))
            .unwrap();

        assert!(repo.get_shipped_line_item_by_order_id(1).unwrap().is_none());
        let item = repo.get_shipped_line_item_by_order_id(2).unwrap().unwrap();
        assert_eq!(item.product_code, "P11");
        assert_eq!(item.quantity_shipped, 7);

        let err = repo
            .update_shipped_line_item(&ShippedLineItem::new(2, "P11", 7).with_id(id + 10))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        let err = repo
            .update_shipped_line_item(&ShippedLineItem::new(2, "P11", 7))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }

    #[test]
    fn test_shipped_line_item_requires_order() {
        let repo = ShipmentRepository::new(setup_test_db());
        let err = repo
            .insert_shipped_line_item(&ShippedLineItem::new(99, "P10", 1))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_insert_shipment_file_info() {
        let repo = ShipmentRepository::new(setup_test_db());
        let id = repo
            .insert_shipment_file_info(&ShipmentFileInfo::new("shipment_20130912.csv", false))
            .unwrap();

        let info = repo.find_shipment_file_info_by_id(id).unwrap().unwrap();
        assert_eq!(info.file_name, "shipment_20130912.csv");
        assert!(info.is_success());
        assert!(info.modified_date.is_some());
    }
}
