// ==========================================
// 物流管理系统 - 发运 API
// ==========================================
// 职责: 发运行 / 发运文件写入的直通转发，
//       以及向订单跟踪协作方批量回写履约结果
// ==========================================

use std::sync::Arc;

use crate::api::error::{require_positive_id, ApiError, ApiResult};
use crate::domain::shipment::{ShipmentFileInfo, ShippedLineItem};
use crate::repository::order_repo::OrderTracking;
use crate::repository::shipment_repo::ShipmentRepository;

/// 发运API
pub struct ShipmentApi {
    shipment_repo: Arc<ShipmentRepository>,
    order_tracking: Arc<dyn OrderTracking>,
}

impl ShipmentApi {
    pub fn new(shipment_repo: Arc<ShipmentRepository>, order_tracking: Arc<dyn OrderTracking>) -> Self {
        Self {
            shipment_repo,
            order_tracking,
        }
    }

    pub fn insert_shipped_line_item(&self, item: &ShippedLineItem) -> ApiResult<i64> {
        Ok(self.shipment_repo.insert_shipped_line_item(item)?)
    }

    pub fn insert_shipment_file_info(&self, info: &ShipmentFileInfo) -> ApiResult<i64> {
        let id = self.shipment_repo.insert_shipment_file_info(info)?;
        tracing::info!(shipment_id = id, success = info.is_success(), "发运文件已登记: {}", info.file_name);
        Ok(id)
    }

    /// 批量回写订单的履约标记与发运文件 id
    ///
    /// # 参数
    /// - order_ids: 订单 id 列表（为空时不做任何修改）
    /// - shipment_file_info: 已写入的发运文件（须带 id）
    ///
    /// # 返回
    /// - Ok(usize): 更新的订单数；整批成功才返回
    /// - Err: 整批失败（协作方已回滚），调用方需整批重试
    pub fn update_fulfilled_flag_and_shipment_id_for_orders(
        &self,
        order_ids: &[i64],
        shipment_file_info: &ShipmentFileInfo,
    ) -> ApiResult<usize> {
        if order_ids.is_empty() {
            tracing::debug!("订单列表为空，跳过履约回写");
            return Ok(0);
        }

        let shipment_id = shipment_file_info.id.ok_or_else(|| {
            ApiError::ValidationError("发运文件缺少 id，需先写入发运文件".to_string())
        })?;

        let updated = self
            .order_tracking
            .update_fulfilled_and_shipment_id_for_orders(
                order_ids,
                shipment_file_info.is_success(),
                shipment_id,
            )
            .map_err(|e| {
                tracing::warn!(shipment_id, orders = order_ids.len(), "订单履约回写失败(整批): {}", e);
                ApiError::from(e)
            })?;

        tracing::info!(shipment_id, updated, "订单履约回写完成");
        Ok(updated)
    }

    pub fn get_shipped_line_item_by_order_id(&self, order_id: i64) -> ApiResult<Option<ShippedLineItem>> {
        require_positive_id("orderId", order_id)?;
        Ok(self.shipment_repo.get_shipped_line_item_by_order_id(order_id)?)
    }

    pub fn update_shipped_line_item(&self, item: &ShippedLineItem) -> ApiResult<()> {
        Ok(self.shipment_repo.update_shipped_line_item(item)?)
    }
}
