// ==========================================
// 物流管理系统 - 发运领域模型
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ShippedLineItem - 发运行
// ==========================================
// 约束: (order_id, product_code) 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippedLineItem {
    pub id: Option<i64>,
    pub order_id: i64,
    pub product_code: String,
    pub quantity_shipped: i32,
    pub cost: Option<f64>,
    pub packed_date: Option<NaiveDateTime>,
    pub shipped_date: Option<NaiveDateTime>,
    pub modified_date: Option<NaiveDateTime>,
}

impl ShippedLineItem {
    pub fn new(order_id: i64, product_code: impl Into<String>, quantity_shipped: i32) -> Self {
        Self {
            id: None,
            order_id,
            product_code: product_code.into(),
            quantity_shipped,
            cost: None,
            packed_date: None,
            shipped_date: None,
            modified_date: None,
        }
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn packed_date(mut self, date: NaiveDateTime) -> Self {
        self.packed_date = Some(date);
        self
    }

    pub fn shipped_date(mut self, date: NaiveDateTime) -> Self {
        self.shipped_date = Some(date);
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

// ==========================================
// ShipmentFileInfo - 发运文件处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentFileInfo {
    pub id: Option<i64>,
    pub file_name: String,
    pub processing_error: bool,
    pub modified_date: Option<NaiveDateTime>,
}

impl ShipmentFileInfo {
    pub fn new(file_name: impl Into<String>, processing_error: bool) -> Self {
        Self {
            id: None,
            file_name: file_name.into(),
            processing_error,
            modified_date: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// 文件是否处理成功
    pub fn is_success(&self) -> bool {
        !self.processing_error
    }
}

// ==========================================
// Order - 订单（订单跟踪协作方的最小视图）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status: String,
    pub fulfilled: Option<bool>,
    pub shipment_id: Option<i64>,
}

impl Order {
    pub fn new(id: i64, status: impl Into<String>) -> Self {
        Self {
            id,
            status: status.into(),
            fulfilled: None,
            shipment_id: None,
        }
    }
}
