//! Built-in dashboard views: one declarative column table per view, grouped
//! by category tab.

use crate::column::{ColumnDef as C, FilterKind::*};
use crate::filter::{Comparison, FieldPredicate};
use crate::sort::Direction::*;
use crate::view::{ModeFilter, Tab, ViewDef};

const OPERATIONS: &str = "operations_updated.json";
const CUSTOMERS: &str = "customer-analytics.json";
const PRODUCTS: &str = "product-analytics.json";
const FORECASTING: &str = "forecasting-analytics.json";
const INVENTORY: &str = "inventory_new.json";
const FINANCE: &str = "finance.json";
const LOGISTICS: &str = "logistics.json";
const REPAIRS: &str = "repairs.json";
const MANAGEMENT: &str = "management.json";

pub fn registry() -> Vec<ViewDef> {
    let mut views = Vec::new();
    views.extend(sales());
    views.extend(inventory());
    views.extend(finance());
    views.extend(logistics());
    views.extend(repairs());
    views.extend(management());
    views
}

pub fn find<'a>(views: &'a [ViewDef], id: &str) -> Option<&'a ViewDef> {
    views.iter().find(|v| v.id == id)
}

fn sales() -> Vec<ViewDef> {
    vec![
        ViewDef::new("sales-orders", "Sales Orders", Tab::Sales, OPERATIONS, "/salesOrdersUpdated")
            .columns(vec![
                C::enumeration("soStatus", "SO Status").filter(Exact),
                C::date("soDate", "SO Date").filter(Range),
                C::text("soNbr", "SO Nbr").filter(Substring),
                C::text("customer", "Customer").filter(Substring),
                C::text("custRef", "Cust Ref"),
                C::text("employee", "Employee").filter(Substring),
                C::text("type", "Type"),
                C::text("pn", "PN").filter(Substring),
                C::text("pnDescription", "PN Description"),
                C::integer("qty", "Qty"),
                C::enumeration("condition", "Condition"),
                C::text("sl", "SL"),
                C::integer("qtyOrd", "Qty Ord"),
                C::integer("qtyInv", "Qty Inv"),
                C::currency("price", "Price"),
                C::currency("soTotal", "SO Total"),
                C::currency("soTyl", "SO TYL"),
                C::enumeration("invoiceStatus", "Invoice Status").filter(Exact),
                C::text("invoiceNbr", "Invoice Nbr"),
                C::date("postDate", "Post Date"),
                C::text("consignment", "Consignment").filter(Substring),
                C::text("mfgCode", "Mfg Code"),
                C::text("country", "Country"),
                C::text("poNbr", "PO Nbr"),
                C::text("poVendor", "PO Vendor"),
                C::enumeration("poStatus", "PO Status"),
                C::currency("poCost", "PO Cost"),
            ])
            .sorted_by("soDate", Descending)
            .search(&["soNbr", "customer", "employee", "pn", "consignment"]),
        ViewDef::new("quotes", "Quotes", Tab::Sales, OPERATIONS, "/quotes")
            .columns(vec![
                C::date("quoteDate", "Quote Date").filter(Range),
                C::text("quoteNbr", "CQ Number").filter(Substring),
                C::text("customer", "Customer").filter(Substring),
                C::text("employee", "Employee").filter(Substring),
                C::text("item", "Item"),
                C::text("partNumber", "Part Number").filter(Substring),
                C::text("partDesc", "Part Desc"),
                C::enumeration("businessType", "Business Type").filter(Exact),
                C::text("type", "Type"),
                C::enumeration("cond", "Cond"),
                C::text("stockLine", "Stock Line"),
                C::integer("qtyReq", "Qty Req"),
                C::enumeration("status", "Status").filter(Exact),
                C::integer("qtyQuoted", "Qty Quoted"),
                C::currency("amountQuoted", "Amount Quoted"),
                C::currency("quoteTotal", "Quote Total"),
                C::text("soNumber", "SO Number").nullable(),
                C::text("consignment", "Consignment").filter(Substring),
                C::text("mfgCode", "Mfg Code").filter(Substring),
            ])
            .sorted_by("quoteDate", Descending)
            .search(&["quoteNbr", "customer", "employee", "partNumber", "consignment", "mfgCode"]),
        ViewDef::new("customer-leaderboard", "Customer Leaderboard", Tab::Sales, CUSTOMERS, "/leaderboard")
            .columns(vec![
                C::text("name", "Customer").filter(Substring),
                C::currency("revenue", "Revenue"),
                C::integer("orders", "Orders"),
                C::currency("aov", "AOV"),
                C::percent("conversionRate", "Conversion Rate"),
                C::date("lastPurchase", "Last Purchase"),
                C::text("lastSONumber", "Last SO Number"),
                C::enumeration("region", "Region").filter(Exact),
            ])
            .sorted_by("revenue", Descending)
            .search(&["name", "region", "lastSONumber"]),
        ViewDef::new("product-leaderboard", "Product Leaderboard", Tab::Sales, PRODUCTS, "/leaderboard")
            .columns(vec![
                C::text("partNumber", "Part Number").filter(Substring),
                C::text("description", "Description"),
                C::currency("revenue", "Revenue"),
                C::integer("quantitySold", "Qty Sold"),
                C::integer("orders", "Orders"),
                C::currency("aov", "AOV"),
                C::percent("conversionRate", "Conversion Rate"),
                C::date("lastSoldDate", "Last Sold"),
                C::enumeration("category", "Category").filter(Exact),
            ])
            .sorted_by("revenue", Descending)
            .search(&["partNumber", "description"]),
        ViewDef::new("forecast-by-customer", "Forecast by Customer", Tab::Sales, FORECASTING, "/customerForecasts")
            .columns(vec![
                C::text("customer", "Customer").filter(Substring),
                C::currency("forecastedRevenue", "Forecasted Revenue"),
                C::currency("runRate", "Run Rate"),
                C::currency("varianceVsTarget", "Variance vs Target"),
                C::float("variancePercent", "Variance %"),
                C::enumeration("region", "Region").filter(Exact),
            ])
            .sorted_by("forecastedRevenue", Descending)
            .search(&["customer"]),
        ViewDef::new("forecast-by-product", "Forecast by Product", Tab::Sales, FORECASTING, "/productForecasts")
            .columns(vec![
                C::text("partNumber", "Part Number").filter(Substring),
                C::text("productName", "Product"),
                C::currency("forecastedRevenue", "Forecasted Revenue"),
                C::integer("forecastedQuantity", "Forecasted Qty"),
                C::enumeration("confidenceLevel", "Confidence").filter(Exact),
                C::enumeration("category", "Category").filter(Exact),
            ])
            .sorted_by("forecastedRevenue", Descending)
            .search(&["partNumber", "productName"]),
    ]
}

fn inventory() -> Vec<ViewDef> {
    vec![
        ViewDef::new("inventory-overview", "Inventory Overview", Tab::Inventory, INVENTORY, "/overview/inventory")
            .columns(vec![
                C::text("partNumber", "PN").filter(Substring),
                C::text("description", "Description"),
                C::text("conditionCode", "Condition").filter(Substring),
                C::integer("qtyAvailable", "Qty Available"),
                C::integer("qtyOnHand", "Qty On Hand"),
                C::integer("qtyOnRepair", "Qty on Repair"),
                C::text("roNumber", "RO Number").nullable(),
                C::text("soNumber", "SO Number").nullable().filter(Substring),
                C::text("stockLine", "Stock Line"),
                C::text("serialNumber", "Serial Number"),
                C::currency("itemCost", "Item Cost"),
                C::currency("repairCost", "Repair Cost"),
                C::integer("aging", "Aging").filter(Range),
                C::date("recDate", "Rec Date").filter(Range),
                C::text("applicationCode", "Application"),
                C::text("mfgCode", "Mfg").filter(Substring),
                C::text("consignmentCode", "Consignment").filter(Substring),
                C::text("lot", "Lot").filter(Substring),
                C::text("warehouseCode", "Warehouse").filter(Substring),
                C::text("locationCode", "Location").filter(Substring),
            ])
            .sorted_by("recDate", Descending)
            .search(&["partNumber", "description", "serialNumber"]),
        ViewDef::new("lots-distribution", "Lots & Stock Distribution", Tab::Inventory, INVENTORY, "/lotsDistribution/lots")
            .columns(vec![
                C::text("lotNumber", "Lot Number").filter(Substring),
                C::text("consignment", "Consignment").filter(Substring),
                C::currency("originalCost", "Original Cost"),
                C::currency("totalItemRepairCost", "Total Item Repair Cost"),
                C::currency("remainingRepairCost", "Remaining Repair Cost"),
                C::currency("totalCostSoldItems", "Total Cost of Sold Items"),
                C::currency("totalLotCost", "Total Lot Cost"),
                C::currency("totalSalesVolume", "Total Sales Volume"),
            ])
            .sorted_by("lotNumber", Ascending)
            .search(&["lotNumber", "consignment"]),
        ViewDef::new("ro-incoming", "RO Incoming", Tab::Inventory, INVENTORY, "/incomingParts/roIncoming")
            .columns(vec![
                C::text("roNumber", "RO Number").filter(Substring),
                C::text("partNumber", "PN").filter(Substring),
                C::text("serial", "Serial"),
                C::integer("qty", "Qty"),
                C::currency("totalCost", "Total Cost"),
                C::date("recDate", "Rec Date").filter(Range),
                C::enumeration("condition", "Condition").filter(Exact),
                C::text("consignment", "Consignment"),
                C::text("taggedBy", "Tagged By"),
            ])
            .sorted_by("recDate", Descending)
            .search(&["roNumber", "partNumber", "serial"]),
        ViewDef::new("po-incoming", "PO Incoming", Tab::Inventory, INVENTORY, "/incomingParts/poIncoming")
            .columns(vec![
                C::text("poNumber", "PO Number").filter(Substring),
                C::text("partNumber", "PN").filter(Substring),
                C::text("serial", "Serial"),
                C::integer("qty", "Qty"),
                C::currency("unitCost", "Unit Cost"),
                C::date("recDate", "Rec Date").filter(Range),
                C::enumeration("condition", "Condition").filter(Exact),
                C::text("consignment", "Consignment"),
                C::text("taggedBy", "Tagged By"),
            ])
            .sorted_by("recDate", Descending)
            .search(&["poNumber", "partNumber", "serial"]),
        ViewDef::new("low-stock-alerts", "Low Stock Alerts", Tab::Inventory, INVENTORY, "/alerts/lowStockAlerts")
            .columns(vec![
                C::text("partNumber", "Part Number").filter(Substring),
                C::text("description", "Description"),
                C::integer("currentStock", "Current Stock"),
                C::integer("reorderPoint", "Reorder Point"),
                C::text("supplier", "Supplier").filter(Substring),
                C::currency("stockValue", "Stock Value"),
                C::date("lastSale", "Last Sale"),
                C::enumeration("category", "Category").filter(Exact),
                C::text("warehouse", "Warehouse"),
                C::enumeration("urgency", "Urgency").filter(Exact),
            ])
            .sorted_by("currentStock", Ascending)
            .search(&["partNumber", "description", "supplier"]),
        ViewDef::new("aging-inventory-alerts", "Aging Inventory Alerts", Tab::Inventory, INVENTORY, "/alerts/agingInventoryAlerts")
            .columns(vec![
                C::text("partNumber", "Part Number").filter(Substring),
                C::text("description", "Description"),
                C::integer("daysInStock", "Days in Stock").filter(Range),
                C::integer("quantity", "Quantity"),
                C::currency("stockValue", "Stock Value"),
                C::date("lastMovement", "Last Movement"),
                C::enumeration("condition", "Condition").filter(Exact),
                C::text("consignment", "Consignment"),
                C::text("warehouse", "Warehouse"),
                C::enumeration("category", "Category").filter(Exact),
                C::enumeration("riskLevel", "Risk Level").filter(Exact),
            ])
            .sorted_by("daysInStock", Descending)
            .search(&["partNumber", "description"])
            .mode(
                ModeFilter::new("age")
                    .option("all", vec![])
                    .option("> 270 days", vec![FieldPredicate::threshold("daysInStock", Comparison::Gt, 270.0)])
                    .option("> 365 days", vec![FieldPredicate::threshold("daysInStock", Comparison::Gt, 365.0)]),
            ),
    ]
}

fn late_payments(status: &str) -> ModeFilter {
    ModeFilter::new("late payments")
        .option("all", vec![])
        .option("overdue", vec![FieldPredicate::exact(status, "Overdue")])
        .option("late", vec![FieldPredicate::threshold("aging", Comparison::Ge, 30.0)])
}

fn finance() -> Vec<ViewDef> {
    vec![
        ViewDef::new("account-payables", "Account Payables", Tab::Finance, FINANCE, "/accountPayables/payables")
            .columns(vec![
                C::text("apCtrlNumber", "AP Ctrl Number").filter(Substring),
                C::date("vendInvDate", "Vend Inv Date"),
                C::text("vendInvNbr", "Vend Inv Nbr"),
                C::text("company", "Company").filter(Substring),
                C::text("companyCode", "Company Code"),
                C::text("poNbr", "PO Nbr").nullable(),
                C::text("roNbr", "RO Nbr").nullable(),
                C::text("consignment", "Consignment").filter(Substring),
                C::date("entryDate", "Entry Date").filter(Range),
                C::date("lastPayDate", "Last Pay Date").nullable(),
                C::date("dueDate", "Due Date"),
                C::integer("aging", "Aging"),
                C::enumeration("currency", "Currency"),
                C::currency("amount", "Amount"),
                C::currency("balance", "Balance"),
                C::text("terms", "Terms"),
                C::enumeration("status", "Status").filter(Exact),
            ])
            .sorted_by("dueDate", Ascending)
            .search(&["apCtrlNumber", "company", "vendInvNbr"])
            .mode(late_payments("status")),
        ViewDef::new("account-receivables", "Account Receivables", Tab::Finance, FINANCE, "/accountReceivables/receivables")
            .columns(vec![
                C::text("arCtrlNumber", "AR Ctrl Nbr").filter(Substring),
                C::text("customer", "Customer").filter(Substring),
                C::text("companyCode", "Company Code"),
                C::text("description", "Description"),
                C::text("consignmentCode", "Consignment Code").filter(Substring),
                C::date("entryDate", "Entry Date"),
                C::date("finalDate", "Final Date"),
                C::date("invoiceDate", "Invoice Date").nullable().filter(Range),
                C::date("dueDate", "Due Date"),
                C::integer("aging", "Aging"),
                C::date("lastPayDate", "Last Pay Date").nullable(),
                C::currency("invoiceAmount", "Invoice Amount"),
                C::currency("balance", "Balance"),
                C::enumeration("status", "Status").filter(Exact),
            ])
            .sorted_by("dueDate", Ascending)
            .search(&["arCtrlNumber", "customer", "description"])
            .mode(late_payments("status")),
        ViewDef::new("overdue-receivables", "Overdue Receivables", Tab::Finance, FINANCE, "/latePayments/overdueReceivables")
            .columns(vec![
                C::text("arCtrlNumber", "AR #").filter(Substring),
                C::text("customer", "Customer").filter(Substring),
                C::currency("amount", "Amount"),
                C::integer("aging", "Aging").filter(Range),
                C::date("dueDate", "Due Date"),
                C::text("company", "Company"),
            ])
            .sorted_by("aging", Descending)
            .search(&["arCtrlNumber", "customer"]),
        ViewDef::new("overdue-payables", "Overdue Payables", Tab::Finance, FINANCE, "/latePayments/overduePayables")
            .columns(vec![
                C::text("apCtrlNumber", "AP #").filter(Substring),
                C::text("vendor", "Vendor").filter(Substring),
                C::currency("amount", "Amount"),
                C::integer("aging", "Aging").filter(Range),
                C::date("dueDate", "Due Date"),
                C::text("company", "Company"),
            ])
            .sorted_by("aging", Descending)
            .search(&["apCtrlNumber", "vendor"]),
        ViewDef::new("monthly-finance-summary", "Monthly Finance Summary", Tab::Finance, FINANCE, "/monthlySummary/monthlyData")
            .columns(vec![
                C::date("month", "Month").filter(Range),
                C::currency("revenue", "Revenue"),
                C::currency("expenses", "Expenses"),
                C::currency("netProfit", "Net Profit"),
                C::currency("openAR", "Open AR"),
                C::currency("openAP", "Open AP"),
            ])
            .sorted_by("month", Ascending),
    ]
}

fn logistics() -> Vec<ViewDef> {
    let shipment_columns = || {
        vec![
            C::text("shipNo", "Ship No").filter(Substring),
            C::date("openDate", "Open Date"),
            C::enumeration("status", "Status").filter(Exact),
            C::date("shipDate", "Ship Date").nullable().filter(Range),
            C::text("shipViaAirwayBill", "Ship Via & Airway Bill").nullable().filter(Substring),
            C::text("partNumber", "PN"),
            C::integer("qtyInv", "Qty Inv"),
            C::integer("qtyRes", "Qty Res"),
            C::enumeration("company", "Company").filter(Exact),
            C::text("country", "Country"),
            C::enumeration("shipType", "Ship Type"),
            C::text("soNumber", "SO").nullable(),
            C::text("roNumber", "RO").nullable(),
            C::enumeration("warehouse", "Warehouse").filter(Exact),
        ]
    };

    vec![
        ViewDef::new("logistics-overview", "Repair Order Logistics", Tab::Logistics, LOGISTICS, "/repairOrderOverview/logisticsOrders")
            .columns(vec![
                C::text("pn", "PN").filter(Substring),
                C::text("upgradeTo", "Upgrade To").nullable(),
                C::text("stockLine", "Stock Line"),
                C::enumeration("condition", "Condition"),
                C::text("serialNumber", "Serial Number"),
                C::text("manifest", "Manifest"),
                C::currency("totalYield", "Total Yield"),
                C::integer("sold", "Sold"),
                C::integer("stock", "Stock"),
                C::text("repairShop", "Repair Shop").filter(Substring),
                C::text("roNumber", "RO Number").filter(Substring),
                C::date("roDate", "RO Date").filter(Range),
                C::date("shipDate", "Ship Date").nullable(),
                C::integer("daysROToShip", "Days RO to Ship").nullable(),
                C::enumeration("status", "Status").filter(Exact),
                C::text("awbWHToRS", "AWB WH to RS").nullable(),
                C::date("receivedAtShop", "Received at Shop").nullable(),
                C::text("awbRSToWH", "AWB RS to WH").nullable(),
                C::text("warehouse", "Warehouse"),
                C::text("rsToWHSCUT", "RS to WH SCUT").nullable(),
                C::text("location", "Location"),
                C::text("awbToCust", "AWB to Cust").nullable(),
                C::currency("freightOut", "Freight Out").nullable(),
                C::currency("freightIn", "Freight In").nullable(),
                C::text("consignment", "Consignment"),
                C::text("lot", "Lot"),
            ])
            .sorted_by("roDate", Descending)
            .search(&["pn", "roNumber", "repairShop", "serialNumber"]),
        ViewDef::new("open-shipments", "Open Shipments", Tab::Logistics, LOGISTICS, "/shippingMonitor/openShipments")
            .columns(shipment_columns())
            .sorted_by("openDate", Descending)
            .search(&["shipNo", "partNumber", "shipViaAirwayBill"]),
        ViewDef::new("closed-shipments", "Closed Shipments", Tab::Logistics, LOGISTICS, "/shippingMonitor/closedShipments")
            .columns(shipment_columns())
            .sorted_by("openDate", Descending)
            .search(&["shipNo", "partNumber", "shipViaAirwayBill"]),
        ViewDef::new("stuck-packing-shipments", "Stuck in Packing", Tab::Logistics, LOGISTICS, "/alertsExceptions/stuckPackingShipments")
            .columns(vec![
                C::text("shipNo", "Ship No").filter(Substring),
                C::text("partNumber", "PN"),
                C::text("company", "Company").filter(Substring),
                C::enumeration("shipType", "Ship Type"),
                C::enumeration("warehouse", "Warehouse").filter(Exact),
                C::integer("daysInPacking", "Days in Packing").filter(Range),
                C::date("openDate", "Open Date"),
                C::date("expectedShipDate", "Expected Ship Date"),
                C::enumeration("priority", "Priority").filter(Exact),
                C::text("soNumber", "SO Number").nullable(),
                C::text("roNumber", "RO Number").nullable(),
            ])
            .sorted_by("daysInPacking", Descending)
            .search(&["shipNo", "partNumber", "company"]),
    ]
}

fn repairs() -> Vec<ViewDef> {
    vec![
        ViewDef::new("repair-orders", "Repair Order Details", Tab::Repairs, REPAIRS, "/roDetails/repairOrders")
            .columns(vec![
                C::date("roDate", "RO Date").filter(Range),
                C::enumeration("status", "Status").filter(Exact),
                C::integer("aging", "Aging"),
                C::text("roNumber", "RO Number").filter(Substring),
                C::text("roShop", "RO Shop").filter(Substring),
                C::text("item", "Item"),
                C::text("pnOut", "PN Out"),
                C::text("pnIn", "PN In"),
                C::text("description", "Description"),
                C::text("serialNumber", "Serial Number"),
                C::integer("qtyReser", "Qty Reser"),
                C::integer("qtyRepaired", "Qty Repaired"),
                C::float("repairCost", "Repair Cost"),
                C::float("freight", "Freight"),
                C::text("retCond", "Ret Cond"),
                C::text("lot", "Lot"),
                C::text("soNumber", "SO Number"),
                C::text("whs", "WHS"),
                C::date("nextDelDate", "Next Del Date"),
                C::integer("dayShip", "Day Ship"),
                C::float("scrapPercent", "Scrap %"),
            ])
            .sorted_by("roDate", Descending)
            .search(&["pnOut", "pnIn"]),
        ViewDef::new("tat-analysis", "TAT Analysis", Tab::Repairs, REPAIRS, "/tatAnalysis/tatRecords")
            .columns(vec![
                C::text("roNumber", "RO Number").filter(Substring),
                C::text("roShop", "RO Shop").filter(Substring),
                C::date("roDate", "RO Date").filter(Range),
                C::date("shipDate", "Ship Date"),
                C::date("deliveryDate", "Delivery Date"),
                C::integer("tatInternal", "TAT Internal").filter(Range),
                C::integer("tatExternal", "TAT External").filter(Range),
            ])
            .sorted_by("roDate", Descending)
            .search(&["roNumber", "roShop"]),
        ViewDef::new("scrap-quality", "Scrap & Quality", Tab::Repairs, REPAIRS, "/scrapQuality/scrapEvents")
            .columns(vec![
                C::text("partNumber", "PN").filter(Substring),
                C::text("roShop", "RO Shop").filter(Substring),
                C::float("avgScrapPercent", "Avg Scrap %"),
                C::integer("scrapCount", "Scrap Count"),
            ])
            .sorted_by("scrapCount", Descending)
            .search(&["partNumber", "roShop"]),
        ViewDef::new("vendor-recap", "Vendor Recap", Tab::Repairs, REPAIRS, "/vendorInsights/vendorRecap")
            .columns(vec![
                C::text("roShop", "RO Shop").filter(Substring),
                C::integer("qtyOfROs", "Qty of ROs"),
                C::currency("totalROAmount", "Total RO Amount"),
            ])
            .sorted_by("totalROAmount", Descending),
    ]
}

fn management() -> Vec<ViewDef> {
    vec![
        ViewDef::new("purchase-orders", "Purchase Orders", Tab::Management, OPERATIONS, "/purchaseOrders")
            .columns(vec![
                C::enumeration("poStatus", "PO Status"),
                C::integer("ageOfPO", "Age of PO"),
                C::integer("daysPastDeliveryDate", "Days Past Delivery"),
                C::date("poDate", "PO Date").filter(Range),
                C::date("nextDeliveryDate", "Next Delivery Date"),
                C::text("poNumber", "PO Number").filter(Substring),
                C::text("vendor", "Vendor").filter(Substring),
                C::text("voNumber", "VO Number"),
                C::text("type", "Type"),
                C::text("item", "Item"),
                C::text("pn", "PN").filter(Substring),
                C::text("description", "Description"),
                C::integer("qtyOrdered", "Qty Ordered"),
                C::integer("qtyBackOrdered", "Qty Back Ordered"),
                C::currency("costEA", "Cost EA"),
                C::text("employee", "Employee").filter(Substring),
            ])
            .sorted_by("poDate", Descending)
            .search(&["poNumber", "employee", "vendor", "pn"])
            .mode(
                ModeFilter::new("po status")
                    .option("open", vec![FieldPredicate::exact("poStatus", "Open")])
                    .option("closed", vec![FieldPredicate::exact("poStatus", "Closed")]),
            )
            .mode(
                ModeFilter::new("aging")
                    .option("all", vec![])
                    .option("on time", vec![FieldPredicate::threshold("daysPastDeliveryDate", Comparison::Le, 0.0)])
                    .option("late", vec![FieldPredicate::threshold("daysPastDeliveryDate", Comparison::Gt, 0.0)]),
            ),
        ViewDef::new("employee-performance", "Employee Performance", Tab::Management, MANAGEMENT, "/executiveOverview/employeePerformance")
            .columns(vec![
                C::text("name", "Employee").filter(Substring),
                C::currency("salesAmount", "Sales Amount"),
                C::integer("quotesCount", "Quotes"),
                C::float("conversionPercent", "Conversion %"),
                C::currency("totalAmount", "Total Amount"),
            ])
            .sorted_by("totalAmount", Descending),
        ViewDef::new("exceptions-alerts", "Exceptions & Alerts", Tab::Management, MANAGEMENT, "/executiveOverview/exceptionsAlerts")
            .columns(vec![
                C::enumeration("type", "Type").filter(Exact),
                C::enumeration("department", "Department").filter(Exact),
                C::text("description", "Description").filter(Substring),
                C::enumeration("status", "Status").filter(Exact),
            ])
            .sorted_by("status", Ascending)
            .search(&["description", "type"]),
    ]
}
