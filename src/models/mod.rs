pub mod work_order;

pub use work_order::{NewWorkOrder, Priority, Status, WorkOrder, WorkOrderPatch};
