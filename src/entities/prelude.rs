pub use super::users::Entity as Users;
pub use super::work_orders::Entity as WorkOrders;
