pub mod auth_service;
pub use auth_service::{AuthError, AuthService, LoginGate};

pub mod auth_service_impl;
pub use auth_service_impl::{SeaOrmAuthService, ensure_admin};

pub mod export;

pub mod work_order_service;
pub use work_order_service::WorkOrderService;
