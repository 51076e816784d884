pub use super::cart::Entity as Cart;
pub use super::cart_item::Entity as CartItem;
pub use super::category::Entity as Category;
pub use super::order::Entity as Order;
pub use super::order_item::Entity as OrderItem;
pub use super::product::Entity as Product;
pub use super::role::Entity as Role;
pub use super::user::Entity as User;
