pub mod gateway;
pub mod login;
pub mod view;

pub use gateway::{AuthError, AuthGateway, MockAuth, RemoteAuth};
pub use login::LoginView;
pub use view::{DashboardView, RestaurantForm, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Dashboard,
}
