use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use bazaar_core::health::health_routes;
use bazaar_core::middleware::with_observability;
use bazaar_domain::role::Role;

use crate::handlers::{
    admin::{assign_role, create_manager, delete_account, reset_password},
    auth::{session, sign_in, sign_out, verify_mfa},
    dashboard::{admin_dashboard, assignment, manager_dashboard},
    guard::route_guard,
};
use crate::state::AppState;
use crate::usecase::guard::{Capability, Requirement};

pub fn build_router(state: AppState) -> Router {
    let admin: Router<AppState> = Router::new()
        .route("/admin/dashboard", get(admin_dashboard))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Requirement::Role(Role::Superadmin)),
            route_guard,
        ));

    let accounts: Router<AppState> = Router::new()
        .route("/admin/managers", post(create_manager))
        .route("/admin/managers/{user_id}", delete(delete_account))
        .route("/admin/managers/{user_id}/role", put(assign_role))
        .route("/admin/managers/{user_id}/password-reset", post(reset_password))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Requirement::Capability(Capability::ManageAccounts)),
            route_guard,
        ));

    let store: Router<AppState> = Router::new()
        .route("/store-manager/dashboard", get(manager_dashboard))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Requirement::Role(Role::StoreManager)),
            route_guard,
        ));

    let hotel: Router<AppState> = Router::new()
        .route("/hotel-manager/dashboard", get(manager_dashboard))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Requirement::Role(Role::HotelManager)),
            route_guard,
        ));

    let taxi: Router<AppState> = Router::new()
        .route("/taxi-manager/dashboard", get(manager_dashboard))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Requirement::Role(Role::TaxiManager)),
            route_guard,
        ));

    let listings: Router<AppState> = Router::new()
        .route("/manager/assignment", get(assignment))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Requirement::Capability(Capability::ManageListings)),
            route_guard,
        ));

    let app = Router::new()
        .merge(health_routes::<AppState>())
        // Session
        .route("/auth/session", get(session))
        .route("/auth/{portal}/sign-in", post(sign_in))
        .route("/auth/{portal}/mfa/verify", post(verify_mfa))
        .route("/auth/{portal}/sign-out", post(sign_out))
        // Guarded areas
        .merge(admin)
        .merge(accounts)
        .merge(store)
        .merge(hotel)
        .merge(taxi)
        .merge(listings)
        .with_state(state);

    with_observability(app)
}
