use bazaar_core::baas::BaasClient;

use crate::infra::functions::EdgeFunctions;
use crate::infra::gotrue::GoTrueAuth;
use crate::infra::rest::RestRoleLookup;
use crate::infra::sessions::SessionRegistry;
use crate::usecase::admin::AdminUseCase;
use crate::usecase::role::RoleResolver;
use crate::usecase::session::SessionGate;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub baas: BaasClient,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn auth_port(&self) -> GoTrueAuth {
        GoTrueAuth {
            baas: self.baas.clone(),
            jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn role_lookup(&self) -> RestRoleLookup {
        RestRoleLookup {
            baas: self.baas.clone(),
        }
    }

    pub fn session_gate(&self) -> SessionGate<GoTrueAuth, RestRoleLookup> {
        SessionGate {
            auth: self.auth_port(),
            roles: RoleResolver {
                lookup: self.role_lookup(),
            },
        }
    }

    pub fn admin_usecase(&self) -> AdminUseCase<EdgeFunctions> {
        AdminUseCase {
            functions: EdgeFunctions {
                baas: self.baas.clone(),
            },
        }
    }
}
