use uuid::Uuid;

use bazaar_backoffice::domain::types::AdminFunction;
use bazaar_backoffice::error::BackofficeError;
use bazaar_backoffice::usecase::admin::{AdminUseCase, AssignRoleInput, CreateManagerInput};
use bazaar_domain::id::{EntityId, UserId};
use bazaar_domain::role::Role;

use crate::helpers::MockFunctions;

const TOKEN: &str = "admin-access-token";

fn usecase() -> (AdminUseCase<MockFunctions>, MockFunctions) {
    let functions = MockFunctions::default();
    (
        AdminUseCase {
            functions: functions.clone(),
        },
        functions,
    )
}

fn create_input(email: &str, password: &str, role: Role) -> CreateManagerInput {
    CreateManagerInput {
        email: email.to_owned(),
        password: password.to_owned(),
        role,
        entity_id: EntityId(Uuid::new_v4()),
    }
}

#[tokio::test]
async fn should_invoke_create_manager_with_payload() {
    let (usecase, functions) = usecase();

    usecase
        .create_manager(
            TOKEN,
            create_input(" hotel@bazaar.test ", "long-enough", Role::HotelManager),
        )
        .await
        .unwrap();

    let calls = functions.invocations.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (function, payload) = &calls[0];
    assert_eq!(*function, AdminFunction::CreateManager);
    assert_eq!(payload["email"], "hotel@bazaar.test");
    assert_eq!(payload["role"], "hotel-manager");
}

#[tokio::test]
async fn should_reject_manager_creation_with_bad_input() {
    let (usecase, functions) = usecase();

    let cases = [
        create_input("no-at-sign", "long-enough", Role::StoreManager),
        create_input("ok@bazaar.test", "short", Role::StoreManager),
        create_input("ok@bazaar.test", "long-enough", Role::Superadmin),
    ];
    for input in cases {
        let result = usecase.create_manager(TOKEN, input).await;
        assert!(matches!(result, Err(BackofficeError::InvalidInput(_))));
    }
    assert!(functions.invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_entity_for_manager_role_assignment() {
    let (usecase, _) = usecase();

    let result = usecase
        .assign_role(
            TOKEN,
            AssignRoleInput {
                user_id: UserId(Uuid::new_v4()),
                role: Role::TaxiManager,
                entity_id: None,
            },
        )
        .await;

    assert!(matches!(result, Err(BackofficeError::InvalidInput(_))));
}

#[tokio::test]
async fn should_assign_superadmin_without_entity() {
    let (usecase, functions) = usecase();

    usecase
        .assign_role(
            TOKEN,
            AssignRoleInput {
                user_id: UserId(Uuid::new_v4()),
                role: Role::Superadmin,
                entity_id: None,
            },
        )
        .await
        .unwrap();

    let calls = functions.invocations.lock().unwrap();
    assert_eq!(calls[0].0, AdminFunction::AssignRole);
    assert!(calls[0].1.get("entity_id").is_none());
}

#[tokio::test]
async fn should_never_assign_anonymous() {
    let (usecase, _) = usecase();
    let result = usecase
        .assign_role(
            TOKEN,
            AssignRoleInput {
                user_id: UserId(Uuid::new_v4()),
                role: Role::Anonymous,
                entity_id: None,
            },
        )
        .await;
    assert!(matches!(result, Err(BackofficeError::InvalidInput(_))));
}

#[tokio::test]
async fn should_refuse_self_deletion() {
    let (usecase, functions) = usecase();
    let me = UserId(Uuid::new_v4());

    let result = usecase.delete_account(TOKEN, me, me).await;

    assert!(matches!(result, Err(BackofficeError::InvalidInput(_))));
    assert!(functions.invocations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_surface_function_rejection() {
    let functions = MockFunctions {
        reject_with: Some("user not found".into()),
        ..MockFunctions::default()
    };
    let usecase = AdminUseCase { functions };

    let result = usecase
        .reset_password(TOKEN, UserId(Uuid::new_v4()), "new-password-1".into())
        .await;

    assert!(
        matches!(result, Err(BackofficeError::AdminFunctionRejected(reason)) if reason == "user not found")
    );
}
