use agro_core::model::farmer::{
    FarmerDraft, FarmerInput, DOCUMENT_FIELD, INVALID_DOCUMENT_MESSAGE,
};
use agro_core::model::field_errors::REQUIRED;
use agro_core::repo::farmer_repo::{
    FarmerRepository, SqliteFarmerRepository, DUPLICATE_DOCUMENT_MESSAGE,
};
use agro_core::service::farmer_service::FarmerService;
use agro_core::{open_db_in_memory, DocumentPolicy, PageRequest, RepoError, ServiceError};
use rusqlite::Connection;
use uuid::Uuid;

fn input(document: &str, name: &str) -> FarmerInput {
    FarmerInput {
        document: Some(document.to_string()),
        name: Some(name.to_string()),
    }
}

fn service(conn: &Connection) -> FarmerService<SqliteFarmerRepository<'_>> {
    FarmerService::new(SqliteFarmerRepository::try_new(conn).unwrap())
}

#[test]
fn create_persists_normalized_document() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let farmer = service
        .create_farmer(&input("951.810.400-04", "Ana Souza"))
        .unwrap();
    assert_eq!(farmer.document, "95181040004");
    assert_eq!(farmer.name, "Ana Souza");
    assert!(farmer.created_at > 0);

    let loaded = service.get_farmer(farmer.id).unwrap();
    assert_eq!(loaded, farmer);
}

#[test]
fn invalid_document_is_a_field_error() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service
        .create_farmer(&input("12345678901", "Ana"))
        .unwrap_err();
    let ServiceError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.messages(DOCUMENT_FIELD), [INVALID_DOCUMENT_MESSAGE]);
}

#[test]
fn missing_fields_are_all_reported() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.create_farmer(&FarmerInput::default()).unwrap_err();
    let ServiceError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(errors.messages(DOCUMENT_FIELD), [REQUIRED]);
    assert_eq!(errors.messages("name"), [REQUIRED]);
}

#[test]
fn repeated_digits_are_accepted_only_when_policy_allows() {
    let conn = open_db_in_memory().unwrap();
    let strict = service(&conn);
    assert!(matches!(
        strict.create_farmer(&input("00000000000", "Zero")),
        Err(ServiceError::Validation(_))
    ));

    let lenient = FarmerService::with_policy(
        SqliteFarmerRepository::try_new(&conn).unwrap(),
        DocumentPolicy {
            reject_repeated_digits: false,
        },
    );
    assert!(lenient.create_farmer(&input("00000000000", "Zero")).is_ok());
}

#[test]
fn duplicate_document_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.create_farmer(&input("95181040004", "Ana")).unwrap();
    let err = service
        .create_farmer(&input("951.810.400-04", "Outra Ana"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(ref msg) if msg == DUPLICATE_DOCUMENT_MESSAGE));
}

#[test]
fn unique_constraint_backs_the_pre_check() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFarmerRepository::try_new(&conn).unwrap();
    let draft = FarmerDraft {
        document: "95181040004".to_string(),
        name: "Ana".to_string(),
    };

    repo.create_farmer(&draft).unwrap();
    let err = repo.create_farmer(&draft).unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[test]
fn update_keeps_own_document_and_patch_changes_one_field() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let farmer = service.create_farmer(&input("95181040004", "Ana")).unwrap();

    let updated = service
        .update_farmer(farmer.id, &input("95181040004", "Ana Maria"))
        .unwrap();
    assert_eq!(updated.name, "Ana Maria");
    assert!(updated.updated_at >= farmer.updated_at);

    let patched = service
        .patch_farmer(
            farmer.id,
            FarmerInput {
                document: Some("11.222.333/0001-81".to_string()),
                name: None,
            },
        )
        .unwrap();
    assert_eq!(patched.document, "11222333000181");
    assert_eq!(patched.name, "Ana Maria");
}

#[test]
fn full_update_requires_every_field() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let farmer = service.create_farmer(&input("95181040004", "Ana")).unwrap();

    let err = service
        .update_farmer(
            farmer.id,
            &FarmerInput {
                document: None,
                name: Some("Ana".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn missing_farmer_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let id = Uuid::new_v4();

    assert!(matches!(service.get_farmer(id), Err(ServiceError::NotFound { .. })));
    assert!(matches!(
        service.update_farmer(id, &input("95181040004", "Ana")),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(service.delete_farmer(id), Err(ServiceError::NotFound { .. })));
}

#[test]
fn list_is_paged_with_total_count() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    for (document, name) in [
        ("95181040004", "A"),
        ("42442756064", "B"),
        ("52998224725", "C"),
    ] {
        service.create_farmer(&input(document, name)).unwrap();
    }

    let first = service.list_farmers(&PageRequest::new(1, 2)).unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.page_count(), 2);
    assert!(first.has_next());
    assert!(!first.has_previous());

    let second = service.list_farmers(&PageRequest::new(2, 2)).unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(!second.has_next());
    assert!(second.has_previous());
}

#[test]
fn delete_removes_farmer() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let farmer = service.create_farmer(&input("95181040004", "Ana")).unwrap();

    service.delete_farmer(farmer.id).unwrap();
    assert!(matches!(
        service.get_farmer(farmer.id),
        Err(ServiceError::NotFound { .. })
    ));
}
